use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Stats database under `~/.local/state/mathima`, with a
    /// platform-specific fallback when HOME is unset.
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("mathima");
            Some(state_dir.join("stats.db"))
        } else {
            ProjectDirs::from("", "", "mathima")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("stats.db"))
        }
    }

    /// Session history log in the config directory.
    pub fn log_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mathima")
            .map(|proj_dirs| proj_dirs.config_dir().join("log.csv"))
    }
}
