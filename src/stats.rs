use crate::app_dirs::AppDirs;
use crate::content::ItemDifficulty;
use chrono::{DateTime, Local};
use itertools::Itertools;
use rusqlite::{params, Connection, Result};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Which game an answer or session came from; doubles as the label written
/// to the database and the session log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum GameKind {
    #[strum(serialize = "memory")]
    Memory,
    #[strum(serialize = "vocabulary")]
    Vocabulary,
    #[strum(serialize = "verbs")]
    Verbs,
    #[strum(serialize = "numbers")]
    Numbers,
    #[strum(serialize = "writing")]
    Writing,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Memory,
        GameKind::Vocabulary,
        GameKind::Verbs,
        GameKind::Numbers,
        GameKind::Writing,
    ];

    /// Menu label shown to the learner.
    pub fn title(self) -> &'static str {
        match self {
            GameKind::Memory => "Μνήμη — ταίριαξε τα ζευγάρια",
            GameKind::Vocabulary => "Λεξιλόγιο — διάλεξε τη μετάφραση",
            GameKind::Verbs => "Ρήματα — βρες τον σωστό τύπο",
            GameKind::Numbers => "Αριθμοί — λογαριασμοί και λέξεις",
            GameKind::Writing => "Γράψιμο — γράψε τη λέξη",
        }
    }
}

/// One recorded answer to one item.
#[derive(Debug, Clone)]
pub struct AnswerStat {
    pub item_id: String,
    pub game: GameKind,
    pub was_correct: bool,
    pub answer_ms: u64,
    pub timestamp: DateTime<Local>,
}

/// Aggregated row for the stats screen.
#[derive(Debug, Clone)]
pub struct ItemSummary {
    pub item_id: String,
    pub miss_rate: f64,
    pub avg_answer_ms: f64,
    pub attempts: i64,
}

/// Database of per-item answer outcomes, driving the weakest-first item
/// selection and the stats screen.
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open (and if needed create) the database at the default location.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("mathima_stats.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::open(&db_path)
    }

    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS answer_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id TEXT NOT NULL,
                game TEXT NOT NULL,
                was_correct BOOLEAN NOT NULL,
                answer_ms INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_answer_stats_item ON answer_stats(item_id)",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_answer_stats_timestamp ON answer_stats(timestamp)",
            [],
        )?;

        Ok(StatsDb { conn })
    }

    pub fn record_answer(&self, stat: &AnswerStat) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO answer_stats (item_id, game, was_correct, answer_ms, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                stat.item_id,
                stat.game.to_string(),
                stat.was_correct,
                stat.answer_ms,
                stat.timestamp.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Per-item difficulty metrics for the selection strategies.
    pub fn item_difficulties(&self) -> Result<HashMap<String, ItemDifficulty>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT item_id,
                   (1.0 - AVG(was_correct)) * 100.0,
                   AVG(answer_ms),
                   COUNT(*)
            FROM answer_stats
            GROUP BY item_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                ItemDifficulty {
                    miss_rate: row.get(1)?,
                    avg_answer_ms: row.get(2)?,
                    attempts: row.get(3)?,
                },
            ))
        })?;

        let mut difficulties = HashMap::new();
        for row in rows {
            let (item_id, difficulty) = row?;
            difficulties.insert(item_id, difficulty);
        }
        Ok(difficulties)
    }

    /// Worst items first, for the stats screen.
    pub fn summary(&self, limit: usize) -> Result<Vec<ItemSummary>> {
        let difficulties = self.item_difficulties()?;

        Ok(difficulties
            .into_iter()
            .map(|(item_id, d)| ItemSummary {
                item_id,
                miss_rate: d.miss_rate,
                avg_answer_ms: d.avg_answer_ms,
                attempts: d.attempts,
            })
            .sorted_by(|a, b| {
                b.miss_rate
                    .partial_cmp(&a.miss_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .take(limit)
            .collect())
    }

    /// Timestamp of the most recent recorded answer.
    pub fn last_practiced(&self) -> Result<Option<DateTime<Local>>> {
        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM answer_stats ORDER BY timestamp DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        Ok(newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Local)))
    }

    /// Dump all recorded answers as CSV.
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, game, was_correct, answer_ms, timestamp FROM answer_stats ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, u64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(["item_id", "game", "was_correct", "answer_ms", "timestamp"])
            .map_err(csv_to_sqlite_error)?;
        for row in rows {
            let (item_id, game, was_correct, answer_ms, timestamp) = row?;
            csv_writer
                .write_record([
                    item_id,
                    game,
                    was_correct.to_string(),
                    answer_ms.to_string(),
                    timestamp,
                ])
                .map_err(csv_to_sqlite_error)?;
        }
        csv_writer.flush().map_err(|e| {
            rusqlite::Error::ToSqlConversionFailure(Box::new(e))
        })?;
        Ok(())
    }
}

fn csv_to_sqlite_error(e: csv::Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

/// Result of one finished session, for the results screen and the log.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub game: GameKind,
    pub detail: String,
    pub total: usize,
    pub correct: usize,
    pub accuracy: u32,
    pub score: Option<u32>,
    pub moves: Option<u32>,
    pub elapsed_secs: f64,
}

/// Append a finished session to the plain-CSV history log, emitting the
/// header on first write.
pub fn append_session_log(log_path: &Path, summary: &SessionSummary) -> io::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let needs_header = !log_path.exists();

    let mut log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_path)?;

    if needs_header {
        writeln!(
            log_file,
            "date,game,detail,total,correct,accuracy,score,moves,elapsed_secs"
        )?;
    }

    writeln!(
        log_file,
        "{},{},{},{},{},{},{},{},{:.2}",
        Local::now().format("%c"),
        summary.game,
        summary.detail,
        summary.total,
        summary.correct,
        summary.accuracy,
        summary.score.map_or(String::new(), |s| s.to_string()),
        summary.moves.map_or(String::new(), |m| m.to_string()),
        summary.elapsed_secs,
    )?;

    Ok(())
}
