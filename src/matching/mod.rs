pub mod deck;
pub mod session;

pub use deck::{build_deck, Card, Difficulty, MatchTheme};
pub use session::{
    FlipOutcome, GameStatus, MatchSession, MatchStats, PendingResolution, MATCH_RESOLVE_TICKS,
    MATCH_SCORE_BONUS, MISMATCH_RESOLVE_TICKS,
};
