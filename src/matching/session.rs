use super::deck::Card;
use std::time::SystemTime;

// Reveal pacing in ticks at the app tick rate (100ms): a found pair locks in
// quickly, a miss stays visible long enough to memorize both faces.
pub const MATCH_RESOLVE_TICKS: u32 = 5;
pub const MISMATCH_RESOLVE_TICKS: u32 = 10;

pub const MATCH_SCORE_BONUS: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    Won,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub moves: u32,
    pub matches: u32,
    pub score: u32,
}

/// A pair reveal waiting out its delay. Carries the generation it was
/// scheduled under so a resolution that outlives its session is discarded
/// instead of mutating a fresh board.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingResolution {
    pub first: String,
    pub second: String,
    pub matched: bool,
    pub remaining_ticks: u32,
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Input was ignored: wrong status, two cards already up, stale id
    Ignored,
    /// First card of a pair turned up
    Flipped,
    /// Second card turned up; resolution scheduled
    PairCompleted { matched: bool },
}

/// One in-progress memory game. Owns its cards exclusively; replaced
/// wholesale on reset.
#[derive(Debug)]
pub struct MatchSession {
    pub cards: Vec<Card>,
    pub flipped_ids: Vec<String>,
    pub status: GameStatus,
    pub stats: MatchStats,
    pending: Option<PendingResolution>,
    generation: u64,
    started_at: Option<SystemTime>,
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchSession {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            flipped_ids: Vec::new(),
            status: GameStatus::Menu,
            stats: MatchStats::default(),
            pending: None,
            generation: 0,
            started_at: None,
        }
    }

    /// Start playing with a freshly built deck. Any state left over from a
    /// previous round is dropped, and the generation advances so stale
    /// resolutions can no longer land.
    pub fn start_game(&mut self, cards: Vec<Card>) {
        self.generation += 1;
        self.cards = cards;
        self.flipped_ids.clear();
        self.pending = None;
        self.stats = MatchStats::default();
        self.status = GameStatus::Playing;
        self.started_at = Some(SystemTime::now());
    }

    pub fn total_pairs(&self) -> u32 {
        (self.cards.len() / 2) as u32
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<&PendingResolution> {
        self.pending.as_ref()
    }

    /// True while a completed pair is waiting out its reveal delay.
    pub fn is_resolving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .and_then(|t| t.elapsed().ok())
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Turn a card face-up. All abnormal input is a silent no-op: the board
    /// only ever offers valid ids, and the two-card guard rejects flips that
    /// arrive while a pair is waiting to resolve.
    pub fn flip_card(&mut self, card_id: &str) -> FlipOutcome {
        if self.status != GameStatus::Playing {
            return FlipOutcome::Ignored;
        }
        if self.flipped_ids.len() >= 2 {
            return FlipOutcome::Ignored;
        }
        if self.flipped_ids.iter().any(|id| id == card_id) {
            return FlipOutcome::Ignored;
        }

        let card = match self.cards.iter_mut().find(|c| c.id == card_id) {
            Some(card) => card,
            None => return FlipOutcome::Ignored,
        };
        if card.is_matched || card.is_flipped {
            return FlipOutcome::Ignored;
        }

        card.is_flipped = true;
        self.flipped_ids.push(card_id.to_string());
        self.stats.moves += 1;

        if self.flipped_ids.len() == 2 {
            let first = self.flipped_ids[0].clone();
            let second = self.flipped_ids[1].clone();
            let matched = self.group_key_of(&first) == self.group_key_of(&second);
            self.pending = Some(PendingResolution {
                first,
                second,
                matched,
                remaining_ticks: if matched {
                    MATCH_RESOLVE_TICKS
                } else {
                    MISMATCH_RESOLVE_TICKS
                },
                generation: self.generation,
            });
            FlipOutcome::PairCompleted { matched }
        } else {
            FlipOutcome::Flipped
        }
    }

    /// Advance the reveal delay by one tick. Paused sessions freeze.
    pub fn on_tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        let due = match &mut self.pending {
            Some(resolution) => {
                resolution.remaining_ticks = resolution.remaining_ticks.saturating_sub(1);
                resolution.remaining_ticks == 0
            }
            None => return,
        };
        if due {
            if let Some(resolution) = self.pending.take() {
                self.apply_resolution(resolution);
            }
        }
    }

    /// Apply a scheduled resolution. Discarded when the session has moved on
    /// since it was scheduled (reset or new game bumped the generation).
    pub fn apply_resolution(&mut self, resolution: PendingResolution) {
        if resolution.generation != self.generation {
            return;
        }
        if self.status != GameStatus::Playing {
            return;
        }
        self.pending = None;

        if resolution.matched {
            for id in [&resolution.first, &resolution.second] {
                if let Some(card) = self.cards.iter_mut().find(|c| &c.id == id) {
                    card.is_matched = true;
                }
            }
            self.stats.matches += 1;
            self.stats.score += MATCH_SCORE_BONUS;
            if self.stats.matches == self.total_pairs() {
                self.status = GameStatus::Won;
            }
        } else {
            for id in [&resolution.first, &resolution.second] {
                if let Some(card) = self.cards.iter_mut().find(|c| &c.id == id) {
                    card.is_flipped = false;
                }
            }
        }
        self.flipped_ids.clear();
    }

    pub fn pause_game(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
        }
    }

    pub fn resume_game(&mut self) {
        if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
        }
    }

    /// Drop everything and return to the menu.
    pub fn reset_game(&mut self) {
        self.generation += 1;
        self.cards.clear();
        self.flipped_ids.clear();
        self.pending = None;
        self.stats = MatchStats::default();
        self.status = GameStatus::Menu;
        self.started_at = None;
    }

    fn group_key_of(&self, card_id: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|c| c.id == card_id)
            .map(|c| c.group_key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_deck(pairs: usize) -> Vec<Card> {
        let mut cards = Vec::new();
        for i in 0..pairs {
            for suffix in ["a", "b"] {
                cards.push(Card {
                    id: format!("g{i}-{suffix}"),
                    group_key: format!("g{i}"),
                    face: format!("{i}{suffix}"),
                    is_flipped: false,
                    is_matched: false,
                    position: cards.len(),
                });
            }
        }
        cards
    }

    fn started_session(pairs: usize) -> MatchSession {
        let mut session = MatchSession::new();
        session.start_game(test_deck(pairs));
        session
    }

    fn drain_pending(session: &mut MatchSession) {
        for _ in 0..MISMATCH_RESOLVE_TICKS {
            session.on_tick();
        }
    }

    #[test]
    fn test_new_session_is_in_menu() {
        let session = MatchSession::new();
        assert_eq!(session.status, GameStatus::Menu);
        assert!(session.cards.is_empty());
    }

    #[test]
    fn test_start_game_resets_state() {
        let mut session = started_session(6);
        session.flip_card("g0-a");
        session.flip_card("g0-b");

        session.start_game(test_deck(6));

        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.stats, MatchStats::default());
        assert!(session.flipped_ids.is_empty());
        assert!(session.pending().is_none());
        assert!(session.cards.iter().all(|c| !c.is_flipped && !c.is_matched));
        assert_eq!(session.total_pairs(), 6);
    }

    #[test]
    fn test_flip_ignored_in_menu() {
        let mut session = MatchSession::new();
        assert_eq!(session.flip_card("g0-a"), FlipOutcome::Ignored);
    }

    #[test]
    fn test_flip_unknown_id_is_noop() {
        let mut session = started_session(2);
        assert_eq!(session.flip_card("nope"), FlipOutcome::Ignored);
        assert_eq!(session.stats.moves, 0);
    }

    #[test]
    fn test_flip_same_card_twice_is_noop() {
        let mut session = started_session(2);
        assert_eq!(session.flip_card("g0-a"), FlipOutcome::Flipped);
        assert_eq!(session.flip_card("g0-a"), FlipOutcome::Ignored);
        assert_eq!(session.stats.moves, 1);
    }

    #[test]
    fn test_third_flip_while_two_up_is_noop() {
        let mut session = started_session(3);
        session.flip_card("g0-a");
        session.flip_card("g1-a");

        let before_moves = session.stats.moves;
        assert_eq!(session.flip_card("g2-a"), FlipOutcome::Ignored);
        assert_eq!(session.stats.moves, before_moves);
        assert_eq!(session.flipped_ids.len(), 2);

        let third = session.cards.iter().find(|c| c.id == "g2-a").unwrap();
        assert!(!third.is_flipped);
    }

    #[test]
    fn test_matching_pair_resolves_after_delay() {
        let mut session = started_session(6);

        assert_eq!(session.flip_card("g0-a"), FlipOutcome::Flipped);
        assert_matches!(
            session.flip_card("g0-b"),
            FlipOutcome::PairCompleted { matched: true }
        );

        // Still pending until the reveal delay elapses
        assert!(session.is_resolving());
        for _ in 0..MATCH_RESOLVE_TICKS {
            session.on_tick();
        }

        let a = session.cards.iter().find(|c| c.id == "g0-a").unwrap();
        let b = session.cards.iter().find(|c| c.id == "g0-b").unwrap();
        assert!(a.is_matched && b.is_matched);
        assert!(session.flipped_ids.is_empty());
        assert_eq!(session.stats.matches, 1);
        assert_eq!(session.stats.moves, 2);
        assert_eq!(session.stats.score, MATCH_SCORE_BONUS);
        assert_eq!(session.status, GameStatus::Playing);
    }

    #[test]
    fn test_mismatched_pair_flips_back() {
        let mut session = started_session(6);

        session.flip_card("g0-a");
        assert_matches!(
            session.flip_card("g1-a"),
            FlipOutcome::PairCompleted { matched: false }
        );

        drain_pending(&mut session);

        let a = session.cards.iter().find(|c| c.id == "g0-a").unwrap();
        let b = session.cards.iter().find(|c| c.id == "g1-a").unwrap();
        assert!(!a.is_flipped && !b.is_flipped);
        assert!(!a.is_matched && !b.is_matched);
        assert!(session.flipped_ids.is_empty());
        assert_eq!(session.stats.matches, 0);
        assert_eq!(session.stats.moves, 2);
    }

    #[test]
    fn test_mismatch_keeps_cards_up_longer_than_match() {
        let mut session = started_session(6);
        session.flip_card("g0-a");
        session.flip_card("g1-a");

        for _ in 0..MATCH_RESOLVE_TICKS {
            session.on_tick();
        }
        // A mismatch is still on display after the (shorter) match delay
        assert!(session.is_resolving());
    }

    #[test]
    fn test_winning_flow_reaches_won_only_at_last_pair() {
        let mut session = started_session(3);

        for i in 0..3 {
            session.flip_card(&format!("g{i}-a"));
            session.flip_card(&format!("g{i}-b"));
            drain_pending(&mut session);
            if i < 2 {
                assert_eq!(session.status, GameStatus::Playing);
            }
        }

        assert_eq!(session.status, GameStatus::Won);
        assert_eq!(session.stats.matches, session.total_pairs());
        assert_eq!(session.stats.score, 3 * MATCH_SCORE_BONUS);
        // 2 moves per pair
        assert_eq!(session.stats.moves, 6);
    }

    #[test]
    fn test_flips_ignored_after_win() {
        let mut session = started_session(1);
        session.flip_card("g0-a");
        session.flip_card("g0-b");
        drain_pending(&mut session);
        assert_eq!(session.status, GameStatus::Won);

        assert_eq!(session.flip_card("g0-a"), FlipOutcome::Ignored);
    }

    #[test]
    fn test_pause_blocks_flips_and_freezes_countdown() {
        let mut session = started_session(3);
        session.flip_card("g0-a");
        session.flip_card("g1-a");
        let ticks_before = session.pending().unwrap().remaining_ticks;

        session.pause_game();
        assert_eq!(session.status, GameStatus::Paused);
        assert_eq!(session.flip_card("g2-a"), FlipOutcome::Ignored);

        session.on_tick();
        session.on_tick();
        assert_eq!(session.pending().unwrap().remaining_ticks, ticks_before);

        session.resume_game();
        assert_eq!(session.status, GameStatus::Playing);
        drain_pending(&mut session);
        assert!(!session.is_resolving());
    }

    #[test]
    fn test_resume_only_from_paused() {
        let mut session = MatchSession::new();
        session.resume_game();
        assert_eq!(session.status, GameStatus::Menu);
    }

    #[test]
    fn test_reset_returns_to_menu() {
        let mut session = started_session(2);
        session.flip_card("g0-a");

        session.reset_game();

        assert_eq!(session.status, GameStatus::Menu);
        assert!(session.cards.is_empty());
        assert!(session.flipped_ids.is_empty());
        assert_eq!(session.stats, MatchStats::default());
    }

    #[test]
    fn test_stale_resolution_is_discarded_after_reset() {
        let mut session = started_session(2);
        session.flip_card("g0-a");
        session.flip_card("g0-b");
        let stale = session.pending().unwrap().clone();

        session.reset_game();
        session.start_game(test_deck(2));
        session.apply_resolution(stale);

        // The new board is untouched: no card matched, no score granted
        assert!(session.cards.iter().all(|c| !c.is_matched));
        assert_eq!(session.stats.matches, 0);
        assert_eq!(session.stats.score, 0);
    }

    #[test]
    fn test_stale_resolution_is_discarded_after_restart() {
        let mut session = started_session(2);
        session.flip_card("g0-a");
        session.flip_card("g1-a");
        let stale = session.pending().unwrap().clone();

        session.start_game(test_deck(2));
        session.apply_resolution(stale);

        assert!(session.cards.iter().all(|c| !c.is_flipped));
        assert!(session.flipped_ids.is_empty());
    }

    #[test]
    fn test_current_generation_resolution_applies() {
        let mut session = started_session(2);
        session.flip_card("g0-a");
        session.flip_card("g0-b");
        let pending = session.pending().unwrap().clone();

        // Applying the in-flight resolution early is equivalent to the
        // delay elapsing
        session.apply_resolution(pending);

        assert_eq!(session.stats.matches, 1);
        assert!(!session.is_resolving());
    }
}
