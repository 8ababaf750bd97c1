use super::generator::Question;
use crate::stats::{AnswerStat, GameKind, StatsDb};
use crate::util::calculate_accuracy;
use chrono::Local;
use std::time::SystemTime;

/// What a single answer did to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOutcome {
    pub was_correct: bool,
    pub correct_answer: String,
    pub finished: bool,
}

/// One quiz run: an ordered question sequence and a running tally.
/// Invalid input (answering a finished session, an out-of-range option) is
/// ignored, mirroring the rest of the game engines.
#[derive(Debug)]
pub struct QuizSession {
    pub questions: Vec<Question>,
    pub index: usize,
    pub correct: usize,
    pub wrong: usize,
    game: GameKind,
    stats_db: Option<StatsDb>,
    started_at: SystemTime,
    question_started_at: Option<SystemTime>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, game: GameKind) -> Self {
        let question_started_at = if questions.is_empty() {
            None
        } else {
            Some(SystemTime::now())
        };
        Self {
            questions,
            index: 0,
            correct: 0,
            wrong: 0,
            game,
            stats_db: None,
            started_at: SystemTime::now(),
            question_started_at,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .elapsed()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Attach the answer database; per-item outcomes get recorded as the
    /// learner answers.
    pub fn with_stats_db(mut self, stats_db: Option<StatsDb>) -> Self {
        self.stats_db = stats_db;
        self
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn is_complete(&self) -> bool {
        self.index == self.questions.len()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answered(&self) -> usize {
        self.correct + self.wrong
    }

    pub fn accuracy(&self) -> u32 {
        calculate_accuracy(self.correct, self.answered())
    }

    /// Answer the current question by option index and advance. Returns
    /// `None` when there is nothing to answer (complete, or a stale index).
    pub fn select_option(&mut self, option_index: usize) -> Option<SelectOutcome> {
        let question = self.questions.get(self.index)?;
        let selected = question.options.get(option_index)?;

        let was_correct = question.is_correct(selected);
        if was_correct {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }

        if let Some(ref stats_db) = self.stats_db {
            let answer_ms = self
                .question_started_at
                .and_then(|t| t.elapsed().ok())
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            let _ = stats_db.record_answer(&AnswerStat {
                item_id: question.item_id.clone(),
                game: self.game,
                was_correct,
                answer_ms,
                timestamp: Local::now(),
            });
        }

        let correct_answer = question.correct.clone();
        self.index += 1;
        self.question_started_at = if self.is_complete() {
            None
        } else {
            Some(SystemTime::now())
        };

        Some(SelectOutcome {
            was_correct,
            correct_answer,
            finished: self.is_complete(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize, correct: &str) -> Question {
        let mut options = vec![
            correct.to_string(),
            format!("λάθος-{n}-1"),
            format!("λάθος-{n}-2"),
            format!("λάθος-{n}-3"),
        ];
        // Fixed order keeps the correct answer at index 0 for the tests
        options.sort_by_key(|o| if o == correct { 0 } else { 1 });
        Question {
            id: format!("q{n}"),
            item_id: format!("item{n}"),
            prompt: format!("ερώτηση {n}"),
            correct: correct.to_string(),
            options,
        }
    }

    fn session(count: usize) -> QuizSession {
        let questions = (0..count).map(|n| question(n, "σωστό")).collect();
        QuizSession::new(questions, GameKind::Vocabulary)
    }

    #[test]
    fn test_new_session_starts_at_first_question() {
        let session = session(3);
        assert_eq!(session.index, 0);
        assert!(!session.is_complete());
        assert_eq!(session.current().unwrap().id, "q0");
    }

    #[test]
    fn test_correct_answer_advances_and_tallies() {
        let mut session = session(2);

        let outcome = session.select_option(0).unwrap();

        assert!(outcome.was_correct);
        assert!(!outcome.finished);
        assert_eq!(session.correct, 1);
        assert_eq!(session.wrong, 0);
        assert_eq!(session.index, 1);
    }

    #[test]
    fn test_wrong_answer_reports_correct_value() {
        let mut session = session(1);

        let outcome = session.select_option(2).unwrap();

        assert!(!outcome.was_correct);
        assert_eq!(outcome.correct_answer, "σωστό");
        assert!(outcome.finished);
        assert_eq!(session.wrong, 1);
    }

    #[test]
    fn test_completion() {
        let mut session = session(2);
        session.select_option(0);
        assert!(!session.is_complete());
        session.select_option(1);
        assert!(session.is_complete());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_answer_after_completion_is_ignored() {
        let mut session = session(1);
        session.select_option(0);

        assert!(session.select_option(0).is_none());
        assert_eq!(session.correct, 1);
        assert_eq!(session.index, 1);
    }

    #[test]
    fn test_out_of_range_option_is_ignored() {
        let mut session = session(1);

        assert!(session.select_option(7).is_none());
        assert_eq!(session.answered(), 0);
        assert_eq!(session.index, 0);
    }

    #[test]
    fn test_accuracy() {
        let mut session = session(10);
        for i in 0..10 {
            // 7 correct, 3 wrong
            let option = if i < 7 { 0 } else { 1 };
            session.select_option(option);
        }

        assert_eq!(session.correct, 7);
        assert_eq!(session.wrong, 3);
        assert_eq!(session.accuracy(), 70);
    }

    #[test]
    fn test_accuracy_empty_session() {
        let session = session(0);
        assert_eq!(session.accuracy(), 0);
        assert!(session.is_complete());
    }

    #[test]
    fn test_stats_recorded_when_db_attached() {
        let db = StatsDb::open_in_memory().unwrap();
        let questions = vec![question(0, "σωστό")];
        let mut session =
            QuizSession::new(questions, GameKind::Vocabulary).with_stats_db(Some(db));

        session.select_option(0);

        let difficulties = session.stats_db.as_ref().unwrap().item_difficulties().unwrap();
        assert_eq!(difficulties["item0"].attempts, 1);
        assert!((difficulties["item0"].miss_rate - 0.0).abs() < 1e-9);
    }
}
