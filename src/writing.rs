use crate::answer::{compare_vocab_answer, AnswerVerdict};
use crate::content::VocabWord;
use crate::stats::{AnswerStat, GameKind, StatsDb};
use crate::util::calculate_accuracy;
use chrono::Local;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub verdict: AnswerVerdict,
    pub expected: String,
    pub finished: bool,
}

/// The writing drill: the English side is shown, the learner types the
/// Greek. Tally mirrors the quiz session, with close answers tracked
/// separately from exact ones.
#[derive(Debug)]
pub struct WritingSession {
    pub words: Vec<VocabWord>,
    pub index: usize,
    pub exact: usize,
    pub close: usize,
    pub wrong: usize,
    stats_db: Option<StatsDb>,
    started_at: SystemTime,
    word_started_at: Option<SystemTime>,
}

impl WritingSession {
    pub fn new(words: Vec<VocabWord>) -> Self {
        let word_started_at = if words.is_empty() {
            None
        } else {
            Some(SystemTime::now())
        };
        Self {
            words,
            index: 0,
            exact: 0,
            close: 0,
            wrong: 0,
            stats_db: None,
            started_at: SystemTime::now(),
            word_started_at,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .elapsed()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn with_stats_db(mut self, stats_db: Option<StatsDb>) -> Self {
        self.stats_db = stats_db;
        self
    }

    pub fn current(&self) -> Option<&VocabWord> {
        self.words.get(self.index)
    }

    pub fn is_complete(&self) -> bool {
        self.index == self.words.len()
    }

    pub fn total(&self) -> usize {
        self.words.len()
    }

    pub fn correct(&self) -> usize {
        self.exact + self.close
    }

    pub fn answered(&self) -> usize {
        self.exact + self.close + self.wrong
    }

    pub fn accuracy(&self) -> u32 {
        calculate_accuracy(self.correct(), self.answered())
    }

    /// Grade the typed answer for the current word and advance. `None` when
    /// the drill is already finished.
    pub fn submit(&mut self, typed: &str) -> Option<SubmitOutcome> {
        let word = self.words.get(self.index)?;

        let verdict = compare_vocab_answer(word, typed);
        match verdict {
            AnswerVerdict::Exact => self.exact += 1,
            AnswerVerdict::Close => self.close += 1,
            AnswerVerdict::Wrong => self.wrong += 1,
        }

        if let Some(ref stats_db) = self.stats_db {
            let answer_ms = self
                .word_started_at
                .and_then(|t| t.elapsed().ok())
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            let _ = stats_db.record_answer(&AnswerStat {
                item_id: word.id.clone(),
                game: GameKind::Writing,
                was_correct: verdict.counts_as_correct(),
                answer_ms,
                timestamp: Local::now(),
            });
        }

        let expected = word.display_greek();
        self.index += 1;
        self.word_started_at = if self.is_complete() {
            None
        } else {
            Some(SystemTime::now())
        };

        Some(SubmitOutcome {
            verdict,
            expected,
            finished: self.is_complete(),
        })
    }
}
