// Quiz rounds end to end: generation out of the embedded catalog, answering
// through the session, and answer recording into a stats database on disk.

use mathima::content::{Catalog, PoolFilters, RandomSelector, Tense};
use mathima::numbers::generate_number_questions;
use mathima::matching::Difficulty;
use mathima::quiz::{
    generate_verb_questions, generate_vocab_questions, QuizSession, OPTIONS_PER_QUESTION,
};
use mathima::stats::{GameKind, StatsDb};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

#[test]
fn filtered_vocab_round_only_references_that_category() {
    let catalog = Catalog::load();
    let mut rng = StdRng::seed_from_u64(1);
    let filters = PoolFilters {
        category: Some("animals".to_string()),
        level: None,
    };

    let questions = generate_vocab_questions(
        &catalog.words,
        &filters,
        10,
        &RandomSelector,
        &HashMap::new(),
        &mut rng,
    );

    assert_eq!(questions.len(), 10);
    for question in &questions {
        let word = catalog
            .words
            .iter()
            .find(|w| w.id == question.item_id)
            .expect("question references a catalog word");
        assert_eq!(word.category, "animals");
        assert_eq!(question.options.len(), OPTIONS_PER_QUESTION);
    }
}

#[test]
fn answering_every_question_completes_the_session() {
    let catalog = Catalog::load();
    let mut rng = StdRng::seed_from_u64(2);
    let questions = generate_vocab_questions(
        &catalog.words,
        &PoolFilters::default(),
        5,
        &RandomSelector,
        &HashMap::new(),
        &mut rng,
    );

    let mut session = QuizSession::new(questions, GameKind::Vocabulary);
    let mut last_finished = false;
    while let Some(question) = session.current() {
        // Always answer correctly via the known correct index
        let correct_index = question.correct_index().unwrap();
        let outcome = session.select_option(correct_index).unwrap();
        assert!(outcome.was_correct);
        last_finished = outcome.finished;
    }

    assert!(last_finished);
    assert!(session.is_complete());
    assert_eq!(session.correct, 5);
    assert_eq!(session.accuracy(), 100);
}

#[test]
fn verb_round_with_fixed_tense_and_db_recording() {
    let catalog = Catalog::load();
    let mut rng = StdRng::seed_from_u64(3);
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("stats.db");

    let questions = generate_verb_questions(
        &catalog.verbs,
        &PoolFilters::default(),
        4,
        Some(Tense::Future),
        &RandomSelector,
        &HashMap::new(),
        &mut rng,
    );
    let mut session = QuizSession::new(questions, GameKind::Verbs)
        .with_stats_db(StatsDb::open(&db_path).ok());

    while session.current().is_some() {
        // Answer option 1 regardless of correctness
        session.select_option(0);
    }
    assert_eq!(session.answered(), 4);

    // A second connection sees the recorded answers
    let db = StatsDb::open(&db_path).unwrap();
    let difficulties = db.item_difficulties().unwrap();
    let recorded: i64 = difficulties.values().map(|d| d.attempts).sum();
    assert_eq!(recorded, 4);
    assert!(db.last_practiced().unwrap().is_some());
}

#[test]
fn number_round_is_answerable() {
    let mut rng = StdRng::seed_from_u64(4);
    let questions = generate_number_questions(Difficulty::Easy, 8, &mut rng);
    let mut session = QuizSession::new(questions, GameKind::Numbers);

    while let Some(question) = session.current() {
        let correct_index = question.correct_index().unwrap();
        session.select_option(correct_index);
    }

    assert_eq!(session.correct, 8);
    assert_eq!(session.accuracy(), 100);
}

#[test]
fn weakest_first_round_prefers_recorded_misses() {
    use mathima::content::WeakestFirstSelector;

    let catalog = Catalog::load();
    let mut rng = StdRng::seed_from_u64(5);
    let dir = tempfile::tempdir().unwrap();
    let db = StatsDb::open(&dir.path().join("stats.db")).unwrap();

    // Everything answered right once, except one word missed repeatedly
    for word in &catalog.words {
        db.record_answer(&mathima::stats::AnswerStat {
            item_id: word.id.clone(),
            game: GameKind::Vocabulary,
            was_correct: true,
            answer_ms: 1000,
            timestamp: chrono::Local::now(),
        })
        .unwrap();
    }
    for _ in 0..5 {
        db.record_answer(&mathima::stats::AnswerStat {
            item_id: "lykos".to_string(),
            game: GameKind::Vocabulary,
            was_correct: false,
            answer_ms: 4000,
            timestamp: chrono::Local::now(),
        })
        .unwrap();
    }

    // Restrict to the missed word's category so the weakest-first pool is
    // small and the preference is statistically overwhelming
    let stats = db.item_difficulties().unwrap();
    let filters = PoolFilters {
        category: Some("animals".to_string()),
        level: None,
    };
    let questions = generate_vocab_questions(
        &catalog.words,
        &filters,
        30,
        &WeakestFirstSelector,
        &stats,
        &mut rng,
    );

    let misses = questions.iter().filter(|q| q.item_id == "lykos").count();
    assert!(
        misses > 0,
        "the repeatedly missed word should come up in a 30-question round"
    );
}
