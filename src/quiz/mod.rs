pub mod generator;
pub mod session;

pub use generator::{
    generate_verb_questions, generate_vocab_questions, Question, DISTRACTORS_PER_QUESTION,
    OPTIONS_PER_QUESTION,
};
pub use session::{QuizSession, SelectOutcome};
