use crate::matching::Difficulty;
use crate::quiz::{Question, DISTRACTORS_PER_QUESTION};
use crate::util::shuffled;
use rand::seq::SliceRandom;
use rand::Rng;

const UNITS: [&str; 21] = [
    "μηδέν",
    "ένα",
    "δύο",
    "τρία",
    "τέσσερα",
    "πέντε",
    "έξι",
    "επτά",
    "οκτώ",
    "εννέα",
    "δέκα",
    "έντεκα",
    "δώδεκα",
    "δεκατρία",
    "δεκατέσσερα",
    "δεκαπέντε",
    "δεκαέξι",
    "δεκαεπτά",
    "δεκαοκτώ",
    "δεκαεννέα",
    "είκοσι",
];

const TENS: [&str; 8] = [
    "είκοσι",
    "τριάντα",
    "σαράντα",
    "πενήντα",
    "εξήντα",
    "εβδομήντα",
    "ογδόντα",
    "ενενήντα",
];

/// Greek word for a number in 0..=100. Values past 100 are spelled as
/// digits; the drills never produce them.
pub fn greek_number_word(value: u32) -> String {
    match value {
        0..=20 => UNITS[value as usize].to_string(),
        21..=99 => {
            let tens = TENS[(value / 10 - 2) as usize];
            let unit = value % 10;
            if unit == 0 {
                tens.to_string()
            } else {
                format!("{} {}", tens, UNITS[unit as usize])
            }
        }
        100 => "εκατό".to_string(),
        _ => value.to_string(),
    }
}

/// One number-drill challenge. A closed set of operation kinds, each
/// carrying the data needed to render its prompt and validate its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberChallenge {
    Addition { a: u32, b: u32 },
    Subtraction { a: u32, b: u32 },
    Multiplication { a: u32, b: u32 },
    NumberToWord { value: u32 },
    WordToNumber { value: u32 },
}

impl NumberChallenge {
    pub fn prompt(&self) -> String {
        match self {
            NumberChallenge::Addition { a, b } => format!("Πόσο κάνει {a} + {b};"),
            NumberChallenge::Subtraction { a, b } => format!("Πόσο κάνει {a} - {b};"),
            NumberChallenge::Multiplication { a, b } => format!("Πόσο κάνει {a} × {b};"),
            NumberChallenge::NumberToWord { value } => {
                format!("Πώς γράφεται ο αριθμός {value} με λέξεις;")
            }
            NumberChallenge::WordToNumber { value } => {
                format!("Ποιος αριθμός είναι «{}»;", greek_number_word(*value))
            }
        }
    }

    /// The canonical answer string the options are built around.
    pub fn answer(&self) -> String {
        match self {
            NumberChallenge::Addition { a, b } => (a + b).to_string(),
            NumberChallenge::Subtraction { a, b } => (a - b).to_string(),
            NumberChallenge::Multiplication { a, b } => (a * b).to_string(),
            NumberChallenge::NumberToWord { value } => greek_number_word(*value),
            NumberChallenge::WordToNumber { value } => value.to_string(),
        }
    }

    /// Stats key: arithmetic groups by operation, word drills by value.
    pub fn item_id(&self) -> String {
        match self {
            NumberChallenge::Addition { .. } => "arith-add".to_string(),
            NumberChallenge::Subtraction { .. } => "arith-sub".to_string(),
            NumberChallenge::Multiplication { .. } => "arith-mul".to_string(),
            NumberChallenge::NumberToWord { value } | NumberChallenge::WordToNumber { value } => {
                format!("number-{value}")
            }
        }
    }

    /// The numeric value wrong answers should cluster around.
    fn answer_value(&self) -> u32 {
        match self {
            NumberChallenge::Addition { a, b } => a + b,
            NumberChallenge::Subtraction { a, b } => a - b,
            NumberChallenge::Multiplication { a, b } => a * b,
            NumberChallenge::NumberToWord { value } | NumberChallenge::WordToNumber { value } => {
                *value
            }
        }
    }

    fn option_for(&self, value: u32) -> String {
        match self {
            // Word options stay inside the spelled-out range
            NumberChallenge::NumberToWord { .. } => greek_number_word(value.min(100)),
            _ => value.to_string(),
        }
    }

    /// Render as a four-option multiple-choice question. Distractors are
    /// values near the answer so they stay plausible.
    pub fn to_question<R: Rng>(&self, sequence: usize, rng: &mut R) -> Question {
        let correct = self.answer();
        let answer_value = self.answer_value();

        let mut options = vec![correct.clone()];
        let mut attempts = 0;
        while options.len() < DISTRACTORS_PER_QUESTION + 1 && attempts < 64 {
            attempts += 1;
            let offset = rng.gen_range(1..=5);
            let candidate_value = if rng.gen_bool(0.5) {
                answer_value.saturating_add(offset)
            } else {
                answer_value.saturating_sub(offset)
            };
            let candidate = self.option_for(candidate_value);
            if !options.contains(&candidate) {
                options.push(candidate);
            }
        }
        // Tiny answer neighborhoods (e.g. around 0 or 100) may not offer
        // three distinct neighbors; widen outward in both directions
        let mut widen = 6;
        while options.len() < DISTRACTORS_PER_QUESTION + 1 && widen < 200 {
            for candidate_value in [
                answer_value.saturating_add(widen),
                answer_value.saturating_sub(widen),
            ] {
                let candidate = self.option_for(candidate_value);
                if options.len() < DISTRACTORS_PER_QUESTION + 1 && !options.contains(&candidate) {
                    options.push(candidate);
                }
            }
            widen += 1;
        }

        Question {
            id: format!("numbers-{sequence}"),
            item_id: self.item_id(),
            prompt: self.prompt(),
            correct: correct.clone(),
            options: shuffled(&options, rng),
        }
    }
}

/// Operand ranges per board difficulty.
fn value_range(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 20,
        Difficulty::Hard => 100,
    }
}

pub fn random_challenge<R: Rng>(difficulty: Difficulty, rng: &mut R) -> NumberChallenge {
    let max = value_range(difficulty);
    let kinds = ["add", "sub", "mul", "word", "num"];
    match *kinds.choose(rng).unwrap_or(&"add") {
        "add" => {
            let a = rng.gen_range(0..=max / 2);
            let b = rng.gen_range(0..=max / 2);
            NumberChallenge::Addition { a, b }
        }
        "sub" => {
            let a = rng.gen_range(0..=max);
            let b = rng.gen_range(0..=a);
            NumberChallenge::Subtraction { a, b }
        }
        "mul" => {
            let limit = (max / 2).clamp(2, 10);
            let a = rng.gen_range(0..=limit);
            let b = rng.gen_range(0..=limit);
            NumberChallenge::Multiplication { a, b }
        }
        "word" => NumberChallenge::NumberToWord {
            value: rng.gen_range(0..=max),
        },
        _ => NumberChallenge::WordToNumber {
            value: rng.gen_range(0..=max),
        },
    }
}

pub fn generate_number_questions<R: Rng>(
    difficulty: Difficulty,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    (0..count)
        .map(|n| random_challenge(difficulty, rng).to_question(n, rng))
        .collect()
}
