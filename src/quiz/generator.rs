use crate::content::{
    ItemDifficulty, ItemSelector, Person, PoolFilters, Tense, VerbEntry, VocabWord,
};
use crate::util::shuffled;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

pub const OPTIONS_PER_QUESTION: usize = 4;
pub const DISTRACTORS_PER_QUESTION: usize = OPTIONS_PER_QUESTION - 1;

// A pathological pool (one item, one person) could otherwise sample forever;
// after this many rejected candidates the remaining slots get placeholder
// fillers instead.
const MAX_DISTRACTOR_ATTEMPTS: usize = 64;

/// One multiple-choice question. Immutable once produced; `options` holds
/// exactly four unique values, `correct` among them, in shuffled order.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub id: String,
    pub item_id: String,
    pub prompt: String,
    pub correct: String,
    pub options: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct
    }

    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o == &self.correct)
    }
}

/// Collect `DISTRACTORS_PER_QUESTION` unique wrong answers by repeatedly
/// sampling `candidate`. Candidates equal to the correct answer or already
/// chosen are skipped; once the attempt cap is hit the remaining slots are
/// filled with visibly synthetic placeholders.
fn collect_distractors<F>(correct: &str, mut candidate: F) -> Vec<String>
where
    F: FnMut() -> Option<String>,
{
    let mut distractors: Vec<String> = Vec::with_capacity(DISTRACTORS_PER_QUESTION);
    let mut attempts = 0;

    while distractors.len() < DISTRACTORS_PER_QUESTION && attempts < MAX_DISTRACTOR_ATTEMPTS {
        attempts += 1;
        let value = match candidate() {
            Some(value) => value,
            None => continue,
        };
        if value == correct || distractors.contains(&value) {
            continue;
        }
        distractors.push(value);
    }

    let mut filler = 1;
    while distractors.len() < DISTRACTORS_PER_QUESTION {
        let placeholder = "—".repeat(filler);
        filler += 1;
        if placeholder != correct && !distractors.contains(&placeholder) {
            distractors.push(placeholder);
        }
    }

    distractors
}

fn assemble_options<R: Rng>(correct: &str, distractors: Vec<String>, rng: &mut R) -> Vec<String> {
    let mut options = distractors;
    options.push(correct.to_string());
    shuffled(&options, rng)
}

/// Vocabulary questions: translate in a randomly chosen direction, with
/// distractors drawn from other words' translations on the same side.
pub fn generate_vocab_questions<R: Rng>(
    words: &[VocabWord],
    filters: &PoolFilters,
    count: usize,
    selector: &dyn ItemSelector,
    stats: &HashMap<String, ItemDifficulty>,
    rng: &mut R,
) -> Vec<Question> {
    let pool = filters.filter_words(words);
    if pool.is_empty() {
        return Vec::new();
    }

    let ids: Vec<&str> = pool.iter().map(|w| w.id.as_str()).collect();
    let picks = selector.pick_indices(&ids, count, stats);

    picks
        .into_iter()
        .enumerate()
        .map(|(n, idx)| {
            let word = pool[idx];
            let greek_to_english = rng.gen_bool(0.5);

            let (prompt, correct) = if greek_to_english {
                (
                    format!("Τι σημαίνει «{}»;", word.display_greek()),
                    word.english.clone(),
                )
            } else {
                (
                    format!("Πώς λέγεται στα ελληνικά «{}»;", word.english),
                    word.display_greek(),
                )
            };

            let distractors = collect_distractors(&correct, || {
                let other = pool.choose(rng)?;
                if other.id == word.id {
                    return None;
                }
                Some(if greek_to_english {
                    other.english.clone()
                } else {
                    other.display_greek()
                })
            });

            Question {
                id: format!("vocab-{n}-{}", word.id),
                item_id: word.id.clone(),
                prompt,
                correct: correct.clone(),
                options: assemble_options(&correct, distractors, rng),
            }
        })
        .collect()
}

/// Verb questions: give the conjugated form for a tense and person.
/// Distractors prefer a different verb with a random person so the wrong
/// answers are real forms; a one-verb pool falls back to other persons of
/// the same verb.
pub fn generate_verb_questions<R: Rng>(
    verbs: &[VerbEntry],
    filters: &PoolFilters,
    count: usize,
    tense: Option<Tense>,
    selector: &dyn ItemSelector,
    stats: &HashMap<String, ItemDifficulty>,
    rng: &mut R,
) -> Vec<Question> {
    let pool = filters.filter_verbs(verbs);
    if pool.is_empty() {
        return Vec::new();
    }

    let ids: Vec<&str> = pool.iter().map(|v| v.id.as_str()).collect();
    let picks = selector.pick_indices(&ids, count, stats);
    let tenses = [Tense::Present, Tense::Past, Tense::Future];

    picks
        .into_iter()
        .enumerate()
        .map(|(n, idx)| {
            let verb = pool[idx];
            let question_tense = tense.unwrap_or_else(|| *tenses.choose(rng).unwrap_or(&Tense::Present));
            let person = *Person::ALL.choose(rng).unwrap_or(&Person::FirstSingular);
            let correct = verb.form(question_tense, person).to_string();

            let distractors = collect_distractors(&correct, || {
                let candidate_person = *Person::ALL.choose(rng)?;
                if pool.len() > 1 {
                    let other = pool.choose(rng)?;
                    if other.id == verb.id {
                        return None;
                    }
                    Some(other.form(question_tense, candidate_person).to_string())
                } else {
                    // Single-verb pool: vary the person instead
                    Some(verb.form(question_tense, candidate_person).to_string())
                }
            });

            Question {
                id: format!("verb-{n}-{}", verb.id),
                item_id: verb.id.clone(),
                prompt: format!(
                    "{} ({}) — {}, «{} ...»",
                    verb.english,
                    verb.citation_form(),
                    question_tense,
                    person.pronoun()
                ),
                correct: correct.clone(),
                options: assemble_options(&correct, distractors, rng),
            }
        })
        .collect()
}
