use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static DATA_DIR: Dir = include_dir!("src/content/data");

/// One letter of the alphabet; `upper`/`lower` are the two faces a
/// memory-game pair is built from.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Letter {
    pub id: String,
    pub upper: String,
    pub lower: String,
    pub name: String,
}

/// A vocabulary entry. `article` is empty for phrases that take none.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct VocabWord {
    pub id: String,
    pub greek: String,
    pub article: String,
    pub english: String,
    pub category: String,
    pub level: u8,
}

impl VocabWord {
    /// Greek form as shown to the learner, article included.
    pub fn display_greek(&self) -> String {
        if self.article.is_empty() {
            self.greek.clone()
        } else {
            format!("{} {}", self.article, self.greek)
        }
    }
}

/// Grammatical person, in conjugation-table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Person {
    FirstSingular,
    SecondSingular,
    ThirdSingular,
    FirstPlural,
    SecondPlural,
    ThirdPlural,
}

impl Person {
    pub const ALL: [Person; 6] = [
        Person::FirstSingular,
        Person::SecondSingular,
        Person::ThirdSingular,
        Person::FirstPlural,
        Person::SecondPlural,
        Person::ThirdPlural,
    ];

    pub fn index(self) -> usize {
        Person::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// Subject pronoun used when assembling prompts.
    pub fn pronoun(self) -> &'static str {
        match self {
            Person::FirstSingular => "εγώ",
            Person::SecondSingular => "εσύ",
            Person::ThirdSingular => "αυτός",
            Person::FirstPlural => "εμείς",
            Person::SecondPlural => "εσείς",
            Person::ThirdPlural => "αυτοί",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Tense {
    #[strum(serialize = "ενεστώτας")]
    Present,
    #[strum(serialize = "αόριστος")]
    Past,
    #[strum(serialize = "μέλλοντας")]
    Future,
}

/// A verb with its three conjugation tables, six persons each.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct VerbEntry {
    pub id: String,
    pub english: String,
    pub level: u8,
    pub present: Vec<String>,
    pub past: Vec<String>,
    pub future: Vec<String>,
}

impl VerbEntry {
    pub fn form(&self, tense: Tense, person: Person) -> &str {
        let table = match tense {
            Tense::Present => &self.present,
            Tense::Past => &self.past,
            Tense::Future => &self.future,
        };
        &table[person.index()]
    }

    /// Dictionary form (first person singular present).
    pub fn citation_form(&self) -> &str {
        &self.present[0]
    }
}

#[derive(Deserialize, Debug)]
struct AlphabetFile {
    #[allow(dead_code)]
    name: String,
    letters: Vec<Letter>,
}

#[derive(Deserialize, Debug)]
struct VocabularyFile {
    #[allow(dead_code)]
    name: String,
    words: Vec<VocabWord>,
}

#[derive(Deserialize, Debug)]
struct VerbsFile {
    #[allow(dead_code)]
    name: String,
    verbs: Vec<VerbEntry>,
}

/// The full embedded content catalog. Loaded once at startup; the game
/// engines only ever borrow from it.
#[derive(Clone, Debug)]
pub struct Catalog {
    pub letters: Vec<Letter>,
    pub words: Vec<VocabWord>,
    pub verbs: Vec<VerbEntry>,
}

impl Catalog {
    pub fn load() -> Self {
        let alphabet: AlphabetFile = read_data_file("alphabet.json");
        let vocabulary: VocabularyFile = read_data_file("vocabulary.json");
        let verbs: VerbsFile = read_data_file("verbs.json");

        Self {
            letters: alphabet.letters,
            words: vocabulary.words,
            verbs: verbs.verbs,
        }
    }

    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self.words.iter().map(|w| w.category.clone()).collect();
        cats.sort();
        cats.dedup();
        cats
    }
}

fn read_data_file<T: for<'de> Deserialize<'de>>(file_name: &str) -> T {
    try_read_data_file(file_name).expect("Unable to deserialize embedded content file")
}

fn try_read_data_file<T: for<'de> Deserialize<'de>>(file_name: &str) -> Result<T, Box<dyn Error>> {
    let file = DATA_DIR.get_file(file_name).expect("Content file not found");

    let file_as_str = file
        .contents_utf8()
        .expect("Unable to interpret content file as a string");

    Ok(from_str(file_as_str)?)
}

/// Category/level filters applied to a quiz pool. An empty result falls
/// back to the unfiltered pool so question generation never starves.
#[derive(Clone, Debug, Default)]
pub struct PoolFilters {
    pub category: Option<String>,
    pub level: Option<u8>,
}

impl PoolFilters {
    pub fn filter_words<'a>(&self, words: &'a [VocabWord]) -> Vec<&'a VocabWord> {
        let filtered: Vec<&VocabWord> = words
            .iter()
            .filter(|w| {
                self.category
                    .as_deref()
                    .map_or(true, |c| w.category.eq_ignore_ascii_case(c))
            })
            .filter(|w| self.level.map_or(true, |l| w.level <= l))
            .collect();

        if filtered.is_empty() {
            words.iter().collect()
        } else {
            filtered
        }
    }

    pub fn filter_verbs<'a>(&self, verbs: &'a [VerbEntry]) -> Vec<&'a VerbEntry> {
        let filtered: Vec<&VerbEntry> = verbs
            .iter()
            .filter(|v| self.level.map_or(true, |l| v.level <= l))
            .collect();

        if filtered.is_empty() {
            verbs.iter().collect()
        } else {
            filtered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_load() {
        let catalog = Catalog::load();

        assert_eq!(catalog.letters.len(), 24);
        assert!(!catalog.words.is_empty());
        assert!(!catalog.verbs.is_empty());
    }

    #[test]
    fn test_every_verb_has_six_forms_per_tense() {
        let catalog = Catalog::load();

        for verb in &catalog.verbs {
            assert_eq!(verb.present.len(), 6, "{} present", verb.id);
            assert_eq!(verb.past.len(), 6, "{} past", verb.id);
            assert_eq!(verb.future.len(), 6, "{} future", verb.id);
        }
    }

    #[test]
    fn test_verb_form_lookup() {
        let catalog = Catalog::load();
        let echo = catalog.verbs.iter().find(|v| v.id == "echo").unwrap();

        assert_eq!(echo.form(Tense::Present, Person::FirstSingular), "έχω");
        assert_eq!(echo.form(Tense::Past, Person::ThirdPlural), "είχαν");
        assert_eq!(echo.form(Tense::Future, Person::SecondSingular), "θα έχεις");
        assert_eq!(echo.citation_form(), "έχω");
    }

    #[test]
    fn test_display_greek_with_and_without_article() {
        let catalog = Catalog::load();

        let cat = catalog.words.iter().find(|w| w.id == "gata").unwrap();
        assert_eq!(cat.display_greek(), "η γάτα");

        let hello = catalog.words.iter().find(|w| w.id == "geia").unwrap();
        assert_eq!(hello.display_greek(), "γεια σου");
    }

    #[test]
    fn test_category_filter() {
        let catalog = Catalog::load();
        let filters = PoolFilters {
            category: Some("animals".to_string()),
            level: None,
        };

        let pool = filters.filter_words(&catalog.words);

        assert!(!pool.is_empty());
        assert!(pool.iter().all(|w| w.category == "animals"));
    }

    #[test]
    fn test_level_filter_is_inclusive_upper_bound() {
        let catalog = Catalog::load();
        let filters = PoolFilters {
            category: None,
            level: Some(1),
        };

        let pool = filters.filter_words(&catalog.words);

        assert!(pool.iter().all(|w| w.level <= 1));
    }

    #[test]
    fn test_unmatched_filter_falls_back_to_full_pool() {
        let catalog = Catalog::load();
        let filters = PoolFilters {
            category: Some("astrophysics".to_string()),
            level: None,
        };

        let pool = filters.filter_words(&catalog.words);

        assert_eq!(pool.len(), catalog.words.len());
    }

    #[test]
    fn test_tense_labels() {
        assert_eq!(Tense::Present.to_string(), "ενεστώτας");
        assert_eq!(Tense::Past.to_string(), "αόριστος");
        assert_eq!(Tense::Future.to_string(), "μέλλοντας");
    }

    #[test]
    fn test_person_order_and_pronouns() {
        assert_eq!(Person::ALL.len(), 6);
        assert_eq!(Person::FirstSingular.index(), 0);
        assert_eq!(Person::ThirdPlural.index(), 5);
        assert_eq!(Person::SecondPlural.pronoun(), "εσείς");
    }
}
