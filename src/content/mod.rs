pub mod catalog;
pub mod difficulty;
pub mod selector;

pub use catalog::{Catalog, Letter, Person, PoolFilters, Tense, VerbEntry, VocabWord};
pub use difficulty::ItemDifficulty;
pub use selector::{ItemSelector, RandomSelector, WeakestFirstSelector};
