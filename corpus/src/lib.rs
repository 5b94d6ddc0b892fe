pub mod aggregate;
pub mod extract;
pub mod metadata;
pub mod persist;
pub mod record;
pub mod select;
pub mod xml;

pub use record::{Author, BibRecord, Identifier, KeywordEntry, PubDate};

/// Corpus-wide document-frequency table: term -> number of distinct
/// documents containing it at least once.
pub type FrequencyTable = std::collections::BTreeMap<String, u32>;

/// Corpus-wide rarity weights: term -> ln(N / df).
pub type IdfTable = std::collections::BTreeMap<String, f64>;

/// One document's deduplicated contribution to the corpus statistics.
pub type TermSet = std::collections::BTreeSet<String>;
