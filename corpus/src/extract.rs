//! Per-document keyword and keyphrase extraction.
//!
//! The pipeline depends only on the [`KeywordExtractor`] trait; the
//! bundled [`StemExtractor`] strips markup, NFKC-normalizes,
//! lowercases, drops stopwords and stems the rest, scoring keywords by
//! frequency relative to the most frequent term. Maximal runs of two
//! or more adjacent content words become keyphrases.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

use crate::record::KeywordEntry;
use crate::TermSet;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref MARKUP: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = [
        "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at",
        "be", "because", "been", "before", "being", "between", "both", "but", "by",
        "can", "could", "did", "do", "does", "during", "each", "for", "from",
        "had", "has", "have", "having", "he", "her", "here", "his", "how",
        "i", "if", "in", "into", "is", "it", "its", "itself",
        "more", "most", "my", "no", "nor", "not", "of", "off", "on", "once", "only",
        "or", "other", "our", "out", "over", "own", "same", "she", "should", "so",
        "some", "such", "than", "that", "the", "their", "them", "then", "there",
        "these", "they", "this", "those", "through", "to", "too", "under", "until",
        "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
        "who", "whom", "why", "will", "with", "would", "you", "your",
    ]
    .iter()
    .copied()
    .collect();
}

/// Keywords and keyphrases mined from one document.
#[derive(Debug, Default, Clone)]
pub struct DocKeywords {
    /// (stem, score) in descending score order, first occurrence
    /// breaking ties.
    pub keywords: Vec<(String, f64)>,
    /// Multi-word phrases, deduplicated, in order of first occurrence.
    pub keyphrases: Vec<String>,
}

impl DocKeywords {
    /// Artifact entries in persistence order: keywords, then
    /// keyphrases.
    pub fn entries(&self) -> Vec<KeywordEntry> {
        self.keywords
            .iter()
            .map(|(stem, score)| KeywordEntry::Keyword { stem: stem.clone(), score: *score })
            .chain(self.keyphrases.iter().map(|v| KeywordEntry::Keyphrase { value: v.clone() }))
            .collect()
    }

    /// The document's deduplicated contribution to the corpus
    /// statistics: keyword stems plus keyphrase values.
    pub fn term_set(&self) -> TermSet {
        self.keywords
            .iter()
            .map(|(stem, _)| stem.clone())
            .chain(self.keyphrases.iter().cloned())
            .collect()
    }
}

/// The per-document keyword/keyphrase capability.
pub trait KeywordExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<DocKeywords>;
}

/// Stemming extractor over the document's visible text.
pub struct StemExtractor;

impl KeywordExtractor for StemExtractor {
    fn extract(&self, text: &str) -> Result<DocKeywords> {
        Ok(mine(text))
    }
}

/// Tokenize into (stem, position). Positions count every word match,
/// stopwords included, so adjacent positions mean no stopword sat
/// between two content words.
fn tokenize(text: &str) -> Vec<(String, usize)> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for (pos, m) in WORD.find_iter(&normalized).enumerate() {
        let word = m.as_str();
        if STOPWORDS.contains(word) {
            continue;
        }
        tokens.push((STEMMER.stem(word).to_string(), pos));
    }
    tokens
}

fn mine(text: &str) -> DocKeywords {
    let plain = MARKUP.replace_all(text, " ");
    let tokens = tokenize(&plain);

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for (stem, _) in &tokens {
        let count = counts.entry(stem.as_str()).or_insert(0);
        if *count == 0 {
            order.push(stem.as_str());
        }
        *count += 1;
    }
    let max = counts.values().copied().max().unwrap_or(1) as f64;

    let mut keywords: Vec<(String, f64)> = order
        .iter()
        .map(|stem| (stem.to_string(), f64::from(counts[stem]) / max))
        .collect();
    keywords.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut keyphrases: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut run: Vec<&str> = Vec::new();
    let mut prev: Option<usize> = None;
    for (stem, pos) in &tokens {
        if let Some(p) = prev {
            if *pos != p + 1 {
                push_phrase(&mut keyphrases, &mut seen, &run);
                run.clear();
            }
        }
        run.push(stem.as_str());
        prev = Some(*pos);
    }
    push_phrase(&mut keyphrases, &mut seen, &run);

    DocKeywords { keywords, keyphrases }
}

fn push_phrase(out: &mut Vec<String>, seen: &mut HashSet<String>, run: &[&str]) {
    if run.len() < 2 {
        return;
    }
    let phrase = run.join(" ");
    if seen.insert(phrase.clone()) {
        out.push(phrase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stems(doc: &DocKeywords) -> Vec<&str> {
        doc.keywords.iter().map(|(s, _)| s.as_str()).collect()
    }

    #[test]
    fn stems_and_filters_stopwords() {
        let doc = mine("The runners were running the run");
        let stems = stems(&doc);
        assert_eq!(stems, vec!["run", "runner"]);
    }

    #[test]
    fn markup_does_not_leak_into_terms() {
        let doc = mine("<p>Deep <italic>neural</italic> networks</p>");
        let stems = stems(&doc);
        assert!(stems.contains(&"network"));
        assert!(!stems.contains(&"italic"));
        assert!(!stems.contains(&"p"));
    }

    #[test]
    fn most_frequent_keyword_scores_one() {
        let doc = mine("gene gene gene protein");
        assert_eq!(doc.keywords[0], ("gene".to_string(), 1.0));
        let protein = doc.keywords.iter().find(|(s, _)| s == "protein").unwrap();
        assert!((protein.1 - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn adjacent_content_words_form_keyphrases() {
        let doc = mine("Deep neural networks. The deep neural networks win.");
        assert!(doc.keyphrases.contains(&"deep neural network".to_string()));
        // A stopword breaks the run.
        let doc = mine("networks of networks");
        assert!(doc.keyphrases.is_empty());
    }

    #[test]
    fn term_set_deduplicates_across_kinds() {
        let doc = mine("deep networks and deep networks");
        let terms = doc.term_set();
        assert!(terms.contains("deep"));
        assert!(terms.contains("network"));
        assert!(terms.contains("deep network"));
        assert_eq!(terms.len(), 3);
    }

    #[test]
    fn entries_list_keywords_before_keyphrases() {
        let doc = mine("deep networks win");
        let entries = doc.entries();
        let first_phrase = entries
            .iter()
            .position(|e| matches!(e, KeywordEntry::Keyphrase { .. }))
            .unwrap();
        assert!(entries[..first_phrase]
            .iter()
            .all(|e| matches!(e, KeywordEntry::Keyword { .. })));
    }
}
