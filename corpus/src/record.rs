use serde::{Deserialize, Serialize};

/// Normalized bibliographic record for one article. Written once per
/// document and never mutated afterwards; the JSON field names match
/// the artifacts the record store serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BibRecord {
    pub title: String,
    pub author: Vec<Author>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    pub identifier: Vec<Identifier>,
    pub date: PubDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Value of the mandatory publisher-id identifier, the record's
    /// canonical path key.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub surname: String,
    #[serde(rename = "given-names")]
    pub given_names: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub id_type: String,
    pub id: String,
}

/// Publication date, kept verbatim as strings. No calendar validation
/// and no normalization of month names versus numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubDate {
    pub day: String,
    pub month: String,
    pub year: String,
}

/// One entry of a per-document keyword artifact. Single-word keywords
/// carry a relevance score, multi-word keyphrases only their value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordEntry {
    Keyword { stem: String, score: f64 },
    Keyphrase { value: String },
}
