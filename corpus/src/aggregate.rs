//! Corpus-level aggregation of per-document term sets into document
//! frequencies and IDF weights.

use crate::{FrequencyTable, IdfTable, TermSet};

/// Document frequency per term: how many of the given documents
/// contain it. Each entry is already deduplicated, so a document
/// counts a term at most once, and the result is insensitive to term
/// order within a document.
pub fn document_frequencies(documents: &[TermSet]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for terms in documents {
        for term in terms {
            *table.entry(term.clone()).or_insert(0) += 1;
        }
    }
    table
}

/// Inverse document frequency: ln(N / df) for every term in the
/// frequency table. Nothing is filtered; df >= 1 for any present term,
/// and a term occurring in every document gets exactly 0.0.
pub fn idf_table(dfs: &FrequencyTable, num_docs: usize) -> IdfTable {
    dfs.iter()
        .map(|(term, df)| (term.clone(), (num_docs as f64 / f64::from(*df)).ln()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(terms: &[&str]) -> TermSet {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn counts_documents_not_occurrences() {
        let docs = vec![set(&["a", "b"]), set(&["b", "c"]), set(&["b"])];
        let dfs = document_frequencies(&docs);
        assert_eq!(dfs.get("a"), Some(&1));
        assert_eq!(dfs.get("b"), Some(&3));
        assert_eq!(dfs.get("c"), Some(&1));
        assert_eq!(dfs.len(), 3);
    }

    #[test]
    fn insensitive_to_term_order_within_a_document() {
        let forward = vec![set(&["x", "y", "z"]), set(&["y"])];
        let reversed = vec![set(&["z", "y", "x"]), set(&["y"])];
        assert_eq!(document_frequencies(&forward), document_frequencies(&reversed));
    }

    #[test]
    fn idf_is_natural_log_of_n_over_df() {
        let docs = vec![set(&["a", "b"]), set(&["b", "c"]), set(&["b"])];
        let dfs = document_frequencies(&docs);
        let idfs = idf_table(&dfs, docs.len());
        assert_eq!(idfs["a"], 3.0f64.ln());
        assert_eq!(idfs["b"], 0.0);
        assert_eq!(idfs["c"], 3.0f64.ln());
    }

    #[test]
    fn rare_and_ubiquitous_terms_are_both_kept() {
        let docs = vec![set(&["common", "rare"]), set(&["common"])];
        let idfs = idf_table(&document_frequencies(&docs), 2);
        assert_eq!(idfs.len(), 2);
        assert_eq!(idfs["common"], 0.0);
        assert!(idfs["rare"] > 0.0);
    }

    #[test]
    fn empty_batch_yields_empty_tables() {
        let dfs = document_frequencies(&[]);
        assert!(dfs.is_empty());
        assert!(idf_table(&dfs, 0).is_empty());
    }
}
