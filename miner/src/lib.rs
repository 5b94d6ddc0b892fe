//! Batch pipeline over a corpus snapshot:
//! SELECT -> EXTRACT (fan-out/fan-in) -> AGGREGATE -> NORMALIZE_ALL.
//!
//! Extraction fans out one task per selected document; the barrier is
//! awaiting every handle, so completion order never matters and any
//! failure is only acted on after all tasks have finished. A failed
//! extraction aborts the batch before aggregation (fail-fast). The
//! normalization stage is per-document and idempotent, so one bad
//! document never blocks the rest.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use corpus::aggregate::{document_frequencies, idf_table};
use corpus::extract::{KeywordExtractor, StemExtractor};
use corpus::metadata;
use corpus::persist::{self, CorpusPaths, FsRecordStore, RecordStore};
use corpus::select::select_documents;
use corpus::{IdfTable, TermSet};

#[derive(Debug, Clone)]
pub struct Config {
    /// Corpus root: article XML lives in `<root>/articles`, artifacts
    /// go to `<root>/tmp` and `<root>/meta`.
    pub root: PathBuf,
    /// Maximum number of documents per batch.
    pub cap: usize,
    /// Per-document extraction timeout.
    pub timeout: Duration,
}

#[derive(Debug, Default)]
pub struct Summary {
    pub documents: usize,
    pub terms: usize,
    pub records_written: usize,
    pub records_skipped: usize,
    pub records_failed: usize,
}

/// Run one batch over the corpus snapshot under `config.root`.
pub async fn run(config: Config) -> Result<Summary> {
    let paths = CorpusPaths::new(&config.root);
    std::fs::create_dir_all(paths.tmp_dir())?;
    std::fs::create_dir_all(paths.meta_dir())?;

    let documents = select_documents(&config.root.join("articles"), config.cap)?;
    info!(documents = documents.len(), "selected corpus documents");

    let term_sets = extract_all(&documents, &paths, config.timeout).await?;

    let n = term_sets.len();
    let dfs = document_frequencies(&term_sets);
    info!(terms = dfs.len(), documents = n, "aggregated document frequencies");
    if let Err(err) = persist::save_frequency_table(&paths, &dfs) {
        warn!(%err, "failed to write frequency table");
    }
    // The IDF table is written regardless of whether the frequency
    // table made it to disk.
    let idfs = idf_table(&dfs, n);
    if let Err(err) = persist::save_idf_table(&paths, &idfs) {
        warn!(%err, "failed to write IDF table");
    }

    let store = FsRecordStore::new(&paths);
    let (written, skipped, failed) = normalize_all(&documents, &idfs, &store);

    Ok(Summary {
        documents: documents.len(),
        terms: dfs.len(),
        records_written: written,
        records_skipped: skipped,
        records_failed: failed,
    })
}

/// EXTRACT: fan out one task per document, fan in on every handle.
/// Each task persists the document's raw keyword artifact and returns
/// its deduplicated term set; the sets are merged here, after the
/// barrier, so there is no shared accumulator.
async fn extract_all(
    documents: &[PathBuf],
    paths: &CorpusPaths,
    timeout: Duration,
) -> Result<Vec<TermSet>> {
    let extractor: Arc<dyn KeywordExtractor> = Arc::new(StemExtractor);

    let mut handles = Vec::with_capacity(documents.len());
    for doc in documents {
        let doc = doc.clone();
        let extractor = Arc::clone(&extractor);
        let paths = paths.clone();
        handles.push(tokio::spawn(async move {
            tokio::time::timeout(timeout, extract_one(doc, extractor, paths))
                .await
                .map_err(|_| anyhow!("keyword extraction timed out"))?
        }));
    }

    let mut term_sets = Vec::with_capacity(handles.len());
    let mut first_error: Option<anyhow::Error> = None;
    for handle in handles {
        match handle.await {
            Ok(Ok(terms)) => term_sets.push(terms),
            Ok(Err(err)) => first_error = first_error.or(Some(err)),
            Err(err) => first_error = first_error.or(Some(anyhow!(err))),
        }
    }
    match first_error {
        Some(err) => Err(err.context("keyword extraction failed, aborting batch")),
        None => Ok(term_sets),
    }
}

async fn extract_one(
    doc: PathBuf,
    extractor: Arc<dyn KeywordExtractor>,
    paths: CorpusPaths,
) -> Result<TermSet> {
    let text = tokio::fs::read_to_string(&doc)
        .await
        .with_context(|| format!("reading {}", doc.display()))?;
    let mined = extractor.extract(&text)?;
    let stem = doc_stem(&doc);
    // Rewritten on every run, even for documents whose metadata record
    // already exists.
    persist::save_keywords(&paths, &stem, &mined.entries())
        .with_context(|| format!("writing keywords for {stem}"))?;
    Ok(mined.term_set())
}

/// NORMALIZE_ALL: independent per document, idempotent through the
/// store. Per-document failures are logged and counted, never fatal.
/// The IDF table rides along as a stage argument.
pub fn normalize_all(
    documents: &[PathBuf],
    idfs: &IdfTable,
    store: &dyn RecordStore,
) -> (usize, usize, usize) {
    info!(terms = idfs.len(), "normalizing metadata");
    let mut written = 0;
    let mut skipped = 0;
    let mut failed = 0;
    for doc in documents {
        let key = doc_stem(doc);
        if store.exists(&key) {
            skipped += 1;
            continue;
        }
        let outcome = std::fs::read_to_string(doc)
            .map_err(anyhow::Error::from)
            .and_then(|xml| metadata::normalize(&xml).map_err(anyhow::Error::from))
            .and_then(|record| store.put(&key, &record).map(|_| record));
        match outcome {
            Ok(record) => {
                written += 1;
                info!(key = %key, path = %record.path, "wrote metadata record");
            }
            Err(err) => {
                failed += 1;
                warn!(key = %key, %err, "skipping document");
            }
        }
    }
    if written == 0 && failed == 0 {
        info!("nothing to do, every document already has a metadata record");
    }
    (written, skipped, failed)
}

fn doc_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
