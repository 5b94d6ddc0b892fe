//! JSON persistence for corpus artifacts.
//!
//! Layout under one corpus root: `tmp/` holds the corpus statistics
//! (`alldfs.json`, `idfs.json`) and the raw per-document keyword dumps
//! (`<stem>.keywords.json`); `meta/` holds one bibliographic record
//! per document (`<stem>.json`), served through [`RecordStore`].

use std::collections::BTreeMap;
use std::fs::{self, create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;

use crate::record::{BibRecord, KeywordEntry};
use crate::{FrequencyTable, IdfTable};

#[derive(Debug, Clone)]
pub struct CorpusPaths {
    pub root: PathBuf,
}

impl CorpusPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }
    pub fn meta_dir(&self) -> PathBuf {
        self.root.join("meta")
    }
    fn frequency_table(&self) -> PathBuf {
        self.tmp_dir().join("alldfs.json")
    }
    fn idf_table(&self) -> PathBuf {
        self.tmp_dir().join("idfs.json")
    }
    fn keywords(&self, stem: &str) -> PathBuf {
        self.tmp_dir().join(format!("{stem}.keywords.json"))
    }
}

pub fn save_frequency_table(paths: &CorpusPaths, table: &FrequencyTable) -> Result<()> {
    create_dir_all(paths.tmp_dir())?;
    let mut f = File::create(paths.frequency_table())?;
    f.write_all(serde_json::to_string_pretty(table)?.as_bytes())?;
    Ok(())
}

pub fn load_frequency_table(paths: &CorpusPaths) -> Result<FrequencyTable> {
    Ok(serde_json::from_str(&fs::read_to_string(paths.frequency_table())?)?)
}

pub fn save_idf_table(paths: &CorpusPaths, table: &IdfTable) -> Result<()> {
    create_dir_all(paths.tmp_dir())?;
    let mut f = File::create(paths.idf_table())?;
    f.write_all(serde_json::to_string_pretty(table)?.as_bytes())?;
    Ok(())
}

pub fn load_idf_table(paths: &CorpusPaths) -> Result<IdfTable> {
    Ok(serde_json::from_str(&fs::read_to_string(paths.idf_table())?)?)
}

/// Raw extraction output for one document, rewritten on every run.
pub fn save_keywords(paths: &CorpusPaths, stem: &str, entries: &[KeywordEntry]) -> Result<()> {
    create_dir_all(paths.tmp_dir())?;
    let mut f = File::create(paths.keywords(stem))?;
    f.write_all(serde_json::to_string(entries)?.as_bytes())?;
    Ok(())
}

pub fn load_keywords(paths: &CorpusPaths, stem: &str) -> Result<Vec<KeywordEntry>> {
    Ok(serde_json::from_str(&fs::read_to_string(paths.keywords(stem))?)?)
}

/// Identity-keyed store for bibliographic records. The normalizer only
/// talks to this interface, so the skip-if-exists idempotency can be
/// tested without real file I/O.
pub trait RecordStore {
    fn exists(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Result<Option<BibRecord>>;
    fn put(&self, key: &str, record: &BibRecord) -> Result<()>;
}

/// One JSON file per record under `meta/`.
pub struct FsRecordStore {
    dir: PathBuf,
}

impl FsRecordStore {
    pub fn new(paths: &CorpusPaths) -> Self {
        Self { dir: paths.meta_dir() }
    }
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl RecordStore for FsRecordStore {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn get(&self, key: &str) -> Result<Option<BibRecord>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&fs::read_to_string(path)?)?))
    }

    fn put(&self, key: &str, record: &BibRecord) -> Result<()> {
        create_dir_all(&self.dir)?;
        let mut f = File::create(self.path_for(key))?;
        f.write_all(serde_json::to_string(record)?.as_bytes())?;
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemRecordStore {
    records: Mutex<BTreeMap<String, BibRecord>>,
}

impl MemRecordStore {
    pub fn len(&self) -> usize {
        self.records.lock().expect("record store lock poisoned").len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemRecordStore {
    fn exists(&self, key: &str) -> bool {
        self.records.lock().expect("record store lock poisoned").contains_key(key)
    }

    fn get(&self, key: &str) -> Result<Option<BibRecord>> {
        Ok(self.records.lock().expect("record store lock poisoned").get(key).cloned())
    }

    fn put(&self, key: &str, record: &BibRecord) -> Result<()> {
        self.records
            .lock()
            .expect("record store lock poisoned")
            .insert(key.to_string(), record.clone());
        Ok(())
    }
}
