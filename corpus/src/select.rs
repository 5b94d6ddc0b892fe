use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

lazy_static! {
    static ref VERSION: Regex = Regex::new(r"v(\d+)").expect("valid regex");
}

/// Logical article id: the path with every `v<digits>` marker removed.
/// Two paths that differ only in their version markers belong to the
/// same article.
fn logical_id(path: &Path) -> String {
    VERSION.replace_all(&path.to_string_lossy(), "").into_owned()
}

/// Version number parsed from the last marker in the file name.
/// Unversioned files sort below any explicit version.
fn version_of(path: &Path) -> u32 {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .and_then(|n| VERSION.captures_iter(&n).last().and_then(|c| c[1].parse().ok()))
        .unwrap_or(0)
}

/// Ordering for "which version of this article wins": numeric version
/// first, full path breaks ties.
fn version_key(path: &Path) -> (u32, PathBuf) {
    (version_of(path), path.to_path_buf())
}

fn xml_files(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("xml"))
        .collect();
    paths.sort();
    paths
}

/// Discover one XML path per logical article under `root`: a direct
/// `*.xml` entry stands for itself, a subdirectory stands for its
/// latest contained version. The flattened result is grouped again by
/// logical id so versions split across the layout still collapse to
/// one path, then capped to a stable prefix of `cap` entries.
///
/// Pure function of the directory state; an empty corpus is a valid,
/// empty result.
pub fn select_documents(root: &Path, cap: usize) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .collect();
    entries.sort();

    let mut flattened: Vec<PathBuf> = Vec::new();
    for path in entries {
        if path.is_file() {
            if path.extension().and_then(|s| s.to_str()) == Some("xml") {
                flattened.push(path);
            }
        } else if path.is_dir() {
            if let Some(latest) = xml_files(&path).into_iter().max_by_key(|p| version_key(p)) {
                flattened.push(latest);
            }
        }
    }

    let mut groups: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in flattened {
        let id = logical_id(&path);
        match groups.get(&id) {
            Some(existing) if version_key(existing) >= version_key(&path) => {}
            _ => {
                groups.insert(id, path);
            }
        }
    }

    let selected: Vec<PathBuf> = groups.into_values().take(cap).collect();
    tracing::debug!(documents = selected.len(), root = %root.display(), "selected documents");
    Ok(selected)
}
