// Local dashboard files: canonical form, comparison and writes
use crate::domain::sync_status::SyncStatus;
use crate::error::{Result, SyncError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Local and remote renderings of one dashboard plus their classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub status: SyncStatus,
    pub local_text: String,
    pub remote_text: String,
}

/// Serializes `value` with keys sorted at every depth, two-space indent and
/// a trailing newline.
pub fn canonicalize(value: &Value) -> String {
    let sorted = sort_keys(value);
    // Serializing a Value cannot fail: keys are always strings.
    let mut text = serde_json::to_string_pretty(&sorted).unwrap_or_default();
    text.push('\n');
    text
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(obj) => {
            let mut entries: Vec<(&String, &Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k.clone(), sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Classifies the file at `local_path` against `remote`.
pub fn compare(local_path: &Path, remote: &Value) -> Result<Comparison> {
    let remote_text = canonicalize(remote);

    let raw = match std::fs::read_to_string(local_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(Comparison {
                status: SyncStatus::Missing,
                local_text: String::new(),
                remote_text,
            });
        }
        Err(e) => return Err(SyncError::local_io(local_path, e)),
    };

    // Invalid JSON on disk is just a change; the raw text is the diff basis.
    let local_text = match serde_json::from_str::<Value>(&raw) {
        Ok(local) => canonicalize(&local),
        Err(e) => {
            tracing::debug!("{} is not valid JSON: {}", local_path.display(), e);
            raw
        }
    };

    let status = if local_text == remote_text {
        SyncStatus::Identical
    } else {
        SyncStatus::Changed
    };

    Ok(Comparison {
        status,
        local_text,
        remote_text,
    })
}

/// Writes the canonical form of `remote` to `local_path`, creating parents.
pub fn apply(local_path: &Path, remote: &Value) -> Result<()> {
    if let Some(parent) = local_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| SyncError::local_io(parent, e))?;
        }
    }

    std::fs::write(local_path, canonicalize(remote)).map_err(|e| SyncError::local_io(local_path, e))
}

/// Removes a file left behind by a rename. Already-gone files are fine.
pub fn remove(local_path: &Path) -> Result<()> {
    match std::fs::remove_file(local_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::local_io(local_path, e)),
    }
}

/// Maps dashboard uid to the existing file that holds it.
///
/// Every `*.json` file under `dir` is read; files that cannot be read, are
/// not JSON, or carry no string `uid` are skipped. When two files claim the
/// same uid the first in path order wins.
pub fn index_local_files(dir: &Path) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();
    if !dir.exists() {
        return index;
    }

    let files = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"));

    for entry in files {
        let path = entry.path();
        let uid = std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|doc| doc.get("uid").and_then(Value::as_str).map(str::to_string));

        let Some(uid) = uid else {
            continue;
        };

        if let Some(existing) = index.get(&uid) {
            tracing::warn!(
                "uid {} found in both {} and {}; using the first",
                uid,
                existing.display(),
                path.display()
            );
            continue;
        }
        index.insert(uid, path.to_path_buf());
    }

    tracing::debug!("Indexed {} local dashboards under {}", index.len(), dir.display());
    index
}
