//! Normalization of on-disk cache layouts.
//!
//! Every load funnels through [`load_entries`], which upgrades any
//! recognized legacy shape to the consolidated list before the rest of the
//! system sees it. Recognized shapes, oldest last:
//!
//! 1. current: one JSON array of entries in `validation-cache.json`;
//! 2. legacy dict: one JSON object mapping scheduler name to entry (the
//!    entry may omit `schedulerName`; the key fills it in);
//! 3. legacy per-name files: `validation-cache-{NAME}.json` siblings, each
//!    holding a single entry.
//!
//! Merge order: consolidated entries first, then per-name files; the first
//! occurrence of a name wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::types::CacheEntry;

const PER_NAME_PREFIX: &str = "validation-cache-";

/// Result of reading the cache from disk.
pub struct LoadedCache {
    pub entries: Vec<CacheEntry>,
    /// True when the on-disk layout was not already the consolidated list
    /// and should be rewritten.
    pub migrated: bool,
    /// Per-name files whose content was merged; removable after a
    /// successful consolidated write.
    pub legacy_files: Vec<PathBuf>,
}

/// Read and normalize the cache at `path`. A missing file is an empty
/// cache; an unreadable or unparseable main file is an error the caller
/// downgrades to miss behavior.
pub fn load_entries(path: &Path) -> Result<LoadedCache, CacheError> {
    let mut entries: Vec<CacheEntry> = Vec::new();
    let mut migrated = false;

    if path.exists() {
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;
        match value {
            Value::Array(items) => {
                for item in items {
                    push_unique(&mut entries, entry_from_value(None, item));
                }
            }
            Value::Object(map) => {
                // legacy dict shape
                migrated = true;
                for (name, item) in map {
                    push_unique(&mut entries, entry_from_value(Some(&name), item));
                }
            }
            other => {
                warn!(body = %other, "cache file holds neither a list nor a dict, ignoring");
                migrated = true;
            }
        }
    }

    let legacy_files = per_name_files(path);
    for file in &legacy_files {
        migrated = true;
        let name = per_name_scheduler(file);
        match fs::read_to_string(file) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(item) => push_unique(&mut entries, entry_from_value(name.as_deref(), item)),
                Err(e) => warn!(file = %file.display(), error = %e, "skipping unparseable per-name cache file"),
            },
            Err(e) => warn!(file = %file.display(), error = %e, "skipping unreadable per-name cache file"),
        }
    }

    if migrated {
        debug!(
            entries = entries.len(),
            per_name_files = legacy_files.len(),
            "normalized legacy cache layout"
        );
    }

    Ok(LoadedCache {
        entries,
        migrated,
        legacy_files,
    })
}

fn push_unique(entries: &mut Vec<CacheEntry>, entry: Option<CacheEntry>) {
    let Some(entry) = entry else { return };
    if entries
        .iter()
        .any(|e| e.scheduler_name == entry.scheduler_name)
    {
        debug!(scheduler = %entry.scheduler_name, "dropping duplicate cache entry");
        return;
    }
    entries.push(entry);
}

/// Decode one entry, filling a missing `schedulerName` from the hint.
fn entry_from_value(name_hint: Option<&str>, mut value: Value) -> Option<CacheEntry> {
    if let Some(obj) = value.as_object_mut() {
        if !obj.contains_key("schedulerName") {
            if let Some(name) = name_hint {
                obj.insert(
                    "schedulerName".to_string(),
                    Value::String(name.to_string()),
                );
            }
        }
    }

    match serde_json::from_value::<CacheEntry>(value) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(error = %e, "skipping unrecognized cache entry");
            None
        }
    }
}

/// Sibling `validation-cache-{NAME}.json` files, sorted for determinism.
fn per_name_files(path: &Path) -> Vec<PathBuf> {
    let Some(dir) = path.parent() else {
        return Vec::new();
    };
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p != path && is_per_name_file(p))
        .collect();
    files.sort();
    files
}

fn is_per_name_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(PER_NAME_PREFIX) && name.ends_with(".json")
}

fn per_name_scheduler(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(PER_NAME_PREFIX).map(str::to_string)
}
