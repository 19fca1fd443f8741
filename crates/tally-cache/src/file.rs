use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use tally_core::types::ValidatedReport;

use crate::error::CacheError;
use crate::migrate::load_entries;
use crate::store::CacheStore;
use crate::types::CacheEntry;

/// Cache persisted as one JSON list in `validation-cache.json`.
///
/// Stateless between calls: every access rereads the file, every mutation
/// rewrites it whole through a temp file and rename. IO and format failures
/// never escape; they degrade to miss behavior with a logged warning.
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the file, normalizing legacy layouts. When a legacy layout was
    /// found, the consolidated form is written back and the merged per-name
    /// files are removed (best effort).
    fn load(&self) -> Vec<CacheEntry> {
        let loaded = match load_entries(&self.path) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache unreadable, treating as empty");
                return Vec::new();
            }
        };

        if loaded.migrated {
            match self.write(&loaded.entries) {
                Ok(()) => {
                    for file in &loaded.legacy_files {
                        if let Err(e) = fs::remove_file(file) {
                            warn!(file = %file.display(), error = %e, "failed to remove migrated cache file");
                        }
                    }
                    info!(
                        entries = loaded.entries.len(),
                        "migrated cache to consolidated layout"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "failed to write migrated cache, keeping legacy files")
                }
            }
        }

        loaded.entries
    }

    /// Whole-file replace: write a temp sibling, then rename over the
    /// target so readers never observe a partial write.
    fn write(&self, entries: &[CacheEntry]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, scheduler_name: &str, now_ms: i64) -> Option<CacheEntry> {
        let mut entries = self.load();
        let idx = entries
            .iter()
            .position(|e| e.scheduler_name == scheduler_name)?;

        if !entries[idx].valid_at(now_ms) {
            let stale = entries.remove(idx);
            debug!(scheduler = %scheduler_name, fetched_at = stale.fetched_at, "purging stale cache entry");
            if let Err(e) = self.write(&entries) {
                warn!(error = %e, "failed to rewrite cache after purge");
            }
            return None;
        }

        if !entries[idx].qualifies() {
            warn!(scheduler = %scheduler_name, "cache entry is not a validated success, ignoring");
            return None;
        }

        Some(entries.swap_remove(idx))
    }

    fn put(&self, scheduler_name: &str, result: ValidatedReport, now_ms: i64) {
        let mut entries = self.load();
        entries.retain(|e| e.scheduler_name != scheduler_name);
        entries.push(CacheEntry {
            scheduler_name: scheduler_name.to_string(),
            fetched_at: now_ms,
            result,
        });

        if let Err(e) = self.write(&entries) {
            warn!(scheduler = %scheduler_name, error = %e, "failed to write cache entry");
        }
    }

    fn purge_expired(&self, now_ms: i64) -> usize {
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|e| e.valid_at(now_ms));
        let removed = before - entries.len();

        if removed > 0 {
            if let Err(e) = self.write(&entries) {
                warn!(error = %e, "failed to rewrite cache after sweep");
            }
            info!(removed, "purged stale cache entries");
        }
        removed
    }
}
