use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use tally_core::types::ValidatedReport;

use crate::store::CacheStore;
use crate::types::CacheEntry;

/// HashMap-backed store with the same semantics as the file store. Used by
/// tests and available for embedding without a data directory.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry as-is, stamp included.
    pub fn insert(&self, entry: CacheEntry) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(entry.scheduler_name.clone(), entry);
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, scheduler_name: &str, now_ms: i64) -> Option<CacheEntry> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries.get(scheduler_name)?;

        if !entry.valid_at(now_ms) {
            entries.remove(scheduler_name);
            return None;
        }
        if !entry.qualifies() {
            warn!(scheduler = %scheduler_name, "cache entry is not a validated success, ignoring");
            return None;
        }
        Some(entry.clone())
    }

    fn put(&self, scheduler_name: &str, result: ValidatedReport, now_ms: i64) {
        let entry = CacheEntry {
            scheduler_name: scheduler_name.to_string(),
            fetched_at: now_ms,
            result,
        };
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(scheduler_name.to_string(), entry);
    }

    fn purge_expired(&self, now_ms: i64) -> usize {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.valid_at(now_ms));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tally_core::types::{PodResult, SchedulerReport, ValidationResult};

    const DAY1_MS: i64 = 1_705_312_800_000;
    const DAY2_MS: i64 = 1_705_399_200_000;

    fn validated(name: &str) -> ValidatedReport {
        let mut pod_reports = BTreeMap::new();
        pod_reports.insert(
            "pod-a".to_string(),
            PodResult {
                rows_inserted: Some(10),
                execution_success: true,
            },
        );
        ValidatedReport {
            validation: ValidationResult {
                rows_inserted: 10,
                expected_total: 10,
                matched: true,
                pod_count: 1,
                execution_success: true,
                difference: 0,
            },
            report: SchedulerReport {
                scheduler_name: name.to_string(),
                date: DAY1_MS,
                pod_reports,
            },
        }
    }

    #[test]
    fn put_then_get_same_day() {
        let store = MemoryCacheStore::new();
        store.put("A", validated("A"), DAY1_MS);
        assert!(store.get("A", DAY1_MS).is_some());
        assert!(store.get("B", DAY1_MS).is_none());
    }

    #[test]
    fn stale_seeded_entry_is_purged() {
        let store = MemoryCacheStore::new();
        store.insert(CacheEntry {
            scheduler_name: "A".to_string(),
            fetched_at: DAY1_MS,
            result: validated("A"),
        });

        assert!(store.get("A", DAY2_MS).is_none());
        assert_eq!(store.entries.lock().unwrap().len(), 0);
    }

    #[test]
    fn sweep_counts_removals() {
        let store = MemoryCacheStore::new();
        store.put("OLD", validated("OLD"), DAY1_MS);
        store.put("NEW", validated("NEW"), DAY2_MS);
        assert_eq!(store.purge_expired(DAY2_MS), 1);
        assert_eq!(store.purge_expired(DAY2_MS), 0);
    }
}
