use tally_core::types::ValidatedReport;

use crate::types::CacheEntry;

/// Day-scoped cache of validated results, keyed by scheduler name.
///
/// `now_ms` is passed in rather than read from a clock so callers and tests
/// control time. Implementations swallow their own IO failures: a cache
/// that cannot be read or written degrades to miss behavior with a logged
/// warning, never an error.
pub trait CacheStore: Send + Sync {
    /// The entry for `scheduler_name` if it is still valid on today's WIB
    /// calendar date. A stale entry is purged from the store as a side
    /// effect. An entry that does not qualify ([`CacheEntry::qualifies`])
    /// is logged and reported as a miss, left in place for `put` to replace.
    fn get(&self, scheduler_name: &str, now_ms: i64) -> Option<CacheEntry>;

    /// Unconditional upsert with `now_ms` as the write stamp. Callers only
    /// invoke this for success-and-match results; the store does not
    /// re-check.
    fn put(&self, scheduler_name: &str, result: ValidatedReport, now_ms: i64);

    /// Drop every entry not valid at `now_ms`. Returns how many were
    /// removed.
    fn purge_expired(&self, now_ms: i64) -> usize;
}
