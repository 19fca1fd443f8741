use serde::{Deserialize, Serialize};

use tally_core::types::{flex_i64, ValidatedReport};
use tally_core::wib;

/// One persisted validation outcome, keyed by scheduler name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub scheduler_name: String,
    /// Epoch-ms write stamp. Validity is tied to this falling on the same
    /// WIB calendar day as "now", not to elapsed time.
    #[serde(deserialize_with = "flex_i64")]
    pub fetched_at: i64,
    pub result: ValidatedReport,
}

impl CacheEntry {
    /// Still on today's WIB calendar date?
    pub fn valid_at(&self, now_ms: i64) -> bool {
        wib::same_wib_day(self.fetched_at, now_ms)
    }

    /// Only success-and-match results belong in the cache. Anything else
    /// found on disk is served as a miss.
    pub fn qualifies(&self) -> bool {
        self.result.cacheable()
    }
}
