//! Response normalization and the strict decode step.
//!
//! The exec endpoint wraps its rows in an envelope whose key has drifted
//! across deployments. [`extract_rows`] flattens the known shapes; anything
//! else degrades to an empty batch with a warning. [`decode_batch`] then
//! turns raw rows into typed records, flagging every row that does not
//! decode instead of dropping it silently.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

const ENVELOPE_KEYS: [&str; 4] = ["data", "result", "records", "rows"];

/// One row the strict decode step rejected.
#[derive(Debug)]
pub struct DecodeIssue {
    /// Position within the upstream batch.
    pub index: usize,
    pub detail: String,
}

/// Outcome of decoding one upstream batch.
#[derive(Debug)]
pub struct DecodedBatch<T> {
    pub records: Vec<T>,
    pub issues: Vec<DecodeIssue>,
}

/// Flatten a response body to its row list.
pub fn extract_rows(body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        Value::Object(map) => {
            for key in ENVELOPE_KEYS {
                if let Some(Value::Array(rows)) = map.get(key) {
                    return rows.clone();
                }
            }
            let keys: Vec<&String> = map.keys().collect();
            warn!(?keys, "unrecognized response envelope, treating as empty");
            Vec::new()
        }
        other => {
            warn!(body = %other, "response body is not an object or array, treating as empty");
            Vec::new()
        }
    }
}

/// Decode every row, collecting failures as issues rather than aborting.
pub fn decode_batch<T: DeserializeOwned>(rows: Vec<Value>) -> DecodedBatch<T> {
    let mut records = Vec::with_capacity(rows.len());
    let mut issues = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<T>(row) {
            Ok(record) => records.push(record),
            Err(e) => issues.push(DecodeIssue {
                index,
                detail: e.to_string(),
            }),
        }
    }

    DecodedBatch { records, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tally_core::types::SchedulerReport;

    #[test]
    fn rows_under_data_key() {
        let rows = extract_rows(json!({"data": [{"a": 1}, {"a": 2}]}));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn rows_under_alternate_keys() {
        for key in ["result", "records", "rows"] {
            let rows = extract_rows(json!({key: [{"a": 1}]}));
            assert_eq!(rows.len(), 1, "key {key}");
        }
    }

    #[test]
    fn bare_array_passes_through() {
        let rows = extract_rows(json!([{"a": 1}]));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn unknown_envelope_is_empty() {
        assert!(extract_rows(json!({"payload": [{"a": 1}]})).is_empty());
        assert!(extract_rows(json!({"data": "not a list"})).is_empty());
        assert!(extract_rows(json!("just a string")).is_empty());
    }

    #[test]
    fn bad_rows_are_flagged_not_dropped() {
        let batch: DecodedBatch<SchedulerReport> = decode_batch(vec![
            json!({
                "schedulerName": "SALES_FUNNEL_MTD",
                "date": 1705251600000i64,
                "podReports": {"pod-a": {"rowsInserted": 5, "executionSuccess": true}}
            }),
            json!({"schedulerName": "BROKEN"}),
            json!("not even an object"),
        ]);

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].scheduler_name, "SALES_FUNNEL_MTD");
        assert_eq!(batch.issues.len(), 2);
        assert_eq!(batch.issues[0].index, 1);
        assert_eq!(batch.issues[1].index, 2);
    }

    #[test]
    fn malformed_pod_rejects_its_whole_report() {
        // A pod missing executionSuccess must not be salvaged: the partial
        // report would aggregate to an understated total.
        let batch: DecodedBatch<SchedulerReport> = decode_batch(vec![json!({
            "schedulerName": "SALES_FUNNEL_MTD",
            "date": 1705251600000i64,
            "podReports": {
                "pod-a": {"rowsInserted": 5, "executionSuccess": true},
                "pod-b": {"rowsInserted": 7}
            }
        })]);

        assert!(batch.records.is_empty());
        assert_eq!(batch.issues.len(), 1);
        assert_eq!(batch.issues[0].index, 0);
    }
}
