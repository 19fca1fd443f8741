//! Mongo-shell query strings for the explorer exec endpoint.
//!
//! The endpoint takes a literal `db.<collection>.find(...)` string, so the
//! renderers here produce a canonical form: filter keys in a fixed order and
//! scheduler names deduplicated and sorted. Identical inputs always yield
//! byte-identical queries.

use serde_json::json;

/// Reports for a set of scheduler names. With `day_ms` the filter pins the
/// day-start timestamp; without it the query asks for newest first and the
/// caller picks the most recent per name.
pub fn reports_query(collection: &str, names: &[String], day_ms: Option<i64>) -> String {
    let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let name_filter = json!({ "$in": sorted });
    match day_ms {
        Some(day) => format!(
            "db.{}.find({{\"schedulerName\": {}, \"date\": {}}})",
            collection, name_filter, day
        ),
        None => format!(
            "db.{}.find({{\"schedulerName\": {}}}).sort({{\"date\": -1}})",
            collection, name_filter
        ),
    }
}

/// The day's expected-value snapshot rows.
pub fn baseline_query(collection: &str, day_ms: i64) -> String {
    format!("db.{}.find({{\"analyticDate\": {}}})", collection, day_ms)
}

/// Request body for the exec endpoint.
pub fn exec_payload(query: &str, limit: u32) -> serde_json::Value {
    json!({
        "query": query,
        "limit": limit,
        "offset": 0,
    })
}
