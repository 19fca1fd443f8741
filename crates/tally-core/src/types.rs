use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One upstream execution record for a named job on a given day.
///
/// Wire shape is camelCase, matching the Mongo documents the explorer API
/// returns. Unknown document fields (`_id` and friends) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerReport {
    pub scheduler_name: String,
    /// Epoch-ms day stamp (00:00 WIB). Some exec-API exports stringify
    /// Mongo long values, so decoding accepts integers or numeric strings.
    #[serde(deserialize_with = "flex_i64")]
    pub date: i64,
    /// Pod id → per-pod result. Order is semantically irrelevant; a
    /// BTreeMap keeps serialization deterministic.
    #[serde(default)]
    pub pod_reports: BTreeMap<String, PodResult>,
}

/// Outcome reported by one pod of a scheduler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodResult {
    /// Missing/null means the pod reported no count; aggregation treats it as 0.
    #[serde(default, deserialize_with = "flex_opt_i64")]
    pub rows_inserted: Option<i64>,
    pub execution_success: bool,
}

/// One record of the day's expected-value baseline snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedRecord {
    pub analytic_name: String,
    #[serde(deserialize_with = "flex_i64")]
    pub analytic_date: i64,
    #[serde(default, deserialize_with = "flex_i64")]
    pub analytic_total_data: i64,
}

/// Verdict for one (scheduler, day) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub rows_inserted: i64,
    pub expected_total: i64,
    /// Wire key is `match` (a Rust keyword).
    #[serde(rename = "match")]
    pub matched: bool,
    pub pod_count: usize,
    pub execution_success: bool,
    pub difference: i64,
}

/// A verdict together with the report it was computed from, the unit the
/// day-scoped cache persists and the HTTP API returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedReport {
    pub validation: ValidationResult,
    pub report: SchedulerReport,
}

impl ValidatedReport {
    /// Entries qualify for the day-scoped cache only when the run succeeded
    /// AND the totals matched; failures are never remembered.
    pub fn cacheable(&self) -> bool {
        self.validation.execution_success && self.validation.matched
    }
}

/// Best-effort i64 out of a JSON value: integer, integral float, or
/// numeric string. Used by the explorer decode boundary.
pub fn json_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Serde mirror of [`json_i64`] for derived deserialization.
pub fn flex_i64<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Str(String),
    }

    match Raw::deserialize(de)? {
        Raw::Int(n) => Ok(n),
        Raw::Float(f) if f.fract() == 0.0 => Ok(f as i64),
        Raw::Float(f) => Err(D::Error::custom(format!("expected an integer, got {f}"))),
        Raw::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}

/// [`flex_i64`] that additionally maps JSON null to `None`.
pub fn flex_opt_i64<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrap(#[serde(deserialize_with = "flex_i64")] i64);

    Option::<Wrap>::deserialize(de).map(|opt| opt.map(|w| w.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_decodes_camel_case_and_ignores_unknown_fields() {
        let report: SchedulerReport = serde_json::from_value(json!({
            "_id": {"$oid": "665f1c2e9d3b2a0001a4e2f1"},
            "schedulerName": "SALES_FUNNEL_YESTERDAY",
            "date": 1705251600000i64,
            "podReports": {
                "pod-a": {"rowsInserted": 100, "executionSuccess": true},
                "pod-b": {"rowsInserted": null, "executionSuccess": false}
            }
        }))
        .unwrap();

        assert_eq!(report.scheduler_name, "SALES_FUNNEL_YESTERDAY");
        assert_eq!(report.date, 1_705_251_600_000);
        assert_eq!(report.pod_reports.len(), 2);
        assert_eq!(report.pod_reports["pod-a"].rows_inserted, Some(100));
        assert_eq!(report.pod_reports["pod-b"].rows_inserted, None);
    }

    #[test]
    fn stringified_row_counts_decode() {
        let pod: PodResult = serde_json::from_value(json!({
            "rowsInserted": "250",
            "executionSuccess": true
        }))
        .unwrap();
        assert_eq!(pod.rows_inserted, Some(250));

        let pod: PodResult = serde_json::from_value(json!({
            "rowsInserted": null,
            "executionSuccess": true
        }))
        .unwrap();
        assert_eq!(pod.rows_inserted, None);
    }

    #[test]
    fn stringified_epoch_values_decode() {
        let record: ExpectedRecord = serde_json::from_value(json!({
            "analyticName": "SALES_FUNNEL_YESTERDAY",
            "analyticDate": "1705251600000",
            "analyticTotalData": "150"
        }))
        .unwrap();
        assert_eq!(record.analytic_date, 1_705_251_600_000);
        assert_eq!(record.analytic_total_data, 150);
    }

    #[test]
    fn missing_total_defaults_to_zero() {
        let record: ExpectedRecord = serde_json::from_value(json!({
            "analyticName": "SALES_FUNNEL_MTD",
            "analyticDate": 1705251600000i64
        }))
        .unwrap();
        assert_eq!(record.analytic_total_data, 0);
    }

    #[test]
    fn validation_result_uses_match_wire_key() {
        let result = ValidationResult {
            rows_inserted: 150,
            expected_total: 150,
            matched: true,
            pod_count: 2,
            execution_success: true,
            difference: 0,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["match"], json!(true));
        assert_eq!(value["rowsInserted"], json!(150));
        assert_eq!(value["podCount"], json!(2));

        let back: ValidationResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn json_i64_accepts_numbers_floats_and_strings() {
        assert_eq!(json_i64(&json!(42)), Some(42));
        assert_eq!(json_i64(&json!(1705251600000.0)), Some(1_705_251_600_000));
        assert_eq!(json_i64(&json!("  77 ")), Some(77));
        assert_eq!(json_i64(&json!(1.5)), None);
        assert_eq!(json_i64(&json!("not a number")), None);
        assert_eq!(json_i64(&json!(null)), None);
    }
}
