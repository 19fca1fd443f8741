use std::fs;
use std::path::PathBuf;

use tracing::debug;

use tally_core::types::ExpectedRecord;
use tally_core::wib;

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    /// No snapshot for the requested day: file absent, or present but
    /// holding only other days' records.
    #[error("no baseline snapshot for {date}")]
    Missing { date: String },

    #[error("baseline file unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("baseline file malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// The day's expected-value snapshot, persisted as a JSON list. Written by
/// the refresh flow, read by validation. Reads go to disk every time; the
/// file is the only state.
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Records whose `analytic_date` equals `day_ms`. An empty answer is
    /// `Missing`, never an empty list: validating against a stale snapshot
    /// would silently compare everything to 0.
    pub fn load_for_day(&self, day_ms: i64) -> Result<Vec<ExpectedRecord>, BaselineError> {
        if !self.path.exists() {
            return Err(BaselineError::Missing {
                date: wib::wib_date_string(day_ms),
            });
        }

        let raw = fs::read_to_string(&self.path)?;
        let records: Vec<ExpectedRecord> = serde_json::from_str(&raw)?;

        let total = records.len();
        let todays: Vec<ExpectedRecord> = records
            .into_iter()
            .filter(|record| record.analytic_date == day_ms)
            .collect();

        debug!(
            total,
            matching = todays.len(),
            day_ms,
            "loaded baseline snapshot"
        );

        if todays.is_empty() {
            return Err(BaselineError::Missing {
                date: wib::wib_date_string(day_ms),
            });
        }
        Ok(todays)
    }

    /// Replace the snapshot file with the given records.
    pub fn save(&self, records: &[ExpectedRecord]) -> Result<(), BaselineError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)?;
        debug!(count = records.len(), path = %self.path.display(), "saved baseline snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 1_705_251_600_000;
    const OTHER_DAY: i64 = 1_705_338_000_000;

    fn temp_store(tag: &str) -> BaselineStore {
        let path = std::env::temp_dir().join(format!(
            "tally-baseline-{}-{}.json",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        BaselineStore::new(path)
    }

    fn record(name: &str, date: i64, total: i64) -> ExpectedRecord {
        ExpectedRecord {
            analytic_name: name.to_string(),
            analytic_date: date,
            analytic_total_data: total,
        }
    }

    #[test]
    fn missing_file_is_missing_baseline() {
        let store = temp_store("absent");
        let err = store.load_for_day(DAY).unwrap_err();
        assert!(matches!(err, BaselineError::Missing { .. }));
    }

    #[test]
    fn load_filters_to_the_requested_day() {
        let store = temp_store("filter");
        store
            .save(&[
                record("A", DAY, 10),
                record("B", OTHER_DAY, 20),
                record("C", DAY, 30),
            ])
            .unwrap();

        let todays = store.load_for_day(DAY).unwrap();
        let names: Vec<&str> = todays.iter().map(|r| r.analytic_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let _ = fs::remove_file(&store.path);
    }

    #[test]
    fn stale_snapshot_counts_as_missing() {
        let store = temp_store("stale");
        store.save(&[record("A", OTHER_DAY, 10)]).unwrap();

        let err = store.load_for_day(DAY).unwrap_err();
        assert!(matches!(err, BaselineError::Missing { .. }));

        let _ = fs::remove_file(&store.path);
    }

    #[test]
    fn corrupt_file_is_a_format_error() {
        let store = temp_store("corrupt");
        fs::write(&store.path, "{ not json").unwrap();

        let err = store.load_for_day(DAY).unwrap_err();
        assert!(matches!(err, BaselineError::Format(_)));

        let _ = fs::remove_file(&store.path);
    }

    #[test]
    fn raw_upstream_shape_loads() {
        // Snapshot files written by earlier tooling hold the upstream rows
        // verbatim: stringified numbers and extra document fields.
        let store = temp_store("legacy");
        fs::write(
            &store.path,
            format!(
                r#"[{{"_id": "665f1c2e", "analyticName": "A", "analyticDate": "{DAY}", "analyticTotalData": "42", "source": "mongo"}}]"#
            ),
        )
        .unwrap();

        let todays = store.load_for_day(DAY).unwrap();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].analytic_total_data, 42);

        let _ = fs::remove_file(&store.path);
    }
}
