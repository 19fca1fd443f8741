use tally_core::types::ExpectedRecord;

/// Expected aggregate row count for a scheduler, 0 when the snapshot has no
/// record for it. Exact match on `analytic_name`; with duplicate names the
/// first record wins.
///
/// "Snapshot missing entirely" is a distinct condition handled by the
/// snapshot store, not here.
pub fn expected_total(snapshot: &[ExpectedRecord], scheduler_name: &str) -> i64 {
    snapshot
        .iter()
        .find(|record| record.analytic_name == scheduler_name)
        .map(|record| record.analytic_total_data)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, total: i64) -> ExpectedRecord {
        ExpectedRecord {
            analytic_name: name.to_string(),
            analytic_date: 1_705_251_600_000,
            analytic_total_data: total,
        }
    }

    #[test]
    fn finds_exact_name() {
        let snapshot = vec![record("A", 10), record("B", 20)];
        assert_eq!(expected_total(&snapshot, "B"), 20);
    }

    #[test]
    fn absent_name_is_zero() {
        let snapshot = vec![record("A", 10)];
        assert_eq!(expected_total(&snapshot, "B"), 0);
        assert_eq!(expected_total(&[], "A"), 0);
    }

    #[test]
    fn match_is_exact_not_prefix() {
        let snapshot = vec![record("SALES_FUNNEL", 10)];
        assert_eq!(expected_total(&snapshot, "SALES"), 0);
        assert_eq!(expected_total(&snapshot, "sales_funnel"), 0);
    }

    #[test]
    fn duplicate_names_first_wins() {
        let snapshot = vec![record("A", 10), record("A", 99)];
        assert_eq!(expected_total(&snapshot, "A"), 10);
    }
}
