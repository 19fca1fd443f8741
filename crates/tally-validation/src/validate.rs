use tally_core::types::{ExpectedRecord, SchedulerReport, ValidatedReport, ValidationResult};

use crate::aggregate::aggregate;
use crate::baseline::expected_total;

#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// No report for the requested name in the fetched batch. Carries what
    /// WAS found so callers can tell "upstream has nothing yet" apart from
    /// "upstream has data under other names".
    #[error("no report found for scheduler {scheduler_name}")]
    NotFound {
        scheduler_name: String,
        /// Total reports in the batch.
        found_reports: usize,
        /// Names present in the batch, deduplicated and sorted.
        found_schedulers: Vec<String>,
        /// True when the batch was empty altogether.
        empty_result: bool,
    },
}

/// Verdict for one scheduler against a fetched batch and the day's
/// expected-value snapshot. Pure; persistence is the caller's concern.
pub fn validate(
    scheduler_name: &str,
    reports: &[SchedulerReport],
    snapshot: &[ExpectedRecord],
) -> Result<ValidatedReport, ValidateError> {
    let Some(report) = select_report(reports, scheduler_name) else {
        let mut found_schedulers: Vec<String> =
            reports.iter().map(|r| r.scheduler_name.clone()).collect();
        found_schedulers.sort_unstable();
        found_schedulers.dedup();

        return Err(ValidateError::NotFound {
            scheduler_name: scheduler_name.to_string(),
            found_reports: reports.len(),
            found_schedulers,
            empty_result: reports.is_empty(),
        });
    };

    let totals = aggregate(report);
    let expected = expected_total(snapshot, scheduler_name);

    let validation = ValidationResult {
        rows_inserted: totals.rows_inserted,
        expected_total: expected,
        matched: totals.rows_inserted == expected,
        pod_count: totals.pod_count,
        execution_success: totals.execution_success,
        difference: totals.rows_inserted - expected,
    };

    Ok(ValidatedReport {
        validation,
        report: report.clone(),
    })
}

/// Pick the report for `name`: maximum `date` wins, and on equal dates the
/// first encountered report is kept.
fn select_report<'a>(reports: &'a [SchedulerReport], name: &str) -> Option<&'a SchedulerReport> {
    let mut best: Option<&SchedulerReport> = None;
    for report in reports.iter().filter(|r| r.scheduler_name == name) {
        match best {
            None => best = Some(report),
            Some(current) if report.date > current.date => best = Some(report),
            Some(_) => {}
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tally_core::types::PodResult;

    fn report(name: &str, date: i64, pods: &[(&str, Option<i64>, bool)]) -> SchedulerReport {
        let pod_reports: BTreeMap<String, PodResult> = pods
            .iter()
            .map(|(id, rows, ok)| {
                (
                    id.to_string(),
                    PodResult {
                        rows_inserted: *rows,
                        execution_success: *ok,
                    },
                )
            })
            .collect();
        SchedulerReport {
            scheduler_name: name.to_string(),
            date,
            pod_reports,
        }
    }

    fn expected(name: &str, total: i64) -> ExpectedRecord {
        ExpectedRecord {
            analytic_name: name.to_string(),
            analytic_date: 1_705_251_600_000,
            analytic_total_data: total,
        }
    }

    const DAY: i64 = 1_705_251_600_000;

    #[test]
    fn matching_totals_validate() {
        let reports = vec![report(
            "SALES_FUNNEL_YESTERDAY",
            DAY,
            &[("a", Some(100), true), ("b", Some(50), false)],
        )];
        let snapshot = vec![expected("SALES_FUNNEL_YESTERDAY", 150)];

        let validated = validate("SALES_FUNNEL_YESTERDAY", &reports, &snapshot).unwrap();
        let v = &validated.validation;
        assert_eq!(v.rows_inserted, 150);
        assert_eq!(v.expected_total, 150);
        assert!(v.matched);
        assert_eq!(v.pod_count, 2);
        assert!(v.execution_success);
        assert_eq!(v.difference, 0);
        assert_eq!(validated.report.scheduler_name, "SALES_FUNNEL_YESTERDAY");
    }

    #[test]
    fn mismatch_carries_the_difference() {
        let reports = vec![report(
            "SALES_FUNNEL_YESTERDAY",
            DAY,
            &[("a", Some(100), true), ("b", Some(50), false)],
        )];
        let snapshot = vec![expected("SALES_FUNNEL_YESTERDAY", 140)];

        let validated = validate("SALES_FUNNEL_YESTERDAY", &reports, &snapshot).unwrap();
        assert!(!validated.validation.matched);
        assert_eq!(validated.validation.difference, 10);
    }

    #[test]
    fn empty_batch_is_a_distinct_not_found() {
        let err = validate("SALES_FUNNEL_MTD", &[], &[]).unwrap_err();
        let ValidateError::NotFound {
            found_reports,
            found_schedulers,
            empty_result,
            ..
        } = err;
        assert_eq!(found_reports, 0);
        assert!(found_schedulers.is_empty());
        assert!(empty_result);
    }

    #[test]
    fn wrong_names_list_what_was_found() {
        let reports = vec![
            report("OTHER_JOB_B", DAY, &[("a", Some(1), true)]),
            report("OTHER_JOB_A", DAY, &[("a", Some(1), true)]),
            report("OTHER_JOB_B", DAY, &[("a", Some(2), true)]),
        ];
        let err = validate("SALES_FUNNEL_MTD", &reports, &[]).unwrap_err();
        let ValidateError::NotFound {
            found_reports,
            found_schedulers,
            empty_result,
            ..
        } = err;
        assert_eq!(found_reports, 3);
        assert_eq!(found_schedulers, vec!["OTHER_JOB_A", "OTHER_JOB_B"]);
        assert!(!empty_result);
    }

    #[test]
    fn most_recent_report_wins() {
        let reports = vec![
            report("A", DAY, &[("a", Some(1), true)]),
            report("A", DAY + 86_400_000, &[("a", Some(2), true)]),
            report("A", DAY - 86_400_000, &[("a", Some(3), true)]),
        ];
        let validated = validate("A", &reports, &[expected("A", 2)]).unwrap();
        assert_eq!(validated.validation.rows_inserted, 2);
        assert!(validated.validation.matched);
    }

    #[test]
    fn equal_dates_keep_the_first_encountered() {
        let reports = vec![
            report("A", DAY, &[("a", Some(1), true)]),
            report("A", DAY, &[("a", Some(2), true)]),
        ];
        let validated = validate("A", &reports, &[]).unwrap();
        assert_eq!(validated.validation.rows_inserted, 1);
    }

    #[test]
    fn missing_baseline_record_compares_against_zero() {
        let reports = vec![report("A", DAY, &[("a", Some(5), true)])];
        let validated = validate("A", &reports, &[]).unwrap();
        assert_eq!(validated.validation.expected_total, 0);
        assert!(!validated.validation.matched);
        assert_eq!(validated.validation.difference, 5);
    }
}
