use tally_core::types::SchedulerReport;

/// Totals across every pod of one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTotals {
    pub rows_inserted: i64,
    pub pod_count: usize,
    pub execution_success: bool,
}

/// Sum row counts across pods (a missing count is 0) and OR the success
/// flags. A report with no pods ran nowhere, so it is not a success.
pub fn aggregate(report: &SchedulerReport) -> ReportTotals {
    let rows_inserted = report
        .pod_reports
        .values()
        .map(|pod| pod.rows_inserted.unwrap_or(0))
        .sum();
    let execution_success = report.pod_reports.values().any(|pod| pod.execution_success);

    ReportTotals {
        rows_inserted,
        pod_count: report.pod_reports.len(),
        execution_success,
    }
}
