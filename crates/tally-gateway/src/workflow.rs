//! The validation workflow: cache gate, upstream fetch, baseline lookup,
//! verdict, write-through. Handlers call into here; nothing below ever
//! escapes as an error, every path ends in a well-formed outcome value.

use serde::Serialize;
use tracing::{info, warn};

use tally_cache::CacheEntry;
use tally_core::types::{ExpectedRecord, SchedulerReport, ValidatedReport, ValidationResult};
use tally_core::wib;
use tally_validation::{validate, ValidateError};

use crate::app::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSuccess {
    pub success: bool,
    pub validation: ValidationResult,
    pub report: SchedulerReport,
    pub from_cache: bool,
    /// Epoch-ms stamp: the cache entry's write time on a hit, "now" on a
    /// fresh run.
    pub fetched_at: i64,
}

/// Structured failure. The NotFound diagnostics hold their "not applicable"
/// values (`false`, `0`, empty) for every other failure class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub success: bool,
    pub error: String,
    pub empty_result: bool,
    pub found_reports: usize,
    pub found_schedulers: Vec<String>,
    pub today_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidationOutcome {
    Success(ValidationSuccess),
    Failure(ValidationFailure),
}

impl ValidationOutcome {
    fn fresh(validated: ValidatedReport, now_ms: i64) -> Self {
        Self::Success(ValidationSuccess {
            success: true,
            validation: validated.validation,
            report: validated.report,
            from_cache: false,
            fetched_at: now_ms,
        })
    }

    fn cached(entry: CacheEntry) -> Self {
        Self::Success(ValidationSuccess {
            success: true,
            validation: entry.result.validation,
            report: entry.result.report,
            from_cache: true,
            fetched_at: entry.fetched_at,
        })
    }

    fn failure(error: impl Into<String>, today_ms: i64) -> Self {
        Self::Failure(ValidationFailure {
            success: false,
            error: error.into(),
            empty_result: false,
            found_reports: 0,
            found_schedulers: Vec::new(),
            today_date: wib::wib_date_string(today_ms),
        })
    }

    /// Failure shape for a request that outran the handler's time budget.
    pub fn timed_out(secs: u64, now_ms: i64) -> Self {
        Self::failure(
            format!("validation timed out after {secs}s"),
            wib::day_start_ms(now_ms),
        )
    }
}

/// Validate one scheduler for today. Serves from cache when allowed,
/// otherwise fetches, validates, and writes through on a qualifying result.
pub async fn validate_scheduler(
    state: &AppState,
    scheduler_name: &str,
    use_cache: bool,
    force_refresh: bool,
    now_ms: i64,
) -> ValidationOutcome {
    if use_cache && !force_refresh {
        if let Some(entry) = state.cache.get(scheduler_name, now_ms) {
            info!(scheduler = %scheduler_name, "serving validation from cache");
            return ValidationOutcome::cached(entry);
        }
    }

    let today_ms = wib::day_start_ms(now_ms);

    let Some(token) = state.token.load() else {
        return ValidationOutcome::failure("no upstream token configured", today_ms);
    };

    let names = &state.config.schedulers.names;
    let reports = match state
        .fetcher
        .fetch_reports(&token, names, Some(today_ms))
        .await
    {
        Ok(reports) => reports,
        Err(e) => {
            warn!(scheduler = %scheduler_name, error = %e, "report fetch failed");
            return ValidationOutcome::failure(e.to_string(), today_ms);
        }
    };

    let snapshot = match state.baseline.load_for_day(today_ms) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "baseline snapshot unavailable");
            return ValidationOutcome::failure(e.to_string(), today_ms);
        }
    };

    match validate(scheduler_name, &reports, &snapshot) {
        Ok(validated) => {
            if validated.cacheable() {
                state.cache.put(scheduler_name, validated.clone(), now_ms);
            }
            info!(
                scheduler = %scheduler_name,
                rows = validated.validation.rows_inserted,
                expected = validated.validation.expected_total,
                matched = validated.validation.matched,
                "validation complete"
            );
            ValidationOutcome::fresh(validated, now_ms)
        }
        Err(ValidateError::NotFound {
            scheduler_name: name,
            found_reports,
            found_schedulers,
            empty_result,
        }) => {
            info!(scheduler = %name, found_reports, empty_result, "no report for scheduler");
            ValidationOutcome::Failure(ValidationFailure {
                success: false,
                error: format!("no report found for scheduler {name}"),
                empty_result,
                found_reports,
                found_schedulers,
                today_date: wib::wib_date_string(today_ms),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub today_records: usize,
    pub today_date: String,
}

/// Pull today's expected-value snapshot from upstream and persist it,
/// dropping any record stamped with another day.
pub async fn refresh_today(state: &AppState, now_ms: i64) -> RefreshOutcome {
    let today_ms = wib::day_start_ms(now_ms);
    let today_date = wib::wib_date_string(today_ms);

    let fail = |error: String| RefreshOutcome {
        success: false,
        error: Some(error),
        today_records: 0,
        today_date: today_date.clone(),
    };

    let Some(token) = state.token.load() else {
        return fail("no upstream token configured".to_string());
    };

    let records = match state.fetcher.fetch_baseline(&token, today_ms).await {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "baseline fetch failed");
            return fail(e.to_string());
        }
    };

    let total = records.len();
    let todays: Vec<ExpectedRecord> = records
        .into_iter()
        .filter(|record| record.analytic_date == today_ms)
        .collect();
    if todays.len() != total {
        warn!(
            total,
            matching = todays.len(),
            "dropping baseline records not stamped with today"
        );
    }

    if let Err(e) = state.baseline.save(&todays) {
        warn!(error = %e, "failed to save baseline snapshot");
        return fail(e.to_string());
    }

    info!(records = todays.len(), "baseline snapshot refreshed");
    RefreshOutcome {
        success: true,
        error: None,
        today_records: todays.len(),
        today_date,
    }
}
