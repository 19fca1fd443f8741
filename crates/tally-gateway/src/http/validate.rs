//! Scheduler validation endpoint — POST /api/validate
//!
//! Request:  `{"schedulerName": "SALES_FUNNEL_MTD", "forceRefresh": false}`
//! Response: `{"success": true, "validation": {...}, "report": {...},
//!             "fromCache": false, "fetchedAt": 1705312800000}`
//!   or:     `{"success": false, "error": "...", "emptyResult": false,
//!             "foundReports": 0, "foundSchedulers": [], "todayDate": "2024-01-15"}`
//!
//! Structured failures ship with HTTP 200: an upstream gap is data for the
//! dashboard, not a server error. Only a malformed request gets a 4xx.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::app::AppState;
use crate::workflow::{self, ValidationOutcome};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub scheduler_name: String,
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Serialize)]
pub struct ValidateError {
    pub error: String,
}

/// POST /api/validate — validate one scheduler's report for today.
pub async fn validate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationOutcome>, (StatusCode, Json<ValidateError>)> {
    let name = req.scheduler_name.trim();
    if name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ValidateError {
                error: "schedulerName cannot be empty".to_string(),
            }),
        ));
    }
    if !state.config.schedulers.names.iter().any(|n| n == name) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ValidateError {
                error: format!("unknown scheduler: {name}"),
            }),
        ));
    }

    let now_ms = Utc::now().timestamp_millis();
    let budget_secs = state.config.gateway.request_timeout_secs;
    let run = workflow::validate_scheduler(&state, name, true, req.force_refresh, now_ms);

    let outcome = match tokio::time::timeout(Duration::from_secs(budget_secs), run).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(scheduler = %name, budget_secs, "validation exceeded the request budget");
            ValidationOutcome::timed_out(budget_secs, now_ms)
        }
    };
    Ok(Json(outcome))
}
