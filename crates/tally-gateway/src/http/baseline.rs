//! Expected-value snapshot endpoints.
//!
//! POST /api/refresh-today — refetch today's scheduler documents from
//! upstream and rewrite the snapshot file.
//! Response: `{"success": true, "todayRecords": 3, "todayDate": "2024-01-15"}`
//!
//! GET /api/baseline — today's records from the snapshot file as-is.
//! Response: `{"success": true, "todayDate": "...", "records": [...]}`
//!
//! Both answer HTTP 200 with a `success` flag; a missing snapshot is a
//! dashboard state, not a server error.

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use tally_baseline::BaselineError;
use tally_core::wib;

use crate::app::AppState;
use crate::workflow::{self, RefreshOutcome};

/// POST /api/refresh-today — pull and persist today's snapshot.
pub async fn refresh_handler(State(state): State<Arc<AppState>>) -> Json<RefreshOutcome> {
    let now_ms = Utc::now().timestamp_millis();
    Json(workflow::refresh_today(&state, now_ms).await)
}

/// GET /api/baseline — what the snapshot file currently holds for today.
pub async fn baseline_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let today_ms = wib::today_start_ms();
    let today_date = wib::wib_date_string(today_ms);

    match state.baseline.load_for_day(today_ms) {
        Ok(records) => Json(json!({
            "success": true,
            "todayDate": today_date,
            "records": records,
        })),
        Err(e) => {
            if !matches!(e, BaselineError::Missing { .. }) {
                warn!(error = %e, "baseline snapshot unreadable");
            }
            Json(json!({
                "success": false,
                "todayDate": today_date,
                "error": e.to_string(),
            }))
        }
    }
}
