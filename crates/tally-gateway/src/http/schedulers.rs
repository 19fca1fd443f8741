use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /api/schedulers — the configured scheduler names, in config order.
pub async fn list_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "schedulers": state.config.schedulers.names }))
}
