//! SSO token management — POST /api/token
//!
//! Request:  `{"token": "eyJhb..."}`
//! Response: `{"success": true, "message": "token updated"}`
//!
//! The token value itself never reaches the logs.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::AppState;

#[derive(Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Serialize)]
pub struct TokenReply {
    pub success: bool,
    pub message: String,
}

/// POST /api/token — replace the stored upstream SSO token.
pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenRequest>,
) -> (StatusCode, Json<TokenReply>) {
    let token = req.token.trim();
    if token.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(TokenReply {
                success: false,
                message: "token is required".to_string(),
            }),
        );
    }

    match state.token.save(token) {
        Ok(()) => {
            info!("upstream token updated");
            (
                StatusCode::OK,
                Json(TokenReply {
                    success: true,
                    message: "token updated".to_string(),
                }),
            )
        }
        Err(e) => {
            warn!(error = %e, "failed to persist token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TokenReply {
                    success: false,
                    message: "failed to save token".to_string(),
                }),
            )
        }
    }
}
