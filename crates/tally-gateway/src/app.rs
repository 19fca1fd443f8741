use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tally_baseline::BaselineStore;
use tally_cache::CacheStore;
use tally_core::config::TallyConfig;
use tally_explorer::ReportFetcher;

use crate::token::TokenStore;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: TallyConfig,
    pub fetcher: Arc<dyn ReportFetcher>,
    pub cache: Arc<dyn CacheStore>,
    pub baseline: BaselineStore,
    pub token: TokenStore,
}

impl AppState {
    pub fn new(
        config: TallyConfig,
        fetcher: Arc<dyn ReportFetcher>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        let baseline = BaselineStore::new(config.storage.baseline_file());
        let token = TokenStore::new(config.storage.token_file());
        Self {
            config,
            fetcher,
            cache,
            baseline,
            token,
        }
    }
}

/// Assemble the full Axum router. CORS is permissive; the dashboard page is
/// sometimes opened straight from disk during debugging.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::ui::ui_handler))
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/api/schedulers",
            get(crate::http::schedulers::list_handler),
        )
        .route("/api/validate", post(crate::http::validate::validate_handler))
        .route(
            "/api/refresh-today",
            post(crate::http::baseline::refresh_handler),
        )
        .route("/api/baseline", get(crate::http::baseline::baseline_handler))
        .route("/api/token", post(crate::http::token::update_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
