use axum::response::Html;

static DASHBOARD_HTML: &str = include_str!("../../static/dashboard.html");

/// Serve the embedded dashboard at `GET /`.
pub async fn ui_handler() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
