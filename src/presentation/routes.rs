// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_vegetation_patterns, health_check, root};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(health_check))
        .route("/api/v1/patrones_vegetacion", get(get_vegetation_patterns))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
