pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::compare::handlers as compare;
use crate::export::handlers as export;
use crate::ingest::handlers as ingest;
use crate::optimization::handlers as optimization;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route(
            "/api/v1/session",
            post(session::handle_login)
                .get(session::handle_dashboard)
                .delete(session::handle_logout),
        )
        .route("/api/v1/session/plan", post(session::handle_select_plan))
        .route("/api/v1/plans", get(session::handle_plans))
        // Ingestion
        .route(
            "/api/v1/documents",
            post(ingest::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Optimization
        .route("/api/v1/optimize", post(optimization::handle_optimize))
        // History, comparison, export
        .route("/api/v1/history", get(session::handle_history))
        .route("/api/v1/history/:id/compare", get(compare::handle_compare))
        .route("/api/v1/history/:id/export", get(export::handle_export))
        .with_state(state)
}
