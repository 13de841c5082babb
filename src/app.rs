use crate::handlers;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/refs", get(handlers::get_refs))
        .route("/api/datasets", get(handlers::get_datasets))
        .route("/api/summary", get(handlers::get_summary))
        .with_state(state)
}
