//! HTTP route handlers.

use axum::{
    Router,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod health;
mod submit;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let submit_path = state.config.submit_path.clone();

    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))

        // Submission endpoint; the pipeline answers every method itself
        .route(&submit_path, any(submit::submit_answer))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
