pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metadata;
pub mod models;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// All routes, without middleware layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/metadata", post(handlers::metadata::extract_metadata))
        .route(
            "/api/metadata/preview",
            post(handlers::metadata::preview_metadata),
        )
        .with_state(state)
}
