//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Upload size cap for `/api/summarize/upload`.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::api_root))
        .route("/api/health", get(handlers::health))
        .route("/api/summarize", post(handlers::summarize))
        .route("/api/summarize/upload", post(handlers::summarize_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
