use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Internal
        .route("/_internal/health", get(handlers::health))
        // Everything else goes through the path classifier
        .route("/", get(handlers::resolve_root))
        .route("/*path", get(handlers::resolve_path))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
