use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers;

pub fn create_router() -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
}
