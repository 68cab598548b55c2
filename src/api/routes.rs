//! API Routes
//!
//! Configures the Axum router with all feed service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    access_handler, bind_feed_handler, detach_handler, get_feed_handler, health_handler,
    load_handler, refresh_handler, retry_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/feed",
            put(bind_feed_handler)
                .get(get_feed_handler)
                .delete(detach_handler),
        )
        .route("/feed/load/:edge", post(load_handler))
        .route("/feed/retry/:edge", post(retry_handler))
        .route("/feed/access/:index", post(access_handler))
        .route("/feed/refresh", post(refresh_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
