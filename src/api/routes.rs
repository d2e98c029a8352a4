//! API Routes
//!
//! Configures the Axum router with all data layer endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, cleanup_handler, clear_cache_handler, create_row_handler,
    delete_rows_handler, health_handler, invalidate_handler, list_rows_handler,
    sanitize_handler, update_rows_handler, validate_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/sanitize", post(sanitize_handler))
        .route("/validate", post(validate_handler))
        .route(
            "/collections/:name",
            get(list_rows_handler)
                .post(create_row_handler)
                .patch(update_rows_handler)
                .delete(delete_rows_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
