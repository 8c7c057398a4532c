//! Axum router configuration with middleware.
//!
//! Middleware: CORS (from config), tracing, upload body limit.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use parley_types::config::CorsConfig;

use crate::http::handlers;
use crate::state::AppState;

/// Largest accepted request body; recorded answers are sent whole.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    let chat_routes = Router::new()
        .route("/status", get(handlers::status::get_status))
        .route("/start", post(handlers::chat::start))
        .route("/answer", post(handlers::chat::answer))
        .route("/end", get(handlers::chat::end));

    Router::new()
        .nest("/chat", chat_routes)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer. A `*` entry allows any value.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let wildcard = |values: &[String]| values.iter().any(|v| v.trim() == "*");

    let origins = if wildcard(&config.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o.trim()).ok()),
        )
    };

    let methods = if wildcard(&config.allowed_methods) {
        AllowMethods::from(Any)
    } else {
        AllowMethods::list(
            config
                .allowed_methods
                .iter()
                .filter_map(|m| Method::from_bytes(m.trim().to_uppercase().as_bytes()).ok()),
        )
    };

    let headers = if wildcard(&config.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(
            config
                .allowed_headers
                .iter()
                .filter_map(|h| HeaderName::from_bytes(h.trim().as_bytes()).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}

/// GET /health - Liveness probe (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
