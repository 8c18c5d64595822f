//! HTTP route handlers for the message page.
//!
//! The message route carries a short Cache-Control header since the row can
//! change in the database at any time. Request tracing is enabled via
//! middleware that generates a unique request ID for each incoming request,
//! allowing correlation of all logs within a request.

pub mod health;
pub mod home;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_MESSAGE;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Message page - short cache, the row can change underneath us
    let message_routes = Router::new().route("/", get(home::index)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_MESSAGE),
        ),
    );

    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(message_routes)
        .merge(health_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
