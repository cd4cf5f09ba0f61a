//! HTTP route handlers.
//!
//! Two routes: the full heartbeat/vitals snapshot and a plain liveness
//! probe. Vitals carry a no-store Cache-Control header so intermediaries
//! never serve a stale snapshot. Request tracing is enabled via middleware
//! that assigns each request a unique ID for log correlation.

pub mod health;
pub mod heartbeat;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_VITALS;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Vitals - point-in-time snapshot, never cached
    let heartbeat_routes = Router::new()
        .route("/heartbeat", get(heartbeat::heartbeat))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_VITALS),
        ));

    // Liveness probe - always fresh by construction, no header needed
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(heartbeat_routes)
        .merge(health_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
