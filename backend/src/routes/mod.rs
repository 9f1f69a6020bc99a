//! HTTP surface of the FitPulse API
//!
//! Probes are mounted at the root. Everything else lives under `/api/v1`:
//! `/session` for the landing and login flow, `/admin` and `/member` for
//! the two dashboards.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod admin;
mod health;
mod member;
mod session;

/// Chat histories and plans are small; anything larger is a client bug
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Build the router with the shared middleware stack
pub fn create_router(state: AppState) -> Router {
    // The AI client enforces its own timeout; the request one must outlast it
    let request_timeout = Duration::from_secs(state.config().ai.timeout_secs.max(30) + 5);

    let probes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check));

    probes
        .nest("/api/v1", api_v1())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_v1() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "FitPulse API v1" }))
        .nest("/session", session::session_routes())
        .nest("/admin", admin::admin_routes())
        .nest("/member", member::member_routes())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
