//! Health probes
//!
//! `/health` and `/health/live` answer as long as the process serves
//! requests. `/health/ready` additionally writes a probe entry through the
//! key-value storage and reports whether the AI bridge is configured; only
//! the storage result decides readiness.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
    pub ai: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            message: None,
        }
    }
}

impl HealthResponse {
    fn plain(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: None,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("healthy"))
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::plain("alive"))
}

/// 503 when the storage rejects the probe write
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = match state.storage().probe() {
        Ok(()) => CheckStatus::new("healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "Storage probe failed");
            CheckStatus {
                status: "unhealthy",
                message: Some(e.to_string()),
            }
        }
    };
    let ai = CheckStatus::new(if state.ai().is_enabled() {
        "enabled"
    } else {
        "disabled"
    });

    let ready = storage.message.is_none();
    let response = HealthResponse {
        checks: Some(HealthChecks { storage, ai }),
        ..HealthResponse::plain(if ready { "ready" } else { "not_ready" })
    };
    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}
