//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (prediction backend reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::server::state::AppState;
use crate::status::STATUS_PATH;

const BACKEND_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or degraded
    pub status: String,
    /// Prediction backend: ok or unreachable
    pub backend: String,
    /// UI bundle: ok or missing
    pub ui: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_backend(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let backend_ok = check_backend(&state).await;
    let ui_ok = state.static_dir.join("index.html").is_file();

    Json(HealthResponse {
        status: if backend_ok { "healthy" } else { "degraded" }.to_string(),
        backend: if backend_ok { "ok" } else { "unreachable" }.to_string(),
        ui: if ui_ok { "ok" } else { "missing" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// The backend counts as up if its status endpoint answers at all
async fn check_backend(state: &AppState) -> bool {
    let result = state
        .http
        .get(state.backend_url_for(STATUS_PATH))
        .timeout(BACKEND_PROBE_TIMEOUT)
        .send()
        .await;

    match result {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, "backend health probe failed");
            false
        }
    }
}
