//! Probe endpoints, unauthenticated.
//!
//! `/health/ready` is the only one that leaves the process: it asks the
//! backend's data API for its root document and reports how long that took.
//! A failed probe uses the same `{"error": ...}` body as every other route.

use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::backend::BackendClient;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[cfg(feature = "openapi")]
use crate::error::ErrorBody;

/// Process is up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Liveness {
    pub version: String,
    pub uptime_seconds: u64,
}

/// Backend answered the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Readiness {
    pub backend_latency_ms: u64,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses((status = 200, description = "Always \"pong\"", body = String)),
))]
pub async fn ping() -> &'static str {
    "pong"
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is alive", body = Liveness)),
))]
pub async fn liveness(State(start_time): State<Instant>) -> Json<Liveness> {
    Json(Liveness {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start_time.elapsed().as_secs(),
    })
}

/// GET /health/ready - 503 with the backend's error when the probe fails
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Backend reachable", body = Readiness),
        (status = 503, description = "Backend unreachable or refusing", body = ErrorBody),
    ),
))]
pub async fn readiness(State(backend): State<BackendClient>) -> ApiResult<Json<Readiness>> {
    let started = Instant::now();
    backend.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness probe failed");
        ApiError::service_unavailable(format!("Backend check failed: {}", e))
    })?;

    Ok(Json(Readiness {
        backend_latency_ms: started.elapsed().as_millis() as u64,
    }))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}
