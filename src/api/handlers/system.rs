//! System endpoints: health check and alarm-state catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Metadata for one derived APN state.
#[derive(Debug, Serialize, ToSchema)]
struct ApnStateInfo {
    state: &'static str,
    description: &'static str,
    propagates: bool,
}

/// `GET /config/alarm-states` — List the derived APN states.
#[utoipa::path(
    get,
    path = "/config/alarm-states",
    tag = "System",
    summary = "List derived APN states",
    description = "Returns metadata for every state a (pool, APN) pair can be in.",
    responses(
        (status = 200, description = "APN state catalog", body = Vec<ApnStateInfo>),
    )
)]
pub async fn alarm_states_handler() -> impl IntoResponse {
    let states = vec![
        ApnStateInfo {
            state: "up",
            description: "No member of the pool has declared the APN down",
            propagates: false,
        },
        ApnStateInfo {
            state: "partially_down",
            description: "Some serving members have declared the APN down",
            propagates: true,
        },
        ApnStateInfo {
            state: "fully_down",
            description: "Every serving member has declared the APN down",
            propagates: false,
        },
    ];
    (StatusCode::OK, Json(states))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/alarm-states", get(alarm_states_handler))
}
