//! Alarm handlers: raise, clear, and per-pool status queries.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{AlarmResponse, RaiseAlarmRequest};
use crate::app_state::AppState;
use crate::domain::{ApnName, ElementName, PoolName};
use crate::error::{ErrorResponse, SentinelError};

/// `POST /elements/:name/alarms` — Declare an APN down.
///
/// # Errors
///
/// Returns [`SentinelError`] if the reporter is unknown, unpooled, or
/// does not serve the APN, or if the APN is not cataloged.
#[utoipa::path(
    post,
    path = "/api/v1/elements/{name}/alarms",
    tag = "Alarms",
    summary = "Raise an alarm",
    description = "Declares the APN down on behalf of the element and propagates down notices to authenticated serving peers in its pool. Re-declaring is an idempotent no-op; the last serving member to declare completes the set without propagation.",
    params(
        ("name" = String, Path, description = "Reporting element name"),
    ),
    request_body = RaiseAlarmRequest,
    responses(
        (status = 200, description = "Declaration recorded", body = AlarmResponse),
        (status = 400, description = "Element not bound to a pool", body = ErrorResponse),
        (status = 404, description = "Element or APN not found", body = ErrorResponse),
        (status = 422, description = "Element does not serve the APN", body = ErrorResponse),
    )
)]
pub async fn raise_alarm(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<RaiseAlarmRequest>,
) -> Result<impl IntoResponse, SentinelError> {
    let reporter = ElementName::new(name);
    let summary = state.monitor.set_alarm(&reporter, &req.apn).await?;
    Ok(Json(AlarmResponse::from_summary(reporter, req.apn, summary)))
}

/// `DELETE /elements/:name/alarms/:apn` — Withdraw a down declaration.
///
/// # Errors
///
/// Returns [`SentinelError::NoActiveAlarm`] if the pool has no alarm for
/// the APN, or [`SentinelError::NotReporting`] if the element is not among
/// its reporters.
#[utoipa::path(
    delete,
    path = "/api/v1/elements/{name}/alarms/{apn}",
    tag = "Alarms",
    summary = "Clear an alarm",
    description = "Withdraws the element's down declaration for the APN and retracts the matching notice from each authenticated serving peer.",
    params(
        ("name" = String, Path, description = "Reporting element name"),
        ("apn" = String, Path, description = "APN name"),
    ),
    responses(
        (status = 200, description = "Declaration withdrawn", body = AlarmResponse),
        (status = 404, description = "No active alarm for the APN", body = ErrorResponse),
        (status = 409, description = "Element is not a reporter", body = ErrorResponse),
    )
)]
pub async fn clear_alarm(
    State(state): State<AppState>,
    Path((name, apn)): Path<(String, String)>,
) -> Result<impl IntoResponse, SentinelError> {
    let reporter = ElementName::new(name);
    let apn = ApnName::new(apn);
    let summary = state.monitor.clear_alarm(&reporter, &apn).await?;
    Ok(Json(AlarmResponse::from_summary(reporter, apn, summary)))
}

/// `GET /pools/:name/alarms/:apn` — Query a `(pool, apn)` pair's state.
///
/// # Errors
///
/// Returns [`SentinelError::PoolNotFound`] if the pool is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{name}/alarms/{apn}",
    tag = "Alarms",
    summary = "Get alarm status",
    description = "Returns the reporter set, the serving-member set, and the derived state (up, partially_down, fully_down) for the pair.",
    params(
        ("name" = String, Path, description = "Pool name"),
        ("apn" = String, Path, description = "APN name"),
    ),
    responses(
        (status = 200, description = "Alarm status", body = serde_json::Value),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn alarm_status(
    State(state): State<AppState>,
    Path((name, apn)): Path<(String, String)>,
) -> Result<impl IntoResponse, SentinelError> {
    let status = state
        .monitor
        .alarm_status(&PoolName::new(name), &ApnName::new(apn))
        .await?;
    Ok(Json(status))
}

/// Alarm coordination routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/elements/{name}/alarms", post(raise_alarm))
        .route("/elements/{name}/alarms/{apn}", delete(clear_alarm))
        .route("/pools/{name}/alarms/{apn}", get(alarm_status))
}
