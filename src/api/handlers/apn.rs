//! Access-point catalog handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{RegisterApnRequest, RegisterApnResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, SentinelError};

/// `POST /apns` — Register an access point in the catalog.
///
/// # Errors
///
/// Returns [`SentinelError`] on an empty name or a duplicate APN.
#[utoipa::path(
    post,
    path = "/api/v1/apns",
    tag = "Access Points",
    summary = "Register an access point",
    description = "Adds an APN to the catalog. Only cataloged APNs can be associated with elements or declared down.",
    request_body = RegisterApnRequest,
    responses(
        (status = 201, description = "APN registered", body = RegisterApnResponse),
        (status = 400, description = "Invalid APN name", body = ErrorResponse),
        (status = 409, description = "APN already registered", body = ErrorResponse),
    )
)]
pub async fn register_apn(
    State(state): State<AppState>,
    Json(req): Json<RegisterApnRequest>,
) -> Result<impl IntoResponse, SentinelError> {
    super::validate_name(req.name.as_str(), "apn name")?;
    state.monitor.register_apn(req.name.clone()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterApnResponse {
            name: req.name,
            registered_at: Utc::now(),
        }),
    ))
}

/// `GET /apns` — List the APN catalog.
///
/// # Errors
///
/// Returns [`SentinelError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/apns",
    tag = "Access Points",
    summary = "List access points",
    description = "Returns every cataloged APN in sorted order.",
    responses(
        (status = 200, description = "APN catalog", body = serde_json::Value),
    )
)]
pub async fn list_apns(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, SentinelError> {
    let apns = state.monitor.list_apns().await;
    Ok(Json(apns))
}

/// Access-point catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/apns", post(register_apn).get(list_apns))
}
