//! Network-element handlers: registration, APN association, credentials.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    AssociateApnRequest, ChangeCredentialRequest, RegisterElementRequest, RegisterElementResponse,
};
use crate::app_state::AppState;
use crate::domain::{ApnName, ElementName};
use crate::error::{ErrorResponse, SentinelError};

/// `POST /elements` — Register a network element.
///
/// # Errors
///
/// Returns [`SentinelError`] on an empty name or a duplicate element.
#[utoipa::path(
    post,
    path = "/api/v1/elements",
    tag = "Elements",
    summary = "Register a network element",
    description = "Registers a standalone element. When no credential is supplied the configured default is used. Elements join pools via the pool members sub-resource.",
    request_body = RegisterElementRequest,
    responses(
        (status = 201, description = "Element registered", body = RegisterElementResponse),
        (status = 400, description = "Invalid element name", body = ErrorResponse),
        (status = 409, description = "Element already registered", body = ErrorResponse),
    )
)]
pub async fn register_element(
    State(state): State<AppState>,
    Json(req): Json<RegisterElementRequest>,
) -> Result<impl IntoResponse, SentinelError> {
    super::validate_name(req.name.as_str(), "element name")?;
    let credential = req
        .credential
        .unwrap_or_else(|| state.default_credential.clone());
    state
        .monitor
        .register_element(req.name.clone(), credential)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterElementResponse {
            name: req.name,
            registered_at: Utc::now(),
        }),
    ))
}

/// `GET /elements` — List all registered elements.
///
/// # Errors
///
/// Returns [`SentinelError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/elements",
    tag = "Elements",
    summary = "List elements",
    description = "Returns a summary of every registered element: pool binding, served APN count, and pending notice count.",
    responses(
        (status = 200, description = "Element summaries", body = serde_json::Value),
    )
)]
pub async fn list_elements(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, SentinelError> {
    let elements = state.monitor.list_elements().await;
    Ok(Json(elements))
}

/// `GET /elements/:name` — Get one element's full view.
///
/// # Errors
///
/// Returns [`SentinelError::ElementNotFound`] if the element is unknown.
#[utoipa::path(
    get,
    path = "/api/v1/elements/{name}",
    tag = "Elements",
    summary = "Get element details",
    description = "Returns the element's pool binding, served APNs, pool neighbours, and pending down notices.",
    params(
        ("name" = String, Path, description = "Element name"),
    ),
    responses(
        (status = 200, description = "Element details", body = serde_json::Value),
        (status = 404, description = "Element not found", body = ErrorResponse),
    )
)]
pub async fn get_element(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, SentinelError> {
    let detail = state
        .monitor
        .element_detail(&ElementName::new(name))
        .await?;
    Ok(Json(detail))
}

/// `POST /elements/:name/apns` — Associate a cataloged APN with an element.
///
/// # Errors
///
/// Returns [`SentinelError`] if the APN is not cataloged, the element is
/// unknown, or the association already exists.
#[utoipa::path(
    post,
    path = "/api/v1/elements/{name}/apns",
    tag = "Elements",
    summary = "Associate an APN",
    description = "Marks the element as serving the APN. Only cataloged APNs can be associated.",
    params(
        ("name" = String, Path, description = "Element name"),
    ),
    request_body = AssociateApnRequest,
    responses(
        (status = 204, description = "APN associated"),
        (status = 404, description = "Element or APN not found", body = ErrorResponse),
        (status = 409, description = "APN already associated", body = ErrorResponse),
    )
)]
pub async fn associate_apn(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<AssociateApnRequest>,
) -> Result<impl IntoResponse, SentinelError> {
    state
        .monitor
        .associate_apn(&ElementName::new(name), &req.apn)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /elements/:name/apns/:apn` — Dissociate an APN from an element.
///
/// # Errors
///
/// Returns [`SentinelError::NotAssociated`] if the element does not serve
/// the APN.
#[utoipa::path(
    delete,
    path = "/api/v1/elements/{name}/apns/{apn}",
    tag = "Elements",
    summary = "Dissociate an APN",
    description = "Stops the element serving the APN, withdrawing any outstanding declaration it had for it.",
    params(
        ("name" = String, Path, description = "Element name"),
        ("apn" = String, Path, description = "APN name"),
    ),
    responses(
        (status = 204, description = "APN dissociated"),
        (status = 404, description = "Element not found", body = ErrorResponse),
        (status = 409, description = "APN not associated", body = ErrorResponse),
    )
)]
pub async fn dissociate_apn(
    State(state): State<AppState>,
    Path((name, apn)): Path<(String, String)>,
) -> Result<impl IntoResponse, SentinelError> {
    state
        .monitor
        .dissociate_apn(&ElementName::new(name), &ApnName::new(apn))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /elements/:name/credential` — Change an element's credential.
///
/// # Errors
///
/// Returns [`SentinelError::InvalidCredential`] if the old credential does
/// not match.
#[utoipa::path(
    put,
    path = "/api/v1/elements/{name}/credential",
    tag = "Elements",
    summary = "Change credential",
    description = "Replaces the element's credential after verifying the current one.",
    params(
        ("name" = String, Path, description = "Element name"),
    ),
    request_body = ChangeCredentialRequest,
    responses(
        (status = 204, description = "Credential changed"),
        (status = 403, description = "Old credential rejected", body = ErrorResponse),
        (status = 404, description = "Element not found", body = ErrorResponse),
    )
)]
pub async fn change_credential(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<ChangeCredentialRequest>,
) -> Result<impl IntoResponse, SentinelError> {
    state
        .monitor
        .change_credential(
            &ElementName::new(name),
            &req.old_credential,
            req.new_credential,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Element management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/elements", post(register_element).get(list_elements))
        .route("/elements/{name}", get(get_element))
        .route("/elements/{name}/apns", post(associate_apn))
        .route("/elements/{name}/apns/{apn}", delete(dissociate_apn))
        .route("/elements/{name}/credential", put(change_credential))
}
