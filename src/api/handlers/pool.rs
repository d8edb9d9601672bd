//! Pool handlers: create, list, get, delete, and membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    AddMemberRequest, CreatePoolRequest, CreatePoolResponse, PaginationMeta, PaginationParams,
    PoolListResponse, PoolSummaryDto,
};
use crate::app_state::AppState;
use crate::domain::{ElementName, PoolName};
use crate::error::{ErrorResponse, SentinelError};

/// `POST /pools` — Create a new pool.
///
/// # Errors
///
/// Returns [`SentinelError`] on an empty name or a duplicate pool.
#[utoipa::path(
    post,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "Create a new pool",
    description = "Creates an empty pool of network elements. Elements join via the members sub-resource.",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created successfully", body = CreatePoolResponse),
        (status = 400, description = "Invalid pool name", body = ErrorResponse),
        (status = 409, description = "Pool already exists", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    Json(req): Json<CreatePoolRequest>,
) -> Result<impl IntoResponse, SentinelError> {
    super::validate_name(req.name.as_str(), "pool name")?;
    state.monitor.create_pool(req.name.clone()).await?;

    let response = CreatePoolResponse {
        name: req.name,
        created_at: Utc::now(),
        status: "active".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /pools` — List all pools with pagination.
///
/// # Errors
///
/// Returns [`SentinelError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns a paginated list of all pools with member and active-alarm counts.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated pool list", body = PoolListResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, SentinelError> {
    let params = params.clamped();
    let summaries = state.monitor.list_pools().await;

    let total = summaries.len() as u32;
    let per_page = params.per_page;
    let page = params.page;
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    // Saturating: an absurd page number yields an empty page, not overflow.
    let start = page.saturating_sub(1).saturating_mul(per_page) as usize;
    let data: Vec<PoolSummaryDto> = summaries
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .map(|s| PoolSummaryDto {
            name: s.name,
            member_count: s.member_count,
            active_alarms: s.active_alarms,
            created_at: s.created_at,
        })
        .collect();

    Ok(Json(PoolListResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// `GET /pools/:name` — Get pool details: members plus down-state.
///
/// # Errors
///
/// Returns [`SentinelError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{name}",
    tag = "Pools",
    summary = "Get pool details",
    description = "Returns the member list in join order and every active alarm with its reporters and derived state.",
    params(
        ("name" = String, Path, description = "Pool name"),
    ),
    responses(
        (status = 200, description = "Pool details", body = serde_json::Value),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, SentinelError> {
    let detail = state.monitor.pool_detail(&PoolName::new(name)).await?;
    Ok(Json(detail))
}

/// `DELETE /pools/:name` — Remove an empty pool.
///
/// # Errors
///
/// Returns [`SentinelError::PoolNotFound`] if the pool does not exist or
/// [`SentinelError::InvalidRequest`] if it still has members.
#[utoipa::path(
    delete,
    path = "/api/v1/pools/{name}",
    tag = "Pools",
    summary = "Delete a pool",
    description = "Removes an empty pool and emits a PoolRemoved event. Pools with members cannot be deleted.",
    params(
        ("name" = String, Path, description = "Pool name"),
    ),
    responses(
        (status = 204, description = "Pool deleted"),
        (status = 400, description = "Pool still has members", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn delete_pool(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, SentinelError> {
    state.monitor.remove_pool(&PoolName::new(name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /pools/:name/members` — Add an element to a pool.
///
/// # Errors
///
/// Returns [`SentinelError`] if the element is unknown or already bound
/// to a pool (membership is exclusive).
#[utoipa::path(
    post,
    path = "/api/v1/pools/{name}/members",
    tag = "Pools",
    summary = "Add a member",
    description = "Adds a registered element to the pool. An element belongs to at most one pool at a time.",
    params(
        ("name" = String, Path, description = "Pool name"),
    ),
    request_body = AddMemberRequest,
    responses(
        (status = 204, description = "Member added"),
        (status = 404, description = "Pool or element not found", body = ErrorResponse),
        (status = 409, description = "Element already bound to a pool", body = ErrorResponse),
    )
)]
pub async fn add_member(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, SentinelError> {
    state
        .monitor
        .add_member(&PoolName::new(name), &req.element)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /pools/:name/members/:element` — Remove an element from a pool.
///
/// # Errors
///
/// Returns [`SentinelError::NotMember`] if the element is not a member.
#[utoipa::path(
    delete,
    path = "/api/v1/pools/{name}/members/{element}",
    tag = "Pools",
    summary = "Remove a member",
    description = "Removes the element from the pool and purges its outstanding declarations and originated notices.",
    params(
        ("name" = String, Path, description = "Pool name"),
        ("element" = String, Path, description = "Element name"),
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 404, description = "Pool or element not found", body = ErrorResponse),
        (status = 409, description = "Element is not a member", body = ErrorResponse),
    )
)]
pub async fn remove_member(
    State(state): State<AppState>,
    Path((name, element)): Path<(String, String)>,
) -> Result<impl IntoResponse, SentinelError> {
    state
        .monitor
        .remove_member(&PoolName::new(name), &ElementName::new(element))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pool management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route("/pools/{name}", get(get_pool).delete(delete_pool))
        .route("/pools/{name}/members", post(add_member))
        .route("/pools/{name}/members/{element}", delete(remove_member))
}
