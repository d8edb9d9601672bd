//! Pool-related DTOs for create, list, and membership operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{ElementName, PoolName};

/// Request body for `POST /pools`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    /// Pool name (identity key).
    pub name: PoolName,
}

/// Response body for `POST /pools` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePoolResponse {
    /// Pool name echoed from the request.
    pub name: PoolName,
    /// Server creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Pool status.
    pub status: String,
}

/// Pool summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolSummaryDto {
    /// Pool name.
    pub name: PoolName,
    /// Number of members.
    pub member_count: usize,
    /// Number of APNs with at least one active declaration.
    pub active_alarms: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Paginated list response for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Pool summaries.
    pub data: Vec<PoolSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Request body for `POST /pools/{name}/members`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddMemberRequest {
    /// The element to add to the pool.
    pub element: ElementName,
}
