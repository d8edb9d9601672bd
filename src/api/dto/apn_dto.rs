//! Access-point DTOs for catalog registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ApnName;

/// Request body for `POST /apns`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterApnRequest {
    /// APN name (identity key).
    pub name: ApnName,
}

/// Response body for `POST /apns` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterApnResponse {
    /// APN name echoed from the request.
    pub name: ApnName,
    /// Server registration timestamp.
    pub registered_at: DateTime<Utc>,
}
