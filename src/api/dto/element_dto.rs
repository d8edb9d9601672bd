//! Network-element DTOs for registration, association, and credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApnName, ElementName};

/// Request body for `POST /elements`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterElementRequest {
    /// Element name (identity key).
    pub name: ElementName,
    /// Initial credential. Falls back to the configured default when
    /// omitted.
    #[serde(default)]
    pub credential: Option<String>,
}

/// Response body for `POST /elements` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterElementResponse {
    /// Element name echoed from the request.
    pub name: ElementName,
    /// Server registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// Request body for `POST /elements/{name}/apns`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssociateApnRequest {
    /// The APN to associate.
    pub apn: ApnName,
}

/// Request body for `PUT /elements/{name}/credential`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeCredentialRequest {
    /// The current credential.
    pub old_credential: String,
    /// The replacement credential.
    pub new_credential: String,
}
