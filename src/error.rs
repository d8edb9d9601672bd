//! Service error types with HTTP status code mapping.
//!
//! [`SentinelError`] is the central error type. Every variant is a
//! recoverable, caller-facing condition — none is fatal to the process —
//! and each maps to a specific HTTP status code and structured JSON error
//! response. Idempotent re-declarations are deliberately NOT errors; they
//! surface as successful no-op summaries instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ApnName, ElementName, PoolName};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2201,
///     "message": "no active alarm for fast.example in pool pool1",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                  |
/// |-----------|--------------------|------------------------------|
/// | 1000–1999 | Validation/Auth    | 400 Bad Request / 403        |
/// | 2000–2099 | Not Found          | 404 Not Found                |
/// | 2100–2199 | Registry Conflict  | 409 Conflict                 |
/// | 2200–2299 | Alarm Misuse       | 404 / 409                    |
/// | 3000–3999 | Server             | 500 Internal Server Error    |
/// | 4000–4999 | Coordination       | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Malformed or wrong-kind arguments to an alarm operation, e.g. a
    /// reporter that is not bound to any pool.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Credential check failed (change rejected, old credential wrong).
    #[error("invalid credential for element {0}")]
    InvalidCredential(ElementName),

    /// Pool with the given name was not found.
    #[error("pool not found: {0}")]
    PoolNotFound(PoolName),

    /// Network element with the given name was not found.
    #[error("network element not found: {0}")]
    ElementNotFound(ElementName),

    /// Access point with the given name is not in the catalog.
    #[error("access point not found: {0}")]
    ApnNotFound(ApnName),

    /// A pool with this name already exists.
    #[error("pool already exists: {0}")]
    PoolExists(PoolName),

    /// An element with this name already exists.
    #[error("network element already exists: {0}")]
    ElementExists(ElementName),

    /// An access point with this name already exists.
    #[error("access point already exists: {0}")]
    ApnExists(ApnName),

    /// The element is already a member of the target pool.
    #[error("element {element} is already a member of pool {pool}")]
    AlreadyMember {
        /// The element in question.
        element: ElementName,
        /// The target pool.
        pool: PoolName,
    },

    /// The element is bound to another pool; membership is exclusive.
    #[error("element {element} already belongs to pool {pool}")]
    AlreadyInOtherPool {
        /// The element in question.
        element: ElementName,
        /// The pool it is currently bound to.
        pool: PoolName,
    },

    /// The element is not a member of the target pool.
    #[error("element {element} is not a member of pool {pool}")]
    NotMember {
        /// The element in question.
        element: ElementName,
        /// The target pool.
        pool: PoolName,
    },

    /// The APN is already associated with the element.
    #[error("apn {apn} already associated with element {element}")]
    AlreadyAssociated {
        /// The element in question.
        element: ElementName,
        /// The APN in question.
        apn: ApnName,
    },

    /// The APN is not associated with the element.
    #[error("apn {apn} not associated with element {element}")]
    NotAssociated {
        /// The element in question.
        element: ElementName,
        /// The APN in question.
        apn: ApnName,
    },

    /// An alarm was raised for an APN the reporter does not serve.
    #[error("element {element} does not serve apn {apn}")]
    NotServed {
        /// The reporting element.
        element: ElementName,
        /// The unserved APN.
        apn: ApnName,
    },

    /// A clear was attempted while no alarm is active for the APN.
    #[error("no active alarm for {apn} in pool {pool}")]
    NoActiveAlarm {
        /// The owning pool.
        pool: PoolName,
        /// The APN in question.
        apn: ApnName,
    },

    /// A clear was attempted by an element that never raised the alarm.
    #[error("element {element} is not reporting {apn} as down")]
    NotReporting {
        /// The element in question.
        element: ElementName,
        /// The APN in question.
        apn: ApnName,
    },

    /// Internal invariant breach.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SentinelError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidArguments(_) => 1002,
            Self::InvalidCredential(_) => 1101,
            Self::PoolNotFound(_) => 2001,
            Self::ElementNotFound(_) => 2002,
            Self::ApnNotFound(_) => 2003,
            Self::PoolExists(_) => 2101,
            Self::ElementExists(_) => 2102,
            Self::ApnExists(_) => 2103,
            Self::AlreadyMember { .. } => 2111,
            Self::AlreadyInOtherPool { .. } => 2112,
            Self::NotMember { .. } => 2113,
            Self::AlreadyAssociated { .. } => 2114,
            Self::NotAssociated { .. } => 2115,
            Self::NoActiveAlarm { .. } => 2201,
            Self::NotReporting { .. } => 2202,
            Self::Internal(_) => 3000,
            Self::NotServed { .. } => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidArguments(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredential(_) => StatusCode::FORBIDDEN,
            Self::PoolNotFound(_)
            | Self::ElementNotFound(_)
            | Self::ApnNotFound(_)
            | Self::NoActiveAlarm { .. } => StatusCode::NOT_FOUND,
            Self::PoolExists(_)
            | Self::ElementExists(_)
            | Self::ApnExists(_)
            | Self::AlreadyMember { .. }
            | Self::AlreadyInOtherPool { .. }
            | Self::NotMember { .. }
            | Self::AlreadyAssociated { .. }
            | Self::NotAssociated { .. }
            | Self::NotReporting { .. } => StatusCode::CONFLICT,
            Self::NotServed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SentinelError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn alarm_misuse_maps_distinctly() {
        let err = SentinelError::NoActiveAlarm {
            pool: PoolName::from("pool1"),
            apn: ApnName::from("fast.example"),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2201);

        let err = SentinelError::NotReporting {
            element: ElementName::from("ne1"),
            apn: ApnName::from("fast.example"),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_served_is_unprocessable() {
        let err = SentinelError::NotServed {
            element: ElementName::from("ne1"),
            apn: ApnName::from("fast.example"),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), 4001);
    }

    #[test]
    fn error_response_exposes_an_openapi_schema() {
        use utoipa::PartialSchema;
        let json = serde_json::to_string(&ErrorResponse::schema()).unwrap_or_default();
        assert!(json.contains("code"));
        assert!(json.contains("message"));
    }

    #[test]
    fn messages_name_the_identities() {
        let err = SentinelError::AlreadyInOtherPool {
            element: ElementName::from("ne1"),
            pool: PoolName::from("pool2"),
        };
        let msg = err.to_string();
        assert!(msg.contains("ne1"));
        assert!(msg.contains("pool2"));
    }
}
