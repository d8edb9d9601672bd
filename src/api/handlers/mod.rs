//! REST endpoint handlers organized by resource.

pub mod alarm;
pub mod apn;
pub mod element;
pub mod pool;
pub mod system;

use axum::Router;

use crate::app_state::AppState;
use crate::error::SentinelError;

/// Rejects blank identity names before they reach the directory.
///
/// # Errors
///
/// Returns [`SentinelError::InvalidRequest`] when the name is empty or
/// whitespace-only.
pub(crate) fn validate_name(name: &str, what: &str) -> Result<(), SentinelError> {
    if name.trim().is_empty() {
        return Err(SentinelError::InvalidRequest(format!(
            "{what} must not be empty"
        )));
    }
    Ok(())
}

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(pool::routes())
        .merge(apn::routes())
        .merge(element::routes())
        .merge(alarm::routes())
}
