//! Access point catalog entry.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApnName;

/// A shared resource endpoint identified by name.
///
/// Access points carry no behaviour of their own; their health is declared
/// by the network elements serving them. Registration in the catalog is
/// what makes an APN a valid target for association and alarm operations.
#[derive(Debug, Clone, Serialize)]
pub struct AccessPoint {
    /// Identity key (immutable after registration).
    pub name: ApnName,

    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl AccessPoint {
    /// Creates a catalog entry for the given APN name.
    #[must_use]
    pub fn new(name: ApnName) -> Self {
        Self {
            name,
            registered_at: Utc::now(),
        }
    }
}
