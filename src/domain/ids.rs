//! Type-safe identity keys for pools, network elements, and access points.
//!
//! All three are newtype wrappers around `String`. Identities are assigned
//! by the operator at registration time and immutable thereafter; wrapping
//! them prevents a pool name from being passed where an APN name is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity of a pool of network elements.
///
/// Used as the dictionary key in the directory's pool map, as the event
/// discriminator, and as the WebSocket subscription target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PoolName(String);

impl PoolName {
    /// Creates a `PoolName` from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PoolName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Identity of a network element (NE), a peer participating in a pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ElementName(String);

impl ElementName {
    /// Creates an `ElementName` from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Identity of an access point (APN), a shared endpoint that multiple
/// network elements may serve redundantly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ApnName(String);

impl ApnName {
    /// Creates an `ApnName` from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ApnName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}
