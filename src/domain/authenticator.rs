//! Peer authentication seam.
//!
//! The coordinator authenticates every peer before touching its notice log.
//! The check is pluggable so a real deployment can swap in genuine mutual
//! authentication without touching the coordination algorithm.

use std::fmt;

use super::NetworkElement;

/// Capability the coordinator invokes once per peer during propagation.
///
/// A `false` result skips the peer (the notice is not delivered) and is
/// surfaced to the caller via `peers_skipped` in the propagation summary —
/// never a hard failure of the whole operation.
pub trait PeerAuthenticator: Send + Sync + fmt::Debug {
    /// Returns `true` if the coordinator may mutate this peer's notice log.
    fn authenticate(&self, element: &NetworkElement) -> bool;
}

/// Default authenticator: presents a single operational credential to each
/// peer's credential check.
#[derive(Debug, Clone)]
pub struct CredentialAuthenticator {
    credential: String,
}

impl CredentialAuthenticator {
    /// Creates an authenticator presenting the given operational credential.
    #[must_use]
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
        }
    }
}

impl PeerAuthenticator for CredentialAuthenticator {
    fn authenticate(&self, element: &NetworkElement) -> bool {
        element.verify_credential(&self.credential)
    }
}
