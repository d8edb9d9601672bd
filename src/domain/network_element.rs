//! Network element: an addressable peer with a credential, a set of served
//! APNs, and a log of down notices received from pool peers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ApnName, ElementName, PoolName};
use crate::error::SentinelError;

/// A down notice as recorded in a peer's log.
///
/// Notices form an ordered multiset: the same `(reporter, apn)` pair may
/// appear more than once, and clearing removes exactly one occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct DownNotice {
    /// The element that declared the APN down.
    pub reporter: ElementName,
    /// The affected access point.
    pub apn: ApnName,
    /// When this peer received the notice.
    pub received_at: DateTime<Utc>,
}

/// An addressable peer network element.
///
/// Belongs to at most one pool at a time; the `pool` back-reference is kept
/// consistent with the pool's member list by the directory, which performs
/// both sides of the link inside a single locked transaction.
#[derive(Debug, Clone)]
pub struct NetworkElement {
    /// Identity key (immutable after registration).
    pub name: ElementName,

    /// Credential checked before any peer notice is delivered.
    credential: String,

    /// Back-reference to the owning pool, if any.
    pub pool: Option<PoolName>,

    /// APNs this element serves, in association order, no duplicates.
    pub served_apns: Vec<ApnName>,

    /// Down notices received from pool peers, in arrival order.
    pub notices: Vec<DownNotice>,

    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl NetworkElement {
    /// Creates a standalone element with the given credential.
    #[must_use]
    pub fn new(name: ElementName, credential: String) -> Self {
        Self {
            name,
            credential,
            pool: None,
            served_apns: Vec::new(),
            notices: Vec::new(),
            registered_at: Utc::now(),
        }
    }

    /// Returns `true` iff `candidate` matches the stored credential.
    ///
    /// No lockout or rate limiting — this is a stand-in for real peer
    /// authentication (see [`crate::domain::PeerAuthenticator`]).
    #[must_use]
    pub fn verify_credential(&self, candidate: &str) -> bool {
        self.credential == candidate
    }

    /// Replaces the credential after verifying the old one.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::InvalidCredential`] if `old` does not match.
    /// The credential is never partially applied.
    pub fn change_credential(&mut self, old: &str, new: String) -> Result<(), SentinelError> {
        if !self.verify_credential(old) {
            return Err(SentinelError::InvalidCredential(self.name.clone()));
        }
        self.credential = new;
        Ok(())
    }

    /// Returns `true` if this element serves the given APN.
    #[must_use]
    pub fn serves(&self, apn: &ApnName) -> bool {
        self.served_apns.contains(apn)
    }

    /// Adds an APN to the served set.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::AlreadyAssociated`] if the APN is already
    /// served by this element.
    pub fn associate_apn(&mut self, apn: ApnName) -> Result<(), SentinelError> {
        if self.serves(&apn) {
            return Err(SentinelError::AlreadyAssociated {
                element: self.name.clone(),
                apn,
            });
        }
        self.served_apns.push(apn);
        Ok(())
    }

    /// Removes an APN from the served set.
    ///
    /// Cascading cleanup of down-state and peer notice logs is performed by
    /// the directory, which owns the cross-object view.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::NotAssociated`] if the APN is not served.
    pub fn dissociate_apn(&mut self, apn: &ApnName) -> Result<(), SentinelError> {
        let Some(pos) = self.served_apns.iter().position(|a| a == apn) else {
            return Err(SentinelError::NotAssociated {
                element: self.name.clone(),
                apn: apn.clone(),
            });
        };
        self.served_apns.remove(pos);
        Ok(())
    }

    /// Appends a down notice to the log.
    pub fn push_notice(&mut self, reporter: ElementName, apn: ApnName) {
        self.notices.push(DownNotice {
            reporter,
            apn,
            received_at: Utc::now(),
        });
    }

    /// Removes the first notice matching `(reporter, apn)`.
    ///
    /// Exactly one occurrence is removed even if duplicates exist. Returns
    /// `false` if no matching notice was found (expected divergence, e.g.
    /// the peer joined after the alarm was raised).
    pub fn remove_first_notice(&mut self, reporter: &ElementName, apn: &ApnName) -> bool {
        let Some(pos) = self
            .notices
            .iter()
            .position(|n| &n.reporter == reporter && &n.apn == apn)
        else {
            return false;
        };
        self.notices.remove(pos);
        true
    }

    /// Removes every notice originated by `reporter`, returning the count.
    pub fn purge_notices_from(&mut self, reporter: &ElementName) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| &n.reporter != reporter);
        before - self.notices.len()
    }

    /// Removes every notice concerning `apn`, returning the count.
    pub fn purge_notices_for(&mut self, apn: &ApnName) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| &n.apn != apn);
        before - self.notices.len()
    }

    /// Drops the entire notice log.
    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }
}
