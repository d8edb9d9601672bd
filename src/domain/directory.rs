//! Concurrent network directory guarding all mutable coordination state.
//!
//! [`Directory`] stores the APN catalog, the element registry, and all
//! pools behind a single [`tokio::sync::RwLock`]. Every mutating operation
//! (membership, association, alarm raise/clear) takes the write lock for
//! the whole call, making it one atomic transaction: a quorum decision
//! always sees a consistent reporter count, and membership changes can
//! never race an in-flight propagation. Operations are local and bounded
//! by pool size, so the coarse lock is cheap.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::access_point::AccessPoint;
use super::alarm::{ApnState, PropagationSummary};
use super::authenticator::PeerAuthenticator;
use super::network_element::{DownNotice, NetworkElement};
use super::pool::Pool;
use super::{ApnName, ElementName, PoolName};
use crate::error::SentinelError;

/// All mutable coordination state, guarded as a unit.
#[derive(Debug, Default)]
struct DirectoryState {
    apns: HashMap<ApnName, AccessPoint>,
    elements: HashMap<ElementName, NetworkElement>,
    pools: HashMap<PoolName, Pool>,
}

/// Central store for access points, network elements, and pools.
///
/// The bidirectional membership link (element back-reference vs. pool
/// member list) is enforced synchronously inside [`Directory::add_member`]
/// and [`Directory::remove_member`] — the two sides can never diverge
/// because both are written under the same lock in the same call.
#[derive(Debug, Default)]
pub struct Directory {
    state: RwLock<DirectoryState>,
}

/// Lightweight pool view for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSummary {
    /// Pool identifier.
    pub name: PoolName,
    /// Number of members.
    pub member_count: usize,
    /// Number of APNs with at least one active declaration.
    pub active_alarms: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One down-state entry in a pool detail view.
#[derive(Debug, Clone, Serialize)]
pub struct DownStateEntry {
    /// The affected access point.
    pub apn: ApnName,
    /// Members currently declaring the APN down, in declaration order.
    pub reporters: Vec<ElementName>,
    /// Derived state of the `(pool, apn)` pair.
    pub state: ApnState,
}

/// Full pool view: members plus down-state.
#[derive(Debug, Clone, Serialize)]
pub struct PoolDetail {
    /// Pool identifier.
    pub name: PoolName,
    /// Members in join order.
    pub members: Vec<ElementName>,
    /// Active alarms, sorted by APN name.
    pub down_state: Vec<DownStateEntry>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Lightweight element view for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ElementSummary {
    /// Element identifier.
    pub name: ElementName,
    /// Owning pool, if any.
    pub pool: Option<PoolName>,
    /// Number of served APNs.
    pub served_apn_count: usize,
    /// Number of notices in the received log.
    pub notice_count: usize,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// Full element view: pool, neighbours, served APNs, and notice log.
#[derive(Debug, Clone, Serialize)]
pub struct ElementDetail {
    /// Element identifier.
    pub name: ElementName,
    /// Owning pool, if any.
    pub pool: Option<PoolName>,
    /// Pool peers (members of the same pool, excluding this element).
    pub neighbours: Vec<ElementName>,
    /// Served APNs in association order.
    pub served_apns: Vec<ApnName>,
    /// Received down notices in arrival order.
    pub notices: Vec<DownNotice>,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// Reporter set plus derived state for a single `(pool, apn)` pair.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmStatus {
    /// The affected access point.
    pub apn: ApnName,
    /// Members currently declaring the APN down.
    pub reporters: Vec<ElementName>,
    /// Number of pool members serving the APN.
    pub servers: usize,
    /// Derived state.
    pub state: ApnState,
}

/// Members of `pool` that currently serve `apn`, in join order.
fn serving_members(
    elements: &HashMap<ElementName, NetworkElement>,
    pool: &Pool,
    apn: &ApnName,
) -> Vec<ElementName> {
    pool.members
        .iter()
        .filter(|m| elements.get(*m).is_some_and(|ne| ne.serves(apn)))
        .cloned()
        .collect()
}

impl Directory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ────────────────────────────────────────────────────

    /// Registers an access point in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ApnExists`] if the name is already taken.
    pub async fn register_apn(&self, name: ApnName) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        if state.apns.contains_key(&name) {
            return Err(SentinelError::ApnExists(name));
        }
        state.apns.insert(name.clone(), AccessPoint::new(name));
        Ok(())
    }

    /// Registers a standalone network element.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementExists`] if the name is already taken.
    pub async fn register_element(
        &self,
        name: ElementName,
        credential: String,
    ) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        if state.elements.contains_key(&name) {
            return Err(SentinelError::ElementExists(name));
        }
        state
            .elements
            .insert(name.clone(), NetworkElement::new(name, credential));
        Ok(())
    }

    /// Creates an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolExists`] if the name is already taken.
    pub async fn create_pool(&self, name: PoolName) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        if state.pools.contains_key(&name) {
            return Err(SentinelError::PoolExists(name));
        }
        state.pools.insert(name.clone(), Pool::new(name));
        Ok(())
    }

    /// Removes a pool. Only empty pools can be removed; evict members first.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolNotFound`] if the pool does not exist,
    /// or [`SentinelError::InvalidRequest`] if it still has members.
    pub async fn remove_pool(&self, name: &PoolName) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        let pool = state
            .pools
            .get(name)
            .ok_or_else(|| SentinelError::PoolNotFound(name.clone()))?;
        if !pool.members.is_empty() {
            return Err(SentinelError::InvalidRequest(format!(
                "pool {name} still has {} members",
                pool.members.len()
            )));
        }
        state.pools.remove(name);
        Ok(())
    }

    // ── Membership ──────────────────────────────────────────────────────

    /// Adds an element to a pool, wiring both sides of the membership link.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::AlreadyMember`] if the element is already in
    /// this pool, or [`SentinelError::AlreadyInOtherPool`] if it is bound to
    /// any other pool. An element belongs to at most one pool at a time.
    pub async fn add_member(
        &self,
        pool_name: &PoolName,
        element_name: &ElementName,
    ) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        let st = &mut *state;

        if !st.pools.contains_key(pool_name) {
            return Err(SentinelError::PoolNotFound(pool_name.clone()));
        }
        let element = st
            .elements
            .get_mut(element_name)
            .ok_or_else(|| SentinelError::ElementNotFound(element_name.clone()))?;

        match &element.pool {
            Some(bound) if bound == pool_name => {
                return Err(SentinelError::AlreadyMember {
                    element: element_name.clone(),
                    pool: pool_name.clone(),
                });
            }
            Some(bound) => {
                return Err(SentinelError::AlreadyInOtherPool {
                    element: element_name.clone(),
                    pool: bound.clone(),
                });
            }
            None => {}
        }

        element.pool = Some(pool_name.clone());
        if let Some(pool) = st.pools.get_mut(pool_name) {
            pool.push_member(element_name.clone());
        }
        Ok(())
    }

    /// Removes an element from a pool, purging its alarm footprint.
    ///
    /// Cascading cleanup: the element is removed from every down-state
    /// entry of the pool, notices it originated are purged from remaining
    /// members' logs, and its own notice log (which only ever holds
    /// in-pool notices) is cleared. Returns the APNs it was reporting.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::NotMember`] if the element is not a member
    /// of this pool.
    pub async fn remove_member(
        &self,
        pool_name: &PoolName,
        element_name: &ElementName,
    ) -> Result<Vec<ApnName>, SentinelError> {
        let mut state = self.state.write().await;
        let st = &mut *state;

        let pool = st
            .pools
            .get_mut(pool_name)
            .ok_or_else(|| SentinelError::PoolNotFound(pool_name.clone()))?;
        let element = st
            .elements
            .get_mut(element_name)
            .ok_or_else(|| SentinelError::ElementNotFound(element_name.clone()))?;

        if element.pool.as_ref() != Some(pool_name) || !pool.remove_member_entry(element_name) {
            return Err(SentinelError::NotMember {
                element: element_name.clone(),
                pool: pool_name.clone(),
            });
        }

        element.pool = None;
        element.clear_notices();
        let purged = pool.purge_reporter(element_name);

        let remaining = pool.members.clone();
        for member in &remaining {
            if let Some(peer) = st.elements.get_mut(member) {
                let _ = peer.purge_notices_from(element_name);
            }
        }
        Ok(purged)
    }

    // ── Association ─────────────────────────────────────────────────────

    /// Associates an APN with an element.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ApnNotFound`] if the APN is not in the
    /// catalog, [`SentinelError::ElementNotFound`] if the element is
    /// unknown, or [`SentinelError::AlreadyAssociated`].
    pub async fn associate_apn(
        &self,
        element_name: &ElementName,
        apn: &ApnName,
    ) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        if !state.apns.contains_key(apn) {
            return Err(SentinelError::ApnNotFound(apn.clone()));
        }
        let element = state
            .elements
            .get_mut(element_name)
            .ok_or_else(|| SentinelError::ElementNotFound(element_name.clone()))?;
        element.associate_apn(apn.clone())
    }

    /// Dissociates an APN from an element.
    ///
    /// Cascading cleanup: any outstanding down-declaration by this element
    /// for the APN is purged from the pool's down-state and the matching
    /// notice is withdrawn from each peer's log; the element's own notices
    /// for the APN are dropped as well (it no longer participates in that
    /// APN's monitoring).
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementNotFound`] or
    /// [`SentinelError::NotAssociated`].
    pub async fn dissociate_apn(
        &self,
        element_name: &ElementName,
        apn: &ApnName,
    ) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        let st = &mut *state;

        let element = st
            .elements
            .get_mut(element_name)
            .ok_or_else(|| SentinelError::ElementNotFound(element_name.clone()))?;
        element.dissociate_apn(apn)?;
        let _ = element.purge_notices_for(apn);
        let pool_name = element.pool.clone();

        if let Some(pool_name) = pool_name
            && let Some(pool) = st.pools.get_mut(&pool_name)
            && pool.remove_reporter(element_name, apn)
        {
            let members = pool.members.clone();
            for member in &members {
                if member == element_name {
                    continue;
                }
                if let Some(peer) = st.elements.get_mut(member) {
                    let _ = peer.remove_first_notice(element_name, apn);
                }
            }
        }
        Ok(())
    }

    /// Changes an element's credential.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementNotFound`] or
    /// [`SentinelError::InvalidCredential`].
    pub async fn change_credential(
        &self,
        element_name: &ElementName,
        old: &str,
        new: String,
    ) -> Result<(), SentinelError> {
        let mut state = self.state.write().await;
        let element = state
            .elements
            .get_mut(element_name)
            .ok_or_else(|| SentinelError::ElementNotFound(element_name.clone()))?;
        element.change_credential(old, new)
    }

    // ── Alarm coordination ──────────────────────────────────────────────

    /// Records a down declaration and propagates notices to serving peers.
    ///
    /// The whole call is one transaction under the directory write lock:
    /// validation, dedup, the quorum check, and peer log mutation all see
    /// the same consistent state. Returns the owning pool together with
    /// the propagation summary.
    ///
    /// Re-declaring an APN already reported by the same element is an
    /// idempotent no-op (success, zero peers notified). When the updated
    /// reporter count equals the number of serving members, the APN is
    /// fully down pool-wide and nothing is propagated.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ApnNotFound`] for an uncatalogued APN,
    /// [`SentinelError::ElementNotFound`] for an unknown reporter,
    /// [`SentinelError::InvalidArguments`] if the reporter is not bound to
    /// a pool, or [`SentinelError::NotServed`] if the reporter does not
    /// serve the APN.
    pub async fn raise_alarm(
        &self,
        reporter: &ElementName,
        apn: &ApnName,
        auth: &dyn PeerAuthenticator,
    ) -> Result<(PoolName, PropagationSummary), SentinelError> {
        let mut state = self.state.write().await;
        let st = &mut *state;

        if !st.apns.contains_key(apn) {
            return Err(SentinelError::ApnNotFound(apn.clone()));
        }
        let element = st
            .elements
            .get(reporter)
            .ok_or_else(|| SentinelError::ElementNotFound(reporter.clone()))?;
        let pool_name = element.pool.clone().ok_or_else(|| {
            SentinelError::InvalidArguments(format!("element {reporter} is not bound to a pool"))
        })?;
        if !element.serves(apn) {
            return Err(SentinelError::NotServed {
                element: reporter.clone(),
                apn: apn.clone(),
            });
        }

        let pool = st
            .pools
            .get_mut(&pool_name)
            .ok_or_else(|| SentinelError::Internal("membership link broken".to_string()))?;
        let servers = serving_members(&st.elements, pool, apn);

        // Idempotent re-declaration: no propagation, current state.
        if pool.is_reporting(reporter, apn) {
            let reporters = pool.down_reporters(apn).len();
            return Ok((
                pool_name,
                PropagationSummary::no_propagation(ApnState::from_counts(reporters, servers.len())),
            ));
        }

        let _ = pool.insert_reporter(reporter.clone(), apn.clone());
        let reporters = pool.down_reporters(apn).len();

        // Quorum: every serving member now agrees the APN is down, so
        // there is no up peer left to notify.
        if reporters == servers.len() {
            return Ok((
                pool_name,
                PropagationSummary::no_propagation(ApnState::FullyDown),
            ));
        }

        let mut notified: u32 = 0;
        let mut skipped: u32 = 0;
        for peer_name in servers.iter().filter(|m| *m != reporter) {
            if let Some(peer) = st.elements.get_mut(peer_name) {
                if auth.authenticate(peer) {
                    peer.push_notice(reporter.clone(), apn.clone());
                    notified += 1;
                } else {
                    skipped += 1;
                }
            }
        }

        Ok((
            pool_name,
            PropagationSummary {
                peers_notified: notified,
                peers_skipped: skipped,
                state: ApnState::from_counts(reporters, servers.len()),
            },
        ))
    }

    /// Withdraws a down declaration and retracts notices from serving peers.
    ///
    /// Each peer gives up exactly one matching `(reporter, apn)` notice;
    /// a peer holding none (it joined after the raise, or the raise was
    /// skipped by authentication) is passed over silently.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementNotFound`] for an unknown reporter,
    /// [`SentinelError::InvalidArguments`] if the reporter is not bound to
    /// a pool, [`SentinelError::NoActiveAlarm`] if no entry exists for the
    /// APN, or [`SentinelError::NotReporting`] if the reporter never raised
    /// this alarm.
    pub async fn clear_alarm(
        &self,
        reporter: &ElementName,
        apn: &ApnName,
        auth: &dyn PeerAuthenticator,
    ) -> Result<(PoolName, PropagationSummary), SentinelError> {
        let mut state = self.state.write().await;
        let st = &mut *state;

        let element = st
            .elements
            .get(reporter)
            .ok_or_else(|| SentinelError::ElementNotFound(reporter.clone()))?;
        let pool_name = element.pool.clone().ok_or_else(|| {
            SentinelError::InvalidArguments(format!("element {reporter} is not bound to a pool"))
        })?;

        let pool = st
            .pools
            .get_mut(&pool_name)
            .ok_or_else(|| SentinelError::Internal("membership link broken".to_string()))?;
        if !pool.has_alarm(apn) {
            return Err(SentinelError::NoActiveAlarm {
                pool: pool_name,
                apn: apn.clone(),
            });
        }
        if !pool.is_reporting(reporter, apn) {
            return Err(SentinelError::NotReporting {
                element: reporter.clone(),
                apn: apn.clone(),
            });
        }

        let _ = pool.remove_reporter(reporter, apn);
        let servers = serving_members(&st.elements, pool, apn);
        let reporters = pool.down_reporters(apn).len();

        let mut notified: u32 = 0;
        let mut skipped: u32 = 0;
        for peer_name in servers.iter().filter(|m| *m != reporter) {
            if let Some(peer) = st.elements.get_mut(peer_name) {
                if auth.authenticate(peer) {
                    if peer.remove_first_notice(reporter, apn) {
                        notified += 1;
                    }
                } else {
                    skipped += 1;
                }
            }
        }

        Ok((
            pool_name,
            PropagationSummary {
                peers_notified: notified,
                peers_skipped: skipped,
                state: ApnState::from_counts(reporters, servers.len()),
            },
        ))
    }

    // ── Read-only views ─────────────────────────────────────────────────

    /// Returns all catalogued access points, sorted by name.
    pub async fn list_apns(&self) -> Vec<AccessPoint> {
        let state = self.state.read().await;
        let mut apns: Vec<AccessPoint> = state.apns.values().cloned().collect();
        apns.sort_by(|a, b| a.name.cmp(&b.name));
        apns
    }

    /// Returns summaries of all registered elements, sorted by name.
    pub async fn list_elements(&self) -> Vec<ElementSummary> {
        let state = self.state.read().await;
        let mut summaries: Vec<ElementSummary> = state
            .elements
            .values()
            .map(|ne| ElementSummary {
                name: ne.name.clone(),
                pool: ne.pool.clone(),
                served_apn_count: ne.served_apns.len(),
                notice_count: ne.notices.len(),
                registered_at: ne.registered_at,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Returns the full view of one element, including its pool neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementNotFound`] if the element is unknown.
    pub async fn element_detail(
        &self,
        element_name: &ElementName,
    ) -> Result<ElementDetail, SentinelError> {
        let state = self.state.read().await;
        let element = state
            .elements
            .get(element_name)
            .ok_or_else(|| SentinelError::ElementNotFound(element_name.clone()))?;

        let neighbours = element
            .pool
            .as_ref()
            .and_then(|p| state.pools.get(p))
            .map(|pool| {
                pool.members
                    .iter()
                    .filter(|m| *m != element_name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(ElementDetail {
            name: element.name.clone(),
            pool: element.pool.clone(),
            neighbours,
            served_apns: element.served_apns.clone(),
            notices: element.notices.clone(),
            registered_at: element.registered_at,
        })
    }

    /// Returns summaries of all pools, sorted by name.
    pub async fn list_pools(&self) -> Vec<PoolSummary> {
        let state = self.state.read().await;
        let mut summaries: Vec<PoolSummary> = state
            .pools
            .values()
            .map(|pool| PoolSummary {
                name: pool.name.clone(),
                member_count: pool.members.len(),
                active_alarms: pool.active_alarm_count(),
                created_at: pool.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Returns the full view of one pool: members plus down-state.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolNotFound`] if the pool is unknown.
    pub async fn pool_detail(&self, pool_name: &PoolName) -> Result<PoolDetail, SentinelError> {
        let state = self.state.read().await;
        let pool = state
            .pools
            .get(pool_name)
            .ok_or_else(|| SentinelError::PoolNotFound(pool_name.clone()))?;

        let down_state = pool
            .down_state_snapshot()
            .into_iter()
            .map(|(apn, reporters)| {
                let servers = serving_members(&state.elements, pool, &apn).len();
                let state = ApnState::from_counts(reporters.len(), servers);
                DownStateEntry {
                    apn,
                    reporters,
                    state,
                }
            })
            .collect();

        Ok(PoolDetail {
            name: pool.name.clone(),
            members: pool.members.clone(),
            down_state,
            created_at: pool.created_at,
        })
    }

    /// Returns the reporter set and derived state for one `(pool, apn)`
    /// pair. An APN nobody reports is simply `Up` with no reporters.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolNotFound`] if the pool is unknown.
    pub async fn alarm_status(
        &self,
        pool_name: &PoolName,
        apn: &ApnName,
    ) -> Result<AlarmStatus, SentinelError> {
        let state = self.state.read().await;
        let pool = state
            .pools
            .get(pool_name)
            .ok_or_else(|| SentinelError::PoolNotFound(pool_name.clone()))?;

        let reporters = pool.down_reporters(apn).to_vec();
        let servers = serving_members(&state.elements, pool, apn).len();
        Ok(AlarmStatus {
            apn: apn.clone(),
            state: ApnState::from_counts(reporters.len(), servers),
            reporters,
            servers,
        })
    }
}
