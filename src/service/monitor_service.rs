//! Monitor service: orchestrates coordination operations and emits events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::directory::{
    AlarmStatus, ElementDetail, ElementSummary, PoolDetail, PoolSummary,
};
use crate::domain::{
    AccessPoint, AlarmEvent, ApnName, Directory, ElementName, EventBus, PeerAuthenticator,
    PoolName, PropagationSummary,
};
use crate::error::SentinelError;

/// Orchestration layer for all coordination operations.
///
/// Stateless coordinator: owns references to the [`Directory`] for state,
/// the [`EventBus`] for event emission, and the pluggable peer
/// authenticator presented to elements during propagation. Every mutation
/// method follows the pattern: delegate the locked transaction to the
/// directory → emit events → return result.
#[derive(Debug, Clone)]
pub struct MonitorService {
    directory: Arc<Directory>,
    event_bus: EventBus,
    authenticator: Arc<dyn PeerAuthenticator>,
}

impl MonitorService {
    /// Creates a new `MonitorService`.
    #[must_use]
    pub fn new(
        directory: Arc<Directory>,
        event_bus: EventBus,
        authenticator: Arc<dyn PeerAuthenticator>,
    ) -> Self {
        Self {
            directory,
            event_bus,
            authenticator,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ── Registration ────────────────────────────────────────────────────

    /// Registers an access point in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ApnExists`] on a duplicate name.
    pub async fn register_apn(&self, name: ApnName) -> Result<(), SentinelError> {
        self.directory.register_apn(name.clone()).await?;
        tracing::info!(apn = %name, "access point registered");
        Ok(())
    }

    /// Registers a standalone network element.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementExists`] on a duplicate name.
    pub async fn register_element(
        &self,
        name: ElementName,
        credential: String,
    ) -> Result<(), SentinelError> {
        self.directory
            .register_element(name.clone(), credential)
            .await?;
        tracing::info!(element = %name, "network element registered");
        Ok(())
    }

    /// Creates an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolExists`] on a duplicate name.
    pub async fn create_pool(&self, name: PoolName) -> Result<(), SentinelError> {
        self.directory.create_pool(name.clone()).await?;

        let _ = self.event_bus.publish(AlarmEvent::PoolCreated {
            pool: name.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(pool = %name, "pool created");
        Ok(())
    }

    /// Removes an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolNotFound`] or
    /// [`SentinelError::InvalidRequest`] if the pool still has members.
    pub async fn remove_pool(&self, name: &PoolName) -> Result<(), SentinelError> {
        self.directory.remove_pool(name).await?;

        let _ = self.event_bus.publish(AlarmEvent::PoolRemoved {
            pool: name.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(pool = %name, "pool removed");
        Ok(())
    }

    // ── Membership ──────────────────────────────────────────────────────

    /// Adds an element to a pool.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::AlreadyMember`] or
    /// [`SentinelError::AlreadyInOtherPool`] — membership is exclusive.
    pub async fn add_member(
        &self,
        pool: &PoolName,
        element: &ElementName,
    ) -> Result<(), SentinelError> {
        self.directory.add_member(pool, element).await?;

        let _ = self.event_bus.publish(AlarmEvent::MemberAdded {
            pool: pool.clone(),
            element: element.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(pool = %pool, element = %element, "member added");
        Ok(())
    }

    /// Removes an element from a pool, purging its alarm footprint.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::NotMember`] if the element is not a member.
    pub async fn remove_member(
        &self,
        pool: &PoolName,
        element: &ElementName,
    ) -> Result<(), SentinelError> {
        let purged = self.directory.remove_member(pool, element).await?;

        if !purged.is_empty() {
            tracing::warn!(
                pool = %pool,
                element = %element,
                purged = purged.len(),
                "departing member had outstanding down-declarations"
            );
        }

        let _ = self.event_bus.publish(AlarmEvent::MemberRemoved {
            pool: pool.clone(),
            element: element.clone(),
            purged_declarations: purged,
            timestamp: Utc::now(),
        });

        tracing::info!(pool = %pool, element = %element, "member removed");
        Ok(())
    }

    // ── Association & credentials ───────────────────────────────────────

    /// Associates an APN with an element.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ApnNotFound`],
    /// [`SentinelError::ElementNotFound`], or
    /// [`SentinelError::AlreadyAssociated`].
    pub async fn associate_apn(
        &self,
        element: &ElementName,
        apn: &ApnName,
    ) -> Result<(), SentinelError> {
        self.directory.associate_apn(element, apn).await?;
        tracing::info!(element = %element, apn = %apn, "apn associated");
        Ok(())
    }

    /// Dissociates an APN from an element, purging any outstanding
    /// declaration it had for that APN.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementNotFound`] or
    /// [`SentinelError::NotAssociated`].
    pub async fn dissociate_apn(
        &self,
        element: &ElementName,
        apn: &ApnName,
    ) -> Result<(), SentinelError> {
        self.directory.dissociate_apn(element, apn).await?;
        tracing::info!(element = %element, apn = %apn, "apn dissociated");
        Ok(())
    }

    /// Changes an element's credential after verifying the old one.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementNotFound`] or
    /// [`SentinelError::InvalidCredential`].
    pub async fn change_credential(
        &self,
        element: &ElementName,
        old: &str,
        new: String,
    ) -> Result<(), SentinelError> {
        self.directory.change_credential(element, old, new).await?;
        tracing::info!(element = %element, "credential changed");
        Ok(())
    }

    // ── Alarm coordination ──────────────────────────────────────────────

    /// Declares an APN down on behalf of `reporter` and propagates notices
    /// to serving pool peers.
    ///
    /// # Errors
    ///
    /// See [`Directory::raise_alarm`].
    pub async fn set_alarm(
        &self,
        reporter: &ElementName,
        apn: &ApnName,
    ) -> Result<PropagationSummary, SentinelError> {
        let (pool, summary) = self
            .directory
            .raise_alarm(reporter, apn, self.authenticator.as_ref())
            .await?;

        let _ = self.event_bus.publish(AlarmEvent::AlarmRaised {
            pool: pool.clone(),
            apn: apn.clone(),
            reporter: reporter.clone(),
            peers_notified: summary.peers_notified,
            peers_skipped: summary.peers_skipped,
            state: summary.state,
            timestamp: Utc::now(),
        });

        if summary.peers_skipped > 0 {
            tracing::warn!(
                pool = %pool,
                apn = %apn,
                reporter = %reporter,
                skipped = summary.peers_skipped,
                "peers skipped during alarm propagation"
            );
        }
        tracing::info!(
            pool = %pool,
            apn = %apn,
            reporter = %reporter,
            notified = summary.peers_notified,
            state = summary.state.as_str(),
            "alarm raised"
        );
        Ok(summary)
    }

    /// Withdraws a down declaration on behalf of `reporter` and retracts
    /// the matching notices from serving pool peers.
    ///
    /// # Errors
    ///
    /// See [`Directory::clear_alarm`].
    pub async fn clear_alarm(
        &self,
        reporter: &ElementName,
        apn: &ApnName,
    ) -> Result<PropagationSummary, SentinelError> {
        let (pool, summary) = self
            .directory
            .clear_alarm(reporter, apn, self.authenticator.as_ref())
            .await?;

        let _ = self.event_bus.publish(AlarmEvent::AlarmCleared {
            pool: pool.clone(),
            apn: apn.clone(),
            reporter: reporter.clone(),
            peers_notified: summary.peers_notified,
            peers_skipped: summary.peers_skipped,
            state: summary.state,
            timestamp: Utc::now(),
        });

        tracing::info!(
            pool = %pool,
            apn = %apn,
            reporter = %reporter,
            notified = summary.peers_notified,
            state = summary.state.as_str(),
            "alarm cleared"
        );
        Ok(summary)
    }

    // ── Read-only views ─────────────────────────────────────────────────

    /// Returns all catalogued access points.
    pub async fn list_apns(&self) -> Vec<AccessPoint> {
        self.directory.list_apns().await
    }

    /// Returns summaries of all registered elements.
    pub async fn list_elements(&self) -> Vec<ElementSummary> {
        self.directory.list_elements().await
    }

    /// Returns the full view of one element.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::ElementNotFound`].
    pub async fn element_detail(
        &self,
        element: &ElementName,
    ) -> Result<ElementDetail, SentinelError> {
        self.directory.element_detail(element).await
    }

    /// Returns summaries of all pools.
    pub async fn list_pools(&self) -> Vec<PoolSummary> {
        self.directory.list_pools().await
    }

    /// Returns the full view of one pool.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolNotFound`].
    pub async fn pool_detail(&self, pool: &PoolName) -> Result<PoolDetail, SentinelError> {
        self.directory.pool_detail(pool).await
    }

    /// Returns the reporter set and state for one `(pool, apn)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`SentinelError::PoolNotFound`].
    pub async fn alarm_status(
        &self,
        pool: &PoolName,
        apn: &ApnName,
    ) -> Result<AlarmStatus, SentinelError> {
        self.directory.alarm_status(pool, apn).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ApnState, CredentialAuthenticator};

    fn make_service() -> MonitorService {
        let directory = Arc::new(Directory::new());
        let event_bus = EventBus::new(1000);
        let authenticator: Arc<dyn PeerAuthenticator> =
            Arc::new(CredentialAuthenticator::new("admin"));
        MonitorService::new(directory, event_bus, authenticator)
    }

    async fn seed(service: &MonitorService) {
        let _ = service.register_apn(ApnName::from("fast.example")).await;
        let _ = service
            .register_element(ElementName::from("ne1"), "admin".to_string())
            .await;
        let _ = service
            .register_element(ElementName::from("ne3"), "admin".to_string())
            .await;
        let _ = service.create_pool(PoolName::from("pool1")).await;
        let _ = service
            .add_member(&PoolName::from("pool1"), &ElementName::from("ne1"))
            .await;
        let _ = service
            .add_member(&PoolName::from("pool1"), &ElementName::from("ne3"))
            .await;
        let _ = service
            .associate_apn(&ElementName::from("ne1"), &ApnName::from("fast.example"))
            .await;
        let _ = service
            .associate_apn(&ElementName::from("ne3"), &ApnName::from("fast.example"))
            .await;
    }

    #[tokio::test]
    async fn create_pool_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service.create_pool(PoolName::from("pool1")).await;
        assert!(result.is_ok());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "pool_created");
    }

    #[tokio::test]
    async fn set_alarm_emits_event_with_summary() {
        let service = make_service();
        seed(&service).await;
        let mut rx = service.event_bus().subscribe();

        let result = service
            .set_alarm(&ElementName::from("ne1"), &ApnName::from("fast.example"))
            .await;
        let Ok(summary) = result else {
            panic!("set_alarm failed");
        };
        assert_eq!(summary.peers_notified, 1);
        assert_eq!(summary.state, ApnState::PartiallyDown);

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "alarm_raised");
        let AlarmEvent::AlarmRaised {
            peers_notified,
            state,
            ..
        } = event
        else {
            panic!("wrong event variant");
        };
        assert_eq!(peers_notified, 1);
        assert_eq!(state, ApnState::PartiallyDown);
    }

    #[tokio::test]
    async fn clear_alarm_emits_event() {
        let service = make_service();
        seed(&service).await;
        let _ = service
            .set_alarm(&ElementName::from("ne1"), &ApnName::from("fast.example"))
            .await;
        let mut rx = service.event_bus().subscribe();

        let result = service
            .clear_alarm(&ElementName::from("ne1"), &ApnName::from("fast.example"))
            .await;
        let Ok(summary) = result else {
            panic!("clear_alarm failed");
        };
        assert_eq!(summary.state, ApnState::Up);

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "alarm_cleared");
    }

    #[tokio::test]
    async fn member_removed_event_carries_purged_declarations() {
        let service = make_service();
        seed(&service).await;
        let _ = service
            .set_alarm(&ElementName::from("ne1"), &ApnName::from("fast.example"))
            .await;
        let mut rx = service.event_bus().subscribe();

        let result = service
            .remove_member(&PoolName::from("pool1"), &ElementName::from("ne1"))
            .await;
        assert!(result.is_ok());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        let AlarmEvent::MemberRemoved {
            purged_declarations,
            ..
        } = event
        else {
            panic!("wrong event variant");
        };
        assert_eq!(purged_declarations, vec![ApnName::from("fast.example")]);
    }
}
