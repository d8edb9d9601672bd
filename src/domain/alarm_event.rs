//! Domain events reflecting pool and alarm state mutations.
//!
//! Every state change emits an [`AlarmEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers,
//! which filter them by pool name.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ApnName, ApnState, ElementName, PoolName};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AlarmEvent {
    /// Emitted when a new pool is created.
    PoolCreated {
        /// Pool identifier.
        pool: PoolName,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an empty pool is removed.
    PoolRemoved {
        /// Pool identifier.
        pool: PoolName,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an element joins a pool.
    MemberAdded {
        /// Pool identifier.
        pool: PoolName,
        /// The joining element.
        element: ElementName,
        /// Join timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an element leaves a pool.
    MemberRemoved {
        /// Pool identifier.
        pool: PoolName,
        /// The departing element.
        element: ElementName,
        /// APNs for which the departing element's declarations were purged.
        purged_declarations: Vec<ApnName>,
        /// Departure timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful `set_alarm` call.
    AlarmRaised {
        /// Pool identifier.
        pool: PoolName,
        /// Affected access point.
        apn: ApnName,
        /// The declaring element.
        reporter: ElementName,
        /// Peers whose notice log was updated.
        peers_notified: u32,
        /// Peers skipped due to authentication failure.
        peers_skipped: u32,
        /// Resulting state of the `(pool, apn)` pair.
        state: ApnState,
        /// Declaration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful `clear_alarm` call.
    AlarmCleared {
        /// Pool identifier.
        pool: PoolName,
        /// Affected access point.
        apn: ApnName,
        /// The element withdrawing its declaration.
        reporter: ElementName,
        /// Peers whose notice log was updated.
        peers_notified: u32,
        /// Peers skipped due to authentication failure.
        peers_skipped: u32,
        /// Resulting state of the `(pool, apn)` pair.
        state: ApnState,
        /// Withdrawal timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl AlarmEvent {
    /// Returns the pool this event concerns.
    #[must_use]
    pub const fn pool(&self) -> &PoolName {
        match self {
            Self::PoolCreated { pool, .. }
            | Self::PoolRemoved { pool, .. }
            | Self::MemberAdded { pool, .. }
            | Self::MemberRemoved { pool, .. }
            | Self::AlarmRaised { pool, .. }
            | Self::AlarmCleared { pool, .. } => pool,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::PoolRemoved { .. } => "pool_removed",
            Self::MemberAdded { .. } => "member_added",
            Self::MemberRemoved { .. } => "member_removed",
            Self::AlarmRaised { .. } => "alarm_raised",
            Self::AlarmCleared { .. } => "alarm_cleared",
        }
    }
}
