//! Domain layer: core coordination model, directory, and event system.
//!
//! This module contains the fault-coordination model: identity keys, the
//! access-point catalog, network elements with their notice logs, pools
//! with per-APN down-state, the directory that transacts across all of
//! them, and the event bus for broadcasting state changes.

pub mod access_point;
pub mod alarm;
pub mod alarm_event;
pub mod authenticator;
pub mod directory;
pub mod event_bus;
pub mod ids;
pub mod network_element;
pub mod pool;

pub use access_point::AccessPoint;
pub use alarm::{ApnState, PropagationSummary};
pub use alarm_event::AlarmEvent;
pub use authenticator::{CredentialAuthenticator, PeerAuthenticator};
pub use directory::Directory;
pub use event_bus::EventBus;
pub use ids::{ApnName, ElementName, PoolName};
pub use network_element::{DownNotice, NetworkElement};
pub use pool::Pool;
