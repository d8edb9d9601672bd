//! Service layer: business logic orchestration.
//!
//! [`MonitorService`] coordinates membership, association, and alarm
//! operations, delegates the locked transactions to the
//! [`crate::domain::Directory`], and emits events through the
//! [`crate::domain::EventBus`].

pub mod monitor_service;

pub use monitor_service::MonitorService;
