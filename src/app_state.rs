//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::MonitorService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Monitor service for all business logic.
    pub monitor: Arc<MonitorService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Credential assigned to elements registered without one.
    pub default_credential: String,
}
