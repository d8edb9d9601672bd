//! # apn-sentinel
//!
//! REST API and WebSocket service for coordinating APN fault reports
//! across pools of network elements.
//!
//! Network elements register, associate the access points they serve,
//! and join pools. When an element observes an APN failure it declares
//! the APN down; the service records the declaration, propagates down
//! notices to the authenticated serving peers in the pool, and derives
//! the pair's state (up, partially down, fully down). Clearing a
//! declaration retracts the matching notices.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── MonitorService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── Directory (domain/)
//!         ├── APN catalog
//!         ├── NetworkElements
//!         └── Pools + down-state
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
