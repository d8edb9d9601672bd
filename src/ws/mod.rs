//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams alarm and membership events to
//! clients, filtered per connection by pool name.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
