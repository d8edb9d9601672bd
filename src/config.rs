//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). The operational credential used to
//! authenticate against peers is configuration, never domain state.

use std::net::SocketAddr;

use anyhow::Context;

/// Top-level service configuration.
///
/// Loaded once at startup via [`SentinelConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Credential the coordinator presents to each peer during
    /// propagation.
    pub operator_credential: String,

    /// Credential assigned to elements registered without an explicit one.
    pub default_element_credential: String,
}

impl SentinelConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);

        let operator_credential =
            std::env::var("OPERATOR_CREDENTIAL").unwrap_or_else(|_| "admin".to_string());

        let default_element_credential =
            std::env::var("DEFAULT_ELEMENT_CREDENTIAL").unwrap_or_else(|_| "admin".to_string());

        Ok(Self {
            listen_addr,
            event_bus_capacity,
            operator_credential,
            default_element_credential,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
