//! apn-sentinel server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use apn_sentinel::api;
use apn_sentinel::app_state::AppState;
use apn_sentinel::config::SentinelConfig;
use apn_sentinel::domain::{CredentialAuthenticator, Directory, EventBus, PeerAuthenticator};
use apn_sentinel::service::MonitorService;
use apn_sentinel::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = SentinelConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting apn-sentinel");

    // Build domain layer
    let directory = Arc::new(Directory::new());
    let event_bus = EventBus::new(config.event_bus_capacity);
    let authenticator: Arc<dyn PeerAuthenticator> =
        Arc::new(CredentialAuthenticator::new(config.operator_credential.clone()));

    // Build service layer
    let monitor = Arc::new(MonitorService::new(
        directory,
        event_bus.clone(),
        authenticator,
    ));

    // Build application state
    let app_state = AppState {
        monitor,
        event_bus,
        default_credential: config.default_element_credential,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
