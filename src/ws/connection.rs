//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered alarm events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{AlarmEvent, ApnName, PoolName};
use crate::service::MonitorService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<AlarmEvent>,
    monitor: Arc<MonitorService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs, &monitor).await;
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(alarm_event) => {
                        if subs.matches(alarm_event.pool()) {
                            let msg = WsMessage {
                                id: uuid::Uuid::new_v4().to_string(),
                                msg_type: WsMessageType::Event,
                                timestamp: chrono::Utc::now(),
                                payload: serde_json::to_value(&alarm_event).unwrap_or_default(),
                            };
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    monitor: &MonitorService,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = error_message(String::new(), 400, "malformed JSON");
        return serde_json::to_string(&err).ok();
    };

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload.clone()) else {
        let err = error_message(msg.id, 404, "unknown command");
        return serde_json::to_string(&err).ok();
    };

    let response = match command {
        WsCommand::Subscribe { pools } => {
            let wildcard = pools.iter().any(|p| p == "*");
            let names: Vec<PoolName> = pools
                .iter()
                .filter(|p| p.as_str() != "*")
                .map(|p| PoolName::new(p.as_str()))
                .collect();
            subs.subscribe(&names, wildcard);
            WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "subscribed": names.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            }
        }
        WsCommand::Unsubscribe { pools } => {
            let names: Vec<PoolName> = pools.iter().map(|p| PoolName::new(p.as_str())).collect();
            subs.unsubscribe(&names);
            WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "unsubscribed": names.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                }),
            }
        }
        WsCommand::GetStatus { pool, apn } => {
            match monitor
                .alarm_status(&PoolName::new(pool), &ApnName::new(apn))
                .await
            {
                Ok(status) => WsMessage {
                    id: msg.id,
                    msg_type: WsMessageType::Response,
                    timestamp: chrono::Utc::now(),
                    payload: serde_json::to_value(&status).unwrap_or_default(),
                },
                Err(e) => error_message(msg.id, e.error_code(), &e.to_string()),
            }
        }
    };

    serde_json::to_string(&response).ok()
}

fn error_message(id: String, code: u32, message: &str) -> WsMessage {
    WsMessage {
        id,
        msg_type: WsMessageType::Error,
        timestamp: chrono::Utc::now(),
        payload: serde_json::json!({
            "code": code,
            "message": message,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn ws_command_subscribe_deserializes() {
        let json = serde_json::json!({
            "command": "subscribe",
            "pools": ["pool1", "*"],
        });
        let result = serde_json::from_value::<WsCommand>(json);
        let Ok(WsCommand::Subscribe { pools }) = result else {
            panic!("expected subscribe command");
        };
        assert_eq!(pools, vec!["pool1".to_string(), "*".to_string()]);
    }

    #[test]
    fn ws_command_get_status_deserializes() {
        let json = serde_json::json!({
            "command": "get_status",
            "pool": "pool1",
            "apn": "fast.example",
        });
        let result = serde_json::from_value::<WsCommand>(json);
        let Ok(WsCommand::GetStatus { pool, apn }) = result else {
            panic!("expected get_status command");
        };
        assert_eq!(pool, "pool1");
        assert_eq!(apn, "fast.example");
    }
}
