//! End-to-end tests for the REST surface, driven through the router
//! without binding a socket.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use tower::util::ServiceExt;

use apn_sentinel::api;
use apn_sentinel::app_state::AppState;
use apn_sentinel::domain::{CredentialAuthenticator, Directory, EventBus, PeerAuthenticator};
use apn_sentinel::service::MonitorService;
use apn_sentinel::ws::handler::ws_handler;

fn build_app() -> Router {
    let directory = Arc::new(Directory::new());
    let event_bus = EventBus::new(1000);
    let authenticator: Arc<dyn PeerAuthenticator> = Arc::new(CredentialAuthenticator::new("admin"));
    let monitor = Arc::new(MonitorService::new(
        directory,
        event_bus.clone(),
        authenticator,
    ));

    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .with_state(AppState {
            monitor,
            event_bus,
            default_credential: "admin".to_string(),
        })
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    match Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
    {
        Ok(req) => req,
        Err(e) => panic!("request build failed: {e}"),
    }
}

fn request(method: &str, uri: &str) -> Request<Body> {
    match Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
    {
        Ok(req) => req,
        Err(e) => panic!("request build failed: {e}"),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = match app.clone().oneshot(req).await {
        Ok(r) => r,
        Err(e) => panic!("request failed: {e}"),
    };
    let status = response.status();
    let bytes = match to_bytes(response.into_body(), usize::MAX).await {
        Ok(b) => b,
        Err(e) => panic!("body read failed: {e}"),
    };
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Registers two serving elements in one pool plus a catalogued APN.
async fn seed(app: &Router) {
    let calls = [
        post_json("/api/v1/apns", serde_json::json!({"name": "fast.example"})),
        post_json("/api/v1/elements", serde_json::json!({"name": "ne1"})),
        post_json("/api/v1/elements", serde_json::json!({"name": "ne3"})),
        post_json("/api/v1/pools", serde_json::json!({"name": "pool1"})),
        post_json(
            "/api/v1/pools/pool1/members",
            serde_json::json!({"element": "ne1"}),
        ),
        post_json(
            "/api/v1/pools/pool1/members",
            serde_json::json!({"element": "ne3"}),
        ),
        post_json(
            "/api/v1/elements/ne1/apns",
            serde_json::json!({"apn": "fast.example"}),
        ),
        post_json(
            "/api/v1/elements/ne3/apns",
            serde_json::json!({"apn": "fast.example"}),
        ),
    ];
    for req in calls {
        let (status, body) = send(app, req).await;
        assert!(status.is_success(), "seed call failed: {status} {body}");
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_app();
    let (status, body) = send(&app, request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn alarm_state_catalog_lists_three_states() {
    let app = build_app();
    let (status, body) = send(&app, request("GET", "/config/alarm-states")).await;
    assert_eq!(status, StatusCode::OK);
    let Some(states) = body.as_array() else {
        panic!("expected array body");
    };
    assert_eq!(states.len(), 3);
    assert_eq!(states[0]["state"], "up");
    assert_eq!(states[2]["state"], "fully_down");
}

#[tokio::test]
async fn create_pool_returns_201_and_duplicate_conflicts() {
    let app = build_app();

    let (status, body) = send(
        &app,
        post_json("/api/v1/pools", serde_json::json!({"name": "pool1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "pool1");
    assert_eq!(body["status"], "active");

    let (status, body) = send(
        &app,
        post_json("/api/v1/pools", serde_json::json!({"name": "pool1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2101);
}

#[tokio::test]
async fn empty_pool_name_is_rejected() {
    let app = build_app();
    let (status, body) = send(
        &app,
        post_json("/api/v1/pools", serde_json::json!({"name": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
}

#[tokio::test]
async fn raise_alarm_propagates_to_serving_peer() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/elements/ne1/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reporter"], "ne1");
    assert_eq!(body["peers_notified"], 1);
    assert_eq!(body["peers_skipped"], 0);
    assert_eq!(body["state"], "partially_down");

    // The peer's pending notice shows up in its detail view.
    let (status, body) = send(&app, request("GET", "/api/v1/elements/ne3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notices"][0]["reporter"], "ne1");
    assert_eq!(body["notices"][0]["apn"], "fast.example");
}

#[tokio::test]
async fn last_reporter_reaches_fully_down() {
    let app = build_app();
    seed(&app).await;

    let (_, _) = send(
        &app,
        post_json(
            "/api/v1/elements/ne1/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;
    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/elements/ne3/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "fully_down");
    assert_eq!(body["peers_notified"], 0);

    let (status, body) = send(
        &app,
        request("GET", "/api/v1/pools/pool1/alarms/fast.example"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "fully_down");
    let Some(reporters) = body["reporters"].as_array() else {
        panic!("expected reporters array");
    };
    assert_eq!(reporters.len(), 2);
}

#[tokio::test]
async fn clear_alarm_restores_up_state() {
    let app = build_app();
    seed(&app).await;

    let (_, _) = send(
        &app,
        post_json(
            "/api/v1/elements/ne1/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;
    let (status, body) = send(
        &app,
        request("DELETE", "/api/v1/elements/ne1/alarms/fast.example"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "up");
    assert_eq!(body["peers_notified"], 1);

    let (status, body) = send(&app, request("GET", "/api/v1/elements/ne3")).await;
    assert_eq!(status, StatusCode::OK);
    let Some(notices) = body["notices"].as_array() else {
        panic!("expected notices array");
    };
    assert!(notices.is_empty());
}

#[tokio::test]
async fn clear_without_active_alarm_is_404() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        request("DELETE", "/api/v1/elements/ne1/alarms/fast.example"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2201);
}

#[tokio::test]
async fn raise_for_unserved_apn_is_422() {
    let app = build_app();
    seed(&app).await;
    let (_, _) = send(
        &app,
        post_json("/api/v1/apns", serde_json::json!({"name": "slow.example"})),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/elements/ne1/alarms",
            serde_json::json!({"apn": "slow.example"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], 4001);
}

#[tokio::test]
async fn raise_by_unpooled_element_is_400() {
    let app = build_app();
    seed(&app).await;
    let (_, _) = send(
        &app,
        post_json("/api/v1/elements", serde_json::json!({"name": "loner"})),
    )
    .await;
    let (_, _) = send(
        &app,
        post_json(
            "/api/v1/elements/loner/apns",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/elements/loner/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);
}

#[tokio::test]
async fn membership_is_exclusive_across_pools() {
    let app = build_app();
    seed(&app).await;
    let (_, _) = send(
        &app,
        post_json("/api/v1/pools", serde_json::json!({"name": "pool2"})),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/pools/pool2/members",
            serde_json::json!({"element": "ne1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2112);
}

#[tokio::test]
async fn pool_detail_shows_members_and_down_state() {
    let app = build_app();
    seed(&app).await;
    let (_, _) = send(
        &app,
        post_json(
            "/api/v1/elements/ne1/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;

    let (status, body) = send(&app, request("GET", "/api/v1/pools/pool1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["members"], serde_json::json!(["ne1", "ne3"]));
    assert_eq!(body["down_state"][0]["apn"], "fast.example");
    assert_eq!(body["down_state"][0]["state"], "partially_down");
}

#[tokio::test]
async fn delete_non_empty_pool_is_rejected() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(&app, request("DELETE", "/api/v1/pools/pool1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);

    // Empty it, then deletion succeeds.
    let (_, _) = send(
        &app,
        request("DELETE", "/api/v1/pools/pool1/members/ne1"),
    )
    .await;
    let (_, _) = send(
        &app,
        request("DELETE", "/api/v1/pools/pool1/members/ne3"),
    )
    .await;
    let (status, _) = send(&app, request("DELETE", "/api/v1/pools/pool1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn removing_member_purges_its_declarations() {
    let app = build_app();
    seed(&app).await;
    let (_, _) = send(
        &app,
        post_json(
            "/api/v1/elements/ne1/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;

    let (status, _) = send(
        &app,
        request("DELETE", "/api/v1/pools/pool1/members/ne1"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        request("GET", "/api/v1/pools/pool1/alarms/fast.example"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "up");
}

#[tokio::test]
async fn credential_change_requires_old_credential() {
    let app = build_app();
    seed(&app).await;

    let bad = match Request::builder()
        .method("PUT")
        .uri("/api/v1/elements/ne1/credential")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({"old_credential": "wrong", "new_credential": "secret"}).to_string(),
        )) {
        Ok(r) => r,
        Err(e) => panic!("request build failed: {e}"),
    };
    let (status, body) = send(&app, bad).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], 1101);
}

#[tokio::test]
async fn changed_credential_causes_skipped_propagation() {
    let app = build_app();
    seed(&app).await;

    // ne3 rotates away from the operator credential; it can no longer be
    // notified.
    let req = match Request::builder()
        .method("PUT")
        .uri("/api/v1/elements/ne3/credential")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({"old_credential": "admin", "new_credential": "secret"}).to_string(),
        )) {
        Ok(r) => r,
        Err(e) => panic!("request build failed: {e}"),
    };
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/elements/ne1/alarms",
            serde_json::json!({"apn": "fast.example"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["peers_notified"], 0);
    assert_eq!(body["peers_skipped"], 1);
}

#[tokio::test]
async fn unknown_element_detail_is_404() {
    let app = build_app();
    let (status, body) = send(&app, request("GET", "/api/v1/elements/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn pools_list_is_paginated() {
    let app = build_app();
    for i in 0..3 {
        let (_, _) = send(
            &app,
            post_json("/api/v1/pools", serde_json::json!({"name": format!("pool{i}")})),
        )
        .await;
    }

    let (status, body) = send(&app, request("GET", "/api/v1/pools?page=1&per_page=2")).await;
    assert_eq!(status, StatusCode::OK);
    let Some(data) = body["data"].as_array() else {
        panic!("expected data array");
    };
    assert_eq!(data.len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn absurd_page_number_yields_empty_page() {
    let app = build_app();
    let (_, _) = send(
        &app,
        post_json("/api/v1/pools", serde_json::json!({"name": "pool1"})),
    )
    .await;

    let (status, body) = send(
        &app,
        request("GET", "/api/v1/pools?page=4294967295&per_page=100"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let Some(data) = body["data"].as_array() else {
        panic!("expected data array");
    };
    assert!(data.is_empty());
    assert_eq!(body["pagination"]["total"], 1);
}
