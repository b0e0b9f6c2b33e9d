//! Presence and health endpoint tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialhub::backend::presence::{HealthResponse, PresenceResponse};
use socialhub::shared::UserId;

use crate::common::{test_config, test_server, test_state};

#[tokio::test]
async fn test_presence_offline_user() {
    let server = test_server(test_state(test_config()));

    let response = server.get("/api/presence/42").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<PresenceResponse>(),
        PresenceResponse {
            user_id: "42".to_string(),
            online: false,
            connections: 0,
        }
    );
}

#[tokio::test]
async fn test_presence_counts_joined_connections() {
    let state = test_state(test_config());
    let hub = state.realtime.clone();
    let server = test_server(state);

    let (first, _first_rx) = hub.open_connection();
    let (second, _second_rx) = hub.open_connection();
    hub.join(first, &json!(42));
    hub.join(second, &json!("42"));

    let body = server.get("/api/presence/42").await.json::<PresenceResponse>();
    assert!(body.online);
    assert_eq!(body.connections, 2);

    hub.close_connection(first);
    let body = server.get("/api/presence/42").await.json::<PresenceResponse>();
    assert!(body.online);
    assert_eq!(body.connections, 1);

    hub.close_connection(second);
    let body = server.get("/api/presence/42").await.json::<PresenceResponse>();
    assert!(!body.online);
    assert!(!hub.registry().is_online(&UserId::parse("42").unwrap()));
}

#[tokio::test]
async fn test_presence_rejects_blank_user_id() {
    let server = test_server(test_state(test_config()));

    let response = server.get("/api/presence/%20%20").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], json!(400));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health_reports_counters() {
    let state = test_state(test_config());
    let hub = state.realtime.clone();
    let server = test_server(state);

    let (connection, _rx) = hub.open_connection();
    let (_idle, _idle_rx) = hub.open_connection();
    hub.join(connection, &json!("alice"));

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body = response.json::<HealthResponse>();
    assert_eq!(body.status, "ok");
    assert_eq!(body.connections, 2);
    assert_eq!(body.online_users, 1);
    assert_eq!(body.pending_notifications, 0);
    assert!(!body.database);
}
