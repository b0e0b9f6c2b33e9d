//! Router-level behavior: CORS, static files, body limit, panic recovery

use axum::{
    http::{header, HeaderValue, StatusCode},
    routing::get,
    Router,
};
use axum_test::TestServer;
use pretty_assertions::{assert_eq, assert_ne};
use serde_json::json;
use socialhub::backend::error::{handle_panic, GENERIC_SERVER_ERROR};
use socialhub::backend::routes::router::MAX_BODY_BYTES;
use tower_http::catch_panic::CatchPanicLayer;

use crate::common::{test_config, test_config_builder, test_server, test_state, TEST_ORIGIN};

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let server = test_server(test_state(test_config()));

    let response = server
        .get("/health")
        .add_header(header::ORIGIN, HeaderValue::from_static(TEST_ORIGIN))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static(TEST_ORIGIN))
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        Some(&HeaderValue::from_static("true"))
    );
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let server = test_server(test_state(test_config()));

    let response = server
        .get("/health")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://evil.example"))
        .await;

    let allowed = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
    assert_ne!(allowed, Some(&HeaderValue::from_static("http://evil.example")));
}

#[tokio::test]
async fn test_static_files_served_from_public_dir() {
    let public = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(public.path().join("index.html"), "<h1>socialhub</h1>").unwrap();

    let config = test_config_builder()
        .public_dir(public.path())
        .build()
        .unwrap();
    let server = test_server(test_state(config));

    let response = server.get("/index.html").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "<h1>socialhub</h1>");

    let missing = server.get("/nope.js").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = test_server(test_state(test_config()));
    let padding = "x".repeat(MAX_BODY_BYTES + 1);

    let response = server
        .post("/api/notifications/1/push")
        .json(&json!({ "padding": padding }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

async fn boom() -> &'static str {
    panic!("database password is hunter2")
}

#[tokio::test]
async fn test_panic_becomes_generic_500() {
    let app = Router::new()
        .route("/boom", get(boom))
        .layer(CatchPanicLayer::custom(handle_panic));
    let server = TestServer::new(app).unwrap();

    let response = server.get("/boom").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"], json!(GENERIC_SERVER_ERROR));
    assert!(!response.text().contains("hunter2"));
}
