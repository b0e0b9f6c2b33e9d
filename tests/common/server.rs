//! Server fixtures for integration tests
//!
//! `test_server` wraps the router in `axum-test` for plain HTTP checks.
//! `LiveServer` binds a real listener on an ephemeral port so WebSocket
//! clients can connect.

use std::net::SocketAddr;

use axum_test::TestServer;
use socialhub::backend::{create_app, AppState, RealtimeHub};
use socialhub::shared::{AppConfig, AppConfigBuilder};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Origin the test config allows
pub const TEST_ORIGIN: &str = "http://localhost:5173";

/// Builder preset for tests: loopback, ephemeral port, known origin
pub fn test_config_builder() -> AppConfigBuilder {
    AppConfig::builder()
        .host("127.0.0.1")
        .port(0)
        .cors_origin(TEST_ORIGIN)
}

pub fn test_config() -> AppConfig {
    test_config_builder()
        .build()
        .expect("test config should be valid")
}

/// State without a database pool
pub fn test_state(config: AppConfig) -> AppState {
    AppState::new(config, None)
}

/// Wrap the full application in an `axum-test` server
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_app(state)).expect("failed to build test server")
}

/// The application served on a real loopback socket
pub struct LiveServer {
    pub addr: SocketAddr,
    pub state: AppState,
    handle: JoinHandle<()>,
}

impl LiveServer {
    pub async fn start() -> Self {
        Self::start_with(test_config()).await
    }

    pub async fn start_with(config: AppConfig) -> Self {
        let state = test_state(config);
        let app = create_app(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test server stopped: {}", e);
            }
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn hub(&self) -> &RealtimeHub {
        &self.state.realtime
    }
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
