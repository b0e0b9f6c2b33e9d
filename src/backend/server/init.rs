/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server.
 *
 * # Initialization Process
 *
 * 1. Connect to the database (startup fails without it)
 * 2. Create application state, including the realtime hub
 * 3. Start background tasks (held-notification sweep)
 * 4. Create the router and start listening
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::connect_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create and configure the Axum application for `app_state`
///
/// Must be called inside a Tokio runtime: the held-notification sweep is
/// spawned here when enabled.
pub fn create_app(app_state: AppState) -> Router<()> {
    if app_state.realtime.spawn_pending_sweeper().is_some() {
        tracing::info!(
            "[Realtime] Holding notifications for offline users for {:?}",
            app_state.config.pending_ttl
        );
    } else {
        tracing::info!("[Realtime] Best-effort delivery, offline notifications are dropped");
    }

    create_router(app_state)
}

/// Connect, bind and serve until Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), BackendError> {
    let pool = match connect_database(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database connection error: {}", e);
            return Err(e);
        }
    };

    let address = config.bind_address();
    let app_state = AppState::new(config, Some(pool));
    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server is running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
