/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Realtime routes (`/ws`) and health
 * 2. API routes (presence, notification push)
 * 3. Static files from the public directory as fallback
 *
 * # Layers
 *
 * - request tracing
 * - CORS for the single configured origin
 * - catch-all: handler panics become a generic 500
 * - request body limit of 10 MiB
 */

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::backend::error::handle_panic;
use crate::backend::presence::handlers::health;
use crate::backend::realtime::socket::handle_ws_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let config = app_state.config.clone();

    let router = Router::new()
        .route("/ws", get(handle_ws_upgrade))
        .route("/health", get(health));

    let router = configure_api_routes(router);

    router
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config))
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(app_state)
}

/// CORS for the one allowed frontend origin
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(config.cors_credentials);

    match HeaderValue::from_str(&config.cors_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(
                "[Server] CORS origin '{}' is not a valid header value ({}), cross-origin requests will be refused",
                config.cors_origin,
                e
            );
            layer
        }
    }
}
