/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container, holding:
 * - The loaded configuration
 * - The realtime hub (connection registry + broadcaster)
 * - The database pool used by the persistence collaborators
 *
 * The hub is the only piece of shared mutable state. It is created once
 * here and reaches handlers through Axum state, never through globals.
 */

use axum::extract::FromRef;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::realtime::RealtimeHub;
use crate::shared::AppConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Presence registry and notification broadcaster
    pub realtime: RealtimeHub,

    /// Database connection pool
    ///
    /// `None` when running without a database (tests, local tooling).
    /// The server binary refuses to start without one.
    pub db_pool: Option<PgPool>,

    /// When this process started serving
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let realtime = RealtimeHub::new(&config);
        Self {
            config: Arc::new(config),
            realtime,
            db_pool,
            started_at: Utc::now(),
        }
    }
}

/// Lets handlers take `State<RealtimeHub>` directly
impl FromRef<AppState> for RealtimeHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
