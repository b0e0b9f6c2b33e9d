//! Presence HTTP Handlers
//!
//! Read-only views of the connection registry.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::realtime::RealtimeHub;
use crate::backend::server::state::AppState;
use crate::shared::UserId;

/// Response for `GET /api/presence/{user_id}`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceResponse {
    pub user_id: String,
    pub online: bool,
    /// Number of open connections joined to the user's channel
    pub connections: usize,
}

/// Response for `GET /health`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub connections: usize,
    pub online_users: usize,
    pub pending_notifications: usize,
    pub database: bool,
    pub started_at: DateTime<Utc>,
}

/// Report whether a user currently has a joined connection
pub async fn get_presence(
    State(hub): State<RealtimeHub>,
    Path(user_id): Path<String>,
) -> Result<Json<PresenceResponse>, BackendError> {
    let user = UserId::parse(&user_id)?;
    let connections = hub.registry().connections_for(&user).len();

    Ok(Json(PresenceResponse {
        user_id: user.to_string(),
        online: connections > 0,
        connections,
    }))
}

/// Liveness plus registry counters
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let hub = &app_state.realtime;
    Json(HealthResponse {
        status: "ok".to_string(),
        connections: hub.registry().connection_count(),
        online_users: hub.registry().user_count(),
        pending_notifications: hub.broadcaster().pending_len(),
        database: app_state.db_pool.is_some(),
        started_at: app_state.started_at,
    })
}
