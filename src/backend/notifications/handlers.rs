//! Notification HTTP Handlers
//!
//! The push endpoint lets the services that own notifications (comments,
//! likes, follows) reach a user's open sockets right after a write. The
//! notification itself is persisted by the caller; this route only relays
//! it, best effort.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::realtime::RealtimeHub;
use crate::shared::{ServerEvent, UserId};

/// Response for `POST /api/notifications/{user_id}/push`
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    pub user_id: String,
    /// Connections the notification was queued on; 0 means the user is offline
    pub delivered: usize,
}

/// Push a notification to every open connection of a user
///
/// The JSON body is forwarded untouched as the `data` of a `notification`
/// event. Always answers 202: an offline user is not an error.
pub async fn push_notification(
    State(hub): State<RealtimeHub>,
    Path(user_id): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<PushResponse>), BackendError> {
    let user = UserId::parse(&user_id)?;
    let delivered = hub.notify(&user, ServerEvent::Notification(payload));

    Ok((
        StatusCode::ACCEPTED,
        Json(PushResponse {
            user_id: user.to_string(),
            delivered,
        }),
    ))
}
