/**
 * Real-time Event System
 *
 * This module defines the events exchanged over the realtime WebSocket.
 * Every frame is a JSON text frame of the shape:
 *
 * ```json
 * {"event": "<name>", "data": <payload>}
 * ```
 *
 * Client events are parsed leniently so a malformed `join` can be logged and
 * ignored instead of tearing the connection down.
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Raw frame before the event name is dispatched
#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Event sent by a client
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// `join` with the raw user identifier, validated by the hub
    Join(serde_json::Value),
    /// `notificationRead`
    NotificationRead(NotificationRead),
}

/// Payload of a `notificationRead` event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRead {
    /// Opaque, passed through untouched
    #[serde(default)]
    pub notification_id: serde_json::Value,
    #[serde(default)]
    pub user_id: serde_json::Value,
}

impl ClientEvent {
    /// Parse a client text frame
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        let frame: Frame = serde_json::from_str(text)?;
        match frame.event.as_str() {
            "join" => Ok(Self::Join(frame.data)),
            "notificationRead" => {
                let read: NotificationRead = serde_json::from_value(frame.data)?;
                Ok(Self::NotificationRead(read))
            }
            other => Err(SharedError::protocol(format!("unknown event '{}'", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::NotificationRead(_) => "notificationRead",
        }
    }
}

/// Event pushed to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A notification was marked read on one of the user's connections
    NotificationUpdated(NotificationUpdate),
    /// Live update pushed by the HTTP layer; payload is opaque
    Notification(serde_json::Value),
}

/// Payload of `notificationUpdated`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationUpdate {
    pub notification_id: serde_json::Value,
    pub is_read: bool,
}

impl ServerEvent {
    /// Build the `notificationUpdated` event for a read receipt
    pub fn notification_read(notification_id: serde_json::Value) -> Self {
        Self::NotificationUpdated(NotificationUpdate {
            notification_id,
            is_read: true,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotificationUpdated(_) => "notificationUpdated",
            Self::Notification(_) => "notification",
        }
    }

    /// Serialize to a text frame
    pub fn to_frame(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
