/**
 * Realtime Hub
 *
 * Owns the connection registry and the broadcaster and dispatches client
 * events. One hub is built at startup and shared through `AppState`; the
 * socket tasks and HTTP handlers all talk to it.
 *
 * # Client events
 *
 * - `join` - subscribe the connection to the user's channel
 * - `notificationRead` - fan `notificationUpdated` out to the user's channel
 *
 * Malformed events are logged and ignored; the client gets no reply.
 */

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::backend::realtime::broadcast::NotificationBroadcaster;
use crate::backend::realtime::pending::PendingBuffer;
use crate::backend::realtime::registry::{ConnectionRegistry, JoinOutcome, OutboundReceiver};
use crate::shared::{AppConfig, ClientEvent, ConnectionId, NotificationRead, ServerEvent, UserId};

/// Interval of the background sweep over held notifications
const PENDING_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Entry point for everything realtime
#[derive(Clone)]
pub struct RealtimeHub {
    registry: ConnectionRegistry,
    broadcaster: NotificationBroadcaster,
}

impl RealtimeHub {
    /// Build a hub from configuration
    pub fn new(config: &AppConfig) -> Self {
        let registry = ConnectionRegistry::new(config.outbound_buffer);
        let broadcaster = if config.pending_enabled() {
            NotificationBroadcaster::with_pending(
                registry.clone(),
                PendingBuffer::new(
                    config.pending_ttl,
                    config.pending_capacity,
                    config.pending_max_users,
                ),
            )
        } else {
            NotificationBroadcaster::new(registry.clone())
        };
        Self {
            registry,
            broadcaster,
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn broadcaster(&self) -> &NotificationBroadcaster {
        &self.broadcaster
    }

    /// Register a new connection
    pub fn open_connection(&self) -> (ConnectionId, OutboundReceiver) {
        let (connection, receiver) = self.registry.connect();
        tracing::info!("[Realtime] Client connected: {}", connection);
        (connection, receiver)
    }

    /// Forget a connection and all of its channel subscriptions
    pub fn close_connection(&self, connection: ConnectionId) {
        let users = self.registry.disconnect(connection);
        if users.is_empty() {
            tracing::info!("[Realtime] Client disconnected: {}", connection);
        } else {
            let names: Vec<&str> = users.iter().map(UserId::as_str).collect();
            tracing::info!(
                "[Realtime] Client disconnected: {} (left {})",
                connection,
                names.join(", ")
            );
        }
    }

    /// Parse and dispatch one text frame from `connection`
    pub fn handle_text(&self, connection: ConnectionId, text: &str) {
        match ClientEvent::parse(text) {
            Ok(event) => self.handle_event(connection, event),
            Err(e) => {
                tracing::warn!(
                    "[Realtime] Ignoring malformed frame from {}: {}",
                    connection,
                    e
                );
            }
        }
    }

    /// Dispatch a parsed client event
    pub fn handle_event(&self, connection: ConnectionId, event: ClientEvent) {
        tracing::debug!("[Realtime] {} from {}", event.name(), connection);
        match event {
            ClientEvent::Join(raw) => {
                self.join(connection, &raw);
            }
            ClientEvent::NotificationRead(read) => {
                self.notification_read(connection, read);
            }
        }
    }

    /// Handle `join`. Returns the user joined, or `None` if the request was
    /// ignored.
    pub fn join(&self, connection: ConnectionId, raw: &serde_json::Value) -> Option<UserId> {
        let user = match UserId::from_value(raw) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("[Realtime] Ignoring join from {}: {}", connection, e);
                return None;
            }
        };

        match self.broadcaster.join(&user, connection) {
            JoinOutcome::Joined => {
                tracing::info!("[Realtime] User {} joined on {}", user, connection);
                Some(user)
            }
            JoinOutcome::AlreadyJoined => {
                tracing::debug!("[Realtime] User {} already joined on {}", user, connection);
                Some(user)
            }
            JoinOutcome::UnknownConnection => {
                tracing::warn!(
                    "[Realtime] Join for user {} from closed connection {}",
                    user,
                    connection
                );
                None
            }
        }
    }

    /// Handle `notificationRead`: tell every connection of that user the
    /// notification is read. Returns the number of connections reached.
    pub fn notification_read(&self, connection: ConnectionId, read: NotificationRead) -> usize {
        let user = match UserId::from_value(&read.user_id) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(
                    "[Realtime] Ignoring notificationRead from {}: {}",
                    connection,
                    e
                );
                return 0;
            }
        };
        self.notify(&user, ServerEvent::notification_read(read.notification_id))
    }

    /// Deliver an event to a user's channel
    pub fn notify(&self, user: &UserId, event: ServerEvent) -> usize {
        self.broadcaster.notify(user, event)
    }

    /// Start the periodic sweep of expired held notifications
    ///
    /// Returns `None` when holding is disabled.
    pub fn spawn_pending_sweeper(&self) -> Option<JoinHandle<()>> {
        if !self.broadcaster.pending_enabled() {
            return None;
        }
        let broadcaster = self.broadcaster.clone();
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(PENDING_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let purged = broadcaster.purge_expired();
                if purged > 0 {
                    tracing::debug!("[Realtime] Purged {} expired held notification(s)", purged);
                }
            }
        }))
    }
}
