/**
 * Notification Broadcasting
 *
 * Delivers an event to every connection joined to a user's channel.
 *
 * # Delivery
 *
 * Delivery is fire-and-forget: the event is queued on each subscribed
 * connection's outbound queue and the call returns. There is no
 * acknowledgement and no retry. A full or closing queue drops the event.
 *
 * # Offline users
 *
 * Notifying a user with no joined connection is a silent no-op that returns
 * 0. When a pending TTL is configured the event is instead held briefly in
 * a `PendingBuffer` and flushed, oldest first, to the next connection that
 * joins through `NotificationBroadcaster::join`.
 */

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::backend::realtime::pending::{HoldOutcome, PendingBuffer};
use crate::backend::realtime::registry::{ConnectionRegistry, JoinOutcome};
use crate::shared::{ConnectionId, ServerEvent, UserId};

/// Fans events out to user channels
#[derive(Clone)]
pub struct NotificationBroadcaster {
    registry: ConnectionRegistry,
    pending: Option<Arc<Mutex<PendingBuffer>>>,
}

impl NotificationBroadcaster {
    /// Broadcaster with best-effort semantics only
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self {
            registry,
            pending: None,
        }
    }

    /// Broadcaster that holds notifications for offline users in `buffer`
    pub fn with_pending(registry: ConnectionRegistry, buffer: PendingBuffer) -> Self {
        Self {
            registry,
            pending: Some(Arc::new(Mutex::new(buffer))),
        }
    }

    /// Deliver `event` to every connection joined to `user`'s channel
    ///
    /// # Returns
    ///
    /// Number of connections the event was queued on (0 if the user is
    /// offline)
    pub fn notify(&self, user: &UserId, event: ServerEvent) -> usize {
        // Pending lock first, then the registry; `join` takes them in the
        // same order.
        let mut pending = self.pending.as_ref().map(|buffer| lock(buffer));

        let delivery = self.registry.deliver(user, &event);
        if delivery.delivered > 0 || delivery.dropped > 0 {
            tracing::info!(
                "[Realtime] {} sent to user {} on {} connection(s)",
                event.name(),
                user,
                delivery.delivered
            );
            return delivery.delivered;
        }

        let Some(buffer) = pending.as_mut() else {
            tracing::debug!("[Realtime] User {} offline, dropping {}", user, event.name());
            return 0;
        };

        let name = event.name();
        match buffer.push(user, event, Instant::now()) {
            HoldOutcome::Held => {
                tracing::debug!(
                    "[Realtime] User {} offline, holding {} for {:?}",
                    user,
                    name,
                    buffer.ttl()
                );
            }
            HoldOutcome::EvictedOldest => {
                tracing::warn!("[Realtime] Pending buffer full for user {}, evicted oldest", user);
            }
            HoldOutcome::Refused => {
                tracing::warn!(
                    "[Realtime] Pending buffer at its user limit, dropping {} for user {}",
                    name,
                    user
                );
            }
        }
        0
    }

    /// Subscribe `connection` to `user`'s channel and hand it anything held
    /// for that user.
    ///
    /// Joining and flushing happen under the pending lock, so a concurrent
    /// `notify` lands either before the join (and is flushed in order) or
    /// after the flush. Held events the connection's queue cannot take stay
    /// held for the next join.
    pub fn join(&self, user: &UserId, connection: ConnectionId) -> JoinOutcome {
        let Some(buffer) = self.pending.as_ref() else {
            return self.registry.join(user, connection);
        };
        let mut buffer = lock(buffer);

        let outcome = self.registry.join(user, connection);
        if outcome != JoinOutcome::Joined {
            return outcome;
        }

        let sent = buffer.drain_with(user, Instant::now(), |event| {
            self.registry.send_to(connection, event.clone())
        });
        let left = buffer.held_for(user);
        if left > 0 {
            tracing::warn!(
                "[Realtime] Flushed {} held notification(s) to user {} on {}, {} still held",
                sent,
                user,
                connection,
                left
            );
        } else if sent > 0 {
            tracing::info!(
                "[Realtime] Flushed {} held notification(s) to user {} on {}",
                sent,
                user,
                connection
            );
        }
        outcome
    }

    /// Drop expired held notifications; returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        match self.pending.as_ref() {
            Some(buffer) => lock(buffer).purge_expired(Instant::now()),
            None => 0,
        }
    }

    pub fn pending_enabled(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of notifications currently held
    pub fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, |buffer| lock(buffer).len())
    }
}

fn lock(buffer: &Mutex<PendingBuffer>) -> MutexGuard<'_, PendingBuffer> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}
