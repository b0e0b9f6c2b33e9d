/**
 * Connection Registry
 *
 * Tracks every open realtime connection, the user channels each connection
 * has joined, and the reverse index used for cleanup.
 *
 * # Indexes
 *
 * - `connections`: connection id -> outbound queue + users joined by it
 * - `channels`: user id -> connections subscribed to that user's channel
 *
 * The two are updated together under one lock, so a user key never maps to
 * an empty set and every subscription has a matching reverse entry.
 * Disconnect cleanup walks only the channels the connection joined.
 *
 * # Presence
 *
 * Presence is one-to-many: every tab a user opens stays reachable, and
 * disconnecting one connection never removes another connection's entry.
 */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::shared::{ConnectionId, ServerEvent, UserId};

/// Sending half of a connection's outbound queue
pub type OutboundSender = mpsc::Sender<ServerEvent>;

/// Receiving half, drained by the connection's socket task
pub type OutboundReceiver = mpsc::Receiver<ServerEvent>;

/// Result of a join request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The connection is now subscribed to the user's channel
    Joined,
    /// The connection was already subscribed; nothing changed
    AlreadyJoined,
    /// No such connection (already disconnected)
    UnknownConnection,
}

/// Counts from one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Events accepted by an outbound queue
    pub delivered: usize,
    /// Events dropped because a queue was full or closed
    pub dropped: usize,
}

struct ConnectionSlot {
    sender: OutboundSender,
    users: HashSet<UserId>,
}

#[derive(Default)]
struct RegistryInner {
    connections: HashMap<ConnectionId, ConnectionSlot>,
    channels: HashMap<UserId, HashSet<ConnectionId>>,
}

/// Process-wide registry of realtime connections
///
/// Cheap to clone; all clones share the same tables. Constructed once in
/// `create_app` and handed to handlers through `AppState`.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<RegistryInner>>,
    outbound_buffer: usize,
}

impl ConnectionRegistry {
    /// Create an empty registry whose connections buffer up to
    /// `outbound_buffer` undelivered events each.
    pub fn new(outbound_buffer: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner::default())),
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    // Critical sections never leave the tables half-updated, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a freshly opened connection
    pub fn connect(&self) -> (ConnectionId, OutboundReceiver) {
        let (sender, receiver) = mpsc::channel(self.outbound_buffer);
        let id = ConnectionId::new();
        self.lock().connections.insert(
            id,
            ConnectionSlot {
                sender,
                users: HashSet::new(),
            },
        );
        (id, receiver)
    }

    /// Subscribe `connection` to the channel named after `user`
    pub fn join(&self, user: &UserId, connection: ConnectionId) -> JoinOutcome {
        let mut inner = self.lock();
        let RegistryInner {
            connections,
            channels,
        } = &mut *inner;

        let Some(slot) = connections.get_mut(&connection) else {
            return JoinOutcome::UnknownConnection;
        };
        if !slot.users.insert(user.clone()) {
            return JoinOutcome::AlreadyJoined;
        }
        channels.entry(user.clone()).or_default().insert(connection);
        JoinOutcome::Joined
    }

    /// Remove a connection and every subscription it holds.
    ///
    /// Returns the users whose channels it had joined. Unknown ids are a
    /// no-op.
    pub fn disconnect(&self, connection: ConnectionId) -> Vec<UserId> {
        let mut inner = self.lock();
        let Some(slot) = inner.connections.remove(&connection) else {
            return Vec::new();
        };

        let mut users: Vec<UserId> = slot.users.into_iter().collect();
        for user in &users {
            if let Some(members) = inner.channels.get_mut(user) {
                members.remove(&connection);
                if members.is_empty() {
                    inner.channels.remove(user);
                }
            }
        }
        users.sort();
        users
    }

    /// Queue `event` on every connection subscribed to `user`'s channel
    pub fn deliver(&self, user: &UserId, event: &ServerEvent) -> Delivery {
        let inner = self.lock();
        let mut delivery = Delivery::default();
        let Some(members) = inner.channels.get(user) else {
            return delivery;
        };

        for connection in members {
            let Some(slot) = inner.connections.get(connection) else {
                continue;
            };
            if try_enqueue(&slot.sender, *connection, event.clone()) {
                delivery.delivered += 1;
            } else {
                delivery.dropped += 1;
            }
        }
        delivery
    }

    /// Queue `event` on one connection
    pub fn send_to(&self, connection: ConnectionId, event: ServerEvent) -> bool {
        let inner = self.lock();
        match inner.connections.get(&connection) {
            Some(slot) => try_enqueue(&slot.sender, connection, event),
            None => false,
        }
    }

    pub fn is_online(&self, user: &UserId) -> bool {
        self.lock().channels.contains_key(user)
    }

    /// Connections currently subscribed to `user`'s channel, sorted
    pub fn connections_for(&self, user: &UserId) -> Vec<ConnectionId> {
        let mut connections: Vec<ConnectionId> = self
            .lock()
            .channels
            .get(user)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default();
        connections.sort();
        connections
    }

    /// Users whose channels `connection` has joined, sorted
    pub fn users_for(&self, connection: ConnectionId) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .lock()
            .connections
            .get(&connection)
            .map(|slot| slot.users.iter().cloned().collect())
            .unwrap_or_default();
        users.sort();
        users
    }

    /// Every user with at least one joined connection, sorted
    pub fn online_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.lock().channels.keys().cloned().collect();
        users.sort();
        users
    }

    pub fn connection_count(&self) -> usize {
        self.lock().connections.len()
    }

    pub fn user_count(&self) -> usize {
        self.lock().channels.len()
    }

    /// Check that the forward and reverse indexes agree
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let inner = self.lock();
        let forward_ok = inner.channels.iter().all(|(user, members)| {
            !members.is_empty()
                && members.iter().all(|c| {
                    inner
                        .connections
                        .get(c)
                        .is_some_and(|slot| slot.users.contains(user))
                })
        });
        let reverse_ok = inner.connections.iter().all(|(c, slot)| {
            slot.users.iter().all(|user| {
                inner
                    .channels
                    .get(user)
                    .is_some_and(|members| members.contains(c))
            })
        });
        forward_ok && reverse_ok
    }
}

fn try_enqueue(sender: &OutboundSender, connection: ConnectionId, event: ServerEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::warn!(
                "[Realtime] Outbound queue full for connection {}, dropping {}",
                connection,
                event.name()
            );
            false
        }
        Err(TrySendError::Closed(event)) => {
            tracing::debug!(
                "[Realtime] Connection {} is closing, dropping {}",
                connection,
                event.name()
            );
            false
        }
    }
}
