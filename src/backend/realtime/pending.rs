/**
 * Pending Notification Buffer
 *
 * A client opens its socket and only then sends `join`. A notification fired
 * in between finds no subscriber and would be lost. When a TTL is
 * configured, such notifications are held here for that long and handed to
 * the first connection that joins the user's channel.
 *
 * This is not a durable queue: entries live only in memory, expire after the
 * TTL, and each user keeps at most `capacity` of them (oldest evicted). At
 * most `max_users` users are held at once; notifications for further users
 * are refused until room frees up.
 */

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::shared::{ServerEvent, UserId};

/// What happened to a notification handed to `PendingBuffer::push`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// Held without touching older entries
    Held,
    /// Held; the user's oldest entry was evicted to make room
    EvictedOldest,
    /// Not held: the buffer already tracks `max_users` users
    Refused,
}

struct PendingEntry {
    queued_at: Instant,
    event: ServerEvent,
}

/// Short-lived per-user buffer for notifications addressed to offline users
pub struct PendingBuffer {
    ttl: Duration,
    capacity: usize,
    max_users: usize,
    entries: HashMap<UserId, VecDeque<PendingEntry>>,
}

impl PendingBuffer {
    pub fn new(ttl: Duration, capacity: usize, max_users: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            max_users: max_users.max(1),
            entries: HashMap::new(),
        }
    }

    /// Hold `event` for `user`
    pub fn push(&mut self, user: &UserId, event: ServerEvent, now: Instant) -> HoldOutcome {
        if !self.entries.contains_key(user) && self.entries.len() >= self.max_users {
            self.purge_expired(now);
            if self.entries.len() >= self.max_users {
                return HoldOutcome::Refused;
            }
        }

        let ttl = self.ttl;
        let queue = self.entries.entry(user.clone()).or_default();
        queue.retain(|entry| now.duration_since(entry.queued_at) < ttl);

        let mut outcome = HoldOutcome::Held;
        while queue.len() >= self.capacity {
            queue.pop_front();
            outcome = HoldOutcome::EvictedOldest;
        }
        queue.push_back(PendingEntry {
            queued_at: now,
            event,
        });
        outcome
    }

    /// Hand fresh entries for `user` to `send`, oldest first.
    ///
    /// Stops at the first entry `send` refuses; that entry and everything
    /// after it stay held with their original timestamps. Returns how many
    /// were sent.
    pub fn drain_with<F>(&mut self, user: &UserId, now: Instant, mut send: F) -> usize
    where
        F: FnMut(&ServerEvent) -> bool,
    {
        let ttl = self.ttl;
        let Some(queue) = self.entries.get_mut(user) else {
            return 0;
        };
        queue.retain(|entry| now.duration_since(entry.queued_at) < ttl);

        let mut sent = 0;
        while let Some(entry) = queue.front() {
            if !send(&entry.event) {
                break;
            }
            queue.pop_front();
            sent += 1;
        }

        if queue.is_empty() {
            self.entries.remove(user);
        }
        sent
    }

    /// Entries currently held for `user`
    pub fn held_for(&self, user: &UserId) -> usize {
        self.entries.get(user).map_or(0, VecDeque::len)
    }

    /// Drop expired entries; returns how many were dropped
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let mut purged = 0;
        self.entries.retain(|_, queue| {
            let before = queue.len();
            queue.retain(|entry| now.duration_since(entry.queued_at) < ttl);
            purged += before - queue.len();
            !queue.is_empty()
        });
        purged
    }

    /// Total entries held across all users
    pub fn len(&self) -> usize {
        self.entries.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
