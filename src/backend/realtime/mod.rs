//! Real-time Presence Module
//!
//! Online presence and per-user notification delivery over WebSockets.
//!
//! # Architecture
//!
//! - **`registry`** - connection table, user channels, reverse index
//! - **`broadcast`** - fire-and-forget fan-out to a user's channel
//! - **`pending`** - optional short-lived buffer for offline users
//! - **`hub`** - owns the above and dispatches client events
//! - **`socket`** - `GET /ws` upgrade and per-connection loop
//!
//! # Flow
//!
//! A client connects, sends `join` with its user id and is subscribed to the
//! channel named after that id. Anything later addressed to the user, either
//! a `notificationRead` from another tab or a push from the HTTP layer,
//! reaches every connection on that channel. Closing the socket removes all
//! of its subscriptions.
//!
//! Delivery is best effort while connected. Offline users must fetch missed
//! notifications over HTTP.

/// Connection registry
pub mod registry;

/// Notification broadcasting
pub mod broadcast;

/// Pending notification buffer
pub mod pending;

/// Realtime hub
pub mod hub;

/// WebSocket handler
pub mod socket;

// Re-export commonly used types and functions
pub use broadcast::NotificationBroadcaster;
pub use hub::RealtimeHub;
pub use registry::{ConnectionRegistry, Delivery, JoinOutcome};
pub use socket::handle_ws_upgrade;
