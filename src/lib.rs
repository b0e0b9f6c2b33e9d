//! SocialHub - Realtime Presence Server
//!
//! The realtime side of a social network backend: it knows which users are
//! online and pushes notifications to every socket a user has open.
//!
//! # Module Structure
//!
//! - **`shared`** - identifiers, wire events, errors, configuration
//! - **`backend`** - Axum server, WebSocket lifecycle, presence registry,
//!   notification broadcaster
//!
//! # Usage
//!
//! ```rust,no_run
//! use socialhub::backend::server::{create_app, AppState};
//! use socialhub::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let state = AppState::new(config, None);
//! let app = create_app(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:4000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Realtime protocol
//!
//! JSON text frames over `/ws`, `{"event": ..., "data": ...}`:
//!
//! - `join` (client) - subscribe to the channel named after a user id
//! - `notificationRead` (client) - mark a notification read everywhere
//! - `notificationUpdated` (server) - `{ notificationId, isRead: true }`
//! - `notification` (server) - live push from the HTTP layer
//!
//! Delivery is best effort while connected; nothing is queued durably.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
