//! Backend Module
//!
//! Server-side code: the Axum HTTP server, the realtime WebSocket layer and
//! the thin HTTP surface around it.
//!
//! # Architecture
//!
//! - **`server`** - initialization, application state, database gate
//! - **`routes`** - router assembly, CORS, limits, static files
//! - **`realtime`** - presence registry, broadcaster, socket lifecycle
//! - **`presence`** - presence and health endpoints
//! - **`notifications`** - live push endpoint for the CRUD services
//! - **`error`** - backend error types and response conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs          - binary entry point
//! ├── server/
//! ├── routes/
//! ├── realtime/
//! ├── presence/
//! ├── notifications/
//! └── error/
//! ```
//!
//! # State Management
//!
//! `AppState` holds the configuration, the `RealtimeHub` and the database
//! pool. The hub's tables sit behind one mutex with short, non-blocking
//! critical sections; outbound delivery never awaits while holding it.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time presence and notification delivery
pub mod realtime;

/// Presence endpoints
pub mod presence;

/// Notification push endpoint
pub mod notifications;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use realtime::{ConnectionRegistry, NotificationBroadcaster, RealtimeHub};
pub use server::{create_app, AppState};
