//! Shared Module
//!
//! Types shared by the realtime protocol and the server: identifiers, wire
//! events, errors and configuration. Nothing in here touches the network.

/// Connection and user identifiers
pub mod identifier;

/// Realtime wire events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use identifier::{ConnectionId, UserId};
pub use event::{ClientEvent, NotificationRead, NotificationUpdate, ServerEvent};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
