//! Presence Module
//!
//! HTTP views over who is online.

/// Presence and health handlers
pub mod handlers;

pub use handlers::{get_presence, health, HealthResponse, PresenceResponse};
