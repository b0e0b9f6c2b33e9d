//! Notifications Module
//!
//! HTTP side of live notification delivery.

/// Push handler
pub mod handlers;

pub use handlers::{push_notification, PushResponse};
