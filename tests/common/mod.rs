//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - In-process server and `axum-test` fixtures
//! - A small WebSocket client speaking the event protocol
//! - Custom assertion macros

pub mod assertions;
pub mod server;
pub mod ws_client;

// Re-export commonly used utilities
pub use server::*;
pub use ws_client::*;
