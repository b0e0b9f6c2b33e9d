//! Backend Error Module
//!
//! Error types for HTTP handlers and server startup.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and its status code mapping
//! - **`conversion`** - `IntoResponse` and the catch-all panic handler
//!
//! # HTTP Response Conversion
//!
//! Handlers return `Result<_, BackendError>`; the error renders as a JSON
//! body with the mapped status. 5xx bodies carry a generic message only.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use conversion::{handle_panic, GENERIC_SERVER_ERROR};
pub use types::BackendError;
