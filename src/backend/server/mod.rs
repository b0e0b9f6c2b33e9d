//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - database connection used as the startup gate
//! - **`init`** - app creation, listener and graceful shutdown
//!
//! # Initialization Flow
//!
//! 1. **Configuration**: `AppConfig::load()` (file + environment)
//! 2. **Database**: connect or exit
//! 3. **State**: build the realtime hub
//! 4. **Router**: routes, CORS, limits, catch-all error handling

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::{create_app, run};
pub use state::AppState;
