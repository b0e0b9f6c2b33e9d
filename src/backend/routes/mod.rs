//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - main router, layers, static fallback
//! - **`api_routes`** - presence and notification push endpoints
//!
//! # Route Types
//!
//! - `GET /ws` - realtime WebSocket
//! - `GET /health` - liveness and connection counts
//! - `GET /api/presence/{user_id}` - presence query
//! - `POST /api/notifications/{user_id}/push` - live push
//! - everything else - static files from the public directory

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
