/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and at startup, and can be
 * converted to HTTP responses.
 *
 * # Error Categories
 *
 * ## Request Errors
 *
 * Bad input on an HTTP route, such as an invalid user identifier, arrives
 * as a `SharedError` and maps to 400. Unreadable bodies are rejected by
 * axum's extractors before a handler runs.
 *
 * ## Startup Errors
 *
 * Configuration, database and listener failures. These stop the process.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::{ConfigError, SharedError};

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Invalid or missing configuration
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// Database connection failure
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Listener or socket failure
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `SharedError` - 400 for validation/protocol, 500 for serialization
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SharedError(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::ProtocolError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::ConfigError(_) | Self::DatabaseError(_) | Self::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}
