/**
 * Error Conversion
 *
 * This module converts backend errors and handler panics into HTTP
 * responses.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 *
 * Server-side failures (5xx) never leak their cause: the client sees a
 * generic message and the details go to the log.
 */

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;

use crate::backend::error::types::BackendError;

/// Message returned for every 5xx response
pub const GENERIC_SERVER_ERROR: &str = "Internal server error";

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("[Server] Request failed: {:?}", self);
            GENERIC_SERVER_ERROR.to_string()
        } else {
            tracing::warn!("[Server] Request rejected: {}", self);
            self.message()
        };
        json_error(status, &message)
    }
}

/// Catch-all for panics inside handlers (used with `CatchPanicLayer`)
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("[Server] Handler panicked: {}", detail);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_SERVER_ERROR)
}

fn json_error(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": message,
        "status": status.as_u16(),
    });

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| (status, message.to_string()).into_response())
}
