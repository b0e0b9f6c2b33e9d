/**
 * Identifier Types
 *
 * Identifiers used as lookup keys by the realtime layer.
 *
 * User identifiers are owned by the persisted user store; clients send them
 * either as JSON strings or as JSON numbers, and both spellings must name
 * the same channel. They are therefore normalized to their string form on
 * the way in.
 */
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Identifier of one open WebSocket connection.
///
/// Assigned by the server at upgrade time, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// External user identifier, also used as the channel name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse a user identifier from its textual form.
    ///
    /// Surrounding whitespace is dropped; an empty result is rejected.
    pub fn parse(raw: &str) -> Result<Self, SharedError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SharedError::validation("userId", "user identifier is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse a user identifier from a JSON value (string or number).
    ///
    /// Every number is a valid id, `0` included. Strings are trimmed, so
    /// `" 42 "` names the same channel as `42`.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, SharedError> {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) => Self::parse(&number_to_string(n)),
            serde_json::Value::Null => {
                Err(SharedError::validation("userId", "user identifier is missing"))
            }
            other => Err(SharedError::validation(
                "userId",
                format!("expected string or number, got {}", json_kind(other)),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(&raw).map_err(serde::de::Error::custom)
    }
}

/// Integral floats render without a fractional part so `42.0` and `42`
/// resolve to the same channel.
fn number_to_string(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
