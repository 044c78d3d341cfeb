//! The JSON response envelope shared by every backend endpoint.
//!
//! Every response body has the same shape:
//!
//! ```json
//! { "success": true, "message": "Appointments retrieved", "data": [ ... ] }
//! ```
//!
//! `data` is absent for calls that return nothing (delete, contact) and
//! `message` is absent on some error paths.  A body that lacks `success`
//! altogether (for example a framework-generated error page rendered as JSON)
//! is treated as a failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a failed response carries no `message` of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// The `{ success, data?, message? }` response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    /// Whether the server considers the call successful.
    #[serde(default)]
    pub success: bool,
    /// Payload of a successful call, if the endpoint returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable outcome; the error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Builds a successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Builds a failed envelope carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The text to show a human when this envelope represents a failure.
    ///
    /// Empty messages count as absent, matching how a falsy message is treated
    /// by the page scripts.
    pub fn failure_message(&self) -> String {
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

impl Envelope<Value> {
    /// Decodes `data` into a concrete type, treating a missing or `null`
    /// payload as `U::default()` (an empty list, for example).
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when `data` is present but
    /// does not have the shape of `U`.
    pub fn data_or_default<U>(&self) -> Result<U, serde_json::Error>
    where
        U: DeserializeOwned + Default,
    {
        match &self.data {
            None | Some(Value::Null) => Ok(U::default()),
            Some(value) => serde_json::from_value(value.clone()),
        }
    }

    /// Decodes `data` into a concrete type; a missing payload decodes as JSON
    /// `null`, which only succeeds for `Option`-like targets.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] on a shape mismatch.
    pub fn data_as<U: DeserializeOwned>(&self) -> Result<U, serde_json::Error> {
        serde_json::from_value(self.data.clone().unwrap_or(Value::Null))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
