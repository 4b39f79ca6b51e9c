//! Error types for Reflex.
//!
//! Tracking, triggering and property access never fail: reading an absent
//! property yields `None`. Errors only arise at the edges, when a host builds
//! tracked objects or configuration from serialized input.

use thiserror::Error;

/// Errors produced while constructing tracked objects or configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// The input was not valid JSON, or did not match the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A tracked object can only wrap a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// The kind of JSON value that was found instead.
        found: &'static str,
    },
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Name the kind of a JSON value for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
