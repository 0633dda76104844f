// Copyright 2025 Cowboy AI, LLC.

//! Error types for descriptor composition

use thiserror::Error;

/// Errors that can occur while composing descriptors
///
/// Every variant is a shape violation; the composer defines no other
/// failure mode. Composition either produces a complete merged descriptor
/// or fails before any merging takes place. A partial result is never
/// returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// A supplied mixin element was not a plain field mapping
    #[error("type mismatch: mixin at position {position} is not a field mapping (found {found})")]
    NotAMapping {
        /// Zero-based position of the offending element in the mixin list
        position: usize,
        /// JSON type of the value that was found instead
        found: String,
    },

    /// A lifecycle-named field was bound to a non-callable value
    #[error("type mismatch: lifecycle field '{field}' in {origin} is not callable")]
    LifecycleNotCallable {
        /// Host-framework name of the lifecycle field (e.g. `onLoad`)
        field: String,
        /// Which descriptor carried the field (`base` or `mixin N`)
        origin: String,
    },

    /// The reserved data field was bound to something other than a key/value mapping
    #[error("type mismatch: data field in {origin} is not a key/value mapping")]
    DataNotAMapping {
        /// Which descriptor carried the field (`base` or `mixin N`)
        origin: String,
    },
}

/// Result type for composition operations
pub type ComposeResult<T> = Result<T, ComposeError>;

impl ComposeError {
    /// Human-readable JSON type name used in mismatch reports
    pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}
