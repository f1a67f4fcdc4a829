//! Error types for the veld core library
//!
//! This module defines the error handling for the value model and the
//! extended-type collaborators, using thiserror for ergonomic error
//! definitions and anyhow for opaque collaborator failure sources.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

use crate::units::UnitsError;

/// Main error type for veld-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A numeric value does not fit the declared subtype/precision
    #[error("Numeric error: {message}")]
    Numeric { message: String },

    /// A nested array is ragged or does not match the declared shape
    #[error("Shape error: expected {expected:?}, found {actual:?}")]
    Shape {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A class/function/instance reference could not be decoded
    #[error("Reference error: {message}")]
    Reference { message: String },

    /// A mesh structure is malformed
    #[error("Mesh error: {message}")]
    Mesh { message: String },

    /// Unit expression or quantity errors
    #[error(transparent)]
    Units(#[from] UnitsError),

    /// A wire value has the wrong JSON kind for the requested construction
    #[error("Wire error: expected {expected}, found {found}")]
    Wire { expected: String, found: String },

    /// Base64 payload decoding errors
    #[error("Encoding error: {message}")]
    Encoding {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Convenience type alias for Results using the core Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::Numeric {
            message: message.into(),
        }
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::Reference {
            message: message.into(),
        }
    }

    pub fn mesh(message: impl Into<String>) -> Self {
        Self::Mesh {
            message: message.into(),
        }
    }

    pub fn wire(expected: impl Into<String>, found: &serde_json::Value) -> Self {
        Self::Wire {
            expected: expected.into(),
            found: json_kind(found).to_string(),
        }
    }
}

/// Human-readable name of a JSON node's kind, used in error messages
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
