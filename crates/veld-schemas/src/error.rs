//! Error and warning model shared by the whole engine
//!
//! Validation, comparison, and schema-compilation failures all carry the
//! same location context: the mismatched keyword or kind plus two JSON
//! Pointers, one into the instance and one into the schema. Two wire
//! renderings derive from the one model: a compact
//! `(kind, instance_ref, schema_ref)` tuple and a descriptive document
//! with nested sub-errors. Rendering is a presentation choice, never a
//! different algorithm.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;
use thiserror::Error;

use crate::pointer::JsonPointer;

/// An instance failed its schema at a specific location
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub struct ValidationError {
    /// The mismatched keyword or kind (`type`, `required`, `anyOf`, ...)
    pub kind: String,
    /// Human-readable description of the mismatch
    pub message: String,
    /// JSON Pointer into the instance
    pub instance_ref: String,
    /// JSON Pointer into the schema
    pub schema_ref: String,
    /// Per-branch failures; non-empty only for failed `anyOf` and for
    /// schema-level wrapping
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_errors: Vec<ValidationError>,
}

impl ValidationError {
    pub fn new(
        kind: impl Into<String>,
        message: impl Into<String>,
        instance_ref: &JsonPointer,
        schema_ref: &JsonPointer,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            instance_ref: instance_ref.to_string(),
            schema_ref: schema_ref.to_string(),
            sub_errors: Vec::new(),
        }
    }

    pub fn with_sub_errors(mut self, sub_errors: Vec<ValidationError>) -> Self {
        self.sub_errors = sub_errors;
        self
    }

    /// Compact wire rendering: `(kind, instance_ref, schema_ref)`
    pub fn compact(&self) -> (String, String, String) {
        (
            self.kind.clone(),
            self.instance_ref.clone(),
            self.schema_ref.clone(),
        )
    }

    /// Descriptive wire rendering:
    /// `{"message", "instanceRef", "schemaRef", "errors"?}`
    pub fn descriptive(&self) -> Json {
        let mut doc = serde_json::json!({
            "message": self.message,
            "instanceRef": self.instance_ref,
            "schemaRef": self.schema_ref,
        });
        if !self.sub_errors.is_empty() {
            doc["errors"] = Json::Array(
                self.sub_errors
                    .iter()
                    .map(ValidationError::descriptive)
                    .collect(),
            );
        }
        doc
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation error at '{}' (schema '{}'): {}",
            self.instance_ref, self.schema_ref, self.message
        )?;
        for sub in &self.sub_errors {
            write!(f, "\n  - {}", sub)?;
        }
        Ok(())
    }
}

/// A non-fatal finding, emitted for `deprecated: true` matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub kind: String,
    pub message: String,
    pub instance_ref: String,
    pub schema_ref: String,
}

impl ValidationWarning {
    pub fn new(
        kind: impl Into<String>,
        message: impl Into<String>,
        instance_ref: &JsonPointer,
        schema_ref: &JsonPointer,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            instance_ref: instance_ref.to_string(),
            schema_ref: schema_ref.to_string(),
        }
    }

    pub fn compact(&self) -> (String, String, String) {
        (
            self.kind.clone(),
            self.instance_ref.clone(),
            self.schema_ref.clone(),
        )
    }

    pub fn descriptive(&self) -> Json {
        serde_json::json!({
            "message": self.message,
            "instanceRef": self.instance_ref,
            "schemaRef": self.schema_ref,
        })
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation warning at '{}' (schema '{}'): {}",
            self.instance_ref, self.schema_ref, self.message
        )
    }
}

/// Two schemas are structurally incompatible
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub struct ComparisonError {
    /// The keyword where the walk stopped
    pub keyword: String,
    pub message: String,
    pub instance_ref: String,
    pub schema_ref: String,
}

impl ComparisonError {
    pub fn new(
        keyword: impl Into<String>,
        message: impl Into<String>,
        instance_ref: &JsonPointer,
        schema_ref: &JsonPointer,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            message: message.into(),
            instance_ref: instance_ref.to_string(),
            schema_ref: schema_ref.to_string(),
        }
    }

    pub fn compact(&self) -> (String, String, String) {
        (
            self.keyword.clone(),
            self.instance_ref.clone(),
            self.schema_ref.clone(),
        )
    }

    pub fn descriptive(&self) -> Json {
        serde_json::json!({
            "message": self.message,
            "instanceRef": self.instance_ref,
            "schemaRef": self.schema_ref,
        })
    }
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Comparison error on '{}' at '{}'/'{}': {}",
            self.keyword, self.instance_ref, self.schema_ref, self.message
        )
    }
}

/// The collected outcome of one validation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok on success, the first error otherwise
    pub fn into_result(mut self) -> std::result::Result<Vec<ValidationWarning>, ValidationError> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(self.errors.remove(0))
        }
    }

    pub fn merge(&mut self, other: ValidationOutcome) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Umbrella error for engine entry points
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed source text, surfaced from the parsing boundary
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The schema document is not a valid instance of the metaschema
    #[error("Invalid schema: {0}")]
    InvalidSchema(ValidationError),

    /// A `$ref` resolved back to an ancestor on the resolution path
    #[error("Circular reference detected: {chain}")]
    CircularReference { chain: String },

    /// A `$ref` target does not exist or is not a pointer
    #[error("Failed to resolve reference '{reference}': {reason}")]
    Reference { reference: String, reason: String },

    /// A `patternProperties` key is not a valid regular expression
    #[error("Invalid property pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The instance failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The two schemas are incompatible
    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    /// Extended-type reconstruction failed
    #[error(transparent)]
    Core(#[from] veld_core::Error),
}

/// Convenience type alias for Results using the engine Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed JSON or YAML source text
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to parse JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported schema format for '{path}'. Expected .yaml, .yml, or .json")]
    UnsupportedFormat { path: std::path::PathBuf },
}
