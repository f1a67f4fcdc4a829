//! Schema document parsing for YAML and JSON formats
//!
//! The engine never parses text itself: this module is the boundary to
//! serde_json/serde_yaml, turning source text into generic JSON trees.
//! Malformed text surfaces as [`DecodeError`] here and nowhere else.
//! Instance documents are JSON only; schema documents may also be YAML.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde_json::Value as Json;
use std::path::Path;

use crate::error::DecodeError;

/// Supported file formats for schema documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(DecodeError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
        }
    }
}

/// Parse an instance document (JSON only)
pub fn parse_instance_str(content: &str) -> Result<Json, DecodeError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a schema document with an explicit format
pub fn parse_schema_content(content: &str, format: Format) -> Result<Json, DecodeError> {
    match format {
        Format::Json => Ok(serde_json::from_str(content)?),
        Format::Yaml => {
            // Parse as YAML first to catch YAML-specific errors, then
            // convert to a JSON tree for uniform handling downstream
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            Ok(serde_json::to_value(yaml).map_err(DecodeError::from)?)
        }
    }
}

/// Parse a schema document from text, trying JSON before YAML
pub fn parse_schema_str(content: &str) -> Result<Json, DecodeError> {
    match parse_schema_content(content, Format::Json) {
        Ok(value) => Ok(value),
        Err(json_err) => match parse_schema_content(content, Format::Yaml) {
            Ok(value) => Ok(value),
            // JSON is the primary format; its error is the useful one
            Err(_) => Err(json_err),
        },
    }
}

/// Parse a schema file, detecting the format from its extension
pub fn parse_schema_file(path: &Path) -> Result<Json, DecodeError> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_schema_content(&content, format)
}
