//! veld-schemas - schema validation, normalization, inference, and
//! comparison for extended JSON data
//!
//! The engine checks tree-shaped data against declarative schemas that
//! extend the JSON Schema type vocabulary with typed numeric scalars and
//! arrays, physical quantities, class/function/instance references, and
//! mesh structures. One schema buys four capabilities:
//!
//! - **Validation**: pass/fail with addressable error locations
//!   ([`Validator`], [`CompiledValidator`])
//! - **Normalization**: validation plus default filling and rich-value
//!   reconstruction ([`Normalizer`])
//! - **Inference**: a minimal schema from an arbitrary value
//!   ([`encode_schema`])
//! - **Comparison**: structural compatibility between two schemas
//!   ([`compare_schemas`])
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//! use veld_schemas::{validate, Normalizer};
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {"color": {"default": "purple"}},
//!     "required": ["color"],
//! });
//!
//! validate(&json!({"color": "green"}), &schema).unwrap();
//!
//! let normalizer = Normalizer::new(&schema).unwrap();
//! let normalized = normalizer.normalize(&json!({})).unwrap();
//! assert!(normalized.as_object().unwrap().contains_key("color"));
//! ```
//!
//! Every error location is a JSON Pointer rooted at `#`; errors render
//! both as compact `(kind, instance_ref, schema_ref)` tuples and as
//! descriptive documents with nested sub-errors.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

pub mod compare;
pub mod descriptors;
pub mod error;
pub mod infer;
pub mod loader;
pub mod metaschema;
pub mod normalizer;
pub mod pointer;
pub mod registry;
pub mod tree;
pub mod validator;

pub use compare::{compare_schemas, compare_schemas_bool};
pub use error::{
    ComparisonError, DecodeError, Error, Result, ValidationError, ValidationOutcome,
    ValidationWarning,
};
pub use infer::encode_schema;
pub use loader::{parse_instance_str, parse_schema_file, parse_schema_str, Format};
pub use metaschema::{check_schema, get_metaschema};
pub use normalizer::{Normalized, Normalizer};
pub use pointer::JsonPointer;
pub use registry::{TypeDescriptor, TypeRegistry};
pub use validator::{CompiledValidator, Validator, ValidatorOptions};

/// One-shot validation: compile `schema` and check `instance`, surfacing
/// the first error
pub fn validate(instance: &serde_json::Value, schema: &serde_json::Value) -> Result<()> {
    let validator = Validator::compile(schema)?;
    validator.validate(instance).into_result()?;
    Ok(())
}
