//! The schema-of-schemas
//!
//! Two metaschema documents validate schema documents themselves: the
//! extended one knows the full type vocabulary, the standards-only one
//! accepts just the JSON Schema primitive names (and rejects any extended
//! name, even in an otherwise well-formed document). Both documents are
//! deliberately cycle-free; nesting is handled by recursing into the
//! subschema-bearing keywords rather than by self-reference.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde_json::{json, Value as Json};
use std::sync::OnceLock;

use crate::error::ValidationError;
use crate::pointer::JsonPointer;
use crate::registry::TypeRegistry;
use crate::validator::{CompiledValidator, Validator};

/// The extended metaschema document
pub fn extended_metaschema() -> &'static Json {
    static DOC: OnceLock<Json> = OnceLock::new();
    DOC.get_or_init(|| build_metaschema(TypeRegistry::extended(), true))
}

/// The standards-only metaschema document
pub fn standard_metaschema() -> &'static Json {
    static DOC: OnceLock<Json> = OnceLock::new();
    DOC.get_or_init(|| build_metaschema(TypeRegistry::standard(), false))
}

/// Public accessor: a copy of the extended metaschema
pub fn get_metaschema() -> Json {
    extended_metaschema().clone()
}

fn build_metaschema(registry: &TypeRegistry, extended: bool) -> Json {
    let names: Vec<Json> = registry
        .allowed_names()
        .into_iter()
        .map(|n| Json::String(n.to_string()))
        .collect();
    // a node valid in a subschema position; the extended vocabulary can
    // demand full recursive validity, the standard one checks shape only
    let subschema = if extended {
        json!({"type": "schema"})
    } else {
        json!({"type": "object"})
    };

    let mut doc = json!({
        "type": "object",
        "properties": {
            "type": {"anyOf": [
                {"type": "string", "enum": names.clone()},
                {"type": "array", "items": {"type": "string", "enum": names}},
            ]},
            "properties": {"type": "object", "additionalProperties": subschema.clone()},
            "patternProperties": {"type": "object", "additionalProperties": subschema.clone()},
            "additionalProperties": {"anyOf": [{"type": "boolean"}, subschema.clone()]},
            "required": {"type": "array", "items": {"type": "string"}},
            "items": {"anyOf": [
                subschema.clone(),
                {"type": "array", "items": subschema.clone()},
            ]},
            "additionalItems": {"anyOf": [{"type": "boolean"}, subschema.clone()]},
            "enum": {"type": "array"},
            "deprecated": {"type": "boolean"},
            "anyOf": {"type": "array", "items": subschema.clone()},
            "allOf": {"type": "array", "items": subschema},
            "$ref": {"type": "string"},
            "title": {"type": "string"},
            "description": {"type": "string"},
        },
    });
    if let (true, Some(properties)) = (extended, doc["properties"].as_object_mut()) {
        properties.insert(
            "subtype".to_string(),
            json!({"type": "string", "enum": ["int", "uint", "float", "complex"]}),
        );
        properties.insert("precision".to_string(), json!({"type": "integer"}));
        properties.insert(
            "shape".to_string(),
            json!({"type": "array", "items": {"type": "integer"}}),
        );
        properties.insert("units".to_string(), json!({"type": "string"}));
        properties.insert(
            "class".to_string(),
            json!({"anyOf": [
                {"type": "string"},
                {"type": "array", "items": {"type": "string"}},
            ]}),
        );
        properties.insert("default".to_string(), json!({"type": "any"}));
    }
    doc
}

fn extended_validator() -> &'static CompiledValidator {
    static VALIDATOR: OnceLock<CompiledValidator> = OnceLock::new();
    VALIDATOR.get_or_init(|| {
        Validator::compile_unchecked(extended_metaschema(), TypeRegistry::extended())
            .expect("the built-in extended metaschema compiles")
    })
}

fn standard_validator() -> &'static CompiledValidator {
    static VALIDATOR: OnceLock<CompiledValidator> = OnceLock::new();
    VALIDATOR.get_or_init(|| {
        Validator::compile_unchecked(standard_metaschema(), TypeRegistry::standard())
            .expect("the built-in standard metaschema compiles")
    })
}

/// Check that `doc` is a valid schema document
///
/// Any failure is reported as a single `("schema", "#", "#")` error
/// carrying the underlying mismatches as sub-errors. With `json_standard`
/// the standards-only metaschema is used and extended type names are
/// rejected even when otherwise well-formed.
pub fn check_schema(doc: &Json, json_standard: bool) -> Result<(), ValidationError> {
    let validator = if json_standard {
        standard_validator()
    } else {
        extended_validator()
    };
    let mut errors = Vec::new();
    walk(doc, validator, &mut errors);
    if errors.is_empty() {
        return Ok(());
    }
    let root = JsonPointer::root();
    Err(
        ValidationError::new("schema", "not a valid schema document", &root, &root)
            .with_sub_errors(errors),
    )
}

/// Validate a node against the metaschema, then recurse into every
/// subschema-bearing keyword so nested schemas are held to the same bar
fn walk(node: &Json, validator: &CompiledValidator, errors: &mut Vec<ValidationError>) {
    let outcome = validator.validate(node);
    if !outcome.is_valid() {
        errors.extend(outcome.errors);
        return;
    }
    let obj = match node.as_object() {
        Some(obj) => obj,
        None => return,
    };
    for keyword in ["properties", "patternProperties"] {
        if let Some(map) = obj.get(keyword).and_then(Json::as_object) {
            for subschema in map.values() {
                walk(subschema, validator, errors);
            }
        }
    }
    for keyword in ["additionalProperties", "additionalItems", "items"] {
        match obj.get(keyword) {
            Some(subschema @ Json::Object(_)) => walk(subschema, validator, errors),
            Some(Json::Array(branches)) if keyword == "items" => {
                for subschema in branches {
                    walk(subschema, validator, errors);
                }
            }
            _ => {}
        }
    }
    for keyword in ["anyOf", "allOf"] {
        if let Some(branches) = obj.get(keyword).and_then(Json::as_array) {
            for subschema in branches {
                walk(subschema, validator, errors);
            }
        }
    }
}
