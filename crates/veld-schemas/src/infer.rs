//! Schema inference from rich values
//!
//! `encode_schema` classifies a value through the registry and emits the
//! minimal schema fragment it satisfies, recursing into sequences as
//! `items` and mappings as `properties`. Extended kinds report their own
//! metadata (`subtype`/`precision`/`shape`/`units`) rather than collapsing
//! to a primitive, with one deliberate exception: an 8-byte float scalar
//! is exactly a JSON number and is reported as one. The emitted fragment
//! is the strict inverse of the normalizer's reconstruction.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde_json::{json, Value as Json};

use veld_core::Value;

use crate::registry::TypeRegistry;

/// Infer the minimal extended schema for a value
pub fn encode_schema(value: &Value) -> Json {
    infer_with(value, TypeRegistry::extended())
}

/// Infer against a specific registry
pub fn infer_with(value: &Value, registry: &TypeRegistry) -> Json {
    match value {
        Value::Array(items) => {
            let mut schema = json!({"type": "array"});
            if !items.is_empty() {
                let fragments: Vec<Json> =
                    items.iter().map(|item| infer_with(item, registry)).collect();
                let homogeneous = fragments.windows(2).all(|pair| pair[0] == pair[1]);
                schema["items"] = if homogeneous {
                    fragments.into_iter().next().unwrap_or(Json::Null)
                } else {
                    // positional form: one schema per element, in order
                    Json::Array(fragments)
                };
            }
            schema
        }
        Value::Object(map) => {
            let mut schema = json!({"type": "object"});
            if !map.is_empty() {
                let properties: serde_json::Map<String, Json> = map
                    .iter()
                    .map(|(key, child)| (key.clone(), infer_with(child, registry)))
                    .collect();
                schema["properties"] = Json::Object(properties);
            }
            schema
        }
        other => registry
            .infer(other)
            .unwrap_or_else(|| json!({"type": "any"})),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_core::{
        ClassRef, FunctionRef, InstanceRef, NdArray, Quantity, Scalar, Subtype, Units,
    };

    #[test]
    fn test_primitives() {
        for (value, expected) in [
            (Value::Bool(true), json!({"type": "boolean"})),
            (Value::Null, json!({"type": "null"})),
            (Value::Int(42), json!({"type": "integer"})),
            (Value::Float(42.0), json!({"type": "number"})),
            (Value::String("hello".to_string()), json!({"type": "string"})),
        ] {
            assert_eq!(encode_schema(&value), expected);
        }
    }

    #[test]
    fn test_heterogeneous_array_is_positional() {
        let value = Value::Array(vec![Value::Int(1), Value::String("hello".to_string())]);
        assert_eq!(
            encode_schema(&value),
            json!({
                "type": "array",
                "items": [{"type": "integer"}, {"type": "string"}],
            })
        );
    }

    #[test]
    fn test_homogeneous_array_is_single() {
        let value = Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(
            encode_schema(&value),
            json!({"type": "array", "items": {"type": "integer"}})
        );
    }

    #[test]
    fn test_object_properties() {
        let mut map = indexmap::IndexMap::new();
        map.insert("a".to_string(), Value::Int(3));
        map.insert("b".to_string(), Value::String("hello".to_string()));
        assert_eq!(
            encode_schema(&Value::Object(map)),
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "integer"},
                    "b": {"type": "string"},
                },
            })
        );
    }

    #[test]
    fn test_scalar_precisions() {
        for (scalar, subtype, precision) in [
            (Scalar::float(3.0, 2).unwrap(), "float", 2),
            (Scalar::float(3.0, 4).unwrap(), "float", 4),
            (Scalar::int(3, 1).unwrap(), "int", 1),
            (Scalar::int(3, 8).unwrap(), "int", 8),
            (Scalar::uint(3, 2).unwrap(), "uint", 2),
            (Scalar::complex(3.0, 0.0, 8).unwrap(), "complex", 8),
            (Scalar::complex(3.0, 0.0, 16).unwrap(), "complex", 16),
        ] {
            assert_eq!(
                encode_schema(&Value::Scalar(scalar)),
                json!({"type": "scalar", "subtype": subtype, "precision": precision})
            );
        }
    }

    #[test]
    fn test_float64_collapses_to_number() {
        let scalar = Scalar::float(3.0, 8).unwrap();
        assert_eq!(
            encode_schema(&Value::Scalar(scalar)),
            json!({"type": "number"})
        );
    }

    #[test]
    fn test_ndarray_reports_shape() {
        let nested = json!([[1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0]]);
        let array = NdArray::from_nested(Subtype::Float, 4, &nested).unwrap();
        assert_eq!(
            encode_schema(&Value::NdArray(array)),
            json!({
                "type": "ndarray",
                "shape": [3, 4],
                "subtype": "float",
                "precision": 4,
            })
        );
    }

    #[test]
    fn test_quantity_reports_units() {
        let quantity = Quantity::new(
            Scalar::float(1.5, 4).unwrap(),
            Units::parse("cm").unwrap(),
        );
        assert_eq!(
            encode_schema(&Value::Quantity(quantity)),
            json!({"type": "scalar", "subtype": "float", "precision": 4, "units": "cm"})
        );
    }

    #[test]
    fn test_refs_do_not_recurse() {
        assert_eq!(
            encode_schema(&Value::Function(FunctionRef::new("m", "f"))),
            json!({"type": "function"})
        );
        assert_eq!(
            encode_schema(&Value::Class(ClassRef::new("m", "K"))),
            json!({"type": "class"})
        );
        let instance = InstanceRef {
            class: ClassRef::new("m", "K"),
            args: vec![json!(1), json!("b")],
            kwargs: indexmap::IndexMap::new(),
        };
        assert_eq!(
            encode_schema(&Value::Instance(instance)),
            json!({"type": "instance"})
        );
    }

    #[test]
    fn test_bytes() {
        assert_eq!(
            encode_schema(&Value::Bytes(b"raw".to_vec())),
            json!({"type": "bytes"})
        );
    }
}
