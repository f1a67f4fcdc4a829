//! Integration tests for schema inference
//!
//! `encode_schema` is the strict inverse of normalization: the fragment
//! it emits for a value accepts that value's wire form.

use serde_json::json;
use veld_core::{
    ClassRef, FunctionRef, InstanceRef, NdArray, Scalar, Subtype, Value,
};
use veld_schemas::{encode_schema, validate};

#[test]
fn test_plain_values() {
    let mut object = indexmap::IndexMap::new();
    object.insert("a".to_string(), Value::Int(3));
    object.insert("b".to_string(), Value::String("hello".to_string()));

    let cases = [
        (Value::Bool(true), json!({"type": "boolean"})),
        (Value::Null, json!({"type": "null"})),
        (Value::Int(42), json!({"type": "integer"})),
        (Value::Float(42.0), json!({"type": "number"})),
        (Value::String("hello".to_string()), json!({"type": "string"})),
        (
            Value::Array(vec![Value::Int(1), Value::String("hello".to_string())]),
            json!({"type": "array", "items": [{"type": "integer"}, {"type": "string"}]}),
        ),
        (
            Value::Object(object),
            json!({
                "type": "object",
                "properties": {"a": {"type": "integer"}, "b": {"type": "string"}},
            }),
        ),
    ];
    for (value, expected) in cases {
        assert_eq!(encode_schema(&value), expected);
    }
}

#[test]
fn test_scalar_subtype_precision_table() {
    let cases = [
        (Scalar::float(3.0, 2).unwrap(), "float", 2),
        (Scalar::float(3.0, 4).unwrap(), "float", 4),
        (Scalar::int(3, 1).unwrap(), "int", 1),
        (Scalar::int(3, 2).unwrap(), "int", 2),
        (Scalar::int(3, 4).unwrap(), "int", 4),
        (Scalar::int(3, 8).unwrap(), "int", 8),
        (Scalar::uint(3, 1).unwrap(), "uint", 1),
        (Scalar::uint(3, 2).unwrap(), "uint", 2),
        (Scalar::uint(3, 4).unwrap(), "uint", 4),
        (Scalar::uint(3, 8).unwrap(), "uint", 8),
        (Scalar::complex(3.0, 0.0, 8).unwrap(), "complex", 8),
        (Scalar::complex(3.0, 0.0, 16).unwrap(), "complex", 16),
    ];
    for (scalar, subtype, precision) in cases {
        assert_eq!(
            encode_schema(&Value::Scalar(scalar)),
            json!({"type": "scalar", "subtype": subtype, "precision": precision}),
        );
    }
}

#[test]
fn test_float64_scalar_is_a_plain_number() {
    assert_eq!(
        encode_schema(&Value::Scalar(Scalar::float(3.0, 8).unwrap())),
        json!({"type": "number"})
    );
}

#[test]
fn test_array_shape_table() {
    let ones = json!([
        [1, 1, 1, 1],
        [1, 1, 1, 1],
        [1, 1, 1, 1],
    ]);
    for (subtype, precision) in [
        (Subtype::Int, 1),
        (Subtype::Int, 8),
        (Subtype::Uint, 2),
        (Subtype::Float, 2),
        (Subtype::Float, 8),
    ] {
        let array = NdArray::from_nested(subtype, precision, &ones).unwrap();
        assert_eq!(
            encode_schema(&Value::NdArray(array)),
            json!({
                "type": "ndarray",
                "shape": [3, 4],
                "subtype": subtype.as_str(),
                "precision": precision,
            }),
        );
    }
}

#[test]
fn test_host_references() {
    assert_eq!(
        encode_schema(&Value::Function(FunctionRef::new(
            "example_module",
            "example_function"
        ))),
        json!({"type": "function"})
    );
    assert_eq!(
        encode_schema(&Value::Class(ClassRef::new("example_module", "ExampleClass"))),
        json!({"type": "class"})
    );
    let instance = InstanceRef {
        class: ClassRef::new("example_module", "ExampleClass"),
        args: vec![json!(1), json!("b")],
        kwargs: indexmap::IndexMap::new(),
    };
    // no structural recursion into instance internals
    assert_eq!(
        encode_schema(&Value::Instance(instance)),
        json!({"type": "instance"})
    );
}

#[test]
fn test_inference_is_self_consistent() {
    // validate(wire(v), encode_schema(v)) succeeds
    let mut object = indexmap::IndexMap::new();
    object.insert("n".to_string(), Value::Int(7));
    object.insert(
        "xs".to_string(),
        Value::Array(vec![Value::Float(1.5), Value::Float(2.5)]),
    );
    let values = [
        Value::Null,
        Value::Bool(false),
        Value::Int(-3),
        Value::Float(2.25),
        Value::String("text".to_string()),
        Value::Bytes(b"data".to_vec()),
        Value::Scalar(Scalar::int(100, 2).unwrap()),
        Value::Class(ClassRef::new("m", "K")),
        Value::Object(object),
    ];
    for value in values {
        let schema = encode_schema(&value);
        validate(&value.to_wire(), &schema)
            .unwrap_or_else(|e| panic!("{:?} failed its inferred schema: {}", value, e));
    }
}
