//! Integration tests for normalization
//!
//! Default filling, extended-type reconstruction, and the fail-fast
//! contract on invalid instances.

use serde_json::json;
use veld_core::{Subtype, Value};
use veld_schemas::{Error, Normalizer};

#[test]
fn test_invalid_schema_text_is_decode_error() {
    for text in ["", "\""] {
        assert!(matches!(Normalizer::from_str(text), Err(Error::Decode(_))));
    }
}

#[test]
fn test_invalid_instance_text_is_decode_error() {
    let normalizer = Normalizer::from_str(r#"{"type": "object"}"#).unwrap();
    for text in ["", "\""] {
        assert!(matches!(
            normalizer.normalize_str(text),
            Err(Error::Decode(_))
        ));
    }
}

#[test]
fn test_default_fills_required_property() {
    let normalizer = Normalizer::new(&json!({
        "type": "object",
        "properties": {"color": {"default": "purple"}},
        "required": ["color"],
    }))
    .unwrap();
    let normalized = normalizer.normalize(&json!({})).unwrap();
    assert_eq!(
        normalized.to_wire(),
        json!({"color": "purple"})
    );
}

#[test]
fn test_present_value_beats_default() {
    let normalizer = Normalizer::new(&json!({
        "type": "object",
        "properties": {"color": {"default": "purple"}},
    }))
    .unwrap();
    let normalized = normalizer.normalize(&json!({"color": "green"})).unwrap();
    assert_eq!(normalized.to_wire(), json!({"color": "green"}));
}

#[test]
fn test_invalid_instance_fails_fast() {
    let normalizer = Normalizer::new(&json!({"type": ["number", "string"]})).unwrap();
    let err = normalizer
        .normalize(&json!(["Life", "the universe", "and everything"]))
        .unwrap_err();
    match err {
        Error::Validation(inner) => assert_eq!(
            inner.compact(),
            ("type".to_string(), "#".to_string(), "#".to_string())
        ),
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_ndarray_reconstruction() {
    let normalizer = Normalizer::new(&json!({
        "type": "ndarray",
        "subtype": "float",
        "precision": 4,
        "shape": [3, 4],
    }))
    .unwrap();
    let ones = json!([
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ]);
    match normalizer.normalize(&ones).unwrap() {
        Value::NdArray(arr) => {
            assert_eq!(arr.subtype, Subtype::Float);
            assert_eq!(arr.precision, 4);
            assert_eq!(arr.shape, vec![3, 4]);
            assert_eq!(arr.to_nested(), ones);
        }
        other => panic!("expected an ndarray, got {:?}", other),
    }
}

#[test]
fn test_shape_mismatch_rejected() {
    let normalizer = Normalizer::new(&json!({
        "type": "ndarray",
        "subtype": "int",
        "precision": 4,
        "shape": [2, 2],
    }))
    .unwrap();
    assert!(normalizer.normalize(&json!([[1, 2, 3], [4, 5, 6]])).is_err());
}

#[test]
fn test_quantity_reconstruction() {
    let normalizer = Normalizer::new(&json!({
        "type": "scalar",
        "subtype": "float",
        "precision": 8,
        "units": "cm",
    }))
    .unwrap();
    match normalizer.normalize(&json!(100.0)).unwrap() {
        Value::Quantity(q) => {
            let meters = q.to(&veld_core::Units::parse("m").unwrap()).unwrap();
            assert_eq!(meters.value.as_f64(), Some(1.0));
        }
        other => panic!("expected a quantity, got {:?}", other),
    }
}

#[test]
fn test_class_and_instance_reconstruction() {
    let normalizer = Normalizer::new(&json!({
        "type": "object",
        "properties": {
            "cls": {"type": "class"},
            "fun": {"type": "function"},
            "obj": {"type": "instance"},
        },
    }))
    .unwrap();
    let instance = json!({
        "cls": "collections:OrderedDict",
        "fun": "example_module:example_function",
        "obj": {
            "class": "example_module:ExampleClass",
            "args": [1, "b"],
            "kwargs": {"c": 2, "d": "d"},
        },
    });
    let normalized = normalizer.normalize(&instance).unwrap();
    let map = normalized.as_object().unwrap();
    assert!(matches!(map.get("cls"), Some(Value::Class(_))));
    assert!(matches!(map.get("fun"), Some(Value::Function(_))));
    match map.get("obj") {
        Some(Value::Instance(i)) => {
            assert_eq!(i.class.to_string(), "example_module:ExampleClass");
            assert_eq!(i.args, vec![json!(1), json!("b")]);
        }
        other => panic!("expected an instance, got {:?}", other),
    }
    // the wire rendering survives the round trip
    assert_eq!(normalized.to_wire(), instance);
}

#[test]
fn test_mesh_reconstruction() {
    let normalizer = Normalizer::new(&json!({"type": "ply"})).unwrap();
    let wire = json!({
        "vertices": [
            {"x": 0.0, "y": 0.0, "z": 0.0},
            {"x": 1.0, "y": 0.0, "z": 0.0},
            {"x": 0.0, "y": 1.0, "z": 0.0},
        ],
        "edges": [{"vertex1": 0, "vertex2": 1}],
        "faces": [{"vertex_index": [0, 1, 2]}],
    });
    match normalizer.normalize(&wire).unwrap() {
        Value::Mesh(mesh) => {
            assert_eq!(mesh.vertex_count(), 3);
            assert_eq!(mesh.face_count(), 1);
            let (min, max) = mesh.bounds().unwrap();
            assert_eq!(min, [0.0, 0.0, 0.0]);
            assert_eq!(max, [1.0, 1.0, 0.0]);
        }
        other => panic!("expected a mesh, got {:?}", other),
    }
}

#[test]
fn test_normalize_idempotent_without_lossy_types() {
    let normalizer = Normalizer::new(&json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "tags": {"type": "array", "items": {"type": "string"}},
            "weight": {"type": "number", "default": 1.0},
        },
    }))
    .unwrap();
    let instance = json!({"name": "a", "tags": ["x", "y"]});
    let once = normalizer.normalize(&instance).unwrap();
    let twice = normalizer.normalize(&once.to_wire()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_bytes_round_trip() {
    let normalizer = Normalizer::new(&json!({"type": "bytes"})).unwrap();
    match normalizer.normalize(&json!("aGVsbG8=")).unwrap() {
        Value::Bytes(bytes) => assert_eq!(bytes, b"hello"),
        other => panic!("expected bytes, got {:?}", other),
    }
}
