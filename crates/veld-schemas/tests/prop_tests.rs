//! Property-based tests for the schema engine
//!
//! These verify the algebraic contracts across a wide range of inputs:
//! comparison is reflexive, inference is self-consistent, and
//! normalization is idempotent on schemas without lossy extended types.

use proptest::prelude::*;
use serde_json::{json, Value as Json};
use veld_core::Value;
use veld_schemas::{compare_schemas_bool, encode_schema, Normalizer, Validator};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i64>().prop_map(|n| Json::Number(n.into())),
        (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
        "[a-zA-Z0-9 ]{0,30}".prop_map(Json::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        12, // max size
        4,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
                proptest::collection::btree_map("[a-z_][a-z0-9_]{0,12}", inner, 0..4)
                    .prop_map(|m| Json::Object(m.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for generating well-formed schema documents
fn schema_strategy() -> impl Strategy<Value = Json> {
    let scalar = prop_oneof![
        Just(json!({"type": "null"})),
        Just(json!({"type": "boolean"})),
        Just(json!({"type": "integer"})),
        Just(json!({"type": "number"})),
        Just(json!({"type": "string"})),
        Just(json!({"type": ["number", "string"]})),
        Just(json!({"type": "scalar", "subtype": "int", "precision": 4})),
        Just(json!({"type": "ndarray", "subtype": "float", "precision": 8, "shape": [2, 2]})),
        Just(json!({"enum": ["red", "green", "blue"]})),
    ];

    scalar.prop_recursive(3, 10, 3, |inner| {
        prop_oneof![
            proptest::collection::btree_map("[a-z]{1,8}", inner.clone(), 1..4).prop_map(|m| {
                json!({
                    "type": "object",
                    "properties": Json::Object(m.into_iter().collect()),
                })
            }),
            inner
                .clone()
                .prop_map(|items| json!({"type": "array", "items": items})),
            proptest::collection::vec(inner, 1..3)
                .prop_map(|branches| json!({"anyOf": branches})),
        ]
    })
}

proptest! {
    #[test]
    fn prop_comparison_is_reflexive(schema in schema_strategy()) {
        prop_assert!(compare_schemas_bool(&schema, &schema));
    }

    #[test]
    fn prop_generated_schemas_compile(schema in schema_strategy()) {
        prop_assert!(Validator::compile(&schema).is_ok());
    }

    #[test]
    fn prop_inference_is_self_consistent(instance in json_value_strategy()) {
        let value = Value::from_json(&instance);
        let schema = encode_schema(&value);
        let validator = Validator::compile(&schema).unwrap();
        let outcome = validator.validate(&instance);
        prop_assert!(
            outcome.is_valid(),
            "inferred schema {} rejected {}: {:?}",
            schema,
            instance,
            outcome.errors
        );
    }

    #[test]
    fn prop_normalization_is_idempotent(instance in json_value_strategy()) {
        // schemas inferred from plain JSON carry no lossy extended types
        let schema = encode_schema(&Value::from_json(&instance));
        let normalizer = Normalizer::new(&schema).unwrap();
        let once = normalizer.normalize(&instance).unwrap();
        let twice = normalizer.normalize(&once.to_wire()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_validation_never_panics(schema in schema_strategy(), instance in json_value_strategy()) {
        let validator = Validator::compile(&schema).unwrap();
        let _ = validator.validate(&instance);
    }
}
