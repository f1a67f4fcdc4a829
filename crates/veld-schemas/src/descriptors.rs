//! Built-in type descriptors
//!
//! One descriptor per name in the vocabulary. The standard primitives map
//! straight onto JSON tree kinds. The extended descriptors read their own
//! schema keywords (`subtype`, `precision`, `shape`, `units`, `class`) to
//! decide membership and to rebuild rich values during normalization.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value as Json;

use veld_core::refs::is_ref_string;
use veld_core::scalar::{nested_shape, wire_castable, wire_matches};
use veld_core::{
    ClassRef, FunctionRef, InstanceRef, Mesh, MeshKind, NdArray, Quantity, QuantityArray, Scalar,
    Subtype, Units, Value,
};

use crate::error::{Error, Result};
use crate::registry::{TypeDescriptor, TypeRegistry};

/// Register the JSON Schema primitive descriptors
pub fn register_standard(registry: &mut TypeRegistry) {
    registry.register(Box::new(NullType));
    registry.register(Box::new(BooleanType));
    registry.register(Box::new(IntegerType));
    registry.register(Box::new(NumberType));
    registry.register(Box::new(StringType));
    registry.register(Box::new(ArrayType));
    registry.register(Box::new(ObjectType));
}

/// Register the extended domain descriptors
pub fn register_extended(registry: &mut TypeRegistry) {
    registry.register(Box::new(ScalarType));
    registry.register(Box::new(FixedSubtype(Subtype::Int)));
    registry.register(Box::new(FixedSubtype(Subtype::Uint)));
    registry.register(Box::new(FixedSubtype(Subtype::Float)));
    registry.register(Box::new(FixedSubtype(Subtype::Complex)));
    registry.register(Box::new(NdArrayType { flat: false }));
    registry.register(Box::new(NdArrayType { flat: true }));
    registry.register(Box::new(BytesType));
    registry.register(Box::new(UnicodeType));
    registry.register(Box::new(ClassType));
    registry.register(Box::new(FunctionType));
    registry.register(Box::new(InstanceType));
    registry.register(Box::new(SchemaType));
    registry.register(Box::new(AnyType));
    registry.register(Box::new(MeshType(MeshKind::Ply)));
    registry.register(Box::new(MeshType(MeshKind::Obj)));
}

// Schema fragment keyword readers, shared by the extended descriptors.

fn schema_subtype(schema: &Json) -> Option<Subtype> {
    schema
        .get("subtype")
        .and_then(Json::as_str)
        .and_then(Subtype::parse)
}

fn schema_precision(schema: &Json) -> Option<u8> {
    schema
        .get("precision")
        .and_then(Json::as_u64)
        .and_then(|p| u8::try_from(p).ok())
}

fn schema_shape(schema: &Json) -> Option<Vec<usize>> {
    schema.get("shape").and_then(Json::as_array).map(|dims| {
        dims.iter()
            .filter_map(Json::as_u64)
            .map(|d| d as usize)
            .collect()
    })
}

fn schema_units(schema: &Json) -> Result<Option<Units>> {
    match schema.get("units").and_then(Json::as_str) {
        Some(expression) => {
            let units = Units::parse(expression).map_err(veld_core::Error::from)?;
            Ok(Some(units))
        }
        None => Ok(None),
    }
}

/// Fallback subtype/precision when the schema fragment declares none
fn detect_subtype(raw: &Json) -> (Subtype, u8) {
    if raw.as_i64().is_some() {
        (Subtype::Int, 8)
    } else if raw.as_u64().is_some() {
        (Subtype::Uint, 8)
    } else if raw.is_object() {
        (Subtype::Complex, 16)
    } else {
        (Subtype::Float, 8)
    }
}

fn default_precision(subtype: Subtype) -> u8 {
    match subtype {
        Subtype::Complex => 16,
        _ => 8,
    }
}

fn first_leaf(raw: &Json) -> &Json {
    match raw {
        Json::Array(items) => items.first().map(first_leaf).unwrap_or(raw),
        _ => raw,
    }
}

struct NullType;

impl TypeDescriptor for NullType {
    fn name(&self) -> &'static str {
        "null"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_null()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Null).then(|| serde_json::json!({"type": "null"}))
    }

    fn construct(&self, _schema: &Json, _raw: &Json) -> Result<Value> {
        Ok(Value::Null)
    }
}

struct BooleanType;

impl TypeDescriptor for BooleanType {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_boolean()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Bool(_)).then(|| serde_json::json!({"type": "boolean"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

struct IntegerType;

impl TypeDescriptor for IntegerType {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.as_i64().is_some() || instance.as_u64().is_some()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Int(_)).then(|| serde_json::json!({"type": "integer"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

struct NumberType;

impl TypeDescriptor for NumberType {
    fn name(&self) -> &'static str {
        "number"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_number()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Float(_)).then(|| serde_json::json!({"type": "number"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

struct StringType;

impl TypeDescriptor for StringType {
    fn name(&self) -> &'static str {
        "string"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_string()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::String(_)).then(|| serde_json::json!({"type": "string"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

struct ArrayType;

impl TypeDescriptor for ArrayType {
    fn name(&self) -> &'static str {
        "array"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_array()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        // items enrichment happens in the inferer, which recurses
        matches!(value, Value::Array(_)).then(|| serde_json::json!({"type": "array"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

struct ObjectType;

impl TypeDescriptor for ObjectType {
    fn name(&self) -> &'static str {
        "object"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_object()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Object(_)).then(|| serde_json::json!({"type": "object"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

/// The `scalar` type: subtype and precision come from the schema fragment
struct ScalarType;

impl TypeDescriptor for ScalarType {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn matches(&self, instance: &Json, schema: &Json) -> bool {
        match schema_subtype(schema) {
            Some(subtype) => wire_matches(subtype, schema_precision(schema), instance),
            None => instance.is_number() || wire_matches(Subtype::Complex, None, instance),
        }
    }

    fn castable_from(&self, instance: &Json, schema: &Json) -> bool {
        match schema_subtype(schema) {
            Some(subtype) => wire_castable(subtype, instance),
            None => instance.is_number() || wire_matches(Subtype::Complex, None, instance),
        }
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        match value {
            // 8-byte floats are exactly the JSON number representation
            Value::Scalar(s) if s.subtype == Subtype::Float && s.precision == 8 => {
                Some(serde_json::json!({"type": "number"}))
            }
            Value::Scalar(s) => Some(serde_json::json!({
                "type": "scalar",
                "subtype": s.subtype.as_str(),
                "precision": s.precision,
            })),
            Value::Quantity(q) => Some(serde_json::json!({
                "type": "scalar",
                "subtype": q.value.subtype.as_str(),
                "precision": q.value.precision,
                "units": q.units.to_string(),
            })),
            _ => None,
        }
    }

    fn construct(&self, schema: &Json, raw: &Json) -> Result<Value> {
        construct_scalar(schema_subtype(schema), schema, raw)
    }
}

/// The `int`/`uint`/`float`/`complex` shorthand type names
struct FixedSubtype(Subtype);

impl TypeDescriptor for FixedSubtype {
    fn name(&self) -> &'static str {
        self.0.as_str()
    }

    fn matches(&self, instance: &Json, schema: &Json) -> bool {
        wire_matches(self.0, schema_precision(schema), instance)
    }

    fn castable_from(&self, instance: &Json, _schema: &Json) -> bool {
        wire_castable(self.0, instance)
    }

    fn construct(&self, schema: &Json, raw: &Json) -> Result<Value> {
        construct_scalar(Some(self.0), schema, raw)
    }
}

fn construct_scalar(subtype: Option<Subtype>, schema: &Json, raw: &Json) -> Result<Value> {
    let (subtype, detected_precision) = match subtype {
        Some(subtype) => (subtype, default_precision(subtype)),
        None => detect_subtype(raw),
    };
    let precision = schema_precision(schema).unwrap_or(detected_precision);
    let scalar = Scalar::from_wire(subtype, precision, raw).map_err(Error::Core)?;
    match schema_units(schema)? {
        Some(units) => Ok(Value::Quantity(Quantity::new(scalar, units))),
        None => Ok(Value::Scalar(scalar)),
    }
}

/// The `ndarray` and `1darray` types; `flat` restricts rank to one
struct NdArrayType {
    flat: bool,
}

impl TypeDescriptor for NdArrayType {
    fn name(&self) -> &'static str {
        if self.flat {
            "1darray"
        } else {
            "ndarray"
        }
    }

    fn matches(&self, instance: &Json, schema: &Json) -> bool {
        let shape = match nested_shape(instance) {
            Ok(shape) => shape,
            Err(_) => return false,
        };
        if self.flat && shape.len() != 1 {
            return false;
        }
        if let Some(declared) = schema_shape(schema) {
            if shape != declared {
                return false;
            }
        }
        let leaf_check = |check: &dyn Fn(&Json) -> bool| every_leaf(instance, check);
        match schema_subtype(schema) {
            Some(subtype) => {
                let precision = schema_precision(schema);
                leaf_check(&|leaf| wire_matches(subtype, precision, leaf))
            }
            None => leaf_check(&|leaf| {
                leaf.is_number() || wire_matches(Subtype::Complex, None, leaf)
            }),
        }
    }

    fn castable_from(&self, instance: &Json, schema: &Json) -> bool {
        let shape = match nested_shape(instance) {
            Ok(shape) => shape,
            Err(_) => return false,
        };
        if self.flat && shape.len() != 1 {
            return false;
        }
        if let Some(declared) = schema_shape(schema) {
            if shape != declared {
                return false;
            }
        }
        match schema_subtype(schema) {
            Some(subtype) => every_leaf(instance, &|leaf| wire_castable(subtype, leaf)),
            None => every_leaf(instance, &Json::is_number),
        }
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        if self.flat {
            return None;
        }
        match value {
            Value::NdArray(a) => Some(serde_json::json!({
                "type": "ndarray",
                "shape": a.shape,
                "subtype": a.subtype.as_str(),
                "precision": a.precision,
            })),
            Value::QuantityArray(qa) => Some(serde_json::json!({
                "type": "ndarray",
                "shape": qa.array.shape,
                "subtype": qa.array.subtype.as_str(),
                "precision": qa.array.precision,
                "units": qa.units.to_string(),
            })),
            _ => None,
        }
    }

    fn construct(&self, schema: &Json, raw: &Json) -> Result<Value> {
        let (subtype, detected_precision) = match schema_subtype(schema) {
            Some(subtype) => (subtype, default_precision(subtype)),
            None => detect_subtype(first_leaf(raw)),
        };
        let precision = schema_precision(schema).unwrap_or(detected_precision);
        let array = match schema_shape(schema) {
            Some(shape) => NdArray::from_nested_with_shape(subtype, precision, &shape, raw),
            None => NdArray::from_nested(subtype, precision, raw),
        }
        .map_err(Error::Core)?;
        if self.flat && array.ndim() != 1 {
            return Err(Error::Core(veld_core::Error::Shape {
                expected: vec![array.len()],
                actual: array.shape,
            }));
        }
        match schema_units(schema)? {
            Some(units) => Ok(Value::QuantityArray(QuantityArray::new(array, units))),
            None => Ok(Value::NdArray(array)),
        }
    }
}

fn every_leaf(raw: &Json, check: &dyn Fn(&Json) -> bool) -> bool {
    match raw {
        Json::Array(items) => items.iter().all(|item| every_leaf(item, check)),
        leaf => check(leaf),
    }
}

struct BytesType;

impl TypeDescriptor for BytesType {
    fn name(&self) -> &'static str {
        "bytes"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance
            .as_str()
            .map(|s| BASE64.decode(s).is_ok())
            .unwrap_or(false)
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Bytes(_)).then(|| serde_json::json!({"type": "bytes"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        let text = raw
            .as_str()
            .ok_or_else(|| veld_core::Error::wire("base64 string", raw))
            .map_err(Error::Core)?;
        let bytes = BASE64.decode(text).map_err(|e| {
            Error::Core(veld_core::Error::Encoding {
                message: "bytes value is not valid base64".to_string(),
                source: Some(e.into()),
            })
        })?;
        Ok(Value::Bytes(bytes))
    }
}

struct UnicodeType;

impl TypeDescriptor for UnicodeType {
    fn name(&self) -> &'static str {
        "unicode"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_string()
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

/// Schema `class` keyword: a single reference string or a list of
/// acceptable reference strings
fn class_keyword_allows(schema: &Json, actual: &str) -> bool {
    let allowed = match schema.get("class") {
        None => return true,
        Some(Json::String(s)) => vec![s.as_str()],
        Some(Json::Array(items)) => items.iter().filter_map(Json::as_str).collect(),
        Some(_) => return false,
    };
    let actual_ref = match ClassRef::from_wire(actual) {
        Ok(r) => r,
        Err(_) => return false,
    };
    allowed
        .iter()
        .any(|candidate| ClassRef::from_wire(candidate).map_or(false, |r| r == actual_ref))
}

struct ClassType;

impl TypeDescriptor for ClassType {
    fn name(&self) -> &'static str {
        "class"
    }

    fn matches(&self, instance: &Json, schema: &Json) -> bool {
        instance
            .as_str()
            .map(|s| is_ref_string(s) && class_keyword_allows(schema, s))
            .unwrap_or(false)
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Class(_)).then(|| serde_json::json!({"type": "class"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        let text = raw
            .as_str()
            .ok_or_else(|| veld_core::Error::wire("class reference string", raw))
            .map_err(Error::Core)?;
        Ok(Value::Class(ClassRef::from_wire(text).map_err(Error::Core)?))
    }
}

struct FunctionType;

impl TypeDescriptor for FunctionType {
    fn name(&self) -> &'static str {
        "function"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.as_str().map(is_ref_string).unwrap_or(false)
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Function(_)).then(|| serde_json::json!({"type": "function"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        let text = raw
            .as_str()
            .ok_or_else(|| veld_core::Error::wire("function reference string", raw))
            .map_err(Error::Core)?;
        Ok(Value::Function(
            FunctionRef::from_wire(text).map_err(Error::Core)?,
        ))
    }
}

struct InstanceType;

impl TypeDescriptor for InstanceType {
    fn name(&self) -> &'static str {
        "instance"
    }

    fn matches(&self, instance: &Json, schema: &Json) -> bool {
        if InstanceRef::from_wire(instance).is_err() {
            return false;
        }
        instance
            .get("class")
            .and_then(Json::as_str)
            .map(|actual| class_keyword_allows(schema, actual))
            .unwrap_or(false)
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        matches!(value, Value::Instance(_)).then(|| serde_json::json!({"type": "instance"}))
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::Instance(
            InstanceRef::from_wire(raw).map_err(Error::Core)?,
        ))
    }
}

/// The `schema` type: a document that is itself a valid extended schema
struct SchemaType;

impl TypeDescriptor for SchemaType {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        instance.is_object() && crate::metaschema::check_schema(instance, false).is_ok()
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

struct AnyType;

impl TypeDescriptor for AnyType {
    fn name(&self) -> &'static str {
        "any"
    }

    fn matches(&self, _instance: &Json, _schema: &Json) -> bool {
        true
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::from_json(raw))
    }
}

/// The `ply` and `obj` mesh types
struct MeshType(MeshKind);

impl TypeDescriptor for MeshType {
    fn name(&self) -> &'static str {
        self.0.type_name()
    }

    fn matches(&self, instance: &Json, _schema: &Json) -> bool {
        Mesh::from_value(self.0, instance).is_ok()
    }

    fn infer(&self, value: &Value) -> Option<Json> {
        match value {
            Value::Mesh(mesh) if mesh.kind == self.0 => {
                Some(serde_json::json!({"type": self.0.type_name()}))
            }
            _ => None,
        }
    }

    fn construct(&self, _schema: &Json, raw: &Json) -> Result<Value> {
        Ok(Value::Mesh(
            Mesh::from_value(self.0, raw).map_err(Error::Core)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str) -> &'static dyn TypeDescriptor {
        TypeRegistry::extended()
            .lookup(name)
            .unwrap_or_else(|| panic!("descriptor {} not registered", name))
    }

    #[test]
    fn test_scalar_matching() {
        let schema = json!({"type": "scalar", "subtype": "int", "precision": 1});
        let d = descriptor("scalar");
        assert!(d.matches(&json!(23), &schema));
        assert!(!d.matches(&json!(1000), &schema));
        assert!(!d.matches(&json!(23.5), &schema));
        assert!(d.castable_from(&json!(23.0), &schema));
    }

    #[test]
    fn test_scalar_construct_with_units() {
        let schema = json!({"type": "scalar", "subtype": "float", "precision": 8, "units": "cm"});
        let d = descriptor("scalar");
        match d.construct(&schema, &json!(2.5)).unwrap() {
            Value::Quantity(q) => {
                assert_eq!(q.value.as_f64(), Some(2.5));
                assert_eq!(q.units.to_string(), "cm");
            }
            other => panic!("expected quantity, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_subtype_construct() {
        let d = descriptor("uint");
        match d.construct(&json!({"type": "uint", "precision": 2}), &json!(300)).unwrap() {
            Value::Scalar(s) => {
                assert_eq!(s.subtype, Subtype::Uint);
                assert_eq!(s.precision, 2);
            }
            other => panic!("expected scalar, got {:?}", other),
        }
        assert!(d
            .construct(&json!({"type": "uint", "precision": 2}), &json!(-1))
            .is_err());
    }

    #[test]
    fn test_ndarray_matching() {
        let d = descriptor("ndarray");
        let schema = json!({"type": "ndarray", "subtype": "float", "precision": 8, "shape": [2, 2]});
        assert!(d.matches(&json!([[1.0, 2.0], [3.0, 4.0]]), &schema));
        assert!(!d.matches(&json!([[1.0, 2.0]]), &schema));
        assert!(!d.matches(&json!([1.0, 2.0, 3.0, 4.0]), &schema));
    }

    #[test]
    fn test_1darray_rank() {
        let d = descriptor("1darray");
        let schema = json!({"type": "1darray", "subtype": "int", "precision": 4});
        assert!(d.matches(&json!([1, 2, 3]), &schema));
        assert!(!d.matches(&json!([[1], [2]]), &schema));
    }

    #[test]
    fn test_complex_wire() {
        let d = descriptor("complex");
        let schema = json!({"type": "complex"});
        assert!(d.matches(&json!({"real": 1.0, "imag": 2.0}), &schema));
        match d.construct(&schema, &json!({"real": 1.0, "imag": 2.0})).unwrap() {
            Value::Scalar(s) => assert_eq!(s.precision, 16),
            other => panic!("expected scalar, got {:?}", other),
        }
    }

    #[test]
    fn test_class_keyword() {
        let d = descriptor("class");
        let schema = json!({"type": "class", "class": "collections:OrderedDict"});
        assert!(d.matches(&json!("collections:OrderedDict"), &schema));
        assert!(!d.matches(&json!("collections:Counter"), &schema));
        assert!(d.matches(&json!("collections:Counter"), &json!({"type": "class"})));
    }

    #[test]
    fn test_instance_wire() {
        let d = descriptor("instance");
        let wire = json!({"class": "m:Klass", "args": [1], "kwargs": {}});
        assert!(d.matches(&wire, &json!({"type": "instance"})));
        assert!(!d.matches(&json!({"args": []}), &json!({"type": "instance"})));
        match d.construct(&json!({"type": "instance"}), &wire).unwrap() {
            Value::Instance(i) => assert_eq!(i.class.to_string(), "m:Klass"),
            other => panic!("expected instance, got {:?}", other),
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let d = descriptor("bytes");
        assert!(d.matches(&json!("aGVsbG8="), &json!({"type": "bytes"})));
        assert!(!d.matches(&json!("not base64!!"), &json!({"type": "bytes"})));
        match d.construct(&json!({"type": "bytes"}), &json!("aGVsbG8=")).unwrap() {
            Value::Bytes(b) => assert_eq!(b, b"hello"),
            other => panic!("expected bytes, got {:?}", other),
        }
    }

    #[test]
    fn test_any_matches_everything() {
        let d = descriptor("any");
        for instance in [json!(null), json!(3), json!("x"), json!([1]), json!({"a": 1})] {
            assert!(d.matches(&instance, &json!({"type": "any"})));
        }
    }

    #[test]
    fn test_mesh_descriptor() {
        let d = descriptor("ply");
        let wire = json!({
            "vertices": [
                {"x": 0.0, "y": 0.0, "z": 0.0},
                {"x": 1.0, "y": 0.0, "z": 0.0},
                {"x": 0.0, "y": 1.0, "z": 0.0},
            ],
            "faces": [{"vertex_index": [0, 1, 2]}],
        });
        assert!(d.matches(&wire, &json!({"type": "ply"})));
        assert!(matches!(
            d.construct(&json!({"type": "ply"}), &wire).unwrap(),
            Value::Mesh(_)
        ));
    }
}
