//! The rich value model
//!
//! `Value` is a tagged union over the JSON tree kinds plus one arm per
//! extended kind. Plain JSON maps onto the first eight arms; normalization
//! produces the extended arms by pairing wire data with schema metadata
//! (subtype, precision, shape, units, class). Every extended arm knows how
//! to render itself back to its wire form, so `to_wire` is total.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::geometry::Mesh;
use crate::refs::{ClassRef, FunctionRef, InstanceRef};
use crate::scalar::{NdArray, Scalar};
use crate::units::{Quantity, QuantityArray};

/// A tree value: JSON kinds plus the extended vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    Scalar(Scalar),
    NdArray(NdArray),
    Quantity(Quantity),
    QuantityArray(QuantityArray),
    Class(ClassRef),
    Function(FunctionRef),
    Instance(InstanceRef),
    Mesh(Mesh),
}

impl Value {
    /// Lift a plain JSON tree; only the first eight arms are produced
    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::Array(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render to the wire form consumed by the JSON layer
    pub fn to_wire(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Bytes(bytes) => Json::String(BASE64.encode(bytes)),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_wire).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_wire()))
                    .collect(),
            ),
            Value::Scalar(s) => s.to_wire(),
            Value::NdArray(a) => a.to_nested(),
            Value::Quantity(q) => q.value.to_wire(),
            Value::QuantityArray(qa) => qa.array.to_nested(),
            Value::Class(c) => Json::String(c.to_string()),
            Value::Function(f) => Json::String(f.to_string()),
            Value::Instance(i) => i.to_wire(),
            Value::Mesh(m) => m.to_value(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Value::from_json(&json)
    }
}
