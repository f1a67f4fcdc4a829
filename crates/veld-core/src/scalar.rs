//! Typed numeric scalars and N-dimensional arrays
//!
//! Wire representations are plain JSON: a number for real subtypes, a
//! `{"real", "imag"}` object for complex, and nested row-major arrays for
//! `ndarray`. The subtype and byte precision travel in the schema, not in
//! the wire value.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;

use crate::error::{Error, Result};

/// Numeric subtype of a scalar or array element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    Int,
    Uint,
    Float,
    Complex,
}

impl Subtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subtype::Int => "int",
            Subtype::Uint => "uint",
            Subtype::Float => "float",
            Subtype::Complex => "complex",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Subtype::Int),
            "uint" => Some(Subtype::Uint),
            "float" => Some(Subtype::Float),
            "complex" => Some(Subtype::Complex),
            _ => None,
        }
    }

    /// Precisions (in bytes) valid for this subtype
    pub fn valid_precisions(&self) -> &'static [u8] {
        match self {
            Subtype::Int | Subtype::Uint => &[1, 2, 4, 8],
            Subtype::Float => &[2, 4, 8],
            Subtype::Complex => &[8, 16],
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a typed scalar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarData {
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex { real: f64, imag: f64 },
}

impl ScalarData {
    /// Real-valued view; None for complex payloads
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarData::Int(v) => Some(*v as f64),
            ScalarData::Uint(v) => Some(*v as f64),
            ScalarData::Float(v) => Some(*v),
            ScalarData::Complex { .. } => None,
        }
    }
}

/// A typed numeric scalar: subtype + byte precision + payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scalar {
    pub subtype: Subtype,
    pub precision: u8,
    pub data: ScalarData,
}

impl Scalar {
    pub fn int(value: i64, precision: u8) -> Result<Self> {
        check_precision(Subtype::Int, precision)?;
        if !int_in_range(value, precision) {
            return Err(Error::numeric(format!(
                "{} does not fit a {}-byte signed integer",
                value, precision
            )));
        }
        Ok(Self {
            subtype: Subtype::Int,
            precision,
            data: ScalarData::Int(value),
        })
    }

    pub fn uint(value: u64, precision: u8) -> Result<Self> {
        check_precision(Subtype::Uint, precision)?;
        if !uint_in_range(value, precision) {
            return Err(Error::numeric(format!(
                "{} does not fit a {}-byte unsigned integer",
                value, precision
            )));
        }
        Ok(Self {
            subtype: Subtype::Uint,
            precision,
            data: ScalarData::Uint(value),
        })
    }

    pub fn float(value: f64, precision: u8) -> Result<Self> {
        check_precision(Subtype::Float, precision)?;
        Ok(Self {
            subtype: Subtype::Float,
            precision,
            data: ScalarData::Float(value),
        })
    }

    pub fn complex(real: f64, imag: f64, precision: u8) -> Result<Self> {
        check_precision(Subtype::Complex, precision)?;
        Ok(Self {
            subtype: Subtype::Complex,
            precision,
            data: ScalarData::Complex { real, imag },
        })
    }

    /// Build a scalar from its wire form for a declared subtype/precision
    pub fn from_wire(subtype: Subtype, precision: u8, raw: &Json) -> Result<Self> {
        check_precision(subtype, precision)?;
        match subtype {
            Subtype::Int => {
                let v = raw
                    .as_i64()
                    .or_else(|| raw.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                    .ok_or_else(|| Error::wire("integer", raw))?;
                Scalar::int(v, precision)
            }
            Subtype::Uint => {
                let v = raw
                    .as_u64()
                    .or_else(|| {
                        raw.as_f64()
                            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                            .map(|f| f as u64)
                    })
                    .ok_or_else(|| Error::wire("unsigned integer", raw))?;
                Scalar::uint(v, precision)
            }
            Subtype::Float => {
                let v = raw.as_f64().ok_or_else(|| Error::wire("number", raw))?;
                Scalar::float(v, precision)
            }
            Subtype::Complex => {
                let obj = raw
                    .as_object()
                    .ok_or_else(|| Error::wire("complex object", raw))?;
                let real = obj
                    .get("real")
                    .and_then(Json::as_f64)
                    .ok_or_else(|| Error::numeric("complex value missing 'real'"))?;
                let imag = obj
                    .get("imag")
                    .and_then(Json::as_f64)
                    .ok_or_else(|| Error::numeric("complex value missing 'imag'"))?;
                Scalar::complex(real, imag, precision)
            }
        }
    }

    /// Render the scalar back to its wire form
    pub fn to_wire(&self) -> Json {
        match self.data {
            ScalarData::Int(v) => Json::from(v),
            ScalarData::Uint(v) => Json::from(v),
            ScalarData::Float(v) => serde_json::Number::from_f64(v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            ScalarData::Complex { real, imag } => serde_json::json!({
                "real": real,
                "imag": imag,
            }),
        }
    }

    /// Real-valued view; None for complex scalars
    pub fn as_f64(&self) -> Option<f64> {
        self.data.as_f64()
    }

    /// A new scalar of the same subtype holding `value`, demoting to float
    /// when an integral subtype cannot represent it
    pub fn with_value(&self, value: f64) -> Scalar {
        match self.subtype {
            Subtype::Int if value.fract() == 0.0 && int_in_range(value as i64, self.precision) => {
                Scalar {
                    data: ScalarData::Int(value as i64),
                    ..self.clone()
                }
            }
            Subtype::Uint
                if value.fract() == 0.0
                    && value >= 0.0
                    && uint_in_range(value as u64, self.precision) =>
            {
                Scalar {
                    data: ScalarData::Uint(value as u64),
                    ..self.clone()
                }
            }
            _ => Scalar {
                subtype: Subtype::Float,
                precision: 8,
                data: ScalarData::Float(value),
            },
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar {
            subtype: Subtype::Float,
            precision: 8,
            data: ScalarData::Float(value),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar {
            subtype: Subtype::Int,
            precision: 8,
            data: ScalarData::Int(value),
        }
    }
}

/// Does a raw wire value exactly satisfy the declared subtype/precision?
pub fn wire_matches(subtype: Subtype, precision: Option<u8>, raw: &Json) -> bool {
    match subtype {
        Subtype::Int => match raw.as_i64() {
            Some(v) => precision.map_or(true, |p| int_in_range(v, p)),
            None => false,
        },
        Subtype::Uint => match raw.as_u64() {
            Some(v) => precision.map_or(true, |p| uint_in_range(v, p)),
            None => false,
        },
        Subtype::Float => raw.is_number(),
        Subtype::Complex => raw
            .as_object()
            .map(|o| {
                o.get("real").map_or(false, Json::is_number)
                    && o.get("imag").map_or(false, Json::is_number)
            })
            .unwrap_or(false),
    }
}

/// Does a raw wire value satisfy the subtype after widening casts?
///
/// Any JSON number can be cast into any real subtype as long as it is
/// integral where the subtype demands it; complex accepts real numbers
/// with a zero imaginary part.
pub fn wire_castable(subtype: Subtype, raw: &Json) -> bool {
    match subtype {
        Subtype::Int => raw.as_f64().map_or(false, |f| f.fract() == 0.0),
        Subtype::Uint => raw.as_f64().map_or(false, |f| f.fract() == 0.0 && f >= 0.0),
        Subtype::Float => raw.is_number(),
        Subtype::Complex => raw.is_number() || wire_matches(Subtype::Complex, None, raw),
    }
}

/// A typed N-dimensional array: subtype + precision + shape + flat data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdArray {
    pub subtype: Subtype,
    pub precision: u8,
    pub shape: Vec<usize>,
    pub data: Vec<ScalarData>,
}

impl NdArray {
    /// Build from nested row-major JSON arrays, deriving the shape
    pub fn from_nested(subtype: Subtype, precision: u8, raw: &Json) -> Result<Self> {
        check_precision(subtype, precision)?;
        let shape = nested_shape(raw)?;
        let mut data = Vec::new();
        flatten(subtype, precision, raw, &shape, 0, &mut data)?;
        Ok(Self {
            subtype,
            precision,
            shape,
            data,
        })
    }

    /// Build from nested arrays, enforcing a declared shape
    pub fn from_nested_with_shape(
        subtype: Subtype,
        precision: u8,
        shape: &[usize],
        raw: &Json,
    ) -> Result<Self> {
        let arr = Self::from_nested(subtype, precision, raw)?;
        if arr.shape != shape {
            return Err(Error::Shape {
                expected: shape.to_vec(),
                actual: arr.shape,
            });
        }
        Ok(arr)
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Render back to nested row-major JSON arrays
    pub fn to_nested(&self) -> Json {
        fn build(shape: &[usize], data: &[ScalarData], subtype: Subtype, precision: u8) -> Json {
            if shape.len() <= 1 {
                return Json::Array(
                    data.iter()
                        .map(|d| {
                            Scalar {
                                subtype,
                                precision,
                                data: *d,
                            }
                            .to_wire()
                        })
                        .collect(),
                );
            }
            let stride: usize = shape[1..].iter().product();
            Json::Array(
                data.chunks(stride)
                    .map(|chunk| build(&shape[1..], chunk, subtype, precision))
                    .collect(),
            )
        }
        build(&self.shape, &self.data, self.subtype, self.precision)
    }
}

/// Derive the rectangular shape of nested JSON arrays, rejecting ragged input
pub fn nested_shape(raw: &Json) -> Result<Vec<usize>> {
    let arr = raw.as_array().ok_or_else(|| Error::wire("array", raw))?;
    let mut shape = vec![arr.len()];
    if let Some(first) = arr.first() {
        if first.is_array() {
            let inner = nested_shape(first)?;
            for item in arr.iter().skip(1) {
                let other = nested_shape(item)?;
                if other != inner {
                    return Err(Error::Shape {
                        expected: inner,
                        actual: other,
                    });
                }
            }
            shape.extend(inner);
        }
    }
    Ok(shape)
}

fn flatten(
    subtype: Subtype,
    precision: u8,
    raw: &Json,
    shape: &[usize],
    depth: usize,
    out: &mut Vec<ScalarData>,
) -> Result<()> {
    let arr = raw.as_array().ok_or_else(|| Error::wire("array", raw))?;
    if depth + 1 == shape.len() {
        for item in arr {
            out.push(Scalar::from_wire(subtype, precision, item)?.data);
        }
    } else {
        for item in arr {
            flatten(subtype, precision, item, shape, depth + 1, out)?;
        }
    }
    Ok(())
}

fn check_precision(subtype: Subtype, precision: u8) -> Result<()> {
    if subtype.valid_precisions().contains(&precision) {
        Ok(())
    } else {
        Err(Error::numeric(format!(
            "invalid precision {} for subtype '{}', expected one of {:?}",
            precision,
            subtype,
            subtype.valid_precisions()
        )))
    }
}

fn int_in_range(value: i64, precision: u8) -> bool {
    match precision {
        1 => i8::try_from(value).is_ok(),
        2 => i16::try_from(value).is_ok(),
        4 => i32::try_from(value).is_ok(),
        _ => true,
    }
}

fn uint_in_range(value: u64, precision: u8) -> bool {
    match precision {
        1 => u8::try_from(value).is_ok(),
        2 => u16::try_from(value).is_ok(),
        4 => u32::try_from(value).is_ok(),
        _ => true,
    }
}
