//! Unit expressions and physical quantities
//!
//! This module handles:
//! - Parsing unit expressions (`kg`, `°C`, `g**2`, `km*s`, `m/s`)
//! - Dimensional compatibility and equality
//! - Quantity conversion and arithmetic
//!
//! A unit expression is a product of factors, each an optionally prefixed
//! unit symbol raised to an integer exponent. Equality compares dimensions
//! and overall scale, so `m == meter` but `m != cm`; compatibility compares
//! dimensions only, so `cm` is compatible with `m` and `hr` with `d`.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::scalar::Scalar;

/// Errors raised by unit parsing, conversion, and quantity arithmetic
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitsError {
    #[error("Failed to parse units '{expression}': {reason}")]
    Parse { expression: String, reason: String },

    #[error("Incompatible units: '{left}' and '{right}'")]
    Incompatible { left: String, right: String },

    #[error("Cannot convert '{units}': {reason}")]
    Conversion { units: String, reason: String },

    #[error("Unsupported quantity operation: {reason}")]
    Unsupported { reason: String },
}

/// Result type for units operations
pub type UnitsResult<T> = std::result::Result<T, UnitsError>;

/// Exponents over the base dimensions: length, mass, time, temperature,
/// amount of substance, electric current, luminous intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions(pub [i8; 7]);

impl Dimensions {
    const LENGTH: Dimensions = Dimensions([1, 0, 0, 0, 0, 0, 0]);
    const MASS: Dimensions = Dimensions([0, 1, 0, 0, 0, 0, 0]);
    const TIME: Dimensions = Dimensions([0, 0, 1, 0, 0, 0, 0]);
    const TEMPERATURE: Dimensions = Dimensions([0, 0, 0, 1, 0, 0, 0]);
    const AMOUNT: Dimensions = Dimensions([0, 0, 0, 0, 1, 0, 0]);
    const NONE: Dimensions = Dimensions([0; 7]);

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|d| *d == 0)
    }

    fn scaled(&self, exponent: i32) -> Dimensions {
        let mut out = [0i8; 7];
        for (o, d) in out.iter_mut().zip(self.0.iter()) {
            *o = (*d as i32 * exponent) as i8;
        }
        Dimensions(out)
    }

    fn add(&self, other: &Dimensions) -> Dimensions {
        let mut out = [0i8; 7];
        for (i, o) in out.iter_mut().enumerate() {
            *o = self.0[i] + other.0[i];
        }
        Dimensions(out)
    }
}

struct UnitDef {
    symbol: &'static str,
    aliases: &'static [&'static str],
    dims: Dimensions,
    /// Scale to the SI coherent unit of its dimension
    scale: f64,
    /// Additive offset to SI (temperatures); applied before scaling checks
    offset: f64,
    prefixable: bool,
}

const UNIT_TABLE: &[UnitDef] = &[
    UnitDef {
        symbol: "m",
        aliases: &["meter", "meters", "metre", "metres"],
        dims: Dimensions::LENGTH,
        scale: 1.0,
        offset: 0.0,
        prefixable: true,
    },
    UnitDef {
        symbol: "g",
        aliases: &["gram", "grams"],
        dims: Dimensions::MASS,
        scale: 1e-3,
        offset: 0.0,
        prefixable: true,
    },
    UnitDef {
        symbol: "s",
        aliases: &["second", "seconds", "sec"],
        dims: Dimensions::TIME,
        scale: 1.0,
        offset: 0.0,
        prefixable: true,
    },
    UnitDef {
        symbol: "min",
        aliases: &["minute", "minutes"],
        dims: Dimensions::TIME,
        scale: 60.0,
        offset: 0.0,
        prefixable: false,
    },
    UnitDef {
        symbol: "hr",
        aliases: &["hour", "hours"],
        dims: Dimensions::TIME,
        scale: 3600.0,
        offset: 0.0,
        prefixable: false,
    },
    UnitDef {
        symbol: "d",
        aliases: &["day", "days"],
        dims: Dimensions::TIME,
        scale: 86400.0,
        offset: 0.0,
        prefixable: false,
    },
    UnitDef {
        symbol: "mol",
        aliases: &["mole", "moles"],
        dims: Dimensions::AMOUNT,
        scale: 1.0,
        offset: 0.0,
        prefixable: true,
    },
    UnitDef {
        symbol: "K",
        aliases: &["kelvin"],
        dims: Dimensions::TEMPERATURE,
        scale: 1.0,
        offset: 0.0,
        prefixable: true,
    },
    UnitDef {
        symbol: "degC",
        aliases: &["°C", "celsius"],
        dims: Dimensions::TEMPERATURE,
        scale: 1.0,
        offset: 273.15,
        prefixable: false,
    },
    UnitDef {
        symbol: "degF",
        aliases: &["°F", "fahrenheit"],
        dims: Dimensions::TEMPERATURE,
        scale: 5.0 / 9.0,
        offset: 255.372222222222,
        prefixable: false,
    },
    UnitDef {
        symbol: "L",
        aliases: &["liter", "liters", "litre", "litres"],
        dims: Dimensions([3, 0, 0, 0, 0, 0, 0]),
        scale: 1e-3,
        offset: 0.0,
        prefixable: true,
    },
];

const PREFIXES: &[(&str, f64)] = &[
    ("da", 1e1),
    ("n", 1e-9),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("m", 1e-3),
    ("c", 1e-2),
    ("d", 1e-1),
    ("h", 1e2),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
];

/// One factor of a unit expression: a (possibly prefixed) symbol with an
/// exponent, e.g. `km` or `g**2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub symbol: String,
    pub exponent: i32,
    dims: Dimensions,
    scale: f64,
    offset: f64,
}

/// A parsed unit expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Units {
    factors: Vec<Factor>,
}

impl Units {
    /// Parse a unit expression. Empty strings and `n/a` are dimensionless.
    pub fn parse(expression: &str) -> UnitsResult<Self> {
        let trimmed = expression.trim();
        if trimmed.is_empty() || trimmed == "n/a" {
            return Ok(Self {
                factors: Vec::new(),
            });
        }

        let mut factors = Vec::new();
        let mut rest = trimmed;
        let mut sign = 1i32;
        loop {
            let (token, exponent, remainder, next_sign) = next_factor(rest, expression)?;
            let (symbol, dims, scale, offset) = resolve_token(token, expression)?;
            factors.push(Factor {
                symbol,
                exponent: exponent * sign,
                dims,
                scale,
                offset,
            });
            match remainder {
                Some(r) => {
                    rest = r;
                    sign = next_sign;
                }
                None => break,
            }
        }
        Ok(Self { factors })
    }

    /// Dimensionless units match anything-free expressions (`""`, `n/a`)
    /// and any expression whose dimensions cancel
    pub fn is_dimensionless(&self) -> bool {
        self.dimensions().is_zero()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.factors
            .iter()
            .fold(Dimensions::NONE, |acc, f| acc.add(&f.dims.scaled(f.exponent)))
    }

    /// Multiplicative factor to the SI coherent unit of this dimension
    pub fn si_scale(&self) -> f64 {
        self.factors
            .iter()
            .map(|f| f.scale.powi(f.exponent))
            .product()
    }

    /// Additive offset to SI; only meaningful for bare temperature units
    fn si_offset(&self) -> f64 {
        match self.factors.as_slice() {
            [f] if f.exponent == 1 => f.offset,
            _ => 0.0,
        }
    }

    /// Same dimensions, any scale: `cm` is compatible with `m`
    pub fn is_compatible(&self, other: &Units) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Factor converting a value in these units to `target` units
    pub fn conversion_factor(&self, target: &Units) -> UnitsResult<(f64, f64)> {
        if !self.is_compatible(target) {
            return Err(UnitsError::Incompatible {
                left: self.to_string(),
                right: target.to_string(),
            });
        }
        let has_offset = self.factors.iter().any(|f| f.offset != 0.0)
            || target.factors.iter().any(|f| f.offset != 0.0);
        if has_offset && (self.factors.len() > 1 || target.factors.len() > 1) {
            return Err(UnitsError::Conversion {
                units: self.to_string(),
                reason: "offset units cannot appear in compound expressions".to_string(),
            });
        }
        // v_si = v * scale + offset; solve for the target representation
        let scale = self.si_scale() / target.si_scale();
        let shift = (self.si_offset() - target.si_offset()) / target.si_scale();
        Ok((scale, shift))
    }

    /// Product of two unit expressions, merging factors with equal symbols
    pub fn multiply(&self, other: &Units) -> Units {
        let mut factors = self.factors.clone();
        for f in &other.factors {
            if let Some(existing) = factors.iter_mut().find(|e| e.symbol == f.symbol) {
                existing.exponent += f.exponent;
            } else {
                factors.push(f.clone());
            }
        }
        factors.retain(|f| f.exponent != 0);
        Units { factors }
    }

    /// Quotient of two unit expressions
    pub fn divide(&self, other: &Units) -> Units {
        let inverted = Units {
            factors: other
                .factors
                .iter()
                .map(|f| Factor {
                    exponent: -f.exponent,
                    ..f.clone()
                })
                .collect(),
        };
        self.multiply(&inverted)
    }

    pub fn powi(&self, exponent: i32) -> Units {
        let mut factors: Vec<Factor> = self
            .factors
            .iter()
            .map(|f| Factor {
                exponent: f.exponent * exponent,
                ..f.clone()
            })
            .collect();
        factors.retain(|f| f.exponent != 0);
        Units { factors }
    }
}

impl PartialEq for Units {
    /// Equal dimensions and equal overall scale: `m == meter`, `m != cm`
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
            && approx_eq(self.si_scale(), other.si_scale())
            && approx_eq(self.si_offset(), other.si_offset())
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return f.write_str("");
        }
        let mut first = true;
        for factor in &self.factors {
            if !first {
                f.write_str("*")?;
            }
            first = false;
            if factor.exponent == 1 {
                write!(f, "{}", factor.symbol)?;
            } else {
                write!(f, "{}**{}", factor.symbol, factor.exponent)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Units {
    type Err = UnitsError;

    fn from_str(s: &str) -> UnitsResult<Self> {
        Units::parse(s)
    }
}

/// A numeric value paired with a unit expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Scalar,
    pub units: Units,
}

impl Quantity {
    pub fn new(value: Scalar, units: Units) -> Self {
        Self { value, units }
    }

    pub fn from_f64(value: f64, units: &str) -> UnitsResult<Self> {
        Ok(Self {
            value: Scalar::from(value),
            units: Units::parse(units)?,
        })
    }

    pub fn from_i64(value: i64, units: &str) -> UnitsResult<Self> {
        Ok(Self {
            value: Scalar::from(value),
            units: Units::parse(units)?,
        })
    }

    pub fn is_dimensionless(&self) -> bool {
        self.units.is_dimensionless()
    }

    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.units.is_compatible(&other.units)
    }

    pub fn is_compatible_units(&self, units: &Units) -> bool {
        self.units.is_compatible(units)
    }

    fn value_f64(&self) -> UnitsResult<f64> {
        self.value.as_f64().ok_or_else(|| UnitsError::Unsupported {
            reason: "complex quantities do not support arithmetic".to_string(),
        })
    }

    /// Convert to compatible target units
    pub fn to(&self, target: &Units) -> UnitsResult<Quantity> {
        let (scale, shift) = self.units.conversion_factor(target)?;
        let converted = self.value_f64()? * scale + shift;
        Ok(Quantity {
            value: self.value.with_value(converted),
            units: target.clone(),
        })
    }

    /// Equal after converting `other` into these units
    pub fn is_equivalent(&self, other: &Quantity) -> bool {
        match other.to(&self.units) {
            Ok(converted) => match (self.value.as_f64(), converted.value.as_f64()) {
                (Some(a), Some(b)) => approx_eq(a, b),
                _ => false,
            },
            Err(_) => false,
        }
    }

    /// Sum, expressed in the left operand's units
    pub fn try_add(&self, other: &Quantity) -> UnitsResult<Quantity> {
        let rhs = other.to(&self.units)?;
        let sum = self.value_f64()? + rhs.value_f64()?;
        Ok(Quantity {
            value: self.value.with_value(sum),
            units: self.units.clone(),
        })
    }

    /// Difference, expressed in the left operand's units
    pub fn try_sub(&self, other: &Quantity) -> UnitsResult<Quantity> {
        let rhs = other.to(&self.units)?;
        let diff = self.value_f64()? - rhs.value_f64()?;
        Ok(Quantity {
            value: self.value.with_value(diff),
            units: self.units.clone(),
        })
    }

    /// Product; compatible operands are converted into the left units first
    /// so `100cm * 0.5m` comes out in `cm**2`
    pub fn try_mul(&self, other: &Quantity) -> UnitsResult<Quantity> {
        let rhs = if self.units.is_compatible(&other.units) && !self.units.is_dimensionless() {
            other.to(&self.units)?
        } else {
            other.clone()
        };
        let product = self.value_f64()? * rhs.value_f64()?;
        Ok(Quantity {
            value: self.value.with_value(product),
            units: self.units.multiply(&rhs.units),
        })
    }

    /// Quotient; compatible operands are converted into the left units first
    pub fn try_div(&self, other: &Quantity) -> UnitsResult<Quantity> {
        let rhs = if self.units.is_compatible(&other.units) && !self.units.is_dimensionless() {
            other.to(&self.units)?
        } else {
            other.clone()
        };
        let quotient = self.value_f64()? / rhs.value_f64()?;
        Ok(Quantity {
            value: self.value.with_value(quotient),
            units: self.units.divide(&rhs.units),
        })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.as_f64() {
            Some(v) => write!(f, "{} {}", v, self.units),
            None => write!(f, "{:?} {}", self.value.data, self.units),
        }
    }
}

/// A typed array paired with a unit expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityArray {
    pub array: crate::scalar::NdArray,
    pub units: Units,
}

impl QuantityArray {
    pub fn new(array: crate::scalar::NdArray, units: Units) -> Self {
        Self { array, units }
    }

    pub fn is_compatible_units(&self, units: &Units) -> bool {
        self.units.is_compatible(units)
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= 1e-9 * scale
}

/// Split the leading factor off a unit expression, returning the token,
/// its exponent, the remainder, and the sign the separator applies to the
/// next factor (`*` keeps it, `/` flips it)
fn next_factor<'a>(
    rest: &'a str,
    expression: &str,
) -> UnitsResult<(&'a str, i32, Option<&'a str>, i32)> {
    let parse_err = |reason: &str| UnitsError::Parse {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    let bytes = rest.as_bytes();
    let mut end = rest.len();
    let mut separator = None;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'*' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            // exponent marker, not a separator
            i += 2;
            continue;
        }
        if bytes[i] == b'*' || bytes[i] == b'/' {
            end = i;
            separator = Some(bytes[i]);
            break;
        }
        i += 1;
    }

    let factor_text = rest[..end].trim();
    if factor_text.is_empty() {
        return Err(parse_err("empty factor"));
    }
    let (token, exponent) = match factor_text.split_once("**") {
        Some((name, exp)) => {
            let exponent: i32 = exp
                .trim()
                .parse()
                .map_err(|_| parse_err("invalid exponent"))?;
            (name.trim(), exponent)
        }
        None => (factor_text, 1),
    };

    match separator {
        Some(sep) => {
            let remainder = rest[end + 1..].trim_start();
            if remainder.is_empty() {
                return Err(parse_err("dangling separator"));
            }
            let sign = if sep == b'/' { -1 } else { 1 };
            Ok((token, exponent, Some(remainder), sign))
        }
        None => Ok((token, exponent, None, 1)),
    }
}

/// Resolve a single token against the unit table, trying exact symbols and
/// aliases before prefix splits
fn resolve_token(token: &str, expression: &str) -> UnitsResult<(String, Dimensions, f64, f64)> {
    for def in UNIT_TABLE {
        if def.symbol == token || def.aliases.contains(&token) {
            return Ok((def.symbol.to_string(), def.dims, def.scale, def.offset));
        }
    }
    for (prefix, prefix_scale) in PREFIXES {
        if let Some(stripped) = token.strip_prefix(prefix) {
            if stripped.is_empty() {
                continue;
            }
            for def in UNIT_TABLE {
                if def.prefixable && (def.symbol == stripped || def.aliases.contains(&stripped)) {
                    return Ok((
                        format!("{}{}", prefix, def.symbol),
                        def.dims,
                        def.scale * prefix_scale,
                        def.offset,
                    ));
                }
            }
        }
    }
    Err(UnitsError::Parse {
        expression: expression.to_string(),
        reason: format!("unknown unit '{}'", token),
    })
}
