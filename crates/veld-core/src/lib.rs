//! veld-core - value model and extended-type collaborators
//!
//! This crate holds the data side of the veld schema engine: the rich
//! [`Value`] union, typed numeric scalars and arrays, unit expressions and
//! quantities, class/function/instance references, and mesh geometry. The
//! schema machinery itself (validation, normalization, inference,
//! comparison) lives in `veld-schemas` and consumes these types through
//! their wire forms.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod geometry;
pub mod refs;
pub mod scalar;
pub mod units;
pub mod value;

pub use error::{json_kind, Error, Result};
pub use geometry::{Edge, Face, Mesh, MeshKind, Vertex};
pub use refs::{ClassRef, FunctionRef, InstanceRef, REF_SENTINEL};
pub use scalar::{NdArray, Scalar, ScalarData, Subtype};
pub use units::{Quantity, QuantityArray, Units, UnitsError, UnitsResult};
pub use value::Value;
