//! Class, function, and instance references
//!
//! References name a callable or class in a host runtime as
//! `module:qualname` (e.g. `collections:OrderedDict`). A second, framed
//! wire form wraps base64 chunks between `-REF-` sentinels: a JSON header
//! naming the reference kind, then the encoded `module:qualname` payload.
//! Instances add positional `args` and keyword `kwargs` trees for
//! reconstruction.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;

use crate::error::{Error, Result};

/// Sentinel framing the encoded reference wire form
pub const REF_SENTINEL: &str = "-REF-";

/// A reference to a class in a host runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassRef {
    pub module: String,
    pub name: String,
}

/// A reference to a callable in a host runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    pub module: String,
    pub name: String,
}

/// A class reference plus the construction arguments needed to
/// reinstantiate the object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRef {
    pub class: ClassRef,
    pub args: Vec<Json>,
    pub kwargs: IndexMap<String, Json>,
}

impl ClassRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Parse either the plain `module:qualname` form or the framed form
    pub fn from_wire(wire: &str) -> Result<Self> {
        let (module, name) = parse_ref_string(wire, "class")?;
        Ok(Self { module, name })
    }

    /// The framed sentinel encoding of this reference
    pub fn to_framed(&self) -> String {
        frame("class", &self.to_string())
    }
}

impl FunctionRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn from_wire(wire: &str) -> Result<Self> {
        let (module, name) = parse_ref_string(wire, "function")?;
        Ok(Self { module, name })
    }

    pub fn to_framed(&self) -> String {
        frame("function", &self.to_string())
    }
}

impl InstanceRef {
    /// Parse the `{"class", "args", "kwargs"}` wire object
    pub fn from_wire(wire: &Json) -> Result<Self> {
        let obj = wire
            .as_object()
            .ok_or_else(|| Error::wire("instance object", wire))?;
        let class_wire = obj
            .get("class")
            .and_then(Json::as_str)
            .ok_or_else(|| Error::reference("instance is missing a 'class' string"))?;
        let class = ClassRef::from_wire(class_wire)?;
        let args = match obj.get("args") {
            Some(Json::Array(items)) => items.clone(),
            Some(other) => return Err(Error::wire("args array", other)),
            None => Vec::new(),
        };
        let kwargs = match obj.get("kwargs") {
            Some(Json::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Some(other) => return Err(Error::wire("kwargs object", other)),
            None => IndexMap::new(),
        };
        Ok(Self {
            class,
            args,
            kwargs,
        })
    }

    pub fn to_wire(&self) -> Json {
        serde_json::json!({
            "class": self.class.to_string(),
            "args": self.args,
            "kwargs": self.kwargs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<serde_json::Map<String, Json>>(),
        })
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.name)
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.name)
    }
}

/// Is this string either reference wire form?
pub fn is_ref_string(wire: &str) -> bool {
    if wire.starts_with(REF_SENTINEL) {
        return unframe(wire).is_ok();
    }
    split_plain(wire).is_some()
}

fn parse_ref_string(wire: &str, expected_kind: &str) -> Result<(String, String)> {
    let plain = if wire.starts_with(REF_SENTINEL) {
        let (kind, payload) = unframe(wire)?;
        if kind != expected_kind {
            return Err(Error::reference(format!(
                "expected a {} reference, found '{}'",
                expected_kind, kind
            )));
        }
        payload
    } else {
        wire.to_string()
    };
    split_plain(&plain)
        .map(|(m, n)| (m.to_string(), n.to_string()))
        .ok_or_else(|| {
            Error::reference(format!(
                "'{}' is not a 'module:qualname' reference",
                plain
            ))
        })
}

fn split_plain(wire: &str) -> Option<(&str, &str)> {
    let (module, name) = wire.split_once(':')?;
    let ident = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    };
    (ident(module) && ident(name)).then_some((module, name))
}

fn frame(kind: &str, payload: &str) -> String {
    let header = serde_json::json!({ "type": kind }).to_string();
    format!(
        "{s}{}{s}{}{s}",
        BASE64.encode(header),
        BASE64.encode(payload),
        s = REF_SENTINEL,
    )
}

fn unframe(wire: &str) -> Result<(String, String)> {
    let bad = || Error::reference(format!("malformed framed reference '{}'", wire));
    let mut parts = wire.split(REF_SENTINEL);
    if !parts.next().map_or(false, str::is_empty) {
        return Err(bad());
    }
    let header_b64 = parts.next().ok_or_else(bad)?;
    let payload_b64 = parts.next().ok_or_else(bad)?;
    if !(parts.next().map_or(false, str::is_empty) && parts.next().is_none()) {
        return Err(bad());
    }

    let decode = |chunk: &str| -> Result<String> {
        let bytes = BASE64.decode(chunk).map_err(|e| Error::Encoding {
            message: format!("invalid base64 in framed reference '{}'", wire),
            source: Some(e.into()),
        })?;
        String::from_utf8(bytes).map_err(|e| Error::Encoding {
            message: format!("framed reference '{}' is not UTF-8", wire),
            source: Some(e.into()),
        })
    };

    let header: Json = serde_json::from_str(&decode(header_b64)?).map_err(|e| Error::Encoding {
        message: "framed reference header is not JSON".to_string(),
        source: Some(e.into()),
    })?;
    let kind = header
        .get("type")
        .and_then(Json::as_str)
        .ok_or_else(|| Error::reference("framed reference header is missing 'type'"))?;
    Ok((kind.to_string(), decode(payload_b64)?))
}
