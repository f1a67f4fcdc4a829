//! Schema tree with `$ref` resolution
//!
//! This module handles:
//! - Intra-document `$ref` resolution (`#/definitions/...` pointers)
//! - Circular reference detection during compilation
//! - Memoization of resolved nodes per compiled schema
//!
//! Resolution happens once, at compile time: the output is a fully
//! inlined document the matcher can walk without ever seeing a `$ref`.
//! A node that resolves back to an ancestor on the current resolution
//! path is a hard schema error, not a validation failure.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde_json::Value as Json;
use std::collections::HashMap;
use tracing::trace;

use crate::error::{Error, Result};
use crate::pointer;

/// Arena over one schema document, resolving `$ref` nodes by pointer path
struct RefArena<'a> {
    document: &'a Json,
    /// Stack of pointer paths currently being resolved
    in_progress: Vec<String>,
    /// Fully resolved targets, keyed by pointer path
    resolved: HashMap<String, Json>,
}

impl<'a> RefArena<'a> {
    fn new(document: &'a Json) -> Self {
        Self {
            document,
            in_progress: Vec::new(),
            resolved: HashMap::new(),
        }
    }

    fn resolve_node(&mut self, node: &Json) -> Result<Json> {
        match node {
            Json::Object(obj) => {
                // only a string-valued $ref is a reference; schemas are
                // objects, so anything else here is plain data (e.g. a
                // property that happens to be named "$ref")
                if let Some(reference) = obj.get("$ref").and_then(Json::as_str) {
                    return self.resolve_reference(reference);
                }
                let mut out = serde_json::Map::new();
                for (key, value) in obj {
                    out.insert(key.clone(), self.resolve_node(value)?);
                }
                Ok(Json::Object(out))
            }
            Json::Array(items) => Ok(Json::Array(
                items
                    .iter()
                    .map(|item| self.resolve_node(item))
                    .collect::<Result<Vec<_>>>()?,
            )),
            _ => Ok(node.clone()),
        }
    }

    fn resolve_reference(&mut self, reference: &str) -> Result<Json> {
        let path = reference
            .strip_prefix('#')
            .ok_or_else(|| Error::Reference {
                reference: reference.to_string(),
                reason: "only intra-document references are supported".to_string(),
            })?;

        if let Some(cached) = self.resolved.get(reference) {
            return Ok(cached.clone());
        }
        if self.in_progress.iter().any(|p| p == reference) {
            let mut chain = self.in_progress.clone();
            chain.push(reference.to_string());
            return Err(Error::CircularReference {
                chain: chain.join(" -> "),
            });
        }

        trace!(reference, "resolving schema reference");
        let target = pointer::lookup(self.document, path).ok_or_else(|| Error::Reference {
            reference: reference.to_string(),
            reason: "target not found".to_string(),
        })?;

        self.in_progress.push(reference.to_string());
        let resolved = self.resolve_node(&target.clone());
        self.in_progress.pop();
        let resolved = resolved?;
        self.resolved.insert(reference.to_string(), resolved.clone());
        Ok(resolved)
    }
}

/// Resolve every `$ref` in a schema document, returning the inlined tree
pub fn resolve_refs(document: &Json) -> Result<Json> {
    RefArena::new(document).resolve_node(document)
}
