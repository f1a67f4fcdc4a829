//! JSON Pointer paths
//!
//! Every error location in the engine is a JSON Pointer rooted at `#`:
//! `#` is the document root, `#/a/b/0` a nested property/index path.
//! Segments are escaped per RFC 6901 (`~` as `~0`, `/` as `~1`).
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON Pointer rooted at the document (`#`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// The document root, rendered as `#`
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend with a property-name segment
    pub fn child(&self, segment: impl AsRef<str>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.as_ref().to_string());
        Self { segments }
    }

    /// Extend with an array-index segment
    pub fn child_index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Parse the `#`/`#/a/b` rendering back into a pointer
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix('#')?;
        if rest.is_empty() {
            return Some(Self::root());
        }
        let rest = rest.strip_prefix('/')?;
        let segments = rest
            .split('/')
            .map(|s| s.replace("~1", "/").replace("~0", "~"))
            .collect();
        Some(Self { segments })
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.segments {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// Follow a pointer path (without the `#` prefix handling) through a JSON
/// document, decoding escaped segments
pub fn lookup<'a>(
    document: &'a serde_json::Value,
    pointer: &str,
) -> Option<&'a serde_json::Value> {
    if pointer.is_empty() {
        return Some(document);
    }
    let mut current = document;
    for segment in pointer.split('/').skip(1) {
        let decoded = segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            serde_json::Value::Object(obj) => obj.get(&decoded)?,
            serde_json::Value::Array(arr) => arr.get(decoded.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_display() {
        assert_eq!(JsonPointer::root().to_string(), "#");
    }

    #[test]
    fn test_child_descent() {
        let p = JsonPointer::root().child("a").child("b").child_index(0);
        assert_eq!(p.to_string(), "#/a/b/0");
    }

    #[test]
    fn test_escaping() {
        let p = JsonPointer::root().child("a/b").child("c~d");
        assert_eq!(p.to_string(), "#/a~1b/c~0d");
        assert_eq!(JsonPointer::parse("#/a~1b/c~0d"), Some(p));
    }

    #[test]
    fn test_parse_root() {
        assert_eq!(JsonPointer::parse("#"), Some(JsonPointer::root()));
        assert_eq!(JsonPointer::parse("not-a-pointer"), None);
    }

    #[test]
    fn test_lookup() {
        let doc = json!({"definitions": {"item": {"type": "string"}}, "items": [1, 2, 3]});
        assert_eq!(
            lookup(&doc, "/definitions/item"),
            Some(&json!({"type": "string"}))
        );
        assert_eq!(lookup(&doc, "/items/1"), Some(&json!(2)));
        assert_eq!(lookup(&doc, ""), Some(&doc));
        assert_eq!(lookup(&doc, "/missing"), None);
    }
}
