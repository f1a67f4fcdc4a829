//! Type registry and descriptor contract
//!
//! Every name usable in a `type` keyword is backed by a [`TypeDescriptor`]
//! registered here. The recursive matcher never hard-codes a type: adding
//! a kind to the vocabulary means registering a descriptor, not touching
//! the walk. Two process-wide registries exist, built once and never
//! mutated afterwards: the *standard* registry holds the JSON Schema
//! primitive names, the *extended* registry adds the domain vocabulary.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde_json::Value as Json;
use std::collections::HashMap;
use std::sync::OnceLock;

use veld_core::Value;

use crate::descriptors;
use crate::error::Result;

/// Contract every type in the vocabulary implements
///
/// `matches` is exact membership of the wire value; the schema fragment is
/// passed through so descriptors can interpret their own keywords
/// (`subtype`, `precision`, `shape`, `units`, `class`) without the
/// recursive core knowing about them. `castable_from` widens acceptance
/// (e.g. any JSON number satisfies a narrower float precision); for the
/// standard primitives it is identical to `matches`. `infer` claims a rich
/// value and emits its minimal schema fragment; `construct` is the
/// inverse, rebuilding the rich value from wire data plus the fragment.
pub trait TypeDescriptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, instance: &Json, schema: &Json) -> bool;

    fn castable_from(&self, instance: &Json, schema: &Json) -> bool {
        self.matches(instance, schema)
    }

    fn infer(&self, _value: &Value) -> Option<Json> {
        None
    }

    fn construct(&self, schema: &Json, raw: &Json) -> Result<Value>;
}

/// Catalogue of named types
pub struct TypeRegistry {
    descriptors: Vec<Box<dyn TypeDescriptor>>,
    index: HashMap<&'static str, usize>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a descriptor; registration order is inference priority
    pub fn register(&mut self, descriptor: Box<dyn TypeDescriptor>) {
        let name = descriptor.name();
        let slot = self.descriptors.len();
        self.descriptors.push(descriptor);
        self.index.insert(name, slot);
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn TypeDescriptor> {
        self.index.get(name).map(|slot| &*self.descriptors[*slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All registered names, sorted for deterministic error messages
    pub fn allowed_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.index.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Classify a rich value: the first descriptor (in registration
    /// order) claiming it wins
    pub fn infer(&self, value: &Value) -> Option<Json> {
        self.descriptors.iter().find_map(|d| d.infer(value))
    }

    /// The process-wide standard registry: JSON Schema primitives only
    pub fn standard() -> &'static TypeRegistry {
        static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = TypeRegistry::new();
            descriptors::register_standard(&mut registry);
            registry
        })
    }

    /// The process-wide extended registry: primitives plus the domain
    /// vocabulary
    pub fn extended() -> &'static TypeRegistry {
        static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = TypeRegistry::new();
            descriptors::register_standard(&mut registry);
            descriptors::register_extended(&mut registry);
            registry
        })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
