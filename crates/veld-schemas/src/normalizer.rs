//! Validation plus default filling and rich-value reconstruction
//!
//! A [`Normalizer`] wraps a compiled validator. `normalize` first
//! validates; on any error the error propagates unchanged and no partial
//! output is produced. On success a second walk pairs the instance with
//! the schema: absent properties with a `default` are deep-copied in, and
//! extended types are rebuilt through their descriptors' `construct`
//! (nested lists plus `shape`/`subtype`/`precision` become a typed array,
//! a number plus `units` a quantity, a reference string a class or
//! function handle, a mesh dictionary a mesh).
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::debug;

use veld_core::Value;

use crate::error::{Result, ValidationOutcome, ValidationWarning};
use crate::loader;
use crate::registry::TypeRegistry;
use crate::validator::{CompiledValidator, Validator, ValidatorOptions};

/// The outcome of a successful normalization
#[derive(Debug, Clone)]
pub struct Normalized {
    pub value: Value,
    pub warnings: Vec<ValidationWarning>,
}

/// Validates and reconstructs instances against one schema
pub struct Normalizer {
    validator: CompiledValidator,
}

impl Normalizer {
    pub fn new(schema: &Json) -> Result<Self> {
        let options = ValidatorOptions {
            defaults_satisfy_required: true,
            ..ValidatorOptions::default()
        };
        Ok(Self {
            validator: Validator::compile_with(schema, TypeRegistry::extended(), options)?,
        })
    }

    /// Build from JSON schema text
    pub fn from_str(text: &str) -> Result<Self> {
        let schema = loader::parse_instance_str(text)?;
        Self::new(&schema)
    }

    pub fn from_validator(validator: CompiledValidator) -> Self {
        Self { validator }
    }

    /// The side-effect-free first step alone
    pub fn validate(&self, instance: &Json) -> ValidationOutcome {
        self.validator.validate(instance)
    }

    /// Validate, then fill defaults and reconstruct extended values
    pub fn normalize(&self, instance: &Json) -> Result<Value> {
        Ok(self.normalize_full(instance)?.value)
    }

    /// Parse JSON text, then normalize it
    pub fn normalize_str(&self, text: &str) -> Result<Value> {
        let instance = loader::parse_instance_str(text)?;
        self.normalize(&instance)
    }

    /// Like `normalize`, also carrying the warnings from the validation
    /// pass
    pub fn normalize_full(&self, instance: &Json) -> Result<Normalized> {
        let warnings = self.validator.validate(instance).into_result()?;
        debug!(warnings = warnings.len(), "instance validated, normalizing");
        let value = self.normalize_node(instance, self.validator.schema())?;
        Ok(Normalized { value, warnings })
    }

    fn normalize_node(&self, instance: &Json, schema: &Json) -> Result<Value> {
        let obj = match schema.as_object() {
            Some(obj) => obj,
            None => return Ok(Value::from_json(instance)),
        };

        if let Some(type_kw) = obj.get("type") {
            if let Some(name) = self.active_type_name(instance, schema, type_kw) {
                return match name {
                    "object" => self.normalize_object(instance, obj),
                    "array" => self.normalize_array(instance, obj),
                    _ => match self.validator.registry().lookup(name) {
                        Some(descriptor) => descriptor.construct(schema, instance),
                        None => Ok(Value::from_json(instance)),
                    },
                };
            }
            return Ok(Value::from_json(instance));
        }

        if let Some(branches) = obj.get("anyOf").and_then(Json::as_array) {
            // validation already succeeded, so some branch matches; the
            // first one wins, mirroring declaration order
            for branch in branches {
                if self.validator.validate_fragment(instance, branch).is_valid() {
                    return self.normalize_node(instance, branch);
                }
            }
            return Ok(Value::from_json(instance));
        }

        if let Some(branches) = obj.get("allOf").and_then(Json::as_array) {
            return self.normalize_all_of(instance, branches);
        }

        if instance.is_object()
            && (obj.contains_key("properties")
                || obj.contains_key("patternProperties")
                || obj.contains_key("additionalProperties"))
        {
            return self.normalize_object(instance, obj);
        }
        if instance.is_array() && obj.contains_key("items") {
            return self.normalize_array(instance, obj);
        }
        Ok(Value::from_json(instance))
    }

    /// The declared name the instance actually matched, in declaration
    /// order, exact membership before casts
    fn active_type_name<'s>(
        &self,
        instance: &Json,
        schema: &Json,
        type_kw: &'s Json,
    ) -> Option<&'s str> {
        let names: Vec<&str> = match type_kw {
            Json::String(name) => vec![name.as_str()],
            Json::Array(items) => items.iter().filter_map(Json::as_str).collect(),
            _ => Vec::new(),
        };
        let registry = self.validator.registry();
        names
            .iter()
            .find(|name| {
                registry
                    .lookup(name)
                    .map_or(false, |d| d.matches(instance, schema))
            })
            .or_else(|| {
                if !self.validator.options().allow_cast {
                    return None;
                }
                names.iter().find(|name| {
                    registry
                        .lookup(name)
                        .map_or(false, |d| d.castable_from(instance, schema))
                })
            })
            .copied()
    }

    fn normalize_object(
        &self,
        instance: &Json,
        schema: &serde_json::Map<String, Json>,
    ) -> Result<Value> {
        let map = match instance.as_object() {
            Some(map) => map,
            None => return Ok(Value::from_json(instance)),
        };
        let properties = schema.get("properties").and_then(Json::as_object);
        let pattern_properties = schema.get("patternProperties").and_then(Json::as_object);
        let additional = schema.get("additionalProperties").filter(|v| v.is_object());

        let mut out: IndexMap<String, Value> = IndexMap::new();
        for (key, child) in map {
            let subschema = properties
                .and_then(|p| p.get(key))
                .or_else(|| {
                    pattern_properties.and_then(|patterns| {
                        patterns.iter().find_map(|(pattern, subschema)| {
                            self.validator
                                .pattern(pattern)
                                .filter(|regex| regex.is_match(key))
                                .map(|_| subschema)
                        })
                    })
                })
                .or(additional);
            let value = match subschema {
                Some(subschema) => self.normalize_node(child, subschema)?,
                None => Value::from_json(child),
            };
            out.insert(key.clone(), value);
        }

        // absent properties with a default are deep-copied in, normalized
        // through the same subschema so extended defaults reconstruct too
        if let Some(properties) = properties {
            for (key, subschema) in properties {
                if out.contains_key(key) {
                    continue;
                }
                if let Some(default) = subschema.get("default") {
                    out.insert(key.clone(), self.normalize_node(default, subschema)?);
                }
            }
        }

        Ok(Value::Object(out))
    }

    fn normalize_array(
        &self,
        instance: &Json,
        schema: &serde_json::Map<String, Json>,
    ) -> Result<Value> {
        let items = match instance.as_array() {
            Some(items) => items,
            None => return Ok(Value::from_json(instance)),
        };
        let out = match schema.get("items") {
            Some(single @ Json::Object(_)) => items
                .iter()
                .map(|item| self.normalize_node(item, single))
                .collect::<Result<Vec<_>>>()?,
            Some(Json::Array(positional)) => {
                let additional = schema.get("additionalItems").filter(|v| v.is_object());
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| match positional.get(index).or(additional) {
                        Some(subschema) => self.normalize_node(item, subschema),
                        None => Ok(Value::from_json(item)),
                    })
                    .collect::<Result<Vec<_>>>()?
            }
            _ => items.iter().map(Value::from_json).collect(),
        };
        Ok(Value::Array(out))
    }

    /// Every branch applies; object results merge, with earlier branches
    /// winning on key collisions
    fn normalize_all_of(&self, instance: &Json, branches: &[Json]) -> Result<Value> {
        let mut merged: Option<Value> = None;
        for branch in branches {
            let value = self.normalize_node(instance, branch)?;
            merged = Some(match (merged, value) {
                (None, value) => value,
                (Some(Value::Object(mut acc)), Value::Object(next)) => {
                    for (key, value) in next {
                        acc.entry(key).or_insert(value);
                    }
                    Value::Object(acc)
                }
                (Some(existing), _) => existing,
            });
        }
        Ok(merged.unwrap_or_else(|| Value::from_json(instance)))
    }
}
