//! Schema compilation and the recursive matcher
//!
//! `Validator::compile` turns a schema document into a reusable
//! [`CompiledValidator`]: references are resolved and memoized, the
//! document is checked against the active metaschema, and every
//! `patternProperties` expression is compiled once. Validation itself is
//! a depth-first walk tracking a JSON Pointer into both trees; ordinary
//! mismatches are collected into the outcome, never thrown. A compiled
//! validator is immutable and safe to share across threads.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use serde_json::Value as Json;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::error::{Error, Result, ValidationError, ValidationOutcome, ValidationWarning};
use crate::loader;
use crate::metaschema;
use crate::pointer::JsonPointer;
use crate::registry::TypeRegistry;
use crate::tree;

/// Knobs for the matcher
#[derive(Debug, Clone, Copy)]
pub struct ValidatorOptions {
    /// Consult `castable_from` after exact membership fails
    pub allow_cast: bool,
    /// Count a property with a `default` as present for `required`;
    /// enabled by the normalizer, which fills that default afterwards
    pub defaults_satisfy_required: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            allow_cast: true,
            defaults_satisfy_required: false,
        }
    }
}

/// Entry points for compiling schema documents
pub struct Validator;

impl Validator {
    /// Compile against the extended vocabulary
    pub fn compile(schema: &Json) -> Result<CompiledValidator> {
        Self::compile_with(schema, TypeRegistry::extended(), ValidatorOptions::default())
    }

    /// Compile against the standards-only vocabulary
    pub fn compile_standard(schema: &Json) -> Result<CompiledValidator> {
        Self::compile_with(schema, TypeRegistry::standard(), ValidatorOptions::default())
    }

    /// Compile JSON schema text against the extended vocabulary
    pub fn from_str(text: &str) -> Result<CompiledValidator> {
        let schema = loader::parse_instance_str(text)?;
        Self::compile(&schema)
    }

    /// Compile a schema file (JSON or YAML, by extension)
    pub fn from_file(path: &std::path::Path) -> Result<CompiledValidator> {
        let schema = loader::parse_schema_file(path)?;
        Self::compile(&schema)
    }

    pub fn compile_with(
        schema: &Json,
        registry: &'static TypeRegistry,
        options: ValidatorOptions,
    ) -> Result<CompiledValidator> {
        let resolved = tree::resolve_refs(schema)?;
        let standard_only = std::ptr::eq(registry, TypeRegistry::standard());
        metaschema::check_schema(&resolved, standard_only).map_err(Error::InvalidSchema)?;
        CompiledValidator::build(resolved, registry, options)
    }

    /// Compile without the metaschema gate; used to bootstrap the
    /// metaschema validators themselves
    pub(crate) fn compile_unchecked(
        schema: &Json,
        registry: &'static TypeRegistry,
    ) -> Result<CompiledValidator> {
        let resolved = tree::resolve_refs(schema)?;
        CompiledValidator::build(resolved, registry, ValidatorOptions::default())
    }
}

/// An immutable, reusable matcher for one schema document
pub struct CompiledValidator {
    schema: Json,
    registry: &'static TypeRegistry,
    options: ValidatorOptions,
    patterns: HashMap<String, Regex>,
}

impl fmt::Debug for CompiledValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledValidator")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .field("patterns", &self.patterns.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl CompiledValidator {
    fn build(
        schema: Json,
        registry: &'static TypeRegistry,
        options: ValidatorOptions,
    ) -> Result<Self> {
        let mut patterns = HashMap::new();
        collect_patterns(&schema, &mut patterns)?;
        debug!(patterns = patterns.len(), "compiled schema");
        Ok(Self {
            schema,
            registry,
            options,
            patterns,
        })
    }

    /// The resolved schema document this validator matches against
    pub fn schema(&self) -> &Json {
        &self.schema
    }

    pub(crate) fn registry(&self) -> &'static TypeRegistry {
        self.registry
    }

    pub(crate) fn options(&self) -> ValidatorOptions {
        self.options
    }

    pub(crate) fn pattern(&self, pattern: &str) -> Option<&Regex> {
        self.patterns.get(pattern)
    }

    /// Check an instance against an arbitrary fragment of this schema;
    /// used by the normalizer to pick `anyOf` branches
    pub(crate) fn validate_fragment(&self, instance: &Json, fragment: &Json) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        self.validate_node(
            instance,
            fragment,
            &JsonPointer::root(),
            &JsonPointer::root(),
            &mut outcome,
        );
        outcome
    }

    /// Check an instance tree; mismatches are collected, never thrown
    pub fn validate(&self, instance: &Json) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        self.validate_node(
            instance,
            &self.schema,
            &JsonPointer::root(),
            &JsonPointer::root(),
            &mut outcome,
        );
        outcome
    }

    /// Parse JSON text and check it; malformed text surfaces as a decode
    /// error from the parsing boundary
    pub fn validate_str(&self, text: &str) -> Result<ValidationOutcome> {
        let instance = loader::parse_instance_str(text)?;
        Ok(self.validate(&instance))
    }

    fn validate_node(
        &self,
        instance: &Json,
        schema: &Json,
        ipath: &JsonPointer,
        spath: &JsonPointer,
        out: &mut ValidationOutcome,
    ) {
        let obj = match schema.as_object() {
            Some(obj) => obj,
            // non-object schema nodes constrain nothing
            None => return,
        };

        if obj.get("deprecated").and_then(Json::as_bool) == Some(true) {
            out.warnings.push(ValidationWarning::new(
                "deprecated",
                format!("'{}' matches a deprecated schema node", ipath),
                ipath,
                spath,
            ));
        }

        if let Some(type_kw) = obj.get("type") {
            if !self.check_type(instance, schema, type_kw, ipath, spath, out) {
                // nothing else is meaningful once the kind is wrong
                return;
            }
        }

        if let Some(allowed) = obj.get("enum").and_then(Json::as_array) {
            if !allowed.iter().any(|candidate| candidate == instance) {
                out.errors.push(ValidationError::new(
                    "enum",
                    format!(
                        "{} is not one of the enumerated values {}",
                        summarize(instance),
                        Json::Array(allowed.clone())
                    ),
                    ipath,
                    spath,
                ));
            }
        }

        if let Some(branches) = obj.get("anyOf").and_then(Json::as_array) {
            self.check_any_of(instance, branches, ipath, spath, out);
        }

        if let Some(branches) = obj.get("allOf").and_then(Json::as_array) {
            for (index, branch) in branches.iter().enumerate() {
                let branch_path = spath.child("allOf").child_index(index);
                self.validate_node(instance, branch, ipath, &branch_path, out);
            }
        }

        if let Some(map) = instance.as_object() {
            self.check_object(map, obj, ipath, spath, out);
        }

        if let Some(items) = instance.as_array() {
            self.check_array(items, obj, ipath, spath, out);
        }
    }

    /// Resolve the `type` keyword; true when membership holds
    fn check_type(
        &self,
        instance: &Json,
        schema: &Json,
        type_kw: &Json,
        ipath: &JsonPointer,
        spath: &JsonPointer,
        out: &mut ValidationOutcome,
    ) -> bool {
        let names: Vec<&str> = match type_kw {
            Json::String(name) => vec![name.as_str()],
            Json::Array(items) => items.iter().filter_map(Json::as_str).collect(),
            _ => Vec::new(),
        };

        let descriptors: Vec<_> = names
            .iter()
            .filter_map(|name| self.registry.lookup(name))
            .collect();
        let mut matched = descriptors.iter().any(|d| d.matches(instance, schema));
        if !matched && self.options.allow_cast {
            matched = descriptors
                .iter()
                .any(|d| d.castable_from(instance, schema));
        }
        if matched {
            return true;
        }

        // the failure message lists every allowed name, sorted, as a
        // JSON-encoded array
        let mut sorted = names.clone();
        sorted.sort_unstable();
        let rendered = Json::Array(sorted.iter().map(|n| Json::String(n.to_string())).collect());
        out.errors.push(ValidationError::new(
            "type",
            format!("{} is not of type {}", summarize(instance), rendered),
            ipath,
            spath,
        ));
        false
    }

    /// Try every alternative; collect all per-branch failures when none
    /// matches, in declaration order
    fn check_any_of(
        &self,
        instance: &Json,
        branches: &[Json],
        ipath: &JsonPointer,
        spath: &JsonPointer,
        out: &mut ValidationOutcome,
    ) {
        let mut collected = Vec::new();
        for (index, branch) in branches.iter().enumerate() {
            let branch_path = spath.child("anyOf").child_index(index);
            let mut branch_out = ValidationOutcome::default();
            self.validate_node(instance, branch, ipath, &branch_path, &mut branch_out);
            if branch_out.errors.is_empty() {
                out.warnings.extend(branch_out.warnings);
                return;
            }
            collected.extend(branch_out.errors);
        }
        out.errors.push(
            ValidationError::new(
                "anyOf",
                "matched none of the alternatives",
                ipath,
                spath,
            )
            .with_sub_errors(collected),
        );
    }

    fn check_object(
        &self,
        map: &serde_json::Map<String, Json>,
        schema: &serde_json::Map<String, Json>,
        ipath: &JsonPointer,
        spath: &JsonPointer,
        out: &mut ValidationOutcome,
    ) {
        let properties = schema.get("properties").and_then(Json::as_object);

        if let Some(properties) = properties {
            for (key, subschema) in properties {
                if let Some(child) = map.get(key) {
                    self.validate_node(
                        child,
                        subschema,
                        &ipath.child(key),
                        &spath.child("properties").child(key),
                        out,
                    );
                }
            }
        }

        if let Some(required) = schema.get("required").and_then(Json::as_array) {
            for name in required.iter().filter_map(Json::as_str) {
                if map.contains_key(name) {
                    continue;
                }
                let has_default = properties
                    .and_then(|p| p.get(name))
                    .map_or(false, |s| s.get("default").is_some());
                if self.options.defaults_satisfy_required && has_default {
                    continue;
                }
                out.errors.push(ValidationError::new(
                    "required",
                    format!("object is missing required property '{}'", name),
                    ipath,
                    &spath.child("required"),
                ));
            }
        }

        let pattern_properties = schema.get("patternProperties").and_then(Json::as_object);
        let additional = schema.get("additionalProperties");

        for (key, child) in map {
            if properties.map_or(false, |p| p.contains_key(key)) {
                continue;
            }
            // unmatched keys are tried against the patterns, in
            // declaration order, before falling through to
            // additionalProperties
            let mut pattern_matched = false;
            if let Some(patterns) = pattern_properties {
                for (pattern, subschema) in patterns {
                    let matched = self
                        .patterns
                        .get(pattern)
                        .map_or(false, |regex| regex.is_match(key));
                    if matched {
                        pattern_matched = true;
                        self.validate_node(
                            child,
                            subschema,
                            &ipath.child(key),
                            &spath.child("patternProperties").child(pattern),
                            out,
                        );
                    }
                }
            }
            if pattern_matched {
                continue;
            }
            match additional {
                Some(Json::Bool(false)) => {
                    out.errors.push(ValidationError::new(
                        "additionalProperties",
                        format!("additional property '{}' is not allowed", key),
                        &ipath.child(key),
                        &spath.child("additionalProperties"),
                    ));
                }
                Some(subschema @ Json::Object(_)) => {
                    self.validate_node(
                        child,
                        subschema,
                        &ipath.child(key),
                        &spath.child("additionalProperties"),
                        out,
                    );
                }
                _ => {}
            }
        }
    }

    fn check_array(
        &self,
        items: &[Json],
        schema: &serde_json::Map<String, Json>,
        ipath: &JsonPointer,
        spath: &JsonPointer,
        out: &mut ValidationOutcome,
    ) {
        match schema.get("items") {
            Some(single @ Json::Object(_)) => {
                for (index, item) in items.iter().enumerate() {
                    self.validate_node(
                        item,
                        single,
                        &ipath.child_index(index),
                        &spath.child("items"),
                        out,
                    );
                }
            }
            Some(Json::Array(positional)) => {
                for (index, (item, subschema)) in items.iter().zip(positional.iter()).enumerate() {
                    self.validate_node(
                        item,
                        subschema,
                        &ipath.child_index(index),
                        &spath.child("items").child_index(index),
                        out,
                    );
                }
                // elements beyond the positional list are unconstrained
                // unless additionalItems forbids or constrains them
                if items.len() > positional.len() {
                    match schema.get("additionalItems") {
                        Some(Json::Bool(false)) => {
                            out.errors.push(ValidationError::new(
                                "additionalItems",
                                format!(
                                    "array has {} elements, the positional list allows {}",
                                    items.len(),
                                    positional.len()
                                ),
                                ipath,
                                &spath.child("additionalItems"),
                            ));
                        }
                        Some(subschema @ Json::Object(_)) => {
                            for (index, item) in items.iter().enumerate().skip(positional.len()) {
                                self.validate_node(
                                    item,
                                    subschema,
                                    &ipath.child_index(index),
                                    &spath.child("additionalItems"),
                                    out,
                                );
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

/// Precompile every patternProperties expression in the document
fn collect_patterns(schema: &Json, patterns: &mut HashMap<String, Regex>) -> Result<()> {
    match schema {
        Json::Object(obj) => {
            if let Some(map) = obj.get("patternProperties").and_then(Json::as_object) {
                for pattern in map.keys() {
                    if !patterns.contains_key(pattern) {
                        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
                            pattern: pattern.clone(),
                            reason: e.to_string(),
                        })?;
                        patterns.insert(pattern.clone(), regex);
                    }
                }
            }
            for value in obj.values() {
                collect_patterns(value, patterns)?;
            }
        }
        Json::Array(items) => {
            for item in items {
                collect_patterns(item, patterns)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// A short JSON rendering of an instance for error messages
fn summarize(instance: &Json) -> String {
    let rendered = instance.to_string();
    if rendered.chars().count() > 60 {
        let truncated: String = rendered.chars().take(57).collect();
        format!("{}...", truncated)
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multi_type_valid() {
        let validator = Validator::compile(&json!({"type": ["number", "string"]})).unwrap();
        assert!(validator.validate(&json!(42)).is_valid());
        assert!(validator
            .validate(&json!("Life, the universe, and everything"))
            .is_valid());
    }

    #[test]
    fn test_multi_type_invalid_detail() {
        let validator = Validator::compile(&json!({"type": ["number", "string"]})).unwrap();
        let outcome = validator.validate(&json!(["Life", "the universe", "and everything"]));
        assert_eq!(outcome.errors.len(), 1);
        let error = &outcome.errors[0];
        assert_eq!(
            error.compact(),
            ("type".to_string(), "#".to_string(), "#".to_string())
        );
        // every allowed name, sorted, as a JSON array
        assert!(error.message.contains(r#"["number","string"]"#));
    }

    #[test]
    fn test_nested_pointer_paths() {
        let validator = Validator::compile(&json!({
            "type": "object",
            "properties": {
                "points": {"type": "array", "items": {"type": "integer"}},
            },
        }))
        .unwrap();
        let outcome = validator.validate(&json!({"points": [1, "two", 3]}));
        assert_eq!(outcome.errors[0].instance_ref, "#/points/1");
        assert_eq!(outcome.errors[0].schema_ref, "#/properties/points/items");
    }

    #[test]
    fn test_pattern_properties() {
        let validator = Validator::compile(&json!({
            "type": "object",
            "patternProperties": {
                "^S_": {"type": "string"},
                "^I_": {"type": "integer"},
            },
            "additionalProperties": false,
        }))
        .unwrap();

        assert!(validator.validate(&json!({"I_0": 23})).is_valid());
        assert!(validator
            .validate(&json!({"S_1": "the quick brown fox jumps over the lazy dog"}))
            .is_valid());

        let mismatch = validator.validate(&json!({"I_2": "A string"}));
        assert_eq!(mismatch.errors[0].kind, "type");
        assert_eq!(mismatch.errors[0].instance_ref, "#/I_2");

        let unmatched = validator.validate(&json!({"keyword": "value"}));
        assert_eq!(unmatched.errors[0].kind, "additionalProperties");
    }

    #[test]
    fn test_required_and_enum() {
        let validator = Validator::compile(&json!({
            "type": "object",
            "properties": {"color": {"enum": ["red", "green"]}},
            "required": ["color"],
        }))
        .unwrap();
        let missing = validator.validate(&json!({}));
        assert_eq!(missing.errors[0].kind, "required");

        let wrong = validator.validate(&json!({"color": "purple"}));
        assert_eq!(wrong.errors[0].kind, "enum");
        assert_eq!(wrong.errors[0].instance_ref, "#/color");
    }

    #[test]
    fn test_any_of_collects_all_branches() {
        let validator = Validator::compile(&json!({
            "anyOf": [
                {"type": "string"},
                {"type": "integer"},
            ],
        }))
        .unwrap();
        assert!(validator.validate(&json!("text")).is_valid());
        assert!(validator.validate(&json!(7)).is_valid());

        let outcome = validator.validate(&json!(null));
        assert_eq!(outcome.errors.len(), 1);
        let error = &outcome.errors[0];
        assert_eq!(error.kind, "anyOf");
        assert_eq!(error.message, "matched none of the alternatives");
        assert_eq!(error.sub_errors.len(), 2);
        assert_eq!(error.sub_errors[0].schema_ref, "#/anyOf/0");
        assert_eq!(error.sub_errors[1].schema_ref, "#/anyOf/1");
    }

    #[test]
    fn test_all_of() {
        let validator = Validator::compile(&json!({
            "allOf": [
                {"type": "object", "required": ["a"]},
                {"type": "object", "required": ["b"]},
            ],
        }))
        .unwrap();
        assert!(validator.validate(&json!({"a": 1, "b": 2})).is_valid());
        let outcome = validator.validate(&json!({"a": 1}));
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, "required");
    }

    #[test]
    fn test_deprecated_warns_but_validates() {
        let validator = Validator::compile(&json!({
            "type": "object",
            "properties": {
                "legacy": {"type": "string", "deprecated": true},
            },
        }))
        .unwrap();
        let outcome = validator.validate(&json!({"legacy": "still here"}));
        assert!(outcome.is_valid());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, "deprecated");
        assert_eq!(outcome.warnings[0].instance_ref, "#/legacy");
    }

    #[test]
    fn test_positional_items() {
        let validator = Validator::compile(&json!({
            "type": "array",
            "items": [{"type": "integer"}, {"type": "string"}],
        }))
        .unwrap();
        assert!(validator.validate(&json!([1, "hello"])).is_valid());
        assert!(validator.validate(&json!([1, "hello", true])).is_valid());

        let outcome = validator.validate(&json!(["hello", 1]));
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].schema_ref, "#/items/0");
    }

    #[test]
    fn test_additional_items_forbidden() {
        let validator = Validator::compile(&json!({
            "type": "array",
            "items": [{"type": "integer"}],
            "additionalItems": false,
        }))
        .unwrap();
        assert!(validator.validate(&json!([1])).is_valid());
        let outcome = validator.validate(&json!([1, 2]));
        assert_eq!(outcome.errors[0].kind, "additionalItems");
    }

    #[test]
    fn test_extended_type_keywords_delegated() {
        let validator = Validator::compile(&json!({
            "type": "ndarray",
            "subtype": "int",
            "precision": 4,
            "shape": [2, 3],
        }))
        .unwrap();
        assert!(validator
            .validate(&json!([[1, 2, 3], [4, 5, 6]]))
            .is_valid());
        let outcome = validator.validate(&json!([[1, 2], [3, 4]]));
        assert_eq!(outcome.errors[0].kind, "type");
    }

    #[test]
    fn test_cast_option() {
        let schema = json!({"type": "scalar", "subtype": "int", "precision": 4});
        let strict = Validator::compile_with(
            &schema,
            TypeRegistry::extended(),
            ValidatorOptions {
                allow_cast: false,
                ..ValidatorOptions::default()
            },
        )
        .unwrap();
        assert!(!strict.validate(&json!(7.0)).is_valid());

        let widened = Validator::compile(&schema).unwrap();
        assert!(widened.validate(&json!(7.0)).is_valid());
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let err = Validator::compile(&json!({"type": 3})).unwrap_err();
        match err {
            Error::InvalidSchema(inner) => {
                assert_eq!(
                    inner.compact(),
                    ("schema".to_string(), "#".to_string(), "#".to_string())
                );
            }
            other => panic!("expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_text_is_decode_error() {
        assert!(matches!(Validator::from_str(""), Err(Error::Decode(_))));
        assert!(matches!(Validator::from_str("\""), Err(Error::Decode(_))));

        let validator = Validator::compile(&json!({"type": "string"})).unwrap();
        assert!(matches!(
            validator.validate_str("{not json"),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_ref_resolution_in_compile() {
        let validator = Validator::compile(&json!({
            "type": "object",
            "properties": {"home": {"$ref": "#/definitions/address"}},
            "definitions": {
                "address": {"type": "object", "required": ["street"]},
            },
        }))
        .unwrap();
        let outcome = validator.validate(&json!({"home": {}}));
        assert_eq!(outcome.errors[0].kind, "required");
        assert_eq!(outcome.errors[0].instance_ref, "#/home");
    }
}
