//! Structural compatibility between two schema documents
//!
//! `compare_schemas(a, b)` walks the keywords the two documents share and
//! stops at the first incompatibility. The contract is subsumption: data
//! valid under `a` must be valid under `b`, so for `type` the allowed-name
//! set of `b` must be a superset of `a`'s, `b` may not require properties
//! `a` does not, and the extended metadata keywords must agree exactly
//! where `b` declares them. Comparing a document against itself always
//! succeeds.
//!
//! Copyright (c) 2026 Veld Team
//! Licensed under the Apache-2.0 license

use serde_json::Value as Json;
use std::collections::BTreeSet;

use crate::error::ComparisonError;
use crate::pointer::JsonPointer;

/// Compare two schema documents; the error names the first incompatible
/// keyword and the paths where the walk stopped
pub fn compare_schemas(a: &Json, b: &Json) -> Result<(), ComparisonError> {
    compare_node(a, b, &JsonPointer::root(), &JsonPointer::root())
}

/// Non-throwing form: true when compatible
pub fn compare_schemas_bool(a: &Json, b: &Json) -> bool {
    compare_schemas(a, b).is_ok()
}

fn type_names(node: &Json) -> Option<BTreeSet<&str>> {
    match node.get("type")? {
        Json::String(name) => Some(BTreeSet::from([name.as_str()])),
        Json::Array(items) => Some(items.iter().filter_map(Json::as_str).collect()),
        _ => None,
    }
}

fn compare_node(
    a: &Json,
    b: &Json,
    pa: &JsonPointer,
    pb: &JsonPointer,
) -> Result<(), ComparisonError> {
    // reflexivity shortcut; also covers identical subtrees
    if a == b {
        return Ok(());
    }
    let (a_obj, b_obj) = match (a.as_object(), b.as_object()) {
        (Some(a_obj), Some(b_obj)) => (a_obj, b_obj),
        _ => return Ok(()),
    };

    match (type_names(a), type_names(b)) {
        (Some(ta), Some(tb)) => {
            if !ta.is_subset(&tb) {
                let missing: Vec<&str> = ta.difference(&tb).copied().collect();
                return Err(ComparisonError::new(
                    "type",
                    format!(
                        "allowed types {:?} are not accepted by the target schema ({:?})",
                        missing,
                        tb.iter().collect::<Vec<_>>()
                    ),
                    pa,
                    pb,
                ));
            }
        }
        (None, Some(tb)) => {
            return Err(ComparisonError::new(
                "type",
                format!(
                    "target schema constrains type to {:?}, source does not",
                    tb.iter().collect::<Vec<_>>()
                ),
                pa,
                pb,
            ));
        }
        _ => {}
    }

    // extended metadata must agree exactly wherever the target declares it
    for keyword in ["subtype", "precision", "shape", "units", "class"] {
        match (a_obj.get(keyword), b_obj.get(keyword)) {
            (Some(va), Some(vb)) if va != vb => {
                return Err(ComparisonError::new(
                    keyword,
                    format!("'{}' differs: {} vs {}", keyword, va, vb),
                    pa,
                    pb,
                ));
            }
            (None, Some(vb)) => {
                return Err(ComparisonError::new(
                    keyword,
                    format!("target schema requires '{}' = {}", keyword, vb),
                    pa,
                    pb,
                ));
            }
            _ => {}
        }
    }

    if let Some(eb) = b_obj.get("enum").and_then(Json::as_array) {
        match a_obj.get("enum").and_then(Json::as_array) {
            Some(ea) => {
                if let Some(extra) = ea.iter().find(|candidate| !eb.contains(candidate)) {
                    return Err(ComparisonError::new(
                        "enum",
                        format!("enumerated value {} is not accepted by the target", extra),
                        pa,
                        pb,
                    ));
                }
            }
            None => {
                return Err(ComparisonError::new(
                    "enum",
                    "target schema enumerates values, source does not",
                    pa,
                    pb,
                ));
            }
        }
    }

    if let Some(rb) = b_obj.get("required").and_then(Json::as_array) {
        let ra: Vec<&str> = a_obj
            .get("required")
            .and_then(Json::as_array)
            .map(|names| names.iter().filter_map(Json::as_str).collect())
            .unwrap_or_default();
        for name in rb.iter().filter_map(Json::as_str) {
            if !ra.contains(&name) {
                return Err(ComparisonError::new(
                    "required",
                    format!("target requires property '{}', source does not", name),
                    pa,
                    pb,
                ));
            }
        }
    }

    if let (Some(props_a), Some(props_b)) = (
        a_obj.get("properties").and_then(Json::as_object),
        b_obj.get("properties").and_then(Json::as_object),
    ) {
        for (key, sub_a) in props_a {
            if let Some(sub_b) = props_b.get(key) {
                compare_node(
                    sub_a,
                    sub_b,
                    &pa.child("properties").child(key),
                    &pb.child("properties").child(key),
                )?;
            }
        }
    }

    match (a_obj.get("items"), b_obj.get("items")) {
        (Some(ia @ Json::Object(_)), Some(ib @ Json::Object(_))) => {
            compare_node(ia, ib, &pa.child("items"), &pb.child("items"))?;
        }
        (Some(Json::Array(la)), Some(Json::Array(lb))) => {
            for (index, (ia, ib)) in la.iter().zip(lb.iter()).enumerate() {
                compare_node(
                    ia,
                    ib,
                    &pa.child("items").child_index(index),
                    &pb.child("items").child_index(index),
                )?;
            }
        }
        (Some(ia @ Json::Object(_)), Some(Json::Array(lb))) => {
            for (index, ib) in lb.iter().enumerate() {
                compare_node(
                    ia,
                    ib,
                    &pa.child("items"),
                    &pb.child("items").child_index(index),
                )?;
            }
        }
        (Some(Json::Array(la)), Some(ib @ Json::Object(_))) => {
            for (index, ia) in la.iter().enumerate() {
                compare_node(
                    ia,
                    ib,
                    &pa.child("items").child_index(index),
                    &pb.child("items"),
                )?;
            }
        }
        _ => {}
    }

    Ok(())
}
