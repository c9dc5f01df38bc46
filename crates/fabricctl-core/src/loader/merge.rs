// ── Property-bag merging ──
//
// Corp defaults and user YAML are nested maps. They are deep-merged
// (user wins), flattened with `_` separators, then renamed through a
// field-mapping table flattened the same way.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::model::Scalar;

/// Recursively overlay `overlay` onto `base`. Maps merge key by key;
/// any other value in `overlay` replaces the base value.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            let mut merged: Mapping = b.clone();
            for (key, value) in o {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        (_, Value::Null) => base.clone(),
        _ => overlay.clone(),
    }
}

/// Flatten nested maps into `Parent_Child` keys. Nulls are dropped;
/// sequences of scalars are joined with `,`.
pub fn flatten(value: &Value) -> IndexMap<String, Scalar> {
    let mut out = IndexMap::new();
    flatten_into(value, None, &mut out);
    out
}

fn flatten_into(value: &Value, prefix: Option<&str>, out: &mut IndexMap<String, Scalar>) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = key_string(key) else { continue };
                let full = match prefix {
                    Some(p) => format!("{p}_{key}"),
                    None => key,
                };
                flatten_into(child, Some(&full), out);
            }
        }
        other => {
            if let (Some(key), Some(scalar)) = (prefix, to_scalar(other)) {
                out.insert(key.to_owned(), scalar);
            }
        }
    }
}

/// Flatten a field-mapping table. A null target means "drop this key".
pub fn flatten_mapping(value: &Value) -> IndexMap<String, Option<String>> {
    let mut out = IndexMap::new();
    flatten_mapping_into(value, None, &mut out);
    out
}

fn flatten_mapping_into(
    value: &Value,
    prefix: Option<&str>,
    out: &mut IndexMap<String, Option<String>>,
) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = key_string(key) else { continue };
                let full = match prefix {
                    Some(p) => format!("{p}_{key}"),
                    None => key,
                };
                flatten_mapping_into(child, Some(&full), out);
            }
        }
        Value::Null => {
            if let Some(key) = prefix {
                out.insert(key.to_owned(), None);
            }
        }
        other => {
            if let (Some(key), Some(target)) = (prefix, to_scalar(other)) {
                out.insert(key.to_owned(), Some(target.to_string()));
            }
        }
    }
}

/// Top-level section of a mapping table as `semantic -> wire` pairs.
pub fn section_mapping(table: &Value, section: &str) -> IndexMap<String, String> {
    table
        .get(section)
        .and_then(Value::as_mapping)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| Some((key_string(k)?, to_scalar(v)?.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Top-level section of a defaults table as `semantic -> value` pairs.
pub fn section_values(table: &Value, section: &str) -> IndexMap<String, Scalar> {
    table.get(section).map(scalar_map).unwrap_or_default()
}

/// One level of a mapping as scalars. Nested maps and nulls are skipped.
pub fn scalar_map(value: &Value) -> IndexMap<String, Scalar> {
    value
        .as_mapping()
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| Some((key_string(k)?, to_scalar(v)?)))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn key_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn to_scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(Scalar::Int)
            .or_else(|| n.as_f64().map(Scalar::Float)),
        Value::String(s) => Some(Scalar::Str(s.clone())),
        Value::Sequence(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(to_scalar)
                .map(|s| s.to_string())
                .collect();
            Some(Scalar::Str(parts.join(",")))
        }
        Value::Null | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}
