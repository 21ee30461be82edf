//! Equality and formatting rules for raw plan values.

use serde_json::Value;

/// Null, `""`, `{}` and `[]` all mean "nothing here".
pub fn is_effectively_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Absent keys compare like explicit nulls.
pub(crate) fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Deep equality where every empty representation equals every other one.
///
/// Maps compare key by key with missing keys treated as null, so
/// `{"a": ""}` equals `{}`. Numbers compare by value.
pub fn effectively_equal(before: &Value, after: &Value) -> bool {
    if is_effectively_empty(before) && is_effectively_empty(after) {
        return true;
    }
    match (before, after) {
        (Value::Object(b), Value::Object(a)) => b
            .keys()
            .chain(a.keys())
            .all(|k| effectively_equal_opt(b.get(k), a.get(k))),
        (Value::Array(b), Value::Array(a)) => {
            b.len() == a.len() && b.iter().zip(a).all(|(x, y)| effectively_equal(x, y))
        }
        (Value::Number(b), Value::Number(a)) => match (b.as_f64(), a.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => b == a,
        },
        _ => before == after,
    }
}

/// [`effectively_equal`] over optional sides, absent meaning null.
pub(crate) fn effectively_equal_opt(before: Option<&Value>, after: Option<&Value>) -> bool {
    effectively_equal(before.unwrap_or(&Value::Null), after.unwrap_or(&Value::Null))
}

/// True if any leaf of an `after_unknown` subtree is `true`.
pub fn contains_unknown(marker: &Value) -> bool {
    match marker {
        Value::Bool(b) => *b,
        Value::Array(items) => items.iter().any(contains_unknown),
        Value::Object(map) => map.values().any(contains_unknown),
        _ => false,
    }
}

/// Mappings and lists of mappings are shown as blocks rather than attributes.
pub(crate) fn is_block_like(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

/// Compact rendering used on attribute lines: strings quoted, null as `null`,
/// containers as compact JSON.
pub fn format_value(value: &Value) -> String {
    value.to_string()
}

pub(crate) fn format_opt(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), format_value)
}
