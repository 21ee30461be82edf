//! Recursive attribute diff.
//!
//! Every function here returns candidate lines instead of writing into a
//! parent, so a nested block can be inspected and dropped when it turns out
//! to hold nothing but unchanged values.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::value::{
    contains_unknown, effectively_equal_opt, format_opt, format_value, is_absent,
    is_block_like, is_effectively_empty,
};
use crate::plan::{Change, ChangeType};
use crate::tree::NodeDraft;

pub(crate) const KNOWN_AFTER_APPLY: &str = "(known after apply)";

static NULL: Value = Value::Null;

/// Candidate children of one block plus the tallies of what was left out.
#[derive(Debug, Default)]
pub(crate) struct BlockBody {
    pub lines: Vec<NodeDraft>,
    /// Number of visible changes (a nested block counts once).
    pub changes: usize,
    pub hidden_attributes: usize,
    pub hidden_blocks: usize,
    pub hidden_elements: usize,
}

impl BlockBody {
    fn change(&mut self, lines: impl IntoIterator<Item = NodeDraft>) {
        let before = self.lines.len();
        self.lines.extend(lines);
        if self.lines.len() > before {
            self.changes += 1;
        }
    }

    /// Equal pairs count as a hidden block only when both sides are blocks;
    /// a mapping compared against null or a scalar stays an attribute.
    fn hide(&mut self, before: Option<&Value>, after: Option<&Value>) {
        if before.is_some_and(is_block_like) && after.is_some_and(is_block_like) {
            self.hidden_blocks += 1;
        } else {
            self.hidden_attributes += 1;
        }
    }

    /// Append one comment per non-zero tally and return the lines.
    pub fn finish(mut self) -> Vec<NodeDraft> {
        for (count, noun) in [
            (self.hidden_attributes, "attribute"),
            (self.hidden_blocks, "block"),
            (self.hidden_elements, "element"),
        ] {
            if count > 0 {
                self.lines.push(NodeDraft::comment(hidden_tally(count, noun)));
            }
        }
        self.lines
    }
}

pub(crate) fn hidden_tally(count: usize, noun: &str) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("# ({count} unchanged {noun}{plural} hidden)")
}

/// Lines for the body of a resource block.
pub(crate) fn resource_body(change_type: &ChangeType, change: &Change) -> BlockBody {
    match change_type {
        ChangeType::Create => forced_body(&change.after, &change.after_unknown, ChangeType::Create),
        ChangeType::Destroy => forced_body(&change.before, &NULL, ChangeType::Destroy),
        _ => diff_object(&change.before, &change.after, &change.after_unknown),
    }
}

fn leaf(change_type: ChangeType, key: &str, value: &str) -> NodeDraft {
    let text = format!("{} {key} = {value}", change_type.prefix());
    NodeDraft::attribute(change_type, text)
}

fn element(change_type: ChangeType, value: &str) -> NodeDraft {
    let text = format!("{} {value},", change_type.prefix());
    NodeDraft::attribute(change_type, text)
}

fn block_lines(change_type: ChangeType, label: &str, children: Vec<NodeDraft>) -> Vec<NodeDraft> {
    let text = format!("{} {label} {{", change_type.prefix());
    vec![NodeDraft::block(change_type, text, children), NodeDraft::closing("}")]
}

fn list_lines(change_type: ChangeType, key: &str, children: Vec<NodeDraft>) -> Vec<NodeDraft> {
    let text = format!("{} {key} = [", change_type.prefix());
    vec![NodeDraft::block(change_type, text, children), NodeDraft::closing("]")]
}

fn object_of<'a>(value: &'a Value, side: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            tracing::warn!("ignoring non-object {side} value {other}");
            None
        }
    }
}

/// Sorted union of the keys on both sides and the keys marked unknown.
fn union_keys<'a>(
    before: &'a Map<String, Value>,
    after: &'a Map<String, Value>,
    unknown: &'a Value,
) -> BTreeSet<&'a str> {
    let marked = unknown
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(_, marker)| contains_unknown(marker))
        .map(|(k, _)| k);
    before
        .keys()
        .chain(after.keys())
        .chain(marked)
        .map(String::as_str)
        .collect()
}

pub(crate) fn diff_object(before: &Value, after: &Value, unknown: &Value) -> BlockBody {
    let empty = Map::new();
    let b = object_of(before, "before").unwrap_or(&empty);
    let a = object_of(after, "after").unwrap_or(&empty);
    let mut body = BlockBody::default();
    for key in union_keys(b, a, unknown) {
        let marker = unknown.get(key).unwrap_or(&NULL);
        diff_entry(&mut body, key, b.get(key), a.get(key), marker);
    }
    body
}

fn diff_entry(
    body: &mut BlockBody,
    key: &str,
    before: Option<&Value>,
    after: Option<&Value>,
    unknown: &Value,
) {
    if *unknown == Value::Bool(true) {
        let line = if is_absent(before) || before.is_some_and(is_effectively_empty) {
            leaf(ChangeType::Create, key, KNOWN_AFTER_APPLY)
        } else {
            let text = format!("{} -> {KNOWN_AFTER_APPLY}", format_opt(before));
            leaf(ChangeType::Update, key, &text)
        };
        body.change([line]);
        return;
    }
    if effectively_equal_opt(before, after) && !contains_unknown(unknown) {
        body.hide(before, after);
        return;
    }
    match (before, after) {
        _ if is_absent(before) && is_absent(after) => {
            body.change([leaf(ChangeType::Create, key, KNOWN_AFTER_APPLY)]);
        }
        (_, Some(after)) if is_absent(before) => {
            body.change(forced_entry(key, after, unknown, ChangeType::Create));
        }
        (Some(before), _) if is_absent(after) => {
            body.change(forced_entry(key, before, &NULL, ChangeType::Destroy));
        }
        (Some(b @ Value::Object(_)), Some(a @ Value::Object(_))) => {
            let nested = diff_object(b, a, unknown);
            if nested.changes == 0 {
                body.hidden_blocks += 1;
            } else {
                body.change(block_lines(ChangeType::Update, key, nested.finish()));
            }
        }
        (Some(Value::Array(b)), Some(Value::Array(a))) => diff_list(body, key, b, a, unknown),
        _ => {
            let text = format!("{} -> {}", format_opt(before), format_opt(after));
            body.change([leaf(ChangeType::Update, key, &text)]);
        }
    }
}

/// Positional list diff. Lists holding mappings turn into sibling `key[i]`
/// blocks; scalar lists become one `key = [` block.
fn diff_list(body: &mut BlockBody, key: &str, before: &[Value], after: &[Value], unknown: &Value) {
    let len = before.len().max(after.len());
    if before.iter().chain(after).any(Value::is_object) {
        for i in 0..len {
            let marker = unknown.get(i).unwrap_or(&NULL);
            diff_entry(body, &format!("{key}[{i}]"), before.get(i), after.get(i), marker);
        }
        return;
    }

    let mut items = BlockBody::default();
    for i in 0..len {
        let (b, a) = (before.get(i), after.get(i));
        let marker = unknown.get(i).unwrap_or(&NULL);
        let line = if *marker == Value::Bool(true) {
            match b {
                Some(b) if !b.is_null() => {
                    element(ChangeType::Update, &format!("{} -> {KNOWN_AFTER_APPLY}", format_value(b)))
                }
                _ => element(ChangeType::Create, KNOWN_AFTER_APPLY),
            }
        } else if effectively_equal_opt(b, a) && !contains_unknown(marker) {
            items.hidden_elements += 1;
            continue;
        } else {
            match (b, a) {
                (None, Some(a)) => element(ChangeType::Create, &format_value(a)),
                (Some(b), None) => element(ChangeType::Destroy, &format_value(b)),
                _ => element(
                    ChangeType::Update,
                    &format!("{} -> {}", format_opt(b), format_opt(a)),
                ),
            }
        };
        items.change([line]);
    }

    if items.changes == 0 {
        body.hidden_attributes += 1;
    } else {
        body.change(list_lines(ChangeType::Update, key, items.finish()));
    }
}

/// Body of a resource that is created or destroyed as a whole.
fn forced_body(value: &Value, unknown: &Value, change_type: ChangeType) -> BlockBody {
    let empty = Map::new();
    let map = object_of(value, change_type.label()).unwrap_or(&empty);
    let lines = forced_object(map, unknown, &change_type);
    let changes = lines.iter().filter(|line| line.is_change()).count();
    BlockBody {
        lines,
        changes,
        ..Default::default()
    }
}

fn forced_object(map: &Map<String, Value>, unknown: &Value, change_type: &ChangeType) -> Vec<NodeDraft> {
    let empty = Map::new();
    union_keys(map, &empty, unknown)
        .into_iter()
        .flat_map(|key| {
            let value = map.get(key).unwrap_or(&NULL);
            let marker = unknown.get(key).unwrap_or(&NULL);
            forced_entry(key, value, marker, change_type.clone())
        })
        .collect()
}

/// One side of a key rendered entirely with `change_type`'s prefix.
/// Nulls are skipped; unknown leaves on the created side show as
/// `(known after apply)`.
fn forced_entry(key: &str, value: &Value, unknown: &Value, change_type: ChangeType) -> Vec<NodeDraft> {
    let creating = change_type == ChangeType::Create;
    if creating && (*unknown == Value::Bool(true) || (value.is_null() && contains_unknown(unknown))) {
        return vec![leaf(change_type, key, KNOWN_AFTER_APPLY)];
    }
    match value {
        Value::Null => Vec::new(),
        Value::Object(map) => {
            let children = forced_object(map, unknown, &change_type);
            if children.is_empty() {
                vec![leaf(change_type, key, "{}")]
            } else {
                block_lines(change_type, key, children)
            }
        }
        Value::Array(items) if items.is_empty() => vec![leaf(change_type, key, "[]")],
        Value::Array(items) if items.iter().any(Value::is_object) => items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| {
                let marker = unknown.get(i).unwrap_or(&NULL);
                forced_entry(&format!("{key}[{i}]"), item, marker, change_type.clone())
            })
            .collect(),
        Value::Array(items) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    if creating && unknown.get(i) == Some(&Value::Bool(true)) {
                        element(change_type.clone(), KNOWN_AFTER_APPLY)
                    } else {
                        element(change_type.clone(), &format_value(item))
                    }
                })
                .collect();
            list_lines(change_type, key, children)
        }
        scalar if creating => vec![leaf(change_type, key, &format_value(scalar))],
        scalar => {
            let text = format!("{} -> null", format_value(scalar));
            vec![leaf(change_type, key, &text)]
        }
    }
}
