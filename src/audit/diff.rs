//! Field-level change lists between two record snapshots

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

/// Strings longer than this are cut short in change lists
const MAX_STRING_LEN: usize = 50;

/// One top-level field that differs between snapshots
#[derive(Debug, Clone, PartialEq)]
enum FieldChange<'a> {
    Added(&'a str, &'a Value),
    Removed(&'a str, &'a Value),
    Changed(&'a str, &'a Value, &'a Value),
}

impl fmt::Display for FieldChange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldChange::Added(key, new) => write!(f, "{}: (added) -> {}", key, Compact(new)),
            FieldChange::Removed(key, old) => write!(f, "{}: {} -> (removed)", key, Compact(old)),
            FieldChange::Changed(key, old, new) => {
                write!(f, "{}: {} -> {}", key, Compact(old), Compact(new))
            }
        }
    }
}

fn field_changes<'a>(before: &'a Map<String, Value>, after: &'a Map<String, Value>) -> Vec<FieldChange<'a>> {
    let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();

    keys.into_iter()
        .filter_map(|key| match (before.get(key), after.get(key)) {
            (Some(old), Some(new)) if old != new => Some(FieldChange::Changed(key, old, new)),
            (Some(old), None) => Some(FieldChange::Removed(key, old)),
            (None, Some(new)) => Some(FieldChange::Added(key, new)),
            _ => None,
        })
        .collect()
}

/// `field: old -> new` for each differing top-level field, in key order.
/// `None` when the snapshots are equal.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    if before == after {
        return None;
    }

    let summary = match (before, after) {
        (Value::Object(before), Value::Object(after)) => field_changes(before, after)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        _ => format!("{} -> {}", Compact(before), Compact(after)),
    };
    Some(summary)
}

/// A JSON value shortened for a one-line summary
struct Compact<'a>(&'a Value);

impl fmt::Display for Compact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
                let head: String = s.chars().take(MAX_STRING_LEN - 3).collect();
                write!(f, "\"{}...\"", head)
            }
            Value::Array(items) => write!(f, "[{} items]", items.len()),
            Value::Object(fields) => write!(f, "{{{} fields}}", fields.len()),
            scalar => write!(f, "{}", scalar),
        }
    }
}
