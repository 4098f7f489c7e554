//! Tolerant field lookup over untrusted JSON.
//!
//! Every extraction site in the crate goes through [`extract`] (or one of its
//! typed wrappers) with an ordered list of candidate key paths, so a backend
//! renaming `total_duration` to `duration` only means adding a candidate.

use serde_json::Value;

/// Resolve a dotted key path (`summary.peak_executors`, `attempts.0.duration`).
///
/// Object segments are looked up by key; numeric segments also index arrays.
/// Returns `None` for missing containers and for explicit `null`.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    if current.is_null() { None } else { Some(current) }
}

/// First defined, non-null value among `paths`, in order.
pub fn find<'a>(record: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| resolve(record, path))
}

/// Like [`find`] but searches several records, all paths of the first record
/// before moving to the next.
pub fn find_in<'a>(records: &[&'a Value], paths: &[&str]) -> Option<&'a Value> {
    records.iter().find_map(|record| find(record, paths))
}

/// Value at the first resolving path, or `default`.
pub fn extract(record: &Value, paths: &[&str], default: Value) -> Value {
    find(record, paths).cloned().unwrap_or(default)
}

pub fn extract_f64(record: &Value, paths: &[&str], default: f64) -> f64 {
    find(record, paths).and_then(as_f64).unwrap_or(default)
}

pub fn extract_i64(record: &Value, paths: &[&str], default: i64) -> i64 {
    find(record, paths).and_then(as_i64).unwrap_or(default)
}

pub fn extract_str(record: &Value, paths: &[&str], default: &str) -> String {
    find(record, paths)
        .and_then(as_text)
        .unwrap_or_else(|| default.to_string())
}

pub fn extract_bool(record: &Value, paths: &[&str], default: bool) -> bool {
    find(record, paths).and_then(as_bool).unwrap_or(default)
}

/// Lenient numeric coercion: numbers, numeric strings and booleans.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Text form of a scalar. Containers are rendered as compact JSON.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
