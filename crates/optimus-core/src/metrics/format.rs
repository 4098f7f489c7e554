use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

/// Milliseconds as seconds with one decimal (`120000` → `"120.0s"`).
pub fn format_seconds(ms: f64) -> String {
    format!("{:.1}s", ms / 1000.0)
}

/// Human-readable byte size with two decimals.
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes;
    for unit in UNITS {
        if value.abs() < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} PB", value)
}

/// Task completion triple `complete/failed/total`.
pub fn format_tasks(completed: f64, failed: f64, total: f64) -> String {
    format!("{}/{}/{}", completed as i64, failed as i64, total as i64)
}

/// Epoch milliseconds of a timestamp field.
///
/// Accepts epoch-millisecond numbers (or numeric strings), RFC 3339, Spark's
/// `2024-01-15T10:30:00.000GMT` form, and naive `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn parse_timestamp_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(ms) = s.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Some(stripped) = s.strip_suffix("GMT") {
        let with_offset = format!("{}+0000", stripped);
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(dt.timestamp_millis());
        }
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}
