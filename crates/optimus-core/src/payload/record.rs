use super::extract;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// How a resolved value should be typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
    Flag,
    Json,
}

/// A semantic field and the source paths it may live under, in priority order.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub paths: &'static [&'static str],
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn number(name: &'static str, paths: &'static [&'static str]) -> Self {
        Self {
            name,
            paths,
            kind: FieldKind::Number,
        }
    }

    pub const fn text(name: &'static str, paths: &'static [&'static str]) -> Self {
        Self {
            name,
            paths,
            kind: FieldKind::Text,
        }
    }

    pub const fn flag(name: &'static str, paths: &'static [&'static str]) -> Self {
        Self {
            name,
            paths,
            kind: FieldKind::Flag,
        }
    }

    pub const fn json(name: &'static str, paths: &'static [&'static str]) -> Self {
        Self {
            name,
            paths,
            kind: FieldKind::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Json(Value),
    Absent,
}

/// Extractor output: semantic field name to typed value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRecord {
    fields: BTreeMap<&'static str, FieldValue>,
}

impl NormalizedRecord {
    pub fn from_value(record: &Value, specs: &[FieldSpec]) -> Self {
        Self::from_values(&[record], specs)
    }

    /// Normalize against several records; each field takes the first record
    /// that resolves one of its paths.
    pub fn from_values(records: &[&Value], specs: &[FieldSpec]) -> Self {
        let fields = specs
            .iter()
            .map(|spec| {
                let value = match extract::find_in(records, spec.paths) {
                    None => FieldValue::Absent,
                    Some(found) => match spec.kind {
                        FieldKind::Number => extract::as_f64(found)
                            .map(FieldValue::Number)
                            .unwrap_or(FieldValue::Absent),
                        FieldKind::Text => extract::as_text(found)
                            .map(FieldValue::Text)
                            .unwrap_or(FieldValue::Absent),
                        FieldKind::Flag => extract::as_bool(found)
                            .map(FieldValue::Flag)
                            .unwrap_or(FieldValue::Absent),
                        FieldKind::Json => FieldValue::Json(found.clone()),
                    },
                };
                (spec.name, value)
            })
            .collect();

        Self { fields }
    }

    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&FieldValue::Absent)
    }

    pub fn is_absent(&self, name: &str) -> bool {
        matches!(self.get(name), FieldValue::Absent)
    }

    /// True when no field resolved at all.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| matches!(v, FieldValue::Absent))
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn number_or(&self, name: &str, default: f64) -> f64 {
        self.number(name).unwrap_or(default)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn text_or(&self, name: &str, default: &str) -> String {
        self.text(name).unwrap_or(default).to_string()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn json(&self, name: &str) -> Option<&Value> {
        match self.get(name) {
            FieldValue::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Display form of any resolved field.
    pub fn display(&self, name: &str) -> Option<String> {
        match self.get(name) {
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            FieldValue::Number(n) => Some(format!("{:.2}", n)),
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Flag(b) => Some(b.to_string()),
            FieldValue::Json(v) => extract::as_text(v),
            FieldValue::Absent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::number("duration_ms", &["total_duration", "duration"]),
        FieldSpec::text("status", &["status", "state"]),
        FieldSpec::flag("completed", &["attempts.0.completed", "completed"]),
        FieldSpec::number("task_count", &["numTasks", "total_tasks"]),
    ];

    #[test]
    fn test_normalize_resolves_each_field() {
        let record = json!({
            "duration": 1500,
            "state": "SUCCEEDED",
            "attempts": [{"completed": true}]
        });
        let normalized = NormalizedRecord::from_value(&record, FIELDS);

        assert_eq!(normalized.number("duration_ms"), Some(1500.0));
        assert_eq!(normalized.text("status"), Some("SUCCEEDED"));
        assert_eq!(normalized.flag("completed"), Some(true));
        assert!(normalized.is_absent("task_count"));
        assert!(!normalized.is_empty());
    }

    #[test]
    fn test_normalize_empty_record() {
        let normalized = NormalizedRecord::from_value(&json!({}), FIELDS);
        assert!(normalized.is_empty());
        assert_eq!(normalized.number_or("duration_ms", 0.0), 0.0);
        assert_eq!(normalized.text_or("status", "UNKNOWN"), "UNKNOWN");
    }

    #[test]
    fn test_from_values_prefers_earlier_record() {
        let first = json!({"duration": 10});
        let second = json!({"duration": 99, "status": "RUNNING"});
        let normalized = NormalizedRecord::from_values(&[&first, &second], FIELDS);
        assert_eq!(normalized.number("duration_ms"), Some(10.0));
        assert_eq!(normalized.text("status"), Some("RUNNING"));
    }

    #[test]
    fn test_display_formats_numbers() {
        let normalized =
            NormalizedRecord::from_value(&json!({"duration": 3, "numTasks": 2.5}), FIELDS);
        assert_eq!(normalized.display("duration_ms").as_deref(), Some("3"));
        assert_eq!(normalized.display("task_count").as_deref(), Some("2.50"));
        assert_eq!(normalized.display("status"), None);
    }
}
