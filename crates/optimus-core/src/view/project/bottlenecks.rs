use super::Projection;
use crate::payload::{self, FieldSpec, NormalizedRecord};
use crate::view::{Finding, FindingCategory, ViewBody};
use serde_json::Value;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", &["title", "issue", "type", "name", "message"]),
    FieldSpec::text("detail", &["description", "details", "message", "reason"]),
    FieldSpec::text("metric", &["metric", "value", "impact"]),
    FieldSpec::text(
        "recommendation",
        &["recommendation", "suggestion", "fix", "action"],
    ),
    FieldSpec::text("severity", &["severity", "level", "priority"]),
];

/// Categorized collections, in display order.
const CATEGORIES: &[(&str, FindingCategory)] = &[
    ("critical", FindingCategory::Critical),
    ("warnings", FindingCategory::Warning),
    ("info", FindingCategory::Info),
];

const LEGACY_KEYS: &[&str] = &["findings", "bottlenecks", "issues"];

fn finding(item: &Value, category: Option<FindingCategory>) -> Option<Finding> {
    if let Some(text) = item.as_str() {
        let text = text.trim();
        return (!text.is_empty()).then(|| Finding {
            category: category.unwrap_or(FindingCategory::General),
            title: text.to_string(),
            detail: None,
            metric: None,
            recommendation: None,
        });
    }

    if !item.is_object() {
        return None;
    }

    let record = NormalizedRecord::from_value(item, FIELDS);
    let title = record
        .text("title")
        .or_else(|| record.text("detail"))?
        .to_string();
    let detail = record
        .text("detail")
        .filter(|detail| *detail != title)
        .map(str::to_string);

    let category = category
        .or_else(|| record.text("severity").and_then(FindingCategory::from_severity))
        .unwrap_or(FindingCategory::General);

    Some(Finding {
        category,
        title,
        detail,
        metric: record.text("metric").map(str::to_string),
        recommendation: record.text("recommendation").map(str::to_string),
    })
}

fn collection<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let nested = format!("bottlenecks.{}", key);
    payload::find(root, &[key, nested.as_str()])
}

fn items<'a>(root: &'a Value, key: &str) -> &'a [Value] {
    collection(root, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn findings(projection: &Projection<'_>) -> Option<ViewBody> {
    let root = projection.classified.payload;

    let mut findings: Vec<Finding> = CATEGORIES
        .iter()
        .flat_map(|(key, category)| {
            items(root, key)
                .iter()
                .filter_map(move |item| finding(item, Some(*category)))
        })
        .collect();

    // Legacy arrays only when no categorized collection is present at all
    let categorized = CATEGORIES
        .iter()
        .any(|(key, _)| collection(root, key).is_some());

    if !categorized {
        let legacy: &[Value] = match root {
            Value::Array(all) => all,
            _ => LEGACY_KEYS
                .iter()
                .find_map(|key| root.get(*key).and_then(Value::as_array))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        };
        findings = legacy.iter().filter_map(|item| finding(item, None)).collect();
    }

    if findings.is_empty() {
        return None;
    }

    tracing::debug!("Collected {} findings", findings.len());
    Some(ViewBody::Findings(findings))
}
