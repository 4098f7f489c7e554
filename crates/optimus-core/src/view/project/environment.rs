use super::Projection;
use crate::metrics::{ComparisonSet, Pair, three_way};
use crate::payload::{self, as_text};
use crate::view::{DiffRow, DiffSection, DiffStatus, DiffTable, KeyValue, KeyValueSection, ViewBody};
use serde_json::Value;
use std::collections::BTreeMap;

/// Environment blocks shown by the key/value view, with their accepted names.
const ENVIRONMENT_SECTIONS: &[(&str, &[&str])] = &[
    ("Runtime", &["runtime"]),
    ("Spark Properties", &["sparkProperties", "spark_properties"]),
    ("System Properties", &["systemProperties", "system_properties"]),
    ("Hadoop Properties", &["hadoopProperties", "hadoop_properties"]),
    ("Classpath", &["classpathEntries", "classpath_entries", "classpath"]),
];

/// Property sections compared between two applications.
const DIFF_SECTIONS: &[(&str, &[&str])] = &[
    ("Spark Properties", &["spark_properties", "sparkProperties"]),
    ("System Properties", &["system_properties", "systemProperties"]),
];

/// Partition names, current first then legacy.
const DIFFERENT: &[&str] = &["different", "changed"];
const ONLY_IN_A: &[&str] = &["only_in_app1", "app1_only"];
const ONLY_IN_B: &[&str] = &["only_in_app2", "app2_only"];
const SAME: &[&str] = &["same", "common"];

const ENTRY_KEY: &[&str] = &["key", "property", "name"];

/// Flatten `[[key, value], ...]`, `[{key, value}, ...]` or `{key: value}`.
fn entries(value: &Value) -> Vec<KeyValue> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| KeyValue::new(key.clone(), as_text(value).unwrap_or_default()))
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Array(pair) => {
                    let key = as_text(pair.first()?)?;
                    let value = pair.get(1).and_then(as_text).unwrap_or_default();
                    Some(KeyValue::new(key, value))
                }
                Value::Object(_) => {
                    let key = payload::find(item, ENTRY_KEY).and_then(as_text)?;
                    let value = payload::extract_str(item, &["value"], "");
                    Some(KeyValue::new(key, value))
                }
                Value::String(key) => Some(KeyValue::new(key.clone(), "")),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn key_values(projection: &Projection<'_>) -> Option<ViewBody> {
    let root = projection.classified.payload;

    let sections: Vec<KeyValueSection> = ENVIRONMENT_SECTIONS
        .iter()
        .filter_map(|(title, keys)| {
            let entries = entries(payload::find(root, keys)?);
            (!entries.is_empty()).then(|| KeyValueSection {
                title: title.to_string(),
                entries,
            })
        })
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(ViewBody::KeyValues(sections))
    }
}

/// `{key: value}` or `[{key, value}]` into a text map.
fn value_map(value: &Value) -> BTreeMap<String, String> {
    entries(value)
        .into_iter()
        .map(|kv| (kv.key, kv.value))
        .collect()
}

fn pair_of(value: &Value) -> Pair<String> {
    let text = |v: Option<&Value>| v.and_then(as_text).unwrap_or_default();
    match value {
        Value::Array(pair) => Pair {
            a: text(pair.first()),
            b: text(pair.get(1)),
        },
        Value::Object(_) => Pair {
            a: text(payload::find(value, &["app1", "app1_value", "a"])),
            b: text(payload::find(value, &["app2", "app2_value", "b"])),
        },
        other => {
            let same = as_text(other).unwrap_or_default();
            Pair {
                a: same.clone(),
                b: same,
            }
        }
    }
}

/// Keyed pairs from `{key: pair}` or `[{key, app1, app2}]`.
fn pairs(value: &Value) -> Vec<(String, Pair<String>)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| (key.clone(), pair_of(value)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let key = payload::find(item, ENTRY_KEY).and_then(as_text)?;
                Some((key, pair_of(item)))
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Partitioned sections as reported by the backend.
fn reported(section: &Value) -> Option<ComparisonSet<String>> {
    let has_partition = [DIFFERENT, ONLY_IN_A, ONLY_IN_B, SAME]
        .iter()
        .any(|names| payload::find(section, names).is_some());
    if !has_partition {
        return None;
    }

    let one_sided = |names: &[&str]| -> Vec<(String, String)> {
        match payload::find(section, names) {
            Some(Value::Array(keys)) if keys.iter().all(Value::is_string) => keys
                .iter()
                .filter_map(as_text)
                .map(|key| (key, String::new()))
                .collect(),
            Some(other) => value_map(other).into_iter().collect(),
            None => Vec::new(),
        }
    };
    let two_sided = |names: &[&str]| payload::find(section, names).map(pairs).unwrap_or_default();

    Some(ComparisonSet::from_partitions(
        two_sided(DIFFERENT),
        one_sided(ONLY_IN_A),
        one_sided(ONLY_IN_B),
        two_sided(SAME),
    ))
}

/// Partitions computed from each side's raw property map.
fn computed(a: &Value, b: &Value) -> ComparisonSet<String> {
    three_way(&value_map(a), &value_map(b))
}

fn rows(set: ComparisonSet<String>) -> Vec<DiffRow> {
    let row = |key: String, a: Option<String>, b: Option<String>, status| DiffRow {
        key,
        a,
        b,
        status,
        delta: None,
    };

    let mut rows = Vec::with_capacity(set.len());
    rows.extend(
        set.different
            .into_iter()
            .map(|(k, p)| row(k, Some(p.a), Some(p.b), DiffStatus::Changed)),
    );
    rows.extend(
        set.only_in_a
            .into_iter()
            .map(|(k, v)| row(k, Some(v), None, DiffStatus::Missing)),
    );
    rows.extend(
        set.only_in_b
            .into_iter()
            .map(|(k, v)| row(k, None, Some(v), DiffStatus::New)),
    );
    rows.extend(
        set.common
            .into_iter()
            .map(|(k, p)| row(k, Some(p.a), Some(p.b), DiffStatus::Same)),
    );
    rows
}

fn diff_section(root: &Value, keys: &[&str]) -> Option<ComparisonSet<String>> {
    if let Some(section) = payload::find(root, keys).filter(|v| v.is_object()) {
        if let Some(set) = reported(section) {
            return Some(set);
        }
        if let (Some(a), Some(b)) = (section.get("app1"), section.get("app2")) {
            return Some(computed(a, b));
        }
    }

    // Raw per-application environments: app1.spark_properties vs app2.spark_properties
    let side = |name: &str| {
        keys.iter()
            .find_map(|key| payload::resolve(root, &format!("{}.{}", name, key)))
    };
    match (side("app1"), side("app2")) {
        (Some(a), Some(b)) => Some(computed(a, b)),
        _ => None,
    }
}

pub fn diff(projection: &Projection<'_>) -> Option<ViewBody> {
    let root = projection.classified.root;

    let sections: Vec<DiffSection> = DIFF_SECTIONS
        .iter()
        .filter_map(|(title, keys)| {
            let rows = rows(diff_section(root, keys)?);
            (!rows.is_empty()).then(|| DiffSection {
                title: title.to_string(),
                rows,
            })
        })
        .collect();

    if sections.is_empty() {
        return None;
    }

    let count = |status: DiffStatus| {
        sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .filter(|r| r.status == status)
            .count()
    };
    let summary = [
        DiffStatus::Changed,
        DiffStatus::Missing,
        DiffStatus::New,
        DiffStatus::Same,
    ]
    .into_iter()
    .map(|status| KeyValue::new(status.as_str(), count(status).to_string()))
    .collect();

    Some(ViewBody::Diff(DiffTable {
        app1: payload::extract_str(
            root,
            &["app1_id", "app_id1", "applications.app1.id", "app1.id"],
            "App 1",
        ),
        app2: payload::extract_str(
            root,
            &["app2_id", "app_id2", "applications.app2.id", "app2.id"],
            "App 2",
        ),
        summary,
        sections,
    }))
}
