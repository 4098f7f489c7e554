use super::Projection;
use crate::metrics::{ComparisonSet, operator_delta, three_way};
use crate::payload::{self, as_i64, as_text};
use crate::view::{DiffRow, DiffSection, DiffStatus, DiffTable, KeyValue, ViewBody};
use serde_json::Value;
use std::collections::BTreeMap;

/// Where a side's operators may live, `{side}` substituted with `app1`/`app2`.
const OPERATOR_PATHS: &[&str] = &[
    "operator_counts.{side}",
    "node_types.{side}",
    "plan_structure.{side}_node_types",
    "plan_comparison.{side}_node_types",
    "{side}.node_types",
    "{side}.operator_counts",
    "{side}.operators",
    "{side}.nodes",
    "{side}.plan.nodes",
];

const NODE_NAME: &[&str] = &["nodeName", "node_name", "name", "type"];

/// Operator histogram from `{name: count}` or a list of plan nodes.
fn operator_counts(value: &Value) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    match value {
        Value::Object(map) => {
            for (name, count) in map {
                if let Some(count) = as_i64(count) {
                    counts.insert(name.clone(), count);
                }
            }
        }
        Value::Array(nodes) => {
            for node in nodes {
                let name = match node {
                    Value::String(name) => Some(name.clone()),
                    _ => payload::find(node, NODE_NAME).and_then(as_text),
                };
                if let Some(name) = name {
                    *counts.entry(name).or_insert(0) += 1;
                }
            }
        }
        _ => {}
    }
    counts
}

fn side_counts(root: &Value, side: &str) -> Option<BTreeMap<String, i64>> {
    let paths: Vec<String> = OPERATOR_PATHS
        .iter()
        .map(|path| path.replace("{side}", side))
        .collect();
    let paths: Vec<&str> = paths.iter().map(String::as_str).collect();

    payload::find(root, &paths).map(operator_counts)
}

fn row(set: &ComparisonSet<i64>, key: &str) -> Option<DiffRow> {
    let text = |v: &i64| Some(v.to_string());
    let (a, b, status) = if let Some(pair) = set.different.get(key) {
        (text(&pair.a), text(&pair.b), DiffStatus::Changed)
    } else if let Some(a) = set.only_in_a.get(key) {
        (text(a), None, DiffStatus::Missing)
    } else if let Some(b) = set.only_in_b.get(key) {
        (None, text(b), DiffStatus::New)
    } else {
        let pair = set.common.get(key)?;
        (text(&pair.a), text(&pair.b), DiffStatus::Same)
    };

    Some(DiffRow {
        key: key.to_string(),
        a,
        b,
        status,
        delta: Some(operator_delta(set, key)),
    })
}

pub fn operator_diff(projection: &Projection<'_>) -> Option<ViewBody> {
    let root = projection.classified.root;
    let counts1 = side_counts(root, "app1").unwrap_or_default();
    let counts2 = side_counts(root, "app2").unwrap_or_default();

    let set = three_way(&counts1, &counts2);
    if set.is_empty() {
        return None;
    }

    let mut rows: Vec<DiffRow> = set.keys().into_iter().filter_map(|key| row(&set, key)).collect();
    rows.sort_by_key(|row| (row.status as u8, row.key.clone()));

    let total = |counts: &BTreeMap<String, i64>| {
        counts
            .values()
            .fold(0i64, |sum, count| sum.saturating_add(*count))
            .to_string()
    };
    let summary = vec![
        KeyValue::new("App 1 operators", total(&counts1)),
        KeyValue::new("App 2 operators", total(&counts2)),
        KeyValue::new("Changed", set.different.len().to_string()),
        KeyValue::new("Missing", set.only_in_a.len().to_string()),
        KeyValue::new("New", set.only_in_b.len().to_string()),
    ];

    Some(ViewBody::Diff(DiffTable {
        app1: payload::extract_str(root, &["app1_id", "app_id1", "app1.id"], "App 1"),
        app2: payload::extract_str(root, &["app2_id", "app_id2", "app2.id"], "App 2"),
        summary,
        sections: vec![DiffSection {
            title: "Operators".to_string(),
            rows,
        }],
    }))
}
