//! Decides which known layout a tool payload uses.

use crate::tools::Tool;
use serde::Serialize;
use serde_json::Value;

/// Containers that may hold the `app1`/`app2` halves of a comparison, checked in order.
pub const COMPARISON_CONTAINERS: &[&str] = &[
    "executor_metrics",
    "summary_performance",
    "performance_summary",
    "summary",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeTag {
    Array,
    Wrapped,
    Comparison,
    Single,
    Empty,
}

impl ShapeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeTag::Array => "array",
            ShapeTag::Wrapped => "wrapped",
            ShapeTag::Comparison => "comparison",
            ShapeTag::Single => "single",
            ShapeTag::Empty => "empty",
        }
    }
}

/// A payload with its shape decided. `payload` is the unwrapped part the
/// projector works on; `root` is always the original value.
#[derive(Debug, Clone, Copy)]
pub struct Classified<'a> {
    pub shape: ShapeTag,
    pub payload: &'a Value,
    pub root: &'a Value,
}

impl<'a> Classified<'a> {
    /// Items of the primary collection, empty for non-collection shapes.
    pub fn items(&self) -> &'a [Value] {
        match self.payload {
            Value::Array(items) => items,
            _ => &[],
        }
    }
}

/// Classify `payload` for `tool` (`None` for unrecognized tool names). Never fails.
pub fn classify(tool: Option<Tool>, payload: &Value) -> Classified<'_> {
    let classified = classify_inner(tool, payload);
    tracing::debug!(
        "Classified {} payload as {}",
        tool.map(|t| t.as_str()).unwrap_or("unknown"),
        classified.shape.as_str()
    );
    classified
}

fn classify_inner<'a>(tool: Option<Tool>, payload: &'a Value) -> Classified<'a> {
    let shaped = |shape: ShapeTag, unwrapped: &'a Value| Classified {
        shape,
        payload: unwrapped,
        root: payload,
    };

    let map = match payload {
        Value::Array(_) => return shaped(ShapeTag::Array, payload),
        Value::Object(map) if !map.is_empty() => map,
        _ => return shaped(ShapeTag::Empty, payload),
    };

    if let Some(tool) = tool {
        if let Some(inner) = tool
            .collection_keys()
            .iter()
            .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
        {
            return shaped(ShapeTag::Wrapped, inner);
        }

        if tool.is_comparison()
            && let Some(container) = comparison_container(payload)
        {
            return shaped(ShapeTag::Comparison, container);
        }
    }

    shaped(ShapeTag::Single, payload)
}

/// First container holding both comparison sides, the bare payload last.
pub fn comparison_container(payload: &Value) -> Option<&Value> {
    COMPARISON_CONTAINERS
        .iter()
        .filter_map(|name| payload.get(*name))
        .chain(std::iter::once(payload))
        .find(|container| has_sides(container))
}

fn has_sides(container: &Value) -> bool {
    let side = |name| container.get(name).is_some_and(|v| v.is_object());
    side("app1") && side("app2")
}
