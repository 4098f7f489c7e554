use super::Projection;
use crate::metrics::parse_timestamp_ms;
use crate::payload::{self, FieldSpec, NormalizedRecord};
use crate::view::{Kpi, KpiBoard, SeriesPoint, ViewBody};
use serde_json::Value;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::number("total_events", &["summary.total_events", "total_events"]),
    FieldSpec::number(
        "executor_additions",
        &["summary.executor_additions", "executor_additions"],
    ),
    FieldSpec::number(
        "executor_removals",
        &["summary.executor_removals", "executor_removals"],
    ),
    FieldSpec::number(
        "stage_executions",
        &["summary.stage_executions", "stage_executions"],
    ),
    FieldSpec::number("peak_executors", &["summary.peak_executors", "peak_executors"]),
];

const TILES: &[(&str, &str)] = &[
    ("total_events", "Total Events"),
    ("executor_additions", "Executors Added"),
    ("executor_removals", "Executors Removed"),
    ("stage_executions", "Stage Executions"),
    ("peak_executors", "Peak Executors"),
];

const SERIES_KEYS: &[&str] = &["timeline", "events", "resource_timeline"];

fn series_point(event: &Value) -> Option<SeriesPoint> {
    if !event.is_object() {
        return None;
    }

    let raw_timestamp = payload::find(event, &["timestamp", "time", "submissionTime"]);
    Some(SeriesPoint {
        timestamp: raw_timestamp
            .and_then(payload::as_text)
            .unwrap_or_else(|| "N/A".to_string()),
        timestamp_ms: raw_timestamp.and_then(parse_timestamp_ms),
        label: payload::extract_str(event, &["type", "event", "event_type", "description"], "event"),
        value: payload::extract_f64(
            event,
            &["active_executors", "executor_count", "executors", "value"],
            0.0,
        ),
    })
}

pub fn kpis(projection: &Projection<'_>) -> Option<ViewBody> {
    let root = projection.classified.payload;

    let events: &[Value] = match root {
        Value::Array(items) => items,
        _ => SERIES_KEYS
            .iter()
            .find_map(|key| root.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    };

    let mut series: Vec<SeriesPoint> = events.iter().filter_map(series_point).collect();
    series.sort_by_key(|point| (point.timestamp_ms.is_none(), point.timestamp_ms));

    let record = NormalizedRecord::from_value(root, projection.fields);
    let tiles: Vec<Kpi> = TILES
        .iter()
        .filter_map(|(name, label)| record.display(name).map(|value| Kpi::new(*label, value)))
        .collect();

    if tiles.is_empty() && series.is_empty() {
        return None;
    }

    tracing::debug!("{} resource tiles, {} timeline points", tiles.len(), series.len());
    Some(ViewBody::Kpis(KpiBoard { tiles, series }))
}

#[cfg(test)]
mod tests {
    use crate::dispatch::{SelectionContext, interpret};
    use crate::payload::ToolResult;
    use crate::view::ViewBody;
    use serde_json::json;

    #[test]
    fn test_summary_tiles_and_sorted_series() {
        let result = ToolResult::new(
            "get_resource_usage_timeline",
            json!({
                "application_id": "app-1",
                "timeline": [
                    {"timestamp": 3000, "type": "executor_removed", "active_executors": 1},
                    {"timestamp": 1000, "type": "executor_added", "active_executors": 1},
                    {"timestamp": 2000, "type": "executor_added", "active_executors": 2}
                ],
                "summary": {
                    "total_events": 3,
                    "executor_additions": 2,
                    "executor_removals": 1,
                    "peak_executors": 2
                }
            }),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::Kpis(board) = view.body else {
            panic!("expected KPI board, got {:?}", view.body);
        };
        let labels: Vec<&str> = board.tiles.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Total Events", "Executors Added", "Executors Removed", "Peak Executors"]
        );
        assert_eq!(board.tiles[3].value, "2");

        let times: Vec<Option<i64>> = board.series.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(times, vec![Some(1000), Some(2000), Some(3000)]);
        assert_eq!(board.series[1].value, 2.0);
        assert_eq!(board.series[2].label, "executor_removed");
    }

    #[test]
    fn test_series_only() {
        let result = ToolResult::new(
            "get_resource_usage_timeline",
            json!({"timeline": [{"timestamp": "2024-01-15T10:30:00Z", "executors": 3}]}),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::Kpis(board) = view.body else {
            panic!("expected KPI board");
        };
        assert!(board.tiles.is_empty());
        assert_eq!(board.series.len(), 1);
        assert_eq!(board.series[0].timestamp_ms, Some(1_705_314_600_000));
    }

    #[test]
    fn test_nothing_recognizable_is_empty_state() {
        let result = ToolResult::new(
            "get_resource_usage_timeline",
            json!({"summary": {}, "timeline": []}),
        );
        let view = interpret(&result, &SelectionContext::default());
        assert!(view.is_empty_state());
    }
}
