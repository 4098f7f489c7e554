use super::Projection;
use crate::metrics::{format_bytes, format_seconds, format_tasks, parse_timestamp_ms, rate};
use crate::payload::{FieldSpec, NormalizedRecord};
use crate::view::{JobPoint, StageRow, ViewBody};

const JOB_ID_PATHS: &[&str] = &["jobId", "job_id", "id"];
const STAGE_ID_PATHS: &[&str] = &["stageId", "stage_id", "id"];

pub const JOB_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", JOB_ID_PATHS),
    FieldSpec::text("name", &["name", "description"]),
    FieldSpec::text("status", &["status", "state"]),
    FieldSpec::json("submitted", &["submissionTime", "submission_time", "submitted"]),
    FieldSpec::json("completed_at", &["completionTime", "completion_time"]),
    FieldSpec::number("duration_ms", &["duration", "duration_ms", "durationMs"]),
    FieldSpec::number("total_tasks", &["numTasks", "num_tasks", "total_tasks"]),
    FieldSpec::number(
        "completed_tasks",
        &["numCompletedTasks", "num_completed_tasks", "completed_tasks"],
    ),
    FieldSpec::number(
        "failed_tasks",
        &["numFailedTasks", "num_failed_tasks", "failed_tasks"],
    ),
];

pub const STAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", STAGE_ID_PATHS),
    FieldSpec::text("attempt", &["attemptId", "attempt_id"]),
    FieldSpec::text("name", &["name", "description"]),
    FieldSpec::text("status", &["status", "state"]),
    FieldSpec::json("submitted", &["submissionTime", "submission_time"]),
    FieldSpec::json("completed_at", &["completionTime", "completion_time"]),
    FieldSpec::number(
        "duration_ms",
        &["duration", "duration_ms", "executorRunTime", "executor_run_time"],
    ),
    FieldSpec::number("total_tasks", &["numTasks", "num_tasks", "total_tasks"]),
    FieldSpec::number(
        "completed_tasks",
        &["numCompleteTasks", "numCompletedTasks", "completed_tasks"],
    ),
    FieldSpec::number("failed_tasks", &["numFailedTasks", "failed_tasks"]),
    FieldSpec::number("input_bytes", &["inputBytes", "input_bytes"]),
    FieldSpec::number("shuffle_read", &["shuffleReadBytes", "shuffle_read_bytes"]),
    FieldSpec::number("shuffle_write", &["shuffleWriteBytes", "shuffle_write_bytes"]),
    FieldSpec::number("memory_spill", &["memoryBytesSpilled", "memory_bytes_spilled"]),
    FieldSpec::number("disk_spill", &["diskBytesSpilled", "disk_bytes_spilled"]),
];

fn timestamp(record: &NormalizedRecord, name: &str) -> Option<i64> {
    record.json(name).and_then(parse_timestamp_ms)
}

/// Explicit duration, else completion minus submission.
fn elapsed_ms(record: &NormalizedRecord) -> f64 {
    if let Some(duration) = record.number("duration_ms") {
        return duration;
    }
    match (timestamp(record, "submitted"), timestamp(record, "completed_at")) {
        (Some(start), Some(end)) if end >= start => end.saturating_sub(start) as f64,
        _ => 0.0,
    }
}

fn tasks(record: &NormalizedRecord) -> String {
    format_tasks(
        record.number_or("completed_tasks", 0.0),
        record.number_or("failed_tasks", 0.0),
        record.number_or("total_tasks", 0.0),
    )
}

pub fn timeline(projection: &Projection<'_>) -> Option<ViewBody> {
    let mut points: Vec<JobPoint> = projection
        .normalized(JOB_ID_PATHS)
        .iter()
        .map(|record| JobPoint {
            job_id: record.text_or("id", "N/A"),
            name: record.text_or("name", "N/A"),
            status: record.text_or("status", "UNKNOWN"),
            submitted: record
                .json("submitted")
                .and_then(crate::payload::as_text)
                .unwrap_or_else(|| "N/A".to_string()),
            submitted_ms: timestamp(record, "submitted"),
            duration: format_seconds(elapsed_ms(record)),
            tasks: tasks(record),
            success_rate: rate(
                record.number_or("completed_tasks", 0.0),
                record.number_or("total_tasks", 0.0),
            ),
        })
        .collect();

    if points.is_empty() {
        return None;
    }

    // Stable, so jobs without a usable timestamp keep their order at the end
    points.sort_by_key(|point| (point.submitted_ms.is_none(), point.submitted_ms));
    Some(ViewBody::Timeline(points))
}

pub fn stages(projection: &Projection<'_>) -> Option<ViewBody> {
    let rows: Vec<StageRow> = projection
        .normalized(STAGE_ID_PATHS)
        .iter()
        .map(|record| {
            let spill =
                record.number_or("memory_spill", 0.0) + record.number_or("disk_spill", 0.0);
            StageRow {
                stage_id: record.text_or("id", "N/A"),
                attempt_id: record.text_or("attempt", "0"),
                name: record.text_or("name", "N/A"),
                status: record.text_or("status", "UNKNOWN"),
                duration: format_seconds(elapsed_ms(record)),
                tasks: tasks(record),
                input: format_bytes(record.number_or("input_bytes", 0.0)),
                shuffle_read: format_bytes(record.number_or("shuffle_read", 0.0)),
                shuffle_write: format_bytes(record.number_or("shuffle_write", 0.0)),
                spill: format_bytes(spill),
            }
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(ViewBody::Stages(rows))
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::{SelectionContext, interpret};
    use crate::payload::ToolResult;
    use crate::view::ViewBody;
    use serde_json::json;

    #[test]
    fn test_timeline_sorted_by_submission() {
        let result = ToolResult::new(
            "list_jobs",
            json!([
                {"jobId": 2, "name": "late", "status": "SUCCEEDED",
                 "submissionTime": "2024-01-15T10:31:00.000GMT",
                 "completionTime": "2024-01-15T10:31:30.000GMT",
                 "numTasks": 10, "numCompletedTasks": 9, "numFailedTasks": 1},
                {"jobId": 3, "name": "unknown time"},
                {"jobId": 1, "name": "early", "status": "SUCCEEDED",
                 "submissionTime": "2024-01-15T10:30:00.000GMT",
                 "numTasks": 4, "numCompletedTasks": 4}
            ]),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::Timeline(points) = view.body else {
            panic!("expected timeline, got {:?}", view.body);
        };
        let ids: Vec<&str> = points.iter().map(|p| p.job_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        assert_eq!(points[1].duration, "30.0s");
        assert_eq!(points[1].tasks, "9/1/10");
        assert!((points[1].success_rate - 90.0).abs() < 1e-9);
        assert_eq!(points[0].success_rate, 100.0);
        assert_eq!(points[2].submitted, "N/A");
        assert_eq!(points[2].submitted_ms, None);
    }

    #[test]
    fn test_wrapped_slowest_jobs() {
        let result = ToolResult::new(
            "list_slowest_jobs",
            json!({"jobs": [{"job_id": 7, "duration": 61000}], "app_id": "a"}),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::Timeline(points) = view.body else {
            panic!("expected timeline");
        };
        assert_eq!(points[0].job_id, "7");
        assert_eq!(points[0].duration, "61.0s");
        assert_eq!(points[0].tasks, "0/0/0");
    }

    #[test]
    fn test_stage_table_formats_bytes() {
        let result = ToolResult::new(
            "list_stages",
            json!({"stages": [{
                "stageId": 4, "attemptId": 0, "name": "map", "status": "COMPLETE",
                "executorRunTime": 2500, "numTasks": 8, "numCompleteTasks": 8,
                "inputBytes": 1536, "shuffleReadBytes": 0,
                "shuffleWriteBytes": 2097152, "memoryBytesSpilled": 512,
                "diskBytesSpilled": 512
            }]}),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::Stages(rows) = view.body else {
            panic!("expected stages");
        };
        let row = &rows[0];
        assert_eq!(row.stage_id, "4");
        assert_eq!(row.duration, "2.5s");
        assert_eq!(row.tasks, "8/0/8");
        assert_eq!(row.input, "1.50 KB");
        assert_eq!(row.shuffle_read, "0.00 B");
        assert_eq!(row.shuffle_write, "2.00 MB");
        assert_eq!(row.spill, "1.00 KB");
    }

    #[test]
    fn test_extreme_epochs_do_not_overflow() {
        let result = ToolResult::new(
            "list_jobs",
            json!([{"jobId": 1,
                    "submissionTime": -9_000_000_000_000_000_000i64,
                    "completionTime": 9_000_000_000_000_000_000i64}]),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::Timeline(points) = view.body else {
            panic!("expected timeline, got {:?}", view.body);
        };
        assert_eq!(points[0].duration, crate::metrics::format_seconds(i64::MAX as f64));
    }

    #[test]
    fn test_items_that_are_not_objects_are_skipped() {
        let result = ToolResult::new("list_stages", json!(["x", 1, null]));
        let view = interpret(&result, &SelectionContext::default());
        assert!(view.is_empty_state());
    }
}
