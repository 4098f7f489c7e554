use super::Projection;
use crate::metrics::format_seconds;
use crate::payload::{FieldSpec, NormalizedRecord};
use crate::view::{SqlQueryRow, ViewBody};
use serde_json::Value;

const ID_PATHS: &[&str] = &["id", "execution_id", "executionId"];

const JOB_ID_KEYS: &[&str] = &["successJobIds", "failedJobIds", "runningJobIds", "job_ids"];

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", ID_PATHS),
    FieldSpec::text("description", &["description", "query", "name"]),
    FieldSpec::text("status", &["status", "state"]),
    FieldSpec::number("duration_ms", &["duration", "duration_ms", "durationMs"]),
    FieldSpec::number("job_count", &["job_count", "num_jobs"]),
];

fn job_count(record: &Value, normalized: &NormalizedRecord) -> usize {
    if let Some(count) = normalized.number("job_count") {
        return count.max(0.0) as usize;
    }
    JOB_ID_KEYS
        .iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_array))
        .map(Vec::len)
        .sum()
}

pub fn slow_list(projection: &Projection<'_>) -> Option<ViewBody> {
    let mut rows: Vec<SqlQueryRow> = projection
        .records(ID_PATHS)
        .into_iter()
        .map(|record| {
            let normalized = NormalizedRecord::from_value(record, projection.fields);
            let duration = normalized.number_or("duration_ms", 0.0);
            SqlQueryRow {
                id: normalized.text_or("id", "N/A"),
                description: normalized.text_or("description", "N/A"),
                status: normalized.text_or("status", "UNKNOWN"),
                duration: format_seconds(duration),
                duration_ms: duration,
                jobs: job_count(record, &normalized).to_string(),
            }
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    rows.sort_by(|a, b| b.duration_ms.total_cmp(&a.duration_ms));
    Some(ViewBody::SqlQueries(rows))
}

#[cfg(test)]
mod tests {
    use crate::dispatch::{SelectionContext, interpret};
    use crate::payload::ToolResult;
    use crate::view::ViewBody;
    use serde_json::json;

    #[test]
    fn test_sorted_slowest_first() {
        let result = ToolResult::new(
            "list_slowest_sql_queries",
            json!([
                {"id": 1, "description": "select 1", "status": "COMPLETED", "duration": 800},
                {"id": 2, "description": "big join", "status": "COMPLETED", "duration": 95000,
                 "successJobIds": [3, 4], "failedJobIds": [5]},
                {"id": 3, "description": "count", "status": "RUNNING"}
            ]),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::SqlQueries(rows) = view.body else {
            panic!("expected SQL rows, got {:?}", view.body);
        };
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
        assert_eq!(rows[0].duration, "95.0s");
        assert_eq!(rows[0].jobs, "3");
        assert_eq!(rows[2].duration, "0.0s");
        assert_eq!(rows[2].jobs, "0");
    }

    #[test]
    fn test_wrapped_queries() {
        let result = ToolResult::new(
            "list_slowest_sql_queries",
            json!({"queries": [{"execution_id": 9, "duration_ms": 10, "job_count": 2}]}),
        );
        let view = interpret(&result, &SelectionContext::default());

        let ViewBody::SqlQueries(rows) = view.body else {
            panic!("expected SQL rows");
        };
        assert_eq!(rows[0].id, "9");
        assert_eq!(rows[0].jobs, "2");
    }
}
