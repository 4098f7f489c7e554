use super::Projection;
use crate::metrics::format_seconds;
use crate::payload::{FieldSpec, NormalizedRecord};
use crate::view::{ApplicationRow, Detail, KeyValue, ViewBody};

const ID_PATHS: &[&str] = &["id", "app_id", "appId", "application_id"];

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", ID_PATHS),
    FieldSpec::text("name", &["name", "app_name", "appName"]),
    FieldSpec::number(
        "duration_ms",
        &["attempts.0.duration", "duration", "duration_ms"],
    ),
    FieldSpec::number(
        "start_epoch",
        &["attempts.0.startTimeEpoch", "startTimeEpoch", "start_time_epoch"],
    ),
    FieldSpec::number(
        "end_epoch",
        &["attempts.0.endTimeEpoch", "endTimeEpoch", "end_time_epoch"],
    ),
    FieldSpec::flag("completed", &["attempts.0.completed", "completed"]),
    FieldSpec::text("status", &["status", "state"]),
    FieldSpec::text(
        "user",
        &["attempts.0.sparkUser", "sparkUser", "spark_user", "user"],
    ),
    FieldSpec::text(
        "started",
        &["attempts.0.startTime", "startTime", "start_time"],
    ),
    FieldSpec::text("ended", &["attempts.0.endTime", "endTime", "end_time"]),
    FieldSpec::text(
        "spark_version",
        &["attempts.0.appSparkVersion", "appSparkVersion", "spark_version"],
    ),
    FieldSpec::number("cores", &["coresGranted", "cores_granted", "maxCores"]),
    FieldSpec::number(
        "executor_memory_mb",
        &["memoryPerExecutorMB", "memory_per_executor_mb"],
    ),
    FieldSpec::json("attempts", &["attempts"]),
];

/// Duration of the latest attempt, falling back to its start/end epochs.
fn duration_ms(record: &NormalizedRecord) -> f64 {
    if let Some(duration) = record.number("duration_ms") {
        return duration;
    }
    match (record.number("start_epoch"), record.number("end_epoch")) {
        (Some(start), Some(end)) if end > start && start > 0.0 => end - start,
        _ => 0.0,
    }
}

fn status(record: &NormalizedRecord) -> String {
    match record.flag("completed") {
        Some(true) => "Completed".to_string(),
        Some(false) => "Running".to_string(),
        None => record.text_or("status", "Unknown"),
    }
}

pub fn table(projection: &Projection<'_>) -> Option<ViewBody> {
    let rows: Vec<ApplicationRow> = projection
        .normalized(ID_PATHS)
        .iter()
        .map(|record| {
            let id = record.text_or("id", "");
            let duration = duration_ms(record);
            ApplicationRow {
                is_target: projection.context.is_target(&id),
                name: record.text_or("name", "N/A"),
                duration: format_seconds(duration),
                duration_ms: duration,
                status: status(record),
                user: record.text_or("user", "N/A"),
                started: record.text_or("started", "N/A"),
                id,
            }
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    tracing::debug!("Projected {} application rows", rows.len());
    Some(ViewBody::Applications(rows))
}

pub fn detail(projection: &Projection<'_>) -> Option<ViewBody> {
    let payload = projection.classified.payload;
    if !payload.is_object() {
        return None;
    }

    let record = NormalizedRecord::from_value(payload, projection.fields);
    let id = record.text("id")?.to_string();

    let mut fields = vec![
        KeyValue::new("ID", id.clone()),
        KeyValue::new("Name", record.text_or("name", "N/A")),
        KeyValue::new("Status", status(&record)),
        KeyValue::new("User", record.text_or("user", "N/A")),
        KeyValue::new("Started", record.text_or("started", "N/A")),
        KeyValue::new("Ended", record.text_or("ended", "N/A")),
        KeyValue::new("Duration", format_seconds(duration_ms(&record))),
    ];

    if let Some(version) = record.text("spark_version") {
        fields.push(KeyValue::new("Spark Version", version));
    }
    if let Some(cores) = record.display("cores") {
        fields.push(KeyValue::new("Cores Granted", cores));
    }
    if let Some(memory) = record.display("executor_memory_mb") {
        fields.push(KeyValue::new("Executor Memory", format!("{} MB", memory)));
    }
    if let Some(attempts) = record.json("attempts").and_then(|a| a.as_array()) {
        fields.push(KeyValue::new("Attempts", attempts.len().to_string()));
    }
    if projection.context.is_target(&id) {
        fields.push(KeyValue::new("Target", "yes"));
    }

    Some(ViewBody::Detail(Detail {
        title: record.text_or("name", &id),
        fields,
    }))
}
