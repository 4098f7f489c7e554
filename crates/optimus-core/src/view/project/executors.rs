use super::Projection;
use crate::metrics::{format_bytes, format_seconds, format_tasks, rate};
use crate::payload::{FieldSpec, NormalizedRecord};
use crate::view::{ExecutorRow, Kpi, KpiBoard, ViewBody};

const EXECUTOR_ID_PATHS: &[&str] = &["id", "executorId", "executor_id"];

pub const EXECUTOR_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", EXECUTOR_ID_PATHS),
    FieldSpec::text("host", &["hostPort", "host_port", "host"]),
    FieldSpec::flag("active", &["isActive", "is_active", "active"]),
    FieldSpec::number("cores", &["totalCores", "total_cores", "cores"]),
    FieldSpec::number("completed_tasks", &["completedTasks", "completed_tasks"]),
    FieldSpec::number("failed_tasks", &["failedTasks", "failed_tasks"]),
    FieldSpec::number("total_tasks", &["totalTasks", "total_tasks"]),
    FieldSpec::number("memory_used", &["memoryUsed", "memory_used"]),
    FieldSpec::number("max_memory", &["maxMemory", "max_memory"]),
    FieldSpec::number("gc_time", &["totalGCTime", "total_gc_time", "gc_time"]),
    FieldSpec::number("duration", &["totalDuration", "total_duration", "duration"]),
];

pub const SUMMARY_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("total_executors", &["total_executors", "executor_count"]),
    FieldSpec::number("active_executors", &["active_executors"]),
    FieldSpec::number("memory_used", &["memory_used", "total_memory_used"]),
    FieldSpec::number("disk_used", &["disk_used", "total_disk_used"]),
    FieldSpec::number("completed_tasks", &["completed_tasks", "total_completed_tasks"]),
    FieldSpec::number("failed_tasks", &["failed_tasks", "total_failed_tasks"]),
    FieldSpec::number("total_duration", &["total_duration", "duration"]),
    FieldSpec::number("total_gc_time", &["total_gc_time", "gc_time"]),
    FieldSpec::number("input_bytes", &["total_input_bytes", "input_bytes"]),
    FieldSpec::number("shuffle_read", &["total_shuffle_read", "shuffle_read_bytes"]),
    FieldSpec::number("shuffle_write", &["total_shuffle_write", "shuffle_write_bytes"]),
];

fn executor_row(record: &NormalizedRecord) -> ExecutorRow {
    let completed = record.number_or("completed_tasks", 0.0);
    let failed = record.number_or("failed_tasks", 0.0);
    let total = record.number("total_tasks").unwrap_or(completed + failed);

    ExecutorRow {
        id: record.text_or("id", "N/A"),
        host: record.text_or("host", "N/A"),
        active: record.flag("active").unwrap_or(false),
        cores: record.number_or("cores", 0.0) as i64,
        tasks: format_tasks(completed, failed, total),
        memory_used: format_bytes(record.number_or("memory_used", 0.0)),
        max_memory: format_bytes(record.number_or("max_memory", 0.0)),
        gc_time: format_seconds(record.number_or("gc_time", 0.0)),
        duration: format_seconds(record.number_or("duration", 0.0)),
    }
}

pub fn table(projection: &Projection<'_>) -> Option<ViewBody> {
    let rows: Vec<ExecutorRow> = projection
        .normalized(EXECUTOR_ID_PATHS)
        .iter()
        .map(executor_row)
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(ViewBody::Executors(rows))
    }
}

pub fn summary(projection: &Projection<'_>) -> Option<ViewBody> {
    let payload = projection.classified.payload;
    if !payload.is_object() {
        return None;
    }

    let record = NormalizedRecord::from_value(payload, projection.fields);
    if record.is_empty() {
        return None;
    }

    let count = |name: &str| record.display(name).unwrap_or_else(|| "0".to_string());
    let bytes = |name: &str| format_bytes(record.number_or(name, 0.0));
    let seconds = |name: &str| format_seconds(record.number_or(name, 0.0));

    let completed = record.number_or("completed_tasks", 0.0);
    let failed = record.number_or("failed_tasks", 0.0);
    let success_rate = rate(completed, completed + failed);
    let gc_overhead = rate(
        record.number_or("total_gc_time", 0.0),
        record.number_or("total_duration", 0.0),
    );

    let tiles = vec![
        Kpi::new("Total Executors", count("total_executors")),
        Kpi::new("Active Executors", count("active_executors")),
        Kpi::new("Memory Used", bytes("memory_used")),
        Kpi::new("Disk Used", bytes("disk_used")),
        Kpi::new("Completed Tasks", count("completed_tasks")),
        Kpi::new("Failed Tasks", count("failed_tasks")),
        Kpi::new("Task Success Rate", format!("{:.1}%", success_rate)),
        Kpi::new("Total Duration", seconds("total_duration")),
        Kpi::new("GC Time", seconds("total_gc_time")),
        Kpi::new("GC Overhead", format!("{:.1}%", gc_overhead)),
        Kpi::new("Input", bytes("input_bytes")),
        Kpi::new("Shuffle Read", bytes("shuffle_read")),
        Kpi::new("Shuffle Write", bytes("shuffle_write")),
    ];

    Some(ViewBody::Kpis(KpiBoard {
        tiles,
        series: Vec::new(),
    }))
}
