use super::Projection;
use crate::classify::COMPARISON_CONTAINERS;
use crate::metrics::{
    EfficiencyInputs, efficiency_score, format_bytes, format_seconds, ratio, trend, winner,
};
use crate::payload::{self, FieldSpec, NormalizedRecord};
use crate::view::{ScoreRow, ScoreSide, Scorecard, ViewBody};
use serde_json::Value;

pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", &["id", "app_id", "application_id"]),
    FieldSpec::text("name", &["name", "app_name"]),
    FieldSpec::number(
        "duration_ms",
        &[
            "duration",
            "total_duration",
            "duration_ms",
            "total_duration_ms",
            "attempts.0.duration",
        ],
    ),
    FieldSpec::number("total_tasks", &["total_tasks", "task_count", "tasks", "totalTasks"]),
    FieldSpec::number("completed_tasks", &["completed_tasks", "completedTasks"]),
    FieldSpec::number("gc_time_ms", &["total_gc_time", "gc_time", "totalGCTime"]),
    FieldSpec::number(
        "shuffle_read",
        &["total_shuffle_read", "shuffle_read_bytes", "totalShuffleRead"],
    ),
    FieldSpec::number(
        "shuffle_write",
        &["total_shuffle_write", "shuffle_write_bytes", "totalShuffleWrite"],
    ),
];

/// Every record describing `side`, the classified container first. Metrics
/// for one side are often split across several containers.
fn side_records<'a>(projection: &Projection<'a>, side: &str) -> Vec<&'a Value> {
    let root = projection.classified.root;
    let mut records: Vec<&'a Value> = Vec::new();

    let mut push = |value: Option<&'a Value>| {
        if let Some(value) = value.filter(|v| v.is_object())
            && !records.iter().any(|r| std::ptr::eq(*r, value))
        {
            records.push(value);
        }
    };

    push(projection.classified.payload.get(side));
    for container in COMPARISON_CONTAINERS {
        push(root.get(*container).and_then(|c| c.get(side)));
    }
    push(payload::resolve(root, &format!("applications.{}", side)));
    push(root.get(side));

    records
}

struct Side {
    record: NormalizedRecord,
    duration_ms: f64,
    perf: EfficiencyInputs,
    shuffle_bytes: f64,
}

impl Side {
    fn new(records: &[&Value], fields: &[FieldSpec]) -> Option<Self> {
        let record = NormalizedRecord::from_values(records, fields);
        if record.is_empty() {
            return None;
        }

        let total_tasks = record.number_or("total_tasks", 0.0);
        let perf = EfficiencyInputs {
            gc_time_ms: record.number_or("gc_time_ms", 0.0),
            // finished applications often report only the total
            completed_tasks: record.number_or("completed_tasks", total_tasks),
            total_tasks,
        };

        Some(Self {
            duration_ms: record.number_or("duration_ms", 0.0),
            shuffle_bytes: record.number_or("shuffle_read", 0.0)
                + record.number_or("shuffle_write", 0.0),
            perf,
            record,
        })
    }

    fn score(&self) -> i64 {
        efficiency_score(self.duration_ms, &self.perf)
    }

    fn identity(&self, fallback: &str) -> (String, String) {
        let id = self.record.text_or("id", fallback);
        let name = self.record.text_or("name", &id);
        (id, name)
    }
}

fn score_row(metric: &str, v1: f64, v2: f64, display: fn(f64) -> String) -> ScoreRow {
    ScoreRow {
        metric: metric.to_string(),
        app1: display(v1),
        app2: display(v2),
        ratio: ratio(v1, v2),
        trend: trend(v1, v2),
    }
}

fn count(value: f64) -> String {
    format!("{}", value as i64)
}

pub fn scorecard(projection: &Projection<'_>) -> Option<ViewBody> {
    let side1 = Side::new(&side_records(projection, "app1"), projection.fields)?;
    let side2 = Side::new(&side_records(projection, "app2"), projection.fields)?;

    let (score1, score2) = (side1.score(), side2.score());
    let (id1, name1) = side1.identity("App 1");
    let (id2, name2) = side2.identity("App 2");

    tracing::debug!("Efficiency scores {} vs {}", score1, score2);

    let rows = vec![
        score_row("Duration", side1.duration_ms, side2.duration_ms, format_seconds),
        score_row(
            "Tasks",
            side1.perf.total_tasks,
            side2.perf.total_tasks,
            count,
        ),
        score_row(
            "Shuffle bytes",
            side1.shuffle_bytes,
            side2.shuffle_bytes,
            format_bytes,
        ),
        score_row(
            "GC time",
            side1.perf.gc_time_ms,
            side2.perf.gc_time_ms,
            format_seconds,
        ),
    ];

    Some(ViewBody::Scorecard(Scorecard {
        app1: ScoreSide {
            id: id1,
            name: name1,
            score: score1,
        },
        app2: ScoreSide {
            id: id2,
            name: name2,
            score: score2,
        },
        winner: winner(score1, score2),
        rows,
    }))
}
