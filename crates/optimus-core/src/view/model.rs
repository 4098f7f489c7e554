use super::ViewVariant;
use crate::classify::ShapeTag;
use crate::metrics::{Trend, Winner};
use serde::Serialize;
use serde_json::Value;

/// A fully projected result: what to draw and with which template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub tool: String,
    pub variant: ViewVariant,
    pub shape: ShapeTag,
    pub body: ViewBody,
}

impl ViewModel {
    pub fn is_empty_state(&self) -> bool {
        matches!(self.body, ViewBody::Empty(_))
    }

    /// Keep only findings matching `keep`; an emptied list becomes the empty state.
    pub fn retain_findings(&mut self, keep: impl Fn(&Finding) -> bool) {
        if let ViewBody::Findings(findings) = &mut self.body {
            findings.retain(|f| keep(f));
            if findings.is_empty() {
                self.body = ViewBody::Empty(EmptyState::new("No bottlenecks match the filter"));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ViewBody {
    Applications(Vec<ApplicationRow>),
    Detail(Detail),
    Timeline(Vec<JobPoint>),
    Stages(Vec<StageRow>),
    Executors(Vec<ExecutorRow>),
    Kpis(KpiBoard),
    Findings(Vec<Finding>),
    SqlQueries(Vec<SqlQueryRow>),
    KeyValues(Vec<KeyValueSection>),
    Diff(DiffTable),
    Scorecard(Scorecard),
    Raw(Value),
    Empty(EmptyState),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyState {
    pub message: String,
}

impl EmptyState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRow {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub duration_ms: f64,
    pub status: String,
    pub user: String,
    pub started: String,
    pub is_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub title: String,
    pub fields: Vec<KeyValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPoint {
    pub job_id: String,
    pub name: String,
    pub status: String,
    pub submitted: String,
    pub submitted_ms: Option<i64>,
    pub duration: String,
    pub tasks: String,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRow {
    pub stage_id: String,
    pub attempt_id: String,
    pub name: String,
    pub status: String,
    pub duration: String,
    pub tasks: String,
    pub input: String,
    pub shuffle_read: String,
    pub shuffle_write: String,
    pub spill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutorRow {
    pub id: String,
    pub host: String,
    pub active: bool,
    pub cores: i64,
    pub tasks: String,
    pub memory_used: String,
    pub max_memory: String,
    pub gc_time: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

impl Kpi {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: String,
    pub timestamp_ms: Option<i64>,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiBoard {
    pub tiles: Vec<Kpi>,
    pub series: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Critical,
    Warning,
    Info,
    General,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::Critical => "critical",
            FindingCategory::Warning => "warning",
            FindingCategory::Info => "info",
            FindingCategory::General => "general",
        }
    }

    /// Category named by a severity label, if it names one.
    pub fn from_severity(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" | "high" | "error" => Some(FindingCategory::Critical),
            "warning" | "warnings" | "medium" | "warn" => Some(FindingCategory::Warning),
            "info" | "low" | "suggestion" => Some(FindingCategory::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub title: String,
    pub detail: Option<String>,
    pub metric: Option<String>,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlQueryRow {
    pub id: String,
    pub description: String,
    pub status: String,
    pub duration: String,
    pub duration_ms: f64,
    pub jobs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValueSection {
    pub title: String,
    pub entries: Vec<KeyValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiffStatus {
    Changed,
    Missing,
    New,
    Same,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Changed => "Changed",
            DiffStatus::Missing => "Missing",
            DiffStatus::New => "New",
            DiffStatus::Same => "Same",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffRow {
    pub key: String,
    pub a: Option<String>,
    pub b: Option<String>,
    pub status: DiffStatus,
    pub delta: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffSection {
    pub title: String,
    pub rows: Vec<DiffRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffTable {
    pub app1: String,
    pub app2: String,
    pub summary: Vec<KeyValue>,
    pub sections: Vec<DiffSection>,
}

impl DiffTable {
    pub fn rows(&self) -> impl Iterator<Item = &DiffRow> {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSide {
    pub id: String,
    pub name: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub metric: String,
    pub app1: String,
    pub app2: String,
    pub ratio: String,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub app1: ScoreSide,
    pub app2: ScoreSide,
    pub winner: Winner,
    pub rows: Vec<ScoreRow>,
}
