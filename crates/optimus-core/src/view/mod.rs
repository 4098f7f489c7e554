//! View variants and the view-ready projections handed to a renderer.

mod model;
pub mod project;

pub use model::{
    ApplicationRow, Detail, DiffRow, DiffSection, DiffStatus, DiffTable, EmptyState, ExecutorRow,
    Finding, FindingCategory, JobPoint, KeyValue, KeyValueSection, Kpi, KpiBoard, ScoreRow,
    ScoreSide, Scorecard, SeriesPoint, SqlQueryRow, StageRow, ViewBody, ViewModel,
};

use serde::Serialize;

/// Presentation template chosen for a tool result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewVariant {
    ApplicationTable,
    JobTimeline,
    ApplicationDetail,
    StageTable,
    BottleneckList,
    ResourceKpi,
    ExecutorSummary,
    ExecutorTable,
    EnvironmentKeyvalue,
    SqlSlowList,
    EnvironmentDiff,
    PerformanceScorecard,
    OperatorDiff,
    RawFallback,
}

impl ViewVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewVariant::ApplicationTable => "application-table",
            ViewVariant::JobTimeline => "job-timeline",
            ViewVariant::ApplicationDetail => "application-detail",
            ViewVariant::StageTable => "stage-table",
            ViewVariant::BottleneckList => "bottleneck-list",
            ViewVariant::ResourceKpi => "resource-kpi",
            ViewVariant::ExecutorSummary => "executor-summary",
            ViewVariant::ExecutorTable => "executor-table",
            ViewVariant::EnvironmentKeyvalue => "environment-keyvalue",
            ViewVariant::SqlSlowList => "sql-slow-list",
            ViewVariant::EnvironmentDiff => "environment-diff",
            ViewVariant::PerformanceScorecard => "performance-scorecard",
            ViewVariant::OperatorDiff => "operator-diff",
            ViewVariant::RawFallback => "raw-fallback",
        }
    }
}

impl std::fmt::Display for ViewVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
