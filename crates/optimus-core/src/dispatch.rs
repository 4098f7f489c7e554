//! Tool name → {classifier, extractor, projector} dispatch.

use crate::classify::{ShapeTag, classify};
use crate::payload::{FieldSpec, ToolResult};
use crate::tools::Tool;
use crate::view::project::{self, Projection, Projector};
use crate::view::{EmptyState, ViewBody, ViewModel, ViewVariant};
use crate::{Error, Result};
use serde_json::Value;

/// Process-wide UI state owned by the shell, read but never written here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionContext {
    pub target_app_id: Option<String>,
}

impl SelectionContext {
    pub fn with_target(app_id: impl Into<String>) -> Self {
        Self {
            target_app_id: Some(app_id.into()),
        }
    }

    pub fn is_target(&self, app_id: &str) -> bool {
        self.target_app_id.as_deref() == Some(app_id)
    }
}

/// Notified when an application row's identifier is activated.
pub trait SelectionListener {
    fn on_select_application(&mut self, app_id: &str);
}

/// How one tool's results are interpreted.
#[derive(Clone, Copy)]
pub struct ToolHandler {
    pub variant: ViewVariant,
    pub fields: &'static [FieldSpec],
    pub project: Projector,
    pub empty_message: &'static str,
}

/// The dispatch table. Exhaustive over [`Tool`], so a new tool cannot be
/// added without deciding how it is shown.
pub fn handler(tool: Tool) -> ToolHandler {
    use project::*;

    fn entry(
        variant: ViewVariant,
        fields: &'static [FieldSpec],
        project: Projector,
        empty_message: &'static str,
    ) -> ToolHandler {
        ToolHandler {
            variant,
            fields,
            project,
            empty_message,
        }
    }

    match tool {
        Tool::ListApplications => entry(
            ViewVariant::ApplicationTable,
            applications::FIELDS,
            applications::table,
            "No applications found",
        ),
        Tool::GetApplication => entry(
            ViewVariant::ApplicationDetail,
            applications::FIELDS,
            applications::detail,
            "Application not found",
        ),
        Tool::GetEnvironment => entry(
            ViewVariant::EnvironmentKeyvalue,
            &[],
            environment::key_values,
            "No environment information available",
        ),
        Tool::ListJobs | Tool::ListSlowestJobs => entry(
            ViewVariant::JobTimeline,
            jobs::JOB_FIELDS,
            jobs::timeline,
            "No jobs found",
        ),
        Tool::ListStages | Tool::ListSlowestStages => entry(
            ViewVariant::StageTable,
            jobs::STAGE_FIELDS,
            jobs::stages,
            "No stages found",
        ),
        Tool::ListExecutors => entry(
            ViewVariant::ExecutorTable,
            executors::EXECUTOR_FIELDS,
            executors::table,
            "No executors found",
        ),
        Tool::GetExecutorSummary => entry(
            ViewVariant::ExecutorSummary,
            executors::SUMMARY_FIELDS,
            executors::summary,
            "No executor metrics available",
        ),
        Tool::GetResourceUsageTimeline => entry(
            ViewVariant::ResourceKpi,
            resources::FIELDS,
            resources::kpis,
            "No resource usage recorded",
        ),
        Tool::GetJobBottlenecks => entry(
            ViewVariant::BottleneckList,
            bottlenecks::FIELDS,
            bottlenecks::findings,
            "No bottlenecks detected",
        ),
        Tool::ListSlowestSqlQueries => entry(
            ViewVariant::SqlSlowList,
            sql::FIELDS,
            sql::slow_list,
            "No SQL queries found",
        ),
        Tool::CompareJobEnvironments => entry(
            ViewVariant::EnvironmentDiff,
            &[],
            environment::diff,
            "No configuration differences to show",
        ),
        Tool::CompareJobPerformance => entry(
            ViewVariant::PerformanceScorecard,
            performance::FIELDS,
            performance::scorecard,
            "Comparison data unavailable",
        ),
        Tool::CompareSqlExecutionPlans => entry(
            ViewVariant::OperatorDiff,
            &[],
            plans::operator_diff,
            "No execution plan operators to compare",
        ),
    }
}

/// Total: any unrecognized tool name selects the raw-fallback view.
pub fn select(tool_name: &str) -> ViewVariant {
    Tool::from_name(tool_name)
        .map(|tool| handler(tool).variant)
        .unwrap_or(ViewVariant::RawFallback)
}

/// Classify, extract and project one tool result into a renderable view.
///
/// Always produces a view: schema mismatches become empty states and unknown
/// tools the raw payload.
pub fn interpret(result: &ToolResult, context: &SelectionContext) -> ViewModel {
    tracing::debug!("Interpreting result of {}", result.name);

    let null = Value::Null;
    let payload = result.payload.as_ref().unwrap_or(&null);
    let tool = Tool::from_name(&result.name);
    let classified = classify(tool, payload);

    let Some(tool) = tool else {
        tracing::info!("Unrecognized tool {}, showing raw payload", result.name);
        let projection = Projection {
            classified,
            fields: &[],
            context,
        };
        return ViewModel {
            tool: result.name.clone(),
            variant: ViewVariant::RawFallback,
            shape: classified.shape,
            body: project::raw(&projection).unwrap_or(ViewBody::Raw(Value::Null)),
        };
    };

    let handler = handler(tool);
    let body = if classified.shape == ShapeTag::Empty {
        None
    } else {
        let projection = Projection {
            classified,
            fields: handler.fields,
            context,
        };
        (handler.project)(&projection)
    };

    let body = body.unwrap_or_else(|| {
        tracing::info!("{} returned no usable data ({})", tool, classified.shape.as_str());
        ViewBody::Empty(EmptyState::new(handler.empty_message))
    });

    ViewModel {
        tool: result.name.clone(),
        variant: handler.variant,
        shape: classified.shape,
        body,
    }
}

/// The view for a failed invocation: the transport's message, as-is.
pub fn transport_error(tool_name: &str, message: impl Into<String>) -> ViewModel {
    ViewModel {
        tool: tool_name.to_string(),
        variant: select(tool_name),
        shape: ShapeTag::Empty,
        body: ViewBody::Error(message.into()),
    }
}

/// Activate the identifier of application row `index`, notifying `listener`.
pub fn activate_row(
    view: &ViewModel,
    index: usize,
    listener: &mut dyn SelectionListener,
) -> Result<String> {
    let ViewBody::Applications(rows) = &view.body else {
        return Err(Error::NotSelectable(index));
    };
    let row = rows
        .get(index)
        .filter(|row| !row.id.is_empty())
        .ok_or(Error::NotSelectable(index))?;

    tracing::info!("Selected application {}", row.id);
    listener.on_select_application(&row.id);
    Ok(row.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_every_known_tool() {
        for tool in Tool::ALL {
            assert_ne!(select(tool.as_str()), ViewVariant::RawFallback, "{tool}");
        }
        assert_eq!(select("list_applications"), ViewVariant::ApplicationTable);
        assert_eq!(select("list_slowest_jobs"), ViewVariant::JobTimeline);
        assert_eq!(select("compare_sql_execution_plans"), ViewVariant::OperatorDiff);
    }

    #[test]
    fn test_unknown_tool_renders_payload_verbatim() {
        let result = ToolResult::new("foo_bar", json!({"x": 1}));
        let view = interpret(&result, &SelectionContext::default());

        assert_eq!(view.variant, ViewVariant::RawFallback);
        assert_eq!(view.body, ViewBody::Raw(json!({"x": 1})));
    }

    #[test]
    fn test_unknown_tool_without_payload() {
        let view = interpret(&ToolResult::empty("foo_bar"), &SelectionContext::default());
        assert_eq!(view.variant, ViewVariant::RawFallback);
        assert_eq!(view.body, ViewBody::Raw(Value::Null));
    }

    #[test]
    fn test_known_tool_with_empty_payload_is_empty_state() {
        for tool in Tool::ALL {
            for payload in [None, Some(json!({})), Some(json!([])), Some(json!("oops"))] {
                let result = ToolResult {
                    name: tool.as_str().to_string(),
                    payload,
                };
                let view = interpret(&result, &SelectionContext::default());
                assert_eq!(view.variant, handler(tool).variant);
                assert!(view.is_empty_state(), "{tool}: {:?}", view.body);
            }
        }
    }

    #[test]
    fn test_interpret_never_panics_on_odd_shapes() {
        let payloads = [
            json!([1, "two", null]),
            json!({"applications": "nope"}),
            json!({"app1": [], "app2": {}}),
            json!({"critical": "x", "warnings": 3}),
            json!({"summary": null, "timeline": {}}),
            json!({"spark_properties": []}),
        ];
        for tool in Tool::ALL {
            for payload in &payloads {
                let view = interpret(
                    &ToolResult::new(tool.as_str(), payload.clone()),
                    &SelectionContext::default(),
                );
                assert_eq!(view.variant, handler(tool).variant);
            }
        }
    }

    #[test]
    fn test_transport_error_view() {
        let view = transport_error("list_jobs", "connection refused");
        assert_eq!(view.variant, ViewVariant::JobTimeline);
        assert_eq!(view.body, ViewBody::Error("connection refused".to_string()));
    }

    struct Recorder(Vec<String>);

    impl SelectionListener for Recorder {
        fn on_select_application(&mut self, app_id: &str) {
            self.0.push(app_id.to_string());
        }
    }

    #[test]
    fn test_activate_row_notifies_listener() {
        let result = ToolResult::new(
            "list_applications",
            json!([{"id": "app-1"}, {"id": "app-2"}]),
        );
        let view = interpret(&result, &SelectionContext::default());
        let mut recorder = Recorder(Vec::new());

        assert_eq!(activate_row(&view, 1, &mut recorder).unwrap(), "app-2");
        assert!(activate_row(&view, 5, &mut recorder).is_err());
        assert_eq!(recorder.0, vec!["app-2".to_string()]);
    }

    #[test]
    fn test_activate_row_on_other_views_fails() {
        let view = interpret(&ToolResult::new("foo_bar", json!({})), &SelectionContext::default());
        let mut recorder = Recorder(Vec::new());
        assert!(activate_row(&view, 0, &mut recorder).is_err());
        assert!(recorder.0.is_empty());
    }
}
