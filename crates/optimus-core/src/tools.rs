use serde::{Deserialize, Serialize};

/// The tool names the dashboard knows how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    ListApplications,
    GetApplication,
    GetEnvironment,
    ListJobs,
    ListSlowestJobs,
    ListStages,
    ListSlowestStages,
    ListExecutors,
    GetExecutorSummary,
    GetResourceUsageTimeline,
    GetJobBottlenecks,
    ListSlowestSqlQueries,
    CompareJobEnvironments,
    CompareJobPerformance,
    CompareSqlExecutionPlans,
}

impl Tool {
    pub const ALL: [Tool; 15] = [
        Tool::ListApplications,
        Tool::GetApplication,
        Tool::GetEnvironment,
        Tool::ListJobs,
        Tool::ListSlowestJobs,
        Tool::ListStages,
        Tool::ListSlowestStages,
        Tool::ListExecutors,
        Tool::GetExecutorSummary,
        Tool::GetResourceUsageTimeline,
        Tool::GetJobBottlenecks,
        Tool::ListSlowestSqlQueries,
        Tool::CompareJobEnvironments,
        Tool::CompareJobPerformance,
        Tool::CompareSqlExecutionPlans,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::ListApplications => "list_applications",
            Tool::GetApplication => "get_application",
            Tool::GetEnvironment => "get_environment",
            Tool::ListJobs => "list_jobs",
            Tool::ListSlowestJobs => "list_slowest_jobs",
            Tool::ListStages => "list_stages",
            Tool::ListSlowestStages => "list_slowest_stages",
            Tool::ListExecutors => "list_executors",
            Tool::GetExecutorSummary => "get_executor_summary",
            Tool::GetResourceUsageTimeline => "get_resource_usage_timeline",
            Tool::GetJobBottlenecks => "get_job_bottlenecks",
            Tool::ListSlowestSqlQueries => "list_slowest_sql_queries",
            Tool::CompareJobEnvironments => "compare_job_environments",
            Tool::CompareJobPerformance => "compare_job_performance",
            Tool::CompareSqlExecutionPlans => "compare_sql_execution_plans",
        }
    }

    /// Look up a tool by its wire name. Unknown names are `None`.
    pub fn from_name(name: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.as_str() == name.trim())
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Tool::CompareJobEnvironments
                | Tool::CompareJobPerformance
                | Tool::CompareSqlExecutionPlans
        )
    }

    /// Property names under which a wrapped payload carries the primary collection.
    pub fn collection_keys(&self) -> &'static [&'static str] {
        match self {
            Tool::ListApplications => &["applications", "apps"],
            Tool::ListJobs | Tool::ListSlowestJobs => &["jobs"],
            Tool::ListStages | Tool::ListSlowestStages => &["stages"],
            Tool::ListExecutors => &["executors"],
            Tool::ListSlowestSqlQueries => &["queries", "sql_queries", "executions"],
            Tool::GetApplication => &["application"],
            Tool::GetEnvironment => &["environment"],
            Tool::GetExecutorSummary
            | Tool::GetResourceUsageTimeline
            | Tool::GetJobBottlenecks
            | Tool::CompareJobEnvironments
            | Tool::CompareJobPerformance
            | Tool::CompareSqlExecutionPlans => &[],
        }
    }

    /// Arguments the tool cannot run without.
    pub fn required_args(&self) -> &'static [&'static str] {
        match self {
            Tool::ListApplications => &[],
            Tool::CompareJobEnvironments
            | Tool::CompareJobPerformance
            | Tool::CompareSqlExecutionPlans => &["app_id1", "app_id2"],
            _ => &["app_id"],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::ListApplications => "List applications known to the History Server",
            Tool::GetApplication => "Show one application's details",
            Tool::GetEnvironment => "Show an application's runtime and Spark properties",
            Tool::ListJobs => "List jobs of an application",
            Tool::ListSlowestJobs => "List the slowest jobs of an application",
            Tool::ListStages => "List stages of an application",
            Tool::ListSlowestStages => "List the slowest stages of an application",
            Tool::ListExecutors => "List executors of an application",
            Tool::GetExecutorSummary => "Aggregate executor metrics of an application",
            Tool::GetResourceUsageTimeline => "Executor allocation timeline of an application",
            Tool::GetJobBottlenecks => "Identify performance bottlenecks of an application",
            Tool::ListSlowestSqlQueries => "List the slowest SQL queries of an application",
            Tool::CompareJobEnvironments => "Diff the configuration of two applications",
            Tool::CompareJobPerformance => "Score and compare the performance of two applications",
            Tool::CompareSqlExecutionPlans => "Diff the SQL plan operators of two applications",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip_for_every_tool() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.as_str()), Some(tool));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Tool::from_name("foo_bar"), None);
        assert_eq!(Tool::from_name(""), None);
    }

    #[test]
    fn test_comparison_tools_need_two_apps() {
        let comparisons: Vec<Tool> = Tool::ALL
            .into_iter()
            .filter(|t| t.is_comparison())
            .collect();
        assert_eq!(comparisons.len(), 3);
        for tool in comparisons {
            assert_eq!(tool.required_args(), &["app_id1", "app_id2"]);
        }
        assert!(Tool::ListApplications.required_args().is_empty());
        assert_eq!(Tool::ListJobs.required_args(), &["app_id"]);
    }
}
