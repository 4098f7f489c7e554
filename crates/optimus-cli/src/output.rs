use crate::OutputFormat;
use anyhow::Result;
use console::style;
use optimus_core::metrics::Trend;
use optimus_core::view::{
    ApplicationRow, DiffStatus, DiffTable, Finding, FindingCategory, KpiBoard, Scorecard,
};
use optimus_core::{ViewBody, ViewModel, ViewVariant};
use std::fmt::Write;

pub fn title(variant: ViewVariant) -> &'static str {
    match variant {
        ViewVariant::ApplicationTable => "Applications",
        ViewVariant::ApplicationDetail => "Application",
        ViewVariant::EnvironmentKeyvalue => "Environment",
        ViewVariant::JobTimeline => "Job Timeline",
        ViewVariant::StageTable => "Stages",
        ViewVariant::ExecutorTable => "Executors",
        ViewVariant::ExecutorSummary => "Executor Summary",
        ViewVariant::ResourceKpi => "Resource Usage",
        ViewVariant::BottleneckList => "Bottlenecks",
        ViewVariant::SqlSlowList => "Slowest SQL Queries",
        ViewVariant::EnvironmentDiff => "Environment Comparison",
        ViewVariant::PerformanceScorecard => "Performance Comparison",
        ViewVariant::OperatorDiff => "Execution Plan Operators",
        ViewVariant::RawFallback => "Raw Result",
    }
}

/// Render a view in the requested format.
pub fn render(view: &ViewModel, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Table => render_table(view),
        OutputFormat::Pretty => render_pretty(view),
    }
}

fn render_pretty(view: &ViewModel) -> Result<String> {
    let mut out = String::new();
    let heading = format!("{} ({})", title(view.variant), view.tool);

    writeln!(out, "\n{}", style(&heading).bold().cyan())?;
    writeln!(out, "{}", style("=".repeat(heading.len())).cyan())?;

    match &view.body {
        ViewBody::Applications(rows) => pretty_applications(&mut out, rows)?,
        ViewBody::Detail(detail) => {
            writeln!(out, "\n{}", style(&detail.title).bold())?;
            let width = detail.fields.iter().map(|f| f.key.len()).max().unwrap_or(0);
            for field in &detail.fields {
                writeln!(out, "  {:<width$}  {}", field.key, field.value, width = width)?;
            }
        }
        ViewBody::Timeline(points) => {
            writeln!(out)?;
            for point in points {
                writeln!(
                    out,
                    "  {}  job {:<5} {:<10} {:>9}  tasks {:<12} {:>5.1}%  {}",
                    style(&point.submitted).dim(),
                    point.job_id,
                    point.status,
                    point.duration,
                    point.tasks,
                    point.success_rate,
                    point.name
                )?;
            }
        }
        ViewBody::Stages(rows) => {
            writeln!(out)?;
            for row in rows {
                writeln!(
                    out,
                    "  stage {}.{} {:<10} {:>9}  tasks {}  {}",
                    row.stage_id, row.attempt_id, row.status, row.duration, row.tasks, row.name
                )?;
                writeln!(
                    out,
                    "    {}",
                    style(format!(
                        "input {}  shuffle read {}  shuffle write {}  spill {}",
                        row.input, row.shuffle_read, row.shuffle_write, row.spill
                    ))
                    .dim()
                )?;
            }
        }
        ViewBody::Executors(rows) => {
            writeln!(out)?;
            for row in rows {
                let state = if row.active {
                    style("active").green()
                } else {
                    style("dead").dim()
                };
                writeln!(
                    out,
                    "  {:<8} {:<22} {:<6} cores {:<3} tasks {:<12} memory {} / {}  gc {}",
                    row.id,
                    row.host,
                    state,
                    row.cores,
                    row.tasks,
                    row.memory_used,
                    row.max_memory,
                    row.gc_time
                )?;
            }
        }
        ViewBody::Kpis(board) => pretty_kpis(&mut out, board)?,
        ViewBody::Findings(findings) => pretty_findings(&mut out, findings)?,
        ViewBody::SqlQueries(rows) => {
            writeln!(out)?;
            for (i, row) in rows.iter().enumerate() {
                writeln!(
                    out,
                    "  {}. [{}] query {} {} ({} jobs) - {}",
                    i + 1,
                    row.duration,
                    row.id,
                    row.status,
                    row.jobs,
                    row.description
                )?;
            }
        }
        ViewBody::KeyValues(sections) => {
            for section in sections {
                writeln!(out, "\n{}", style(format!("{}:", section.title)).bold())?;
                for entry in &section.entries {
                    writeln!(out, "  {} = {}", entry.key, entry.value)?;
                }
            }
        }
        ViewBody::Diff(table) => pretty_diff(&mut out, table)?,
        ViewBody::Scorecard(card) => pretty_scorecard(&mut out, card)?,
        ViewBody::Raw(value) => writeln!(out, "\n{}", serde_json::to_string_pretty(value)?)?,
        ViewBody::Empty(state) => writeln!(out, "\n{}", style(&state.message).yellow())?,
        ViewBody::Error(message) => {
            writeln!(out, "\n{} {}", style("Error:").red().bold(), message)?
        }
    }

    Ok(out)
}

fn pretty_applications(out: &mut String, rows: &[ApplicationRow]) -> Result<()> {
    writeln!(out)?;
    for (i, row) in rows.iter().enumerate() {
        let marker = if row.is_target { "*" } else { " " };
        writeln!(
            out,
            "{} {:>3}. {:<28} {:>10}  {:<9}  {:<12} {}",
            style(marker).green().bold(),
            i + 1,
            row.id,
            row.duration,
            row.status,
            row.user,
            row.name
        )?;
    }
    Ok(())
}

fn pretty_kpis(out: &mut String, board: &KpiBoard) -> Result<()> {
    if !board.tiles.is_empty() {
        writeln!(out)?;
        let width = board.tiles.iter().map(|t| t.label.len()).max().unwrap_or(0);
        for tile in &board.tiles {
            writeln!(out, "  {:<width$}  {}", tile.label, tile.value, width = width)?;
        }
    }

    if !board.series.is_empty() {
        writeln!(out, "\n{}", style("Timeline:").bold())?;
        for point in &board.series {
            writeln!(
                out,
                "  {}  {:<20} {}",
                style(&point.timestamp).dim(),
                point.label,
                point.value
            )?;
        }
    }
    Ok(())
}

fn category_tag(category: FindingCategory) -> console::StyledObject<&'static str> {
    match category {
        FindingCategory::Critical => style("[CRITICAL]").red().bold(),
        FindingCategory::Warning => style("[WARN]").yellow(),
        FindingCategory::Info => style("[INFO]").dim(),
        FindingCategory::General => style("[NOTE]"),
    }
}

fn pretty_findings(out: &mut String, findings: &[Finding]) -> Result<()> {
    writeln!(out)?;
    for finding in findings {
        writeln!(out, "  {} {}", category_tag(finding.category), finding.title)?;
        if let Some(detail) = &finding.detail {
            writeln!(out, "       {}", style(detail).dim())?;
        }
        if let Some(metric) = &finding.metric {
            writeln!(out, "       metric: {}", metric)?;
        }
        if let Some(recommendation) = &finding.recommendation {
            writeln!(out, "       → {}", recommendation)?;
        }
    }
    Ok(())
}

fn status_tag(status: DiffStatus) -> console::StyledObject<&'static str> {
    match status {
        DiffStatus::Changed => style("Changed").yellow().bold(),
        DiffStatus::Missing => style("Missing").red(),
        DiffStatus::New => style("New").green(),
        DiffStatus::Same => style("Same").dim(),
    }
}

fn pretty_diff(out: &mut String, table: &DiffTable) -> Result<()> {
    writeln!(out, "\n  {} vs {}", style(&table.app1).bold(), style(&table.app2).bold())?;
    let summary: Vec<String> = table
        .summary
        .iter()
        .map(|kv| format!("{}: {}", kv.key, kv.value))
        .collect();
    writeln!(out, "  {}", style(summary.join("  ")).dim())?;

    for section in &table.sections {
        writeln!(out, "\n{}", style(format!("{}:", section.title)).bold())?;
        for row in &section.rows {
            let a = row.a.as_deref().unwrap_or("-");
            let b = row.b.as_deref().unwrap_or("-");
            let delta = row
                .delta
                .filter(|d| *d != 0)
                .map(|d| format!(" ({:+})", d))
                .unwrap_or_default();
            writeln!(
                out,
                "  {:<9} {}: {} → {}{}",
                status_tag(row.status),
                row.key,
                a,
                b,
                delta
            )?;
        }
    }
    Ok(())
}

fn trend_tag(trend: Trend) -> console::StyledObject<&'static str> {
    match trend {
        Trend::Improved => style("improved").green(),
        Trend::Regressed => style("regressed").red(),
        Trend::Neutral => style("neutral").dim(),
    }
}

fn pretty_scorecard(out: &mut String, card: &Scorecard) -> Result<()> {
    writeln!(out, "\n{}", style("Efficiency Score:").bold())?;
    writeln!(out, "  App 1  {:<28} {}", card.app1.name, card.app1.score)?;
    writeln!(out, "  App 2  {:<28} {}", card.app2.name, card.app2.score)?;
    writeln!(out, "  Winner: {}", style(card.winner.as_str()).green().bold())?;

    writeln!(out, "\n{}", style("Metrics:").bold())?;
    for row in &card.rows {
        writeln!(
            out,
            "  {:<14} {:>12} {:>12}  x{:<6} {}",
            row.metric,
            row.app1,
            row.app2,
            row.ratio,
            trend_tag(row.trend)
        )?;
    }
    Ok(())
}

/// Quote a CSV field when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line(out: &mut String, fields: &[&str]) -> Result<()> {
    let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", line.join(","))?;
    Ok(())
}

fn render_table(view: &ViewModel) -> Result<String> {
    let mut out = String::new();

    match &view.body {
        ViewBody::Applications(rows) => {
            csv_line(&mut out, &["ID", "Name", "Duration", "Status", "User", "Started", "Target"])?;
            for row in rows {
                csv_line(
                    &mut out,
                    &[
                        row.id.as_str(),
                        &row.name,
                        &row.duration,
                        &row.status,
                        &row.user,
                        &row.started,
                        if row.is_target { "yes" } else { "" },
                    ],
                )?;
            }
        }
        ViewBody::Detail(detail) => {
            csv_line(&mut out, &["Field", "Value"])?;
            for field in &detail.fields {
                csv_line(&mut out, &[&field.key, &field.value])?;
            }
        }
        ViewBody::Timeline(points) => {
            csv_line(
                &mut out,
                &["Job ID", "Name", "Status", "Submitted", "Duration", "Tasks", "Success Rate"],
            )?;
            for p in points {
                let rate = format!("{:.1}", p.success_rate);
                csv_line(
                    &mut out,
                    &[&p.job_id, &p.name, &p.status, &p.submitted, &p.duration, &p.tasks, &rate],
                )?;
            }
        }
        ViewBody::Stages(rows) => {
            csv_line(
                &mut out,
                &[
                    "Stage ID",
                    "Attempt",
                    "Name",
                    "Status",
                    "Duration",
                    "Tasks",
                    "Input",
                    "Shuffle Read",
                    "Shuffle Write",
                    "Spill",
                ],
            )?;
            for r in rows {
                csv_line(
                    &mut out,
                    &[
                        &r.stage_id,
                        &r.attempt_id,
                        &r.name,
                        &r.status,
                        &r.duration,
                        &r.tasks,
                        &r.input,
                        &r.shuffle_read,
                        &r.shuffle_write,
                        &r.spill,
                    ],
                )?;
            }
        }
        ViewBody::Executors(rows) => {
            csv_line(
                &mut out,
                &[
                    "ID",
                    "Host",
                    "Active",
                    "Cores",
                    "Tasks",
                    "Memory Used",
                    "Max Memory",
                    "GC Time",
                    "Duration",
                ],
            )?;
            for r in rows {
                let active = r.active.to_string();
                let cores = r.cores.to_string();
                csv_line(
                    &mut out,
                    &[
                        &r.id,
                        &r.host,
                        &active,
                        &cores,
                        &r.tasks,
                        &r.memory_used,
                        &r.max_memory,
                        &r.gc_time,
                        &r.duration,
                    ],
                )?;
            }
        }
        ViewBody::Kpis(board) => {
            csv_line(&mut out, &["Metric", "Value"])?;
            for tile in &board.tiles {
                csv_line(&mut out, &[&tile.label, &tile.value])?;
            }
            if !board.series.is_empty() {
                writeln!(out)?;
                csv_line(&mut out, &["Timestamp", "Event", "Value"])?;
                for point in &board.series {
                    csv_line(
                        &mut out,
                        &[&point.timestamp, &point.label, &point.value.to_string()],
                    )?;
                }
            }
        }
        ViewBody::Findings(findings) => {
            csv_line(&mut out, &["Category", "Title", "Detail", "Metric", "Recommendation"])?;
            for f in findings {
                csv_line(
                    &mut out,
                    &[
                        f.category.as_str(),
                        &f.title,
                        f.detail.as_deref().unwrap_or(""),
                        f.metric.as_deref().unwrap_or(""),
                        f.recommendation.as_deref().unwrap_or(""),
                    ],
                )?;
            }
        }
        ViewBody::SqlQueries(rows) => {
            csv_line(&mut out, &["ID", "Description", "Status", "Duration", "Jobs"])?;
            for r in rows {
                csv_line(&mut out, &[&r.id, &r.description, &r.status, &r.duration, &r.jobs])?;
            }
        }
        ViewBody::KeyValues(sections) => {
            csv_line(&mut out, &["Section", "Key", "Value"])?;
            for section in sections {
                for entry in &section.entries {
                    csv_line(&mut out, &[&section.title, &entry.key, &entry.value])?;
                }
            }
        }
        ViewBody::Diff(table) => {
            csv_line(&mut out, &["Section", "Key", "App 1", "App 2", "Status", "Delta"])?;
            for section in &table.sections {
                for row in &section.rows {
                    let delta = row.delta.map(|d| d.to_string()).unwrap_or_default();
                    csv_line(
                        &mut out,
                        &[
                            section.title.as_str(),
                            &row.key,
                            row.a.as_deref().unwrap_or(""),
                            row.b.as_deref().unwrap_or(""),
                            row.status.as_str(),
                            &delta,
                        ],
                    )?;
                }
            }
        }
        ViewBody::Scorecard(card) => {
            csv_line(&mut out, &["Metric", "App 1", "App 2", "Ratio", "Trend"])?;
            csv_line(
                &mut out,
                &[
                    "Efficiency Score",
                    &card.app1.score.to_string(),
                    &card.app2.score.to_string(),
                    "",
                    card.winner.as_str(),
                ],
            )?;
            for row in &card.rows {
                csv_line(
                    &mut out,
                    &[&row.metric, &row.app1, &row.app2, &row.ratio, row.trend.as_str()],
                )?;
            }
        }
        ViewBody::Raw(value) => writeln!(out, "{}", serde_json::to_string_pretty(value)?)?,
        ViewBody::Empty(state) => {
            csv_line(&mut out, &["Message"])?;
            csv_line(&mut out, &[&state.message])?;
        }
        ViewBody::Error(message) => {
            csv_line(&mut out, &["Error"])?;
            csv_line(&mut out, &[message])?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use optimus_core::dispatch::transport_error;
    use optimus_core::{SelectionContext, ToolResult, interpret};
    use serde_json::json;

    fn pretty(view: &ViewModel) -> String {
        console::strip_ansi_codes(&render(view, OutputFormat::Pretty).unwrap()).into_owned()
    }

    fn applications() -> ViewModel {
        interpret(
            &ToolResult::new(
                "list_applications",
                json!([
                    {"id": "app-1", "name": "Nightly, ETL", "attempts": [{"duration": 120000, "completed": true}]},
                    {"id": "app-2", "name": "Adhoc"}
                ]),
            ),
            &SelectionContext::with_target("app-2"),
        )
    }

    #[test]
    fn test_pretty_lists_rows_with_target_marker() {
        let text = pretty(&applications());
        assert!(text.contains("Applications (list_applications)"));
        assert!(text.contains("app-1"));
        assert!(text.contains("120.0s"));
        assert!(text.contains("Completed"));
        let target_line = text.lines().find(|l| l.contains("app-2")).unwrap();
        assert!(target_line.starts_with('*'));
    }

    #[test]
    fn test_table_quotes_fields() {
        let text = render(&applications(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID,Name,Duration,Status,User,Started,Target");
        assert_eq!(lines[1], "app-1,\"Nightly, ETL\",120.0s,Completed,N/A,N/A,");
        assert!(lines[2].ends_with(",yes"));
    }

    #[test]
    fn test_json_is_the_view_model() {
        let text = render(&applications(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["variant"], "application-table");
        assert_eq!(value["body"]["kind"], "applications");
        assert_eq!(value["body"]["data"][0]["duration"], "120.0s");
    }

    #[test]
    fn test_error_and_empty_states() {
        let error = transport_error("list_jobs", "connection refused");
        assert!(pretty(&error).contains("Error: connection refused"));
        assert_eq!(
            render(&error, OutputFormat::Table).unwrap(),
            "Error\nconnection refused\n"
        );

        let empty = interpret(
            &ToolResult::new("get_job_bottlenecks", json!({})),
            &SelectionContext::default(),
        );
        assert!(pretty(&empty).contains("No bottlenecks detected"));
    }

    #[test]
    fn test_diff_rows() {
        let view = interpret(
            &ToolResult::new(
                "compare_job_environments",
                json!({"spark_properties": {"different": {"spark.executor.memory": {"app1": "4g", "app2": "8g"}}}}),
            ),
            &SelectionContext::default(),
        );
        assert!(pretty(&view).contains("spark.executor.memory: 4g → 8g"));

        let table = render(&view, OutputFormat::Table).unwrap();
        assert!(table.contains("Spark Properties,spark.executor.memory,4g,8g,Changed,"));
    }
}
