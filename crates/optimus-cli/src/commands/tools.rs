use crate::OutputFormat;
use crate::config::BridgeConfig;
use anyhow::Result;
use console::style;
use optimus_client::{RemoteTool, ToolTransport};
use optimus_core::Tool;
use optimus_core::dispatch::select;
use serde::Serialize;

/// One row of the tool listing.
#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub view: String,
    pub required: Vec<String>,
    pub description: String,
}

/// The tools this build knows how to interpret.
pub fn known_tools() -> Vec<ToolInfo> {
    Tool::ALL
        .into_iter()
        .map(|tool| ToolInfo {
            name: tool.as_str().to_string(),
            view: select(tool.as_str()).as_str().to_string(),
            required: tool.required_args().iter().map(|s| s.to_string()).collect(),
            description: tool.description().to_string(),
        })
        .collect()
}

/// Tools advertised by the bridge, with the view each would get.
pub fn remote_tools(remote: Vec<RemoteTool>) -> Vec<ToolInfo> {
    remote
        .into_iter()
        .map(|tool| {
            let known = Tool::from_name(&tool.name);
            ToolInfo {
                view: select(&tool.name).as_str().to_string(),
                required: known
                    .map(|t| t.required_args().iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default(),
                description: tool
                    .description
                    .or_else(|| known.map(|t| t.description().to_string()))
                    .unwrap_or_default(),
                name: tool.name,
            }
        })
        .collect()
}

pub fn execute(remote: bool, config: &BridgeConfig, format: OutputFormat) -> Result<()> {
    let tools = if remote {
        tracing::info!("Listing tools advertised by {}", config.url);
        let client = config.client()?;
        let runtime = tokio::runtime::Runtime::new()?;
        remote_tools(runtime.block_on(client.list_tools())?)
    } else {
        known_tools()
    };

    match format {
        OutputFormat::Json => output_json(&tools)?,
        OutputFormat::Table => output_table(&tools),
        OutputFormat::Pretty => output_pretty(&tools),
    }

    Ok(())
}

fn output_json(tools: &[ToolInfo]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(tools)?);
    Ok(())
}

fn output_table(tools: &[ToolInfo]) {
    println!("Tool,View,Required,Description");
    for tool in tools {
        println!(
            "{},{},{},\"{}\"",
            tool.name,
            tool.view,
            tool.required.join(" "),
            tool.description.replace('"', "\"\"")
        );
    }
}

fn output_pretty(tools: &[ToolInfo]) {
    println!("\n{}", style("Tools").bold().cyan());
    println!("{}", style("=====").cyan());

    let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for tool in tools {
        let view = if tool.view == "raw-fallback" {
            style(tool.view.as_str()).dim()
        } else {
            style(tool.view.as_str()).green()
        };
        println!("  {:<width$}  {}", tool.name, view, width = width);
        if !tool.description.is_empty() {
            println!("  {:<width$}  {}", "", style(&tool.description).dim(), width = width);
        }
        if !tool.required.is_empty() {
            println!(
                "  {:<width$}  requires: {}",
                "",
                tool.required.join(", "),
                width = width
            );
        }
    }
}
