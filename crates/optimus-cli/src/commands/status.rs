use crate::OutputFormat;
use crate::config::BridgeConfig;
use anyhow::{Context, Result};
use console::style;
use optimus_client::ToolTransport;
use serde_json::json;

pub fn execute(config: &BridgeConfig, format: OutputFormat) -> Result<()> {
    tracing::info!("Checking bridge at {}", config.url);

    let client = config.client()?;
    let runtime = tokio::runtime::Runtime::new()?;
    let status = runtime
        .block_on(client.status())
        .with_context(|| format!("Bridge at {} is unreachable", config.url))?;

    match format {
        OutputFormat::Json => {
            let report = json!({"bridge": config.url.as_str(), "connected": status.connected});
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!("Bridge,Connected");
            println!("{},{}", config.url, status.connected);
        }
        OutputFormat::Pretty => {
            let state = if status.connected {
                style("connected").green().bold()
            } else {
                style("not connected").yellow().bold()
            };
            println!("Bridge {} is up, History Server {}", config.url, state);
        }
    }

    Ok(())
}
