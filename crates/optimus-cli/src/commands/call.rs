use super::show;
use crate::config::BridgeConfig;
use crate::state::SelectionStore;
use crate::{OutputFormat, Severity};
use anyhow::{Context, Result, bail};
use console::style;
use indicatif::ProgressBar;
use optimus_client::{Outcome, ToolSession};
use optimus_core::dispatch::transport_error;
use optimus_core::{Tool, activate_row, interpret};
use serde_json::{Map, Value};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Parse `KEY=VALUE` pairs into tool arguments. Integers and `true`/`false`
/// keep their JSON type, everything else is passed as a string.
pub fn parse_arguments(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut arguments = Map::new();

    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Invalid argument '{}': expected KEY=VALUE", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid argument '{}': empty key", pair);
        }

        let value = if let Ok(n) = raw.parse::<i64>() {
            Value::from(n)
        } else {
            match raw {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(raw.to_string()),
            }
        };
        arguments.insert(key.to_string(), value);
    }

    Ok(arguments)
}

/// Fill `app_id` from the selected application and check that every
/// required argument of a known tool is present.
pub fn complete_arguments(
    tool: &str,
    arguments: &mut Map<String, Value>,
    target: Option<&str>,
) -> Result<()> {
    let Some(known) = Tool::from_name(tool) else {
        tracing::warn!("{} is not a recognized tool; its result will be shown raw", tool);
        return Ok(());
    };

    let required = known.required_args();
    if required.contains(&"app_id")
        && !arguments.contains_key("app_id")
        && let Some(target) = target
    {
        tracing::debug!("Using selected application {}", target);
        arguments.insert("app_id".to_string(), Value::String(target.to_string()));
    }

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !arguments.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        bail!(
            "{} requires {}. Pass them as KEY=VALUE{}",
            tool,
            missing.join(", "),
            if missing.contains(&"app_id") {
                " or pick an application with `optimus select <APP_ID>`"
            } else {
                ""
            }
        );
    }

    Ok(())
}

/// Call `tool` and render its result. A failed call renders the error view
/// and yields a failing exit code; nothing further is reported.
pub fn execute(
    tool: &str,
    args: &[String],
    severity: Option<Severity>,
    select: Option<usize>,
    config: &BridgeConfig,
    state_dir: &Path,
    format: OutputFormat,
) -> Result<ExitCode> {
    let mut store = SelectionStore::open(state_dir)?;
    let mut arguments = parse_arguments(args)?;
    complete_arguments(tool, &mut arguments, store.target())?;

    tracing::info!("Calling {} on {}", tool, config.url);
    let session = ToolSession::new(Arc::new(config.client()?));

    let spinner = (format == OutputFormat::Pretty).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Calling {}", tool));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(session.call(tool, arguments));

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let result = match outcome {
        Ok(Outcome::Current(result)) => result,
        // One call per session here, so nothing newer can win the race
        Ok(Outcome::Superseded) => bail!("Call to {} was superseded by a newer call", tool),
        Err(e) => {
            tracing::debug!("Tool call {} failed: {:?}", tool, e);
            show(transport_error(tool, e.to_string()), None, format)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let view = show(interpret(&result, &store.context()), severity, format)?;

    if let Some(row) = select {
        if row == 0 {
            bail!("Rows are numbered from 1");
        }
        let app_id = activate_row(&view, row - 1, &mut store)
            .with_context(|| format!("Cannot select row {}", row))?;
        store.save()?;
        println!("\n{} {}", style("Selected application").green(), style(app_id).bold());
    }

    Ok(ExitCode::SUCCESS)
}
