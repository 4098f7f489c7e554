use super::show;
use crate::state::SelectionStore;
use crate::{OutputFormat, Severity};
use anyhow::{Context, Result};
use optimus_client::decode_call_response;
use optimus_core::{PayloadReader, ToolResult, ViewModel, interpret};
use serde_json::Value;
use std::io;
use std::path::Path;

/// Read a saved payload. `None` or `-` reads stdin.
pub fn load_payload(file: Option<&Path>) -> Result<Value> {
    match file {
        Some(path) if path != Path::new("-") => {
            tracing::debug!("Reading payload file: {}", path.display());
            PayloadReader::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))
        }
        _ => {
            tracing::debug!("Reading payload from stdin");
            Ok(PayloadReader::from_reader(io::stdin().lock())?)
        }
    }
}

/// A saved bridge response (`{"result": [...], "isError": ..}`) is unwrapped
/// the same way a live call would be.
fn unwrap_envelope(tool: &str, payload: Value) -> Result<Value> {
    let is_envelope = payload
        .as_object()
        .is_some_and(|obj| obj.contains_key("result") && obj.contains_key("isError"));
    if !is_envelope {
        return Ok(payload);
    }

    tracing::debug!("Unwrapping bridge response envelope");
    let body = serde_json::to_vec(&payload)?;
    Ok(decode_call_response(tool, &body)?)
}

/// Interpret a payload as the result of `tool`.
pub fn render_payload(tool: &str, payload: Value, store: &SelectionStore) -> Result<ViewModel> {
    let payload = unwrap_envelope(tool, payload)?;
    let result = if payload.is_null() {
        ToolResult::empty(tool)
    } else {
        ToolResult::new(tool, payload)
    };
    Ok(interpret(&result, &store.context()))
}

pub fn execute(
    tool: &str,
    file: Option<&Path>,
    severity: Option<Severity>,
    state_dir: &Path,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Rendering saved result of {}", tool);

    let store = SelectionStore::open(state_dir)?;
    let payload = load_payload(file)?;
    let view = render_payload(tool, payload, &store)?;
    show(view, severity, format)?;

    Ok(())
}
