use crate::OutputFormat;
use crate::state::SelectionStore;
use anyhow::{Result, bail};
use console::style;
use std::path::Path;

pub fn execute(
    app_id: Option<&str>,
    clear: bool,
    state_dir: &Path,
    format: OutputFormat,
) -> Result<()> {
    let mut store = SelectionStore::open(state_dir)?;

    if clear {
        store.clear();
        store.save()?;
        tracing::info!("Cleared selected application");
    } else if let Some(app_id) = app_id {
        let app_id = app_id.trim();
        if app_id.is_empty() {
            bail!("Application id must not be empty");
        }
        store.set(app_id);
        store.save()?;
        tracing::info!("Selected application {}", app_id);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(store.state())?),
        OutputFormat::Table => {
            println!("Target,Selected At");
            println!(
                "{},{}",
                store.target().unwrap_or(""),
                store
                    .state()
                    .selected_at
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_default()
            );
        }
        OutputFormat::Pretty => match store.target() {
            Some(target) => println!("Selected application: {}", style(target).bold().green()),
            None => println!("{}", style("No application selected").yellow()),
        },
    }

    Ok(())
}
