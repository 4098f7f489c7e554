pub mod call;
pub mod completion;
pub mod render;
pub mod select;
pub mod status;
pub mod tools;

use crate::output;
use crate::{OutputFormat, Severity};
use anyhow::Result;
use optimus_core::ViewModel;

/// Apply the severity filter, if any, and print the view.
pub(crate) fn show(
    mut view: ViewModel,
    severity: Option<Severity>,
    format: OutputFormat,
) -> Result<ViewModel> {
    if let Some(severity) = severity {
        view.retain_findings(|finding| severity.matches(finding.category));
    }
    print!("{}", output::render(&view, format)?);
    Ok(view)
}
