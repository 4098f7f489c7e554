use clap::ValueEnum;
use optimus_core::view::FindingCategory;

pub mod commands;
pub mod config;
pub mod output;
pub mod state;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

/// Finding severities selectable on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn matches(&self, category: FindingCategory) -> bool {
        matches!(
            (self, category),
            (Severity::Critical, FindingCategory::Critical)
                | (Severity::Warning, FindingCategory::Warning)
                | (Severity::Info, FindingCategory::Info)
        )
    }
}
