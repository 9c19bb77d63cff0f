pub mod human;
pub mod json;
pub mod yaml;

use crate::resolver::DirectiveReport;
use clap::ValueEnum;
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::PathBuf;

/// Output format for resolved documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML documents, one per input file
    #[default]
    Yaml,
    /// JSON for machine processing
    Json,
}

/// Trait for formatting resolved documents
pub trait DocumentFormatter {
    /// Format the parsed structure of every resolved file
    fn format_documents(&self, results: &[(PathBuf, Value)]) -> Result<String>;
}

/// Trait for formatting directive check reports
pub trait ReportFormatter {
    fn format_reports(&self, reports: &[(PathBuf, DirectiveReport)]) -> Result<String>;
}

/// Get the document formatter for the given format
pub fn get_formatter(format: &OutputFormat) -> Box<dyn DocumentFormatter> {
    match format {
        OutputFormat::Yaml => Box::new(yaml::YamlFormatter::new()),
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
    }
}

/// Get the report formatter for the given format; YAML output reports in plain text
pub fn get_report_formatter(format: &OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Yaml => Box::new(human::HumanFormatter::new()),
        OutputFormat::Json => Box::new(json::JsonFormatter::new()),
    }
}

/// Statistics about a directive check run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckStats {
    pub total_files: usize,
    pub files_with_problems: usize,
    pub total_directives: usize,
    pub total_problems: usize,
}

impl CheckStats {
    /// Calculate statistics from check reports
    pub fn from_reports(reports: &[(PathBuf, DirectiveReport)]) -> Self {
        Self {
            total_files: reports.len(),
            files_with_problems: reports.iter().filter(|(_, r)| r.has_problems()).count(),
            total_directives: reports.iter().map(|(_, r)| r.directives).sum(),
            total_problems: reports.iter().map(|(_, r)| r.problems.len()).sum(),
        }
    }

    pub fn has_problems(&self) -> bool {
        self.total_problems > 0
    }
}
