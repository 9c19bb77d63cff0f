use super::{CheckStats, DocumentFormatter, ReportFormatter};
use crate::resolver::{DirectiveProblem, DirectiveReport};
use eyre::{Context, Result};
use serde::Serialize;
use serde_yaml::Value;
use std::path::PathBuf;

/// JSON output formatter
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of a check run
#[derive(Debug, Serialize)]
struct JsonCheckOutput<'a> {
    stats: JsonStats,
    files: Vec<JsonFileReport<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonStats {
    total_files: usize,
    files_with_problems: usize,
    total_directives: usize,
    total_problems: usize,
}

impl From<&CheckStats> for JsonStats {
    fn from(stats: &CheckStats) -> Self {
        Self {
            total_files: stats.total_files,
            files_with_problems: stats.files_with_problems,
            total_directives: stats.total_directives,
            total_problems: stats.total_problems,
        }
    }
}

/// JSON representation of the report for a single file
#[derive(Debug, Serialize)]
struct JsonFileReport<'a> {
    path: String,
    directives: usize,
    names: Vec<&'a str>,
    non_monotone_lines: &'a [usize],
    problems: &'a [DirectiveProblem],
}

impl DocumentFormatter for JsonFormatter {
    fn format_documents(&self, results: &[(PathBuf, Value)]) -> Result<String> {
        if let [(path, value)] = results {
            return serde_json::to_string_pretty(value)
                .with_context(|| format!("Failed to convert {} to JSON", path.display()));
        }

        let mut files = serde_json::Map::new();
        for (path, value) in results {
            let json = serde_json::to_value(value)
                .with_context(|| format!("Failed to convert {} to JSON", path.display()))?;
            files.insert(path.display().to_string(), json);
        }

        serde_json::to_string_pretty(&files).context("Failed to serialize JSON output")
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_reports(&self, reports: &[(PathBuf, DirectiveReport)]) -> Result<String> {
        let stats = CheckStats::from_reports(reports);
        let files = reports
            .iter()
            .map(|(path, report)| JsonFileReport {
                path: path.display().to_string(),
                directives: report.directives,
                names: report.names.iter().map(String::as_str).collect(),
                non_monotone_lines: &report.non_monotone_lines,
                problems: &report.problems,
            })
            .collect();

        let output = JsonCheckOutput {
            stats: JsonStats::from(&stats),
            files,
        };

        serde_json::to_string_pretty(&output).context("Failed to serialize JSON output")
    }
}
