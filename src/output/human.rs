use super::{CheckStats, ReportFormatter};
use crate::resolver::DirectiveReport;
use eyre::Result;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Human-readable formatter for directive check reports
#[derive(Debug, Default)]
pub struct HumanFormatter {
    use_colors: bool,
}

impl HumanFormatter {
    /// Create a new human formatter
    pub fn new() -> Self {
        Self {
            use_colors: Self::should_use_colors(),
        }
    }

    /// Create a new human formatter with explicit color setting
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Determine if colors should be used based on environment
    fn should_use_colors() -> bool {
        std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
    }

    /// Format a file path with appropriate color
    fn format_path(&self, path: &Path) -> String {
        if self.use_colors {
            format!("\x1b[1m{}\x1b[0m", path.display()) // Bold
        } else {
            path.display().to_string()
        }
    }

    /// Format line and column numbers
    fn format_position(&self, line: usize, column: usize) -> String {
        if self.use_colors {
            format!("\x1b[36m{}:{}\x1b[0m", line, column) // Cyan
        } else {
            format!("{}:{}", line, column)
        }
    }

    fn format_error(&self) -> String {
        if self.use_colors {
            "\x1b[31merror\x1b[0m".to_string() // Red
        } else {
            "error".to_string()
        }
    }

    /// Format statistics summary
    fn format_stats(&self, stats: &CheckStats) -> String {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let checked = format!(
            "Checked {} directive{} in {} file{}",
            stats.total_directives,
            plural(stats.total_directives),
            stats.total_files,
            plural(stats.total_files)
        );

        if !stats.has_problems() {
            return checked;
        }

        let found = format!("{} invalid directive{}", stats.total_problems, plural(stats.total_problems));
        if self.use_colors {
            format!("{}: \x1b[31m{}\x1b[0m", checked, found)
        } else {
            format!("{}: {}", checked, found)
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format_reports(&self, reports: &[(PathBuf, DirectiveReport)]) -> Result<String> {
        let mut output = Vec::new();
        let stats = CheckStats::from_reports(reports);

        for (file_path, report) in reports {
            if report.directives == 0 {
                continue;
            }

            output.push(self.format_path(file_path));

            for problem in &report.problems {
                output.push(format!(
                    "  {}: {} {} [{}]",
                    self.format_position(problem.line, problem.column),
                    self.format_error(),
                    problem.message,
                    problem.expression
                ));
            }

            if !report.names.is_empty() {
                let names: Vec<&str> = report.names.iter().map(String::as_str).collect();
                output.push(format!("  definitions: {}", names.join(", ")));
            }

            if !report.non_monotone_lines.is_empty() {
                let lines: Vec<String> = report.non_monotone_lines.iter().map(|l| l.to_string()).collect();
                output.push(format!("  negated on lines: {}", lines.join(", ")));
            }

            output.push(String::new()); // Empty line between files
        }

        output.push(self.format_stats(&stats));

        Ok(output.join("\n"))
    }
}
