use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A malformed directive found while checking a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveProblem {
    /// Source line number (1-based)
    pub line: usize,
    /// Column of the failure on that line (1-based)
    pub column: usize,
    /// Raw expression text between the brackets
    pub expression: String,
    /// Why the expression was rejected
    pub message: String,
}

impl DirectiveProblem {
    pub fn new(line: usize, column: usize, expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            expression: expression.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DirectiveProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {} [{}]", self.line, self.column, self.message, self.expression)
    }
}

impl PartialOrd for DirectiveProblem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DirectiveProblem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
            .then_with(|| self.message.cmp(&other.message))
    }
}

/// Summary of every directive in a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveReport {
    /// Number of lines carrying a directive
    pub directives: usize,
    /// Definition names referenced by well-formed directives
    pub names: BTreeSet<String>,
    /// Lines whose directive contains a negation
    pub non_monotone_lines: Vec<usize>,
    pub problems: Vec<DirectiveProblem>,
}

impl DirectiveReport {
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }
}
