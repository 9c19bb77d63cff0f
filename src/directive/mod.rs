pub mod expr;

use regex::Regex;

pub use expr::{Expr, ExpressionError};

/// A trailing `# [<expression>]` annotation found on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Raw expression text between the brackets
    pub expression: &'a str,
    /// 1-based column where the expression text starts on the line
    pub column: usize,
}

impl Directive<'_> {
    /// Parse the raw expression text, shifting error columns to line columns
    pub fn parse(&self) -> Result<Expr, ExpressionError> {
        Expr::parse(self.expression).map_err(|mut e| {
            e.column += self.column - 1;
            e
        })
    }
}

/// Finds conditional directives on individual lines
#[derive(Debug, Clone)]
pub struct DirectiveMatcher {
    directive_regex: Regex,
}

impl DirectiveMatcher {
    /// Create a new directive matcher
    pub fn new() -> Self {
        // Greedy on both sides: the last `#` opening a bracket, up to the last `]`
        let directive_regex = Regex::new(r"^.*#\s*\[(.*)\]").expect("Invalid directive regex");

        Self { directive_regex }
    }

    /// Look for a directive on a single line (terminator may be included)
    pub fn find<'a>(&self, line: &'a str) -> Option<Directive<'a>> {
        let line = line.trim_end_matches(['\n', '\r']);
        let captures = self.directive_regex.captures(line)?;
        let expression = captures.get(1)?;

        Some(Directive {
            expression: expression.as_str(),
            column: expression.start() + 1,
        })
    }
}

impl Default for DirectiveMatcher {
    fn default() -> Self {
        Self::new()
    }
}
