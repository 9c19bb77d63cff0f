/// A source line kept after directive filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    /// Line number in the source document (1-based)
    pub number: usize,
    /// Line text including its original terminator, if any
    pub text: String,
}

/// The text that remains after directive-based line filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDocument {
    lines: Vec<ResolvedLine>,
    excluded: usize,
}

impl ResolvedDocument {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn retain(&mut self, number: usize, text: &str) {
        self.lines.push(ResolvedLine {
            number,
            text: text.to_string(),
        });
    }

    pub(crate) fn exclude(&mut self) {
        self.excluded += 1;
    }

    /// Retained lines in source order
    pub fn lines(&self) -> &[ResolvedLine] {
        &self.lines
    }

    /// Number of lines dropped by their directive
    pub fn excluded_count(&self) -> usize {
        self.excluded
    }

    /// Join the retained lines back into document text
    pub fn text(&self) -> String {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    /// True when no retained line carries YAML content
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| {
            let trimmed = line.text.trim();
            trimmed.is_empty() || trimmed.starts_with('#')
        })
    }

    /// Map a 1-based line of the resolved text back to its source line.
    /// Positions past the end map to the last retained line.
    pub fn source_line(&self, resolved_line: usize) -> Option<usize> {
        if resolved_line == 0 {
            return None;
        }
        self.lines
            .get(resolved_line - 1)
            .or_else(|| self.lines.last())
            .map(|line| line.number)
    }
}
