use std::path::{Path, PathBuf};

/// Errors surfaced while resolving a conditional document
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The document could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directive expression is malformed
    #[error("{}:{line}:{column}: invalid directive [{expression}]: {reason}", .path.display())]
    Expression {
        path: PathBuf,
        line: usize,
        column: usize,
        expression: String,
        reason: String,
    },

    /// The resolved text is not a valid YAML document
    #[error("{}: {reason}", location_prefix(.path, .line, .column))]
    Parse {
        path: PathBuf,
        /// Source line of the failure, when the parser reports one
        line: Option<usize>,
        column: Option<usize>,
        reason: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ResolveError {
    pub fn path(&self) -> &Path {
        match self {
            ResolveError::Io { path, .. }
            | ResolveError::Expression { path, .. }
            | ResolveError::Parse { path, .. } => path,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ResolveError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn location_prefix(path: &Path, line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!("{}:{}:{}", path.display(), line, column),
        (Some(line), None) => format!("{}:{}", path.display(), line),
        _ => path.display().to_string(),
    }
}

/// Strip the " at line N column M" suffix serde_yaml appends to its messages
pub(crate) fn parser_reason(error: &serde_yaml::Error) -> String {
    let message = error.to_string();
    match message.rfind(" at line ") {
        Some(index) if error.location().is_some() => message[..index].to_string(),
        _ => message,
    }
}
