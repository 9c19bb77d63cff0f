use super::document::ResolvedDocument;
use super::error::{ResolveError, parser_reason};
use super::report::{DirectiveProblem, DirectiveReport};
use crate::config::Config;
use crate::definitions::Definitions;
use crate::directive::DirectiveMatcher;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Path reported for documents resolved from in-memory text
const INLINE_SOURCE: &str = "<input>";

/// Resolves conditional documents against a fixed definition set
#[derive(Debug, Clone)]
pub struct Resolver {
    definitions: Definitions,
    config: Config,
    matcher: DirectiveMatcher,
}

impl Resolver {
    /// Create a resolver with the default configuration
    pub fn new(definitions: Definitions) -> Self {
        Self::with_config(definitions, Config::default())
    }

    /// Create a resolver that walks directories according to `config`
    pub fn with_config(definitions: Definitions, config: Config) -> Self {
        Self {
            definitions,
            config,
            matcher: DirectiveMatcher::new(),
        }
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Resolve a document and parse it into a generic YAML value
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<Value, ResolveError> {
        let path = path.as_ref();
        let document = self.resolve_text(path)?;
        if document.is_blank() {
            return Ok(Value::Null);
        }
        self.deserialize(path, &document)
    }

    /// Resolve a document and deserialize it into `T`
    pub fn resolve_as<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T, ResolveError> {
        let path = path.as_ref();
        let document = self.resolve_text(path)?;
        self.deserialize(path, &document)
    }

    /// Resolve in-memory text and parse it into a generic YAML value
    pub fn resolve_str(&self, content: &str) -> Result<Value, ResolveError> {
        let path = Path::new(INLINE_SOURCE);
        let document = self.filter_source(path, content)?;
        if document.is_blank() {
            return Ok(Value::Null);
        }
        self.deserialize(path, &document)
    }

    /// Read a document and keep only the lines whose directive holds
    pub fn resolve_text<P: AsRef<Path>>(&self, path: P) -> Result<ResolvedDocument, ResolveError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ResolveError::io(path, e))?;
        let document = self.filter_source(path, &content)?;

        info!(
            path = %path.display(),
            kept = document.lines().len(),
            excluded = document.excluded_count(),
            "resolved document"
        );

        Ok(document)
    }

    /// Filter in-memory text
    pub fn filter(&self, content: &str) -> Result<ResolvedDocument, ResolveError> {
        self.filter_source(Path::new(INLINE_SOURCE), content)
    }

    fn filter_source(&self, path: &Path, content: &str) -> Result<ResolvedDocument, ResolveError> {
        let mut document = ResolvedDocument::new();

        for (index, line) in source_lines(content).enumerate() {
            let number = index + 1;

            let Some(directive) = self.matcher.find(line) else {
                document.retain(number, line);
                continue;
            };

            let expr = directive.parse().map_err(|e| ResolveError::Expression {
                path: path.to_path_buf(),
                line: number,
                column: e.column,
                expression: directive.expression.trim().to_string(),
                reason: e.reason,
            })?;

            let keep = expr.evaluate(&self.definitions);
            trace!(line = number, expression = %expr, keep, "evaluated directive");

            if keep {
                document.retain(number, line);
            } else {
                debug!(path = %path.display(), line = number, expression = %expr, "excluding line");
                document.exclude();
            }
        }

        Ok(document)
    }

    fn deserialize<T: DeserializeOwned>(&self, path: &Path, document: &ResolvedDocument) -> Result<T, ResolveError> {
        serde_yaml::from_str(&document.text()).map_err(|source| {
            let location = source.location();
            ResolveError::Parse {
                path: path.to_path_buf(),
                line: location.as_ref().and_then(|l| document.source_line(l.line())),
                column: location.as_ref().map(|l| l.column()),
                reason: parser_reason(&source),
                source,
            }
        })
    }

    /// Validate every directive of a document without resolving it
    pub fn check<P: AsRef<Path>>(&self, path: P) -> Result<DirectiveReport, ResolveError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ResolveError::io(path, e))?;
        Ok(self.check_str(&content))
    }

    /// Validate every directive of in-memory text
    pub fn check_str(&self, content: &str) -> DirectiveReport {
        let mut report = DirectiveReport::default();

        for (index, line) in source_lines(content).enumerate() {
            let Some(directive) = self.matcher.find(line) else {
                continue;
            };
            report.directives += 1;

            match directive.parse() {
                Ok(expr) => {
                    report.names.extend(expr.names().into_iter().map(String::from));
                    if !expr.is_monotone() {
                        report.non_monotone_lines.push(index + 1);
                    }
                }
                Err(e) => report.problems.push(DirectiveProblem::new(
                    index + 1,
                    e.column,
                    directive.expression.trim(),
                    e.reason,
                )),
            }
        }

        report.problems.sort();
        report
    }

    /// Expand files and directories into the list of documents to process
    pub fn collect_documents<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<PathBuf>, ResolveError> {
        let mut file_paths = Vec::new();

        for path in paths {
            let path = path.as_ref();

            if path.is_file() {
                file_paths.push(path.to_path_buf());
            } else if path.is_dir() {
                for entry in WalkDir::new(path).sort_by_file_name() {
                    let entry = entry.map_err(|e| {
                        let failed = e.path().unwrap_or(path).to_path_buf();
                        ResolveError::io(&failed, std::io::Error::other(e))
                    })?;

                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let file_path = entry.path();
                    if self.config.is_file_ignored(file_path) || !self.config.is_document_file(file_path) {
                        continue;
                    }

                    file_paths.push(file_path.to_path_buf());
                }
            } else {
                return Err(ResolveError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
                ));
            }
        }

        Ok(file_paths)
    }

    /// Resolve many files or directories in parallel, preserving input order
    pub fn resolve_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<(PathBuf, Value)>, ResolveError> {
        let file_paths = self.collect_documents(paths)?;

        file_paths
            .par_iter()
            .map(|file_path| Ok((file_path.clone(), self.resolve(file_path)?)))
            .collect()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Definitions::default())
    }
}

/// Split text into lines, each keeping its `\n`, `\r\n` or lone `\r` terminator
fn source_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(['\n', '\r']) {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

/// Resolve `path` against `definitions` and parse the surviving text
pub fn resolve<P: AsRef<Path>>(path: P, definitions: &Definitions) -> Result<Value, ResolveError> {
    Resolver::new(definitions.clone()).resolve(path)
}
