use super::DocumentFormatter;
use eyre::{Context, Result};
use serde_yaml::Value;
use std::path::PathBuf;

/// YAML output formatter
#[derive(Debug, Default)]
pub struct YamlFormatter;

impl YamlFormatter {
    /// Create a new YAML formatter
    pub fn new() -> Self {
        Self
    }
}

impl DocumentFormatter for YamlFormatter {
    fn format_documents(&self, results: &[(PathBuf, Value)]) -> Result<String> {
        if let [(path, value)] = results {
            return serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {}", path.display()));
        }

        // Several files become a multi-document stream, each tagged with its path
        let mut output = String::new();
        for (path, value) in results {
            let yaml = serde_yaml::to_string(value)
                .with_context(|| format!("Failed to serialize {}", path.display()))?;
            output.push_str(&format!("--- # {}\n", path.display()));
            output.push_str(&yaml);
        }

        Ok(output)
    }
}
