use crate::definitions::Definitions;
use crate::output::OutputFormat;
use eyre::{Context, ContextCompat, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for resolving conditional documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Definitions that are always active
    pub definitions: Vec<String>,
    /// Output format for resolved documents
    pub format: OutputFormat,
    /// File patterns treated as documents when walking directories
    #[serde(rename = "document-files")]
    pub document_files: Vec<String>,
    /// File patterns to skip when walking directories
    pub ignore: Vec<String>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path.clone(),
            None => Self::default_config_path()?,
        };

        if config_file.exists() {
            debug!(path = %config_file.display(), "loading configuration");

            let content = fs::read_to_string(&config_file).with_context(|| {
                format!("Failed to read config file: {}", config_file.display())
            })?;

            let config: Config = serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_file.display())
            })?;

            Ok(config)
        } else if config_path.is_some() {
            Err(eyre::eyre!("Config file not found: {}", config_file.display()))
        } else {
            // Fall back to defaults when no config file exists
            Ok(Self::default())
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> Result<PathBuf> {
        // Look for config files in order of preference
        let candidates = [".ycond.yaml", ".ycond.yml", "ycond.yaml", "ycond.yml"];

        for candidate in candidates {
            let candidate = PathBuf::from(candidate);
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        let config_dir = dirs::config_local_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .context("Could not determine config directory")?;

        Ok(config_dir.join("ycond").join("config.yaml"))
    }

    /// Definitions configured as always active
    pub fn definitions(&self) -> Definitions {
        Definitions::parse_list(&self.definitions)
    }

    /// Check if a file should be skipped based on ignore patterns
    pub fn is_file_ignored(&self, file_path: &Path) -> bool {
        let path_str = file_path.to_string_lossy();

        self.ignore.iter().any(|pattern| {
            if pattern.contains('*') {
                pattern_matches(pattern, &path_str)
            } else {
                path_str.contains(pattern.as_str())
            }
        })
    }

    /// Check if a file should be treated as a conditional document
    pub fn is_document_file(&self, file_path: &Path) -> bool {
        let path_str = file_path.to_string_lossy();

        self.document_files.iter().any(|pattern| {
            if pattern.contains('*') {
                pattern_matches(pattern, &path_str)
            } else {
                path_str.ends_with(pattern.as_str())
            }
        })
    }
}

/// Match a `*` wildcard pattern against the trailing path components
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    Regex::new(&format!("(^|/){}$", body))
        .map(|re| re.is_match(path))
        .unwrap_or(false)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            format: OutputFormat::default(),
            document_files: vec!["*.yaml".to_string(), "*.yml".to_string()],
            ignore: vec![".git/**".to_string()],
        }
    }
}
