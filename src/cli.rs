use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ycond::Definitions;
use ycond::output::OutputFormat;

/// Command-line interface for the ycond document resolver
#[derive(Parser)]
#[command(
    name = "ycond",
    about = "Resolve `# [expr]` conditional lines in YAML documents",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Lines ending in `# [<expression>]` are kept only when the expression holds.\n\
                  Expressions use names, `and`, `or`, `not`, parentheses and True/False."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Documents or directories to resolve (when no subcommand is used)
    #[arg(help = "Documents or directories to resolve")]
    pub files: Vec<PathBuf>,

    /// Active definitions
    #[arg(short = 'D', long = "define", value_name = "NAMES", help = "Activate definitions (comma-separated)")]
    pub define: Vec<String>,

    /// Definitions to deactivate, including ones set by the config file
    #[arg(short = 'U', long, value_name = "NAMES", help = "Deactivate definitions (comma-separated)")]
    pub undefine: Vec<String>,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, global = true, help = "Output format [default: yaml]")]
    pub format: Option<OutputFormat>,

    /// Print the resolved text instead of the parsed structure
    #[arg(long, help = "Print the filtered document text instead of the parsed structure")]
    pub text: bool,

    /// Show configuration and exit
    #[arg(long, help = "Show effective configuration and exit")]
    pub show_config: bool,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate every directive expression without resolving
    Check {
        /// Documents or directories to check
        files: Vec<PathBuf>,
    },
}

impl Cli {
    /// Parse definitions from comma-separated values
    pub fn get_definitions(&self) -> Definitions {
        Definitions::parse_list(&self.define)
    }

    /// Parse deactivated definitions from comma-separated values
    pub fn get_undefinitions(&self) -> Definitions {
        Definitions::parse_list(&self.undefine)
    }

    /// Get files to process, defaulting to current directory if none specified
    pub fn get_files(&self) -> Vec<PathBuf> {
        let files = match &self.command {
            Some(Commands::Check { files }) => files,
            None => &self.files,
        };

        if files.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            files.clone()
        }
    }
}

// Provide a default implementation for testing
impl Default for Cli {
    fn default() -> Self {
        Self {
            command: None,
            files: Vec::new(),
            define: Vec::new(),
            undefine: Vec::new(),
            config: None,
            format: None,
            text: false,
            show_config: false,
            verbose: false,
        }
    }
}
