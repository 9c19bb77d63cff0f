use clap::Parser;
use eyre::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use ycond::output::{CheckStats, get_formatter, get_report_formatter};
use ycond::{Config, Resolver};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Apply CLI overrides to configuration
    apply_cli_overrides(&mut config, &cli);

    if cli.show_config {
        return show_config(&config);
    }

    let files = cli.get_files();

    match &cli.command {
        Some(Commands::Check { .. }) => check(config, &files, cli.verbose),
        None if cli.text => print_text(config, &files),
        None => resolve(config, &files, cli.verbose),
    }
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Apply CLI overrides to the configuration
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    let definitions = config
        .definitions()
        .with(cli.get_definitions().iter().map(String::from))
        .without(cli.get_undefinitions().iter());
    config.definitions = definitions.iter().map(String::from).collect();

    if let Some(format) = cli.format {
        config.format = format;
    }
}

/// Show the effective configuration
fn show_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;

    println!("Effective configuration:");
    println!("{}", yaml);

    Ok(())
}

/// Resolve every document and print the parsed structures
fn resolve(config: Config, files: &[PathBuf], verbose: bool) -> Result<()> {
    let formatter = get_formatter(&config.format);
    let resolver = Resolver::with_config(config.definitions(), config);

    let results = resolver.resolve_paths(files).context("Resolving failed")?;

    let output = formatter.format_documents(&results)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    if verbose {
        eprintln!(
            "Resolved {} documents with definitions {}",
            results.len(),
            resolver.definitions()
        );
    }

    Ok(())
}

/// Print the filtered text of every document
fn print_text(config: Config, files: &[PathBuf]) -> Result<()> {
    let resolver = Resolver::with_config(config.definitions(), config);
    let documents = resolver.collect_documents(files).context("Resolving failed")?;

    for path in &documents {
        let document = resolver
            .resolve_text(path)
            .with_context(|| format!("Failed to resolve {}", path.display()))?;

        if documents.len() > 1 {
            println!("--- # {}", path.display());
        }
        let text = document.text();
        print!("{}", text);
        if documents.len() > 1 && !text.is_empty() && !text.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

/// Validate directives and exit with an error code when any is malformed
fn check(config: Config, files: &[PathBuf], verbose: bool) -> Result<()> {
    let formatter = get_report_formatter(&config.format);
    let resolver = Resolver::with_config(config.definitions(), config);
    let documents = resolver.collect_documents(files).context("Checking failed")?;

    let mut reports = Vec::with_capacity(documents.len());
    for path in documents {
        let report = resolver.check(&path).context("Checking failed")?;
        reports.push((path, report));
    }

    println!("{}", formatter.format_reports(&reports)?);

    let stats = CheckStats::from_reports(&reports);
    if verbose {
        eprintln!("Checked {} files", stats.total_files);
    }

    if stats.has_problems() {
        std::process::exit(1);
    }

    Ok(())
}
