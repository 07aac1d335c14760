// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! doc-renamer: content-based batch renaming with a local language model

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use doc_renamer::batch::{BatchRenamer, FileOutcome};
use doc_renamer::config::AppConfig;
use doc_renamer::ollama::OllamaClient;

/// doc-renamer CLI - rename documents after their content
#[derive(Parser, Debug)]
#[command(name = "doc-renamer")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Copy documents under names proposed by a local language model", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for the batch report
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rename every supported file of the input directory into the output directory
    Run {
        /// Input directory (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show proposed names without copying anything
        #[arg(long)]
        dry_run: bool,

        /// Skip Ollama health check on startup
        #[arg(long)]
        skip_health_check: bool,
    },

    /// Show AI engine status
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;

    match cli.command {
        Some(Commands::Run { input, output, dry_run, skip_health_check }) => {
            run_batch(config, input, output, dry_run, skip_health_check, &cli.format).await
        }
        Some(Commands::Status) => run_status(config).await,
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
        None => run_batch(config, None, None, false, false, &cli.format).await,
    }
}

/// Run one batch over the input directory
async fn run_batch(
    mut config: AppConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    dry_run: bool,
    skip_health_check: bool,
    format: &str,
) -> anyhow::Result<()> {
    if let Some(input) = input {
        config.paths.input_dir = input;
    }
    if let Some(output) = output {
        config.paths.output_dir = output;
    }

    info!("Input directory: {:?}", config.paths.input_dir);
    info!("Output directory: {:?}", config.paths.output_dir);

    let client = OllamaClient::new(&config.ai_engine).context("Failed to create HTTP client")?;

    // Unreachable engine only warns: every file would still get a fallback copy
    if !skip_health_check {
        match client.health_check().await {
            Ok(()) => match client.model_available().await {
                Ok(true) => info!("Model '{}' available", client.model()),
                Ok(false) => warn!("Model '{}' not found at {}", client.model(), client.base_url()),
                Err(e) => warn!("Could not list models: {}", e),
            },
            Err(e) => warn!("{}; files will be copied under fallback names", e),
        }
    }

    let input_dir = config.paths.input_dir.clone();
    let output_dir = config.paths.output_dir.clone();
    let renamer = BatchRenamer::new(config, Box::new(client)).dry_run(dry_run);

    let report = renamer
        .run(&input_dir, &output_dir)
        .await
        .with_context(|| format!("Batch over {:?} aborted", input_dir))?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            for outcome in &report.outcomes {
                match outcome {
                    FileOutcome::Renamed { source, destination } => {
                        println!("{} -> {}", source.display(), destination.display())
                    }
                    FileOutcome::Fallback { source, destination, .. } => {
                        println!("{} -> {} (fallback)", source.display(), destination.display())
                    }
                    FileOutcome::Failed { source, reason } => {
                        eprintln!("{}: {}", source.display(), reason)
                    }
                    FileOutcome::Skipped { .. } => {}
                }
            }
        }
    }

    Ok(())
}

/// Run status check
async fn run_status(config: AppConfig) -> anyhow::Result<()> {
    let client = OllamaClient::new(&config.ai_engine)?;

    println!("doc-renamer v{} Status", env!("CARGO_PKG_VERSION"));
    println!("======================");

    // Check Ollama
    match client.health_check().await {
        Ok(()) => println!("Ollama: Running ({})", client.base_url()),
        Err(e) => println!("Ollama: Error - {}", e),
    }

    // List models
    match client.list_models().await {
        Ok(models) => {
            println!("\nAvailable models:");
            for m in &models {
                let marker = if client.is_configured_model(m) { "→" } else { " " };
                println!("  {} {}", marker, m);
            }
        }
        Err(e) => println!("  Error listing models: {}", e),
    }

    println!("\nConfiguration:");
    println!("  Input directory: {:?}", config.paths.input_dir);
    println!("  Output directory: {:?}", config.paths.output_dir);
    println!("  Model: {}", config.ai_engine.model);
    println!("  Extensions: {}", config.extensions.join(", "));

    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Engine: {} ({})", config.ai_engine.url, config.ai_engine.model);
            println!("  Input directory: {:?}", config.paths.input_dir);
            println!("  Output directory: {:?}", config.paths.output_dir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["doc-renamer"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_run_command() {
        let cli = Cli::try_parse_from([
            "doc-renamer", "run", "--input", "/tmp/old", "--output", "/tmp/new", "--dry-run"
        ]).unwrap();

        match cli.command {
            Some(Commands::Run { input, output, dry_run, skip_health_check }) => {
                assert!(dry_run);
                assert!(!skip_health_check);
                assert_eq!(input, Some(PathBuf::from("/tmp/old")));
                assert_eq!(output, Some(PathBuf::from("/tmp/new")));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["doc-renamer", "--format", "xml"]).is_err());
    }
}
