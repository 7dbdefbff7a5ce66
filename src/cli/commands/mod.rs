//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod run_cmd;
mod sources;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "tourproj")]
#[command(about = "Find and extract future tourism projections from published documents")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Process every configured country and save the results (default)
    Run {
        /// Output file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Countries to process (overrides config)
        countries: Vec<String>,
        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Check that the configured LLM answers
    Check,

    /// List registered document sources
    Sources {
        /// Only show sources for this country
        country: Option<String>,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config.clone(),
    };
    let (settings, _config) = load_settings_with_options(options)
        .await
        .map_err(anyhow::Error::msg)?;

    match cli.command.unwrap_or(Commands::Run {
        output: None,
        countries: Vec::new(),
        no_progress: false,
    }) {
        Commands::Run {
            output,
            countries,
            no_progress,
        } => run_cmd::cmd_run(&settings, output, countries, !no_progress).await,
        Commands::Check => check::cmd_check(&settings).await,
        Commands::Sources { country } => sources::cmd_sources(&settings, country.as_deref()),
    }
}
