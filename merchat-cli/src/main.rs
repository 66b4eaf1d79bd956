// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Merchat CLI - usage and cost reporting from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Today's usage summary
//! merchat report --period today
//!
//! # A specific month
//! merchat report --period month --year 2026 --month 8
//!
//! # All-time totals, as JSON
//! merchat report --period total --format json --pretty
//!
//! # Most recent log entries
//! merchat log --limit 20
//!
//! # Record one completed call (normally done by the chat service)
//! merchat track --model llama3-70b-8192 --input 1500 --output 800
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{log, report, track};
use merchat_store::MeterConfig;

// ============================================================================
// CLI Definition
// ============================================================================

/// Merchat CLI - token usage metering and cost reporting.
#[derive(Parser)]
#[command(name = "merchat")]
#[command(about = "Token usage and cost reporting for the Merchat chat backend")]
#[command(long_about = r#"
Merchat meters the token usage and cost of every upstream completion call
and answers day / month / all-time aggregate queries over that history.

Examples:
  merchat report                    # Today's summary
  merchat report --period month     # Current calendar month
  merchat report --period total     # All-time totals
  merchat log --limit 20            # Recent usage records
  merchat track --model llama3-8b-8192 --input 800 --output 400
"#)]
#[command(version)]
#[command(author = "Merchat Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'report' for today.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Directory holding the metering artifacts (defaults to the platform
    /// data dir).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show an aggregate usage report (default if no command specified).
    #[command(visible_alias = "r")]
    Report(report::ReportArgs),

    /// List the most recent usage records.
    #[command(visible_alias = "l")]
    Log(log::LogArgs),

    /// Record one completed completion call.
    #[command(visible_alias = "t")]
    Track(track::TrackArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Builds the meter configuration for a command.
    ///
    /// Reporting commands load state with tracking disabled; only `track`
    /// enables the meter.
    pub fn meter_config(&self, enabled: bool) -> MeterConfig {
        let config = MeterConfig::default().enabled(enabled);
        match &self.data_dir {
            Some(dir) => config.in_dir(dir),
            None => config,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("merchat=debug,info")
    } else {
        EnvFilter::new("merchat=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Report(args)) => report::run(args, &cli).await,
        Some(Commands::Log(args)) => log::run(args, &cli).await,
        Some(Commands::Track(args)) => track::run(args, &cli).await,
        None => {
            // Default to today's report
            report::run(&report::ReportArgs::default(), &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
