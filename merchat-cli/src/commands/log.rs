//! Log command - list recent usage records.

use anyhow::Result;
use clap::Args;
use merchat_store::UsageMeter;
use tracing::info;

use crate::{Cli, OutputFormat};

/// Arguments for the log command.
#[derive(Args)]
pub struct LogArgs {
    /// Maximum number of entries to show (most recent, chronological order).
    #[arg(long, short, default_value = "100")]
    pub limit: usize,
}

/// Runs the log command.
pub async fn run(args: &LogArgs, cli: &Cli) -> Result<()> {
    info!(limit = args.limit, "Listing recent usage records");

    let meter = UsageMeter::load(cli.meter_config(false)).await;
    let entries = meter.reporter().recent_entries(args.limit).await;

    if cli.format == OutputFormat::Json {
        let json = if cli.pretty {
            serde_json::to_string_pretty(&entries)?
        } else {
            serde_json::to_string(&entries)?
        };
        println!("{json}");
        return Ok(());
    }

    if entries.is_empty() {
        println!("No usage records.");
        return Ok(());
    }

    for record in &entries {
        println!(
            "{}  {:<16} {:<26} in={:<8} out={:<8} ${:.6}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.request_id,
            record.model,
            record.input_tokens,
            record.output_tokens,
            record.cost_usd
        );
    }

    Ok(())
}
