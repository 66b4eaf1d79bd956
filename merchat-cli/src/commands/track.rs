//! Track command - record one completed completion call.
//!
//! In production the chat service calls the meter directly; this command is
//! the manual stand-in for testing and backfills.

use anyhow::Result;
use clap::Args;
use merchat_store::UsageMeter;
use tracing::info;

use crate::{Cli, OutputFormat};

/// Arguments for the track command.
#[derive(Args)]
pub struct TrackArgs {
    /// Model identifier as reported by the upstream provider.
    #[arg(long, short)]
    pub model: String,

    /// Input tokens consumed.
    #[arg(long, short)]
    pub input: u64,

    /// Output tokens produced.
    #[arg(long, short)]
    pub output: u64,

    /// Request identifier (generated when omitted).
    #[arg(long)]
    pub request_id: Option<String>,
}

/// Runs the track command.
pub async fn run(args: &TrackArgs, cli: &Cli) -> Result<()> {
    info!(model = %args.model, "Recording completion call");

    let meter = UsageMeter::load(cli.meter_config(true)).await;
    let record = meter
        .track(&args.model, args.input, args.output, args.request_id.clone())
        .await;

    if cli.format == OutputFormat::Json {
        let json = if cli.pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        println!("{json}");
        return Ok(());
    }

    println!(
        "Tracked {} | in={} out={} | ${:.6} | {}",
        record.model, record.input_tokens, record.output_tokens, record.cost_usd, record.request_id
    );

    Ok(())
}
