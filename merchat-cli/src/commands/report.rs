//! Report command - aggregate usage summaries.
//!
//! Maps the period selector 1:1 onto the reporter's `daily`, `monthly`, and
//! `total` queries. An unrecognized period is rejected here, before any
//! metering state is touched.

use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Args;
use merchat_core::{DailySummary, MonthlySummary, Period, TotalSummary};
use merchat_store::UsageMeter;
use std::collections::BTreeMap;
use tracing::info;

use crate::{Cli, OutputFormat};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Reporting period: today, month, or total.
    #[arg(long, short, default_value = "today")]
    pub period: String,

    /// Specific date for the daily report (YYYY-MM-DD, default today).
    #[arg(long)]
    pub date: Option<String>,

    /// Year for the monthly report (default current year).
    #[arg(long)]
    pub year: Option<i32>,

    /// Month for the monthly report (1-12, default current month).
    #[arg(long)]
    pub month: Option<u32>,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            period: "today".to_string(),
            date: None,
            year: None,
            month: None,
        }
    }
}

/// Runs the report command.
pub async fn run(args: &ReportArgs, cli: &Cli) -> Result<()> {
    // Validate the period before loading anything.
    let period: Period = args.period.parse()?;

    info!(period = %period, "Running usage report");

    let meter = UsageMeter::load(cli.meter_config(false)).await;
    let reporter = meter.reporter();

    match period {
        Period::Today => match reporter.daily(args.date.as_deref()).await {
            Some(summary) => output_daily(&summary, cli)?,
            None => println!("No data for that period."),
        },
        Period::Month => {
            let now = Utc::now();
            let year = args.year.unwrap_or(now.year());
            let month = args.month.unwrap_or(now.month());
            let summary = reporter.monthly(year, month).await;
            output_monthly(&summary, cli)?;
        }
        Period::Total => {
            let summary = reporter.total().await;
            output_total(&summary, cli)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, cli: &Cli) -> Result<()> {
    let json = if cli.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn print_models(models: &BTreeMap<String, u64>) {
    if models.is_empty() {
        return;
    }
    println!();
    println!("Models used:");
    for (model, count) in models {
        println!("  {model:<28} {count} requests");
    }
}

fn output_daily(summary: &DailySummary, cli: &Cli) -> Result<()> {
    if cli.format == OutputFormat::Json {
        return print_json(summary, cli);
    }

    println!("Usage for {}", summary.aggregate.date);
    println!("  Requests:      {}", summary.aggregate.total_requests);
    println!("  Input tokens:  {}", summary.formatted.input_tokens);
    println!("  Output tokens: {}", summary.formatted.output_tokens);
    println!("  Total tokens:  {}", summary.formatted.total_tokens);
    println!("  Cost:          {}", summary.formatted.cost_usd);
    print_models(&summary.aggregate.models_used);
    Ok(())
}

fn output_monthly(summary: &MonthlySummary, cli: &Cli) -> Result<()> {
    if cli.format == OutputFormat::Json {
        return print_json(summary, cli);
    }

    println!("Usage for {:04}-{:02}", summary.year, summary.month);
    println!("  Requests:      {}", summary.total_requests);
    println!("  Input tokens:  {}", summary.formatted.input_tokens);
    println!("  Output tokens: {}", summary.formatted.output_tokens);
    println!("  Total tokens:  {}", summary.formatted.total_tokens);
    println!("  Cost:          {}", summary.formatted.cost_usd);
    print_models(&summary.models_used);

    if !summary.daily_breakdown.is_empty() {
        println!();
        println!("Daily breakdown:");
        for (date, daily) in &summary.daily_breakdown {
            println!(
                "  {date}  {:>4} requests  {:>12} tokens  {}",
                daily.total_requests,
                daily.formatted().total_tokens,
                daily.formatted().cost_usd
            );
        }
    }
    Ok(())
}

fn output_total(summary: &TotalSummary, cli: &Cli) -> Result<()> {
    if cli.format == OutputFormat::Json {
        return print_json(summary, cli);
    }

    println!("All-time usage");
    println!("  Requests:      {}", summary.total_requests);
    println!("  Input tokens:  {}", summary.formatted.input_tokens);
    println!("  Output tokens: {}", summary.formatted.output_tokens);
    println!("  Total tokens:  {}", summary.formatted.total_tokens);
    println!("  Cost:          {}", summary.formatted.cost_usd);
    println!("  Days active:   {}", summary.days_active);
    if let (Some(first), Some(last)) = (&summary.first_date, &summary.last_date) {
        println!("  Period:        {first} to {last}");
    }
    print_models(&summary.models_used);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_use_today() {
        let args = ReportArgs::default();
        assert_eq!(args.period, "today");
        assert!(args.date.is_none());
    }

    #[test]
    fn test_invalid_period_is_rejected() {
        let err = "week".parse::<Period>().unwrap_err();
        assert!(err.to_string().contains("week"));
    }
}
