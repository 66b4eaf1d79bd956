//! Aggregate query results.
//!
//! Summaries are pure functions of the daily-aggregate map; nothing here
//! mutates state. Each carries its numeric totals (the source of truth) plus
//! pre-formatted display strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::CoreError;
use crate::format::{format_usd, group_thousands};
use crate::models::usage::DailyAggregate;

// ============================================================================
// Formatted Totals
// ============================================================================

/// Display strings for a set of totals. Presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedTotals {
    /// Thousands-grouped input token count.
    pub input_tokens: String,
    /// Thousands-grouped output token count.
    pub output_tokens: String,
    /// Thousands-grouped total token count.
    pub total_tokens: String,
    /// Six-decimal USD cost string.
    pub cost_usd: String,
}

impl FormattedTotals {
    /// Builds display strings from raw totals.
    pub fn from_totals(input_tokens: u64, output_tokens: u64, cost_usd: f64) -> Self {
        Self {
            input_tokens: group_thousands(input_tokens),
            output_tokens: group_thousands(output_tokens),
            total_tokens: group_thousands(input_tokens + output_tokens),
            cost_usd: format_usd(cost_usd),
        }
    }
}

// ============================================================================
// Summaries
// ============================================================================

/// One day's aggregate with display strings attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    /// The day's aggregate totals.
    #[serde(flatten)]
    pub aggregate: DailyAggregate,
    /// Display strings for the totals.
    pub formatted: FormattedTotals,
}

impl DailySummary {
    /// Wraps an aggregate with its display strings.
    pub fn new(aggregate: DailyAggregate) -> Self {
        let formatted = aggregate.formatted();
        Self {
            aggregate,
            formatted,
        }
    }
}

/// Aggregate totals for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Requested year.
    pub year: i32,
    /// Requested month (1-12).
    pub month: u32,
    /// Calls across the month.
    pub total_requests: u64,
    /// Input tokens across the month.
    pub total_input_tokens: u64,
    /// Output tokens across the month.
    pub total_output_tokens: u64,
    /// USD cost across the month.
    pub total_cost_usd: f64,
    /// Model identifier to request count, merged across days.
    pub models_used: BTreeMap<String, u64>,
    /// Per-day aggregates included in the month.
    pub daily_breakdown: BTreeMap<String, DailyAggregate>,
    /// Display strings for the totals.
    pub formatted: FormattedTotals,
}

impl MonthlySummary {
    /// Sums every aggregate whose date has the `YYYY-MM` prefix.
    ///
    /// This is a string-prefix match, not a calendar range scan; it relies
    /// on the ISO date key format. A month with no matching days yields
    /// all-zero sums and an empty breakdown.
    pub fn for_month(
        year: i32,
        month: u32,
        aggregates: &BTreeMap<String, DailyAggregate>,
    ) -> Self {
        let prefix = format!("{year:04}-{month:02}");

        let mut summary = Self {
            year,
            month,
            total_requests: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_cost_usd: 0.0,
            models_used: BTreeMap::new(),
            daily_breakdown: BTreeMap::new(),
            formatted: FormattedTotals::from_totals(0, 0, 0.0),
        };

        for (date, daily) in aggregates {
            if !date.starts_with(&prefix) {
                continue;
            }
            summary.total_requests += daily.total_requests;
            summary.total_input_tokens += daily.total_input_tokens;
            summary.total_output_tokens += daily.total_output_tokens;
            summary.total_cost_usd += daily.total_cost_usd;
            for (model, count) in &daily.models_used {
                *summary.models_used.entry(model.clone()).or_insert(0) += count;
            }
            summary.daily_breakdown.insert(date.clone(), daily.clone());
        }

        summary.formatted = FormattedTotals::from_totals(
            summary.total_input_tokens,
            summary.total_output_tokens,
            summary.total_cost_usd,
        );
        summary
    }
}

/// All-time aggregate totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalSummary {
    /// Calls across all dates.
    pub total_requests: u64,
    /// Input tokens across all dates.
    pub total_input_tokens: u64,
    /// Output tokens across all dates.
    pub total_output_tokens: u64,
    /// USD cost across all dates.
    pub total_cost_usd: f64,
    /// Model identifier to request count, merged across all days.
    pub models_used: BTreeMap<String, u64>,
    /// Distinct dates with at least one aggregate.
    pub days_active: usize,
    /// Earliest date key, when any data exists.
    pub first_date: Option<String>,
    /// Latest date key, when any data exists.
    pub last_date: Option<String>,
    /// Display strings for the totals.
    pub formatted: FormattedTotals,
}

impl TotalSummary {
    /// Sums every aggregate in the map.
    ///
    /// First/last dates are the lexicographic min/max of the keys, which is
    /// chronological order for ISO `YYYY-MM-DD` strings.
    pub fn from_aggregates(aggregates: &BTreeMap<String, DailyAggregate>) -> Self {
        let mut summary = Self {
            total_requests: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_cost_usd: 0.0,
            models_used: BTreeMap::new(),
            days_active: aggregates.len(),
            first_date: aggregates.keys().next().cloned(),
            last_date: aggregates.keys().next_back().cloned(),
            formatted: FormattedTotals::from_totals(0, 0, 0.0),
        };

        for daily in aggregates.values() {
            summary.total_requests += daily.total_requests;
            summary.total_input_tokens += daily.total_input_tokens;
            summary.total_output_tokens += daily.total_output_tokens;
            summary.total_cost_usd += daily.total_cost_usd;
            for (model, count) in &daily.models_used {
                *summary.models_used.entry(model.clone()).or_insert(0) += count;
            }
        }

        summary.formatted = FormattedTotals::from_totals(
            summary.total_input_tokens,
            summary.total_output_tokens,
            summary.total_cost_usd,
        );
        summary
    }
}

// ============================================================================
// Reporting Period
// ============================================================================

/// Reporting period selector at the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Current day.
    Today,
    /// Current (or requested) calendar month.
    Month,
    /// All time.
    Total,
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Period::Today),
            "month" => Ok(Period::Month),
            "total" => Ok(Period::Total),
            other => Err(CoreError::InvalidPeriod(other.to_string())),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Today => write!(f, "today"),
            Period::Month => write!(f, "month"),
            Period::Total => write!(f, "total"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usage::UsageRecord;

    fn aggregate(date: &str, records: &[(&str, u64, u64, f64)]) -> DailyAggregate {
        let mut daily = DailyAggregate::new(date);
        for (model, input, output, cost) in records {
            daily.record(&UsageRecord::new(*model, *input, *output, *cost, "req"));
        }
        daily
    }

    fn sample_aggregates() -> BTreeMap<String, DailyAggregate> {
        let mut map = BTreeMap::new();
        map.insert(
            "2026-07-30".to_string(),
            aggregate("2026-07-30", &[("qwen3-32b", 500, 200, 0.000263)]),
        );
        map.insert(
            "2026-08-01".to_string(),
            aggregate(
                "2026-08-01",
                &[
                    ("llama3-70b-8192", 1500, 800, 0.001517),
                    ("llama3-8b-8192", 800, 400, 0.000072),
                ],
            ),
        );
        map.insert(
            "2026-08-15".to_string(),
            aggregate("2026-08-15", &[("llama3-70b-8192", 2000, 1200, 0.002128)]),
        );
        map
    }

    #[test]
    fn test_monthly_sums_matching_days_only() {
        let aggregates = sample_aggregates();
        let monthly = MonthlySummary::for_month(2026, 8, &aggregates);

        assert_eq!(monthly.total_requests, 3);
        assert_eq!(monthly.total_input_tokens, 4300);
        assert_eq!(monthly.total_output_tokens, 2400);
        assert!((monthly.total_cost_usd - 0.003717).abs() < 1e-12);
        assert_eq!(monthly.daily_breakdown.len(), 2);
        assert_eq!(monthly.models_used.get("llama3-70b-8192"), Some(&2));
        assert_eq!(monthly.models_used.get("llama3-8b-8192"), Some(&1));
        assert!(!monthly.models_used.contains_key("qwen3-32b"));
    }

    #[test]
    fn test_monthly_equals_sum_of_days() {
        let aggregates = sample_aggregates();
        let monthly = MonthlySummary::for_month(2026, 8, &aggregates);

        let expected_requests: u64 = aggregates
            .iter()
            .filter(|(d, _)| d.starts_with("2026-08"))
            .map(|(_, a)| a.total_requests)
            .sum();
        assert_eq!(monthly.total_requests, expected_requests);
    }

    #[test]
    fn test_empty_month_is_all_zero() {
        let aggregates = sample_aggregates();
        let monthly = MonthlySummary::for_month(1999, 1, &aggregates);

        assert_eq!(monthly.total_requests, 0);
        assert_eq!(monthly.total_cost_usd, 0.0);
        assert!(monthly.daily_breakdown.is_empty());
        assert!(monthly.models_used.is_empty());
        assert_eq!(monthly.formatted.total_tokens, "0");
    }

    #[test]
    fn test_total_sums_everything() {
        let aggregates = sample_aggregates();
        let total = TotalSummary::from_aggregates(&aggregates);

        assert_eq!(total.total_requests, 4);
        assert_eq!(total.total_input_tokens, 4800);
        assert_eq!(total.total_output_tokens, 2600);
        assert_eq!(total.days_active, 3);
        assert_eq!(total.first_date.as_deref(), Some("2026-07-30"));
        assert_eq!(total.last_date.as_deref(), Some("2026-08-15"));
        assert_eq!(total.models_used.get("llama3-70b-8192"), Some(&2));
        assert_eq!(total.models_used.get("qwen3-32b"), Some(&1));
    }

    #[test]
    fn test_total_of_empty_map() {
        let total = TotalSummary::from_aggregates(&BTreeMap::new());
        assert_eq!(total.total_requests, 0);
        assert_eq!(total.days_active, 0);
        assert!(total.first_date.is_none());
        assert!(total.last_date.is_none());
    }

    #[test]
    fn test_formatted_totals() {
        let formatted = FormattedTotals::from_totals(4300, 2400, 0.003717);
        assert_eq!(formatted.input_tokens, "4,300");
        assert_eq!(formatted.output_tokens, "2,400");
        assert_eq!(formatted.total_tokens, "6,700");
        assert_eq!(formatted.cost_usd, "$0.003717");
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("today".parse::<Period>().unwrap(), Period::Today);
        assert_eq!("month".parse::<Period>().unwrap(), Period::Month);
        assert_eq!("total".parse::<Period>().unwrap(), Period::Total);
    }

    #[test]
    fn test_period_parse_invalid() {
        let err = "yesterday".parse::<Period>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidPeriod(ref p) if p == "yesterday"));
    }

    #[test]
    fn test_daily_summary_formats_aggregate() {
        let daily = aggregate("2026-08-01", &[("llama3-70b-8192", 1500, 800, 0.001517)]);
        let summary = DailySummary::new(daily);
        assert_eq!(summary.formatted.input_tokens, "1,500");
        assert_eq!(summary.formatted.cost_usd, "$0.001517");
    }
}
