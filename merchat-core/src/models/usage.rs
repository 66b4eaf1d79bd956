//! Per-call usage records and daily aggregates.
//!
//! A [`UsageRecord`] captures one completed completion call and is never
//! mutated afterwards. A [`DailyAggregate`] accumulates every record sharing
//! a calendar date; summing the log entries for a date must reproduce that
//! date's aggregate exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::summary::FormattedTotals;

// ============================================================================
// Usage Record
// ============================================================================

/// Immutable record of one completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Model identifier as supplied by the upstream provider.
    pub model: String,
    /// Input tokens consumed.
    pub input_tokens: u64,
    /// Output tokens produced.
    pub output_tokens: u64,
    /// Input + output, stored for convenience.
    pub total_tokens: u64,
    /// USD cost, computed from the pricing catalog at creation time.
    /// Never recomputed: later pricing changes do not alter stored records.
    pub cost_usd: f64,
    /// When the call completed.
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied or generated unique identifier.
    pub request_id: String,
}

impl UsageRecord {
    /// Creates a record for a completed call.
    pub fn new(
        model: impl Into<String>,
        input_tokens: u64,
        output_tokens: u64,
        cost_usd: f64,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cost_usd,
            timestamp: Utc::now(),
            request_id: request_id.into(),
        }
    }

    /// Returns a zero-valued record.
    ///
    /// The meter returns this when tracking is disabled so callers can
    /// invoke it unconditionally without branching on configuration.
    pub fn zeroed() -> Self {
        Self {
            model: String::new(),
            input_tokens: 0,
            output_tokens: 0,
            total_tokens: 0,
            cost_usd: 0.0,
            timestamp: Utc::now(),
            request_id: String::new(),
        }
    }

    /// The ISO `YYYY-MM-DD` date key this record aggregates under.
    pub fn date_key(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

// ============================================================================
// Daily Aggregate
// ============================================================================

/// Accumulated totals for all calls on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// Date in `YYYY-MM-DD` format.
    pub date: String,
    /// Number of calls recorded on this date.
    pub total_requests: u64,
    /// Input tokens across all calls.
    pub total_input_tokens: u64,
    /// Output tokens across all calls.
    pub total_output_tokens: u64,
    /// USD cost across all calls.
    pub total_cost_usd: f64,
    /// Model identifier to request count for this date.
    #[serde(default)]
    pub models_used: BTreeMap<String, u64>,
}

impl DailyAggregate {
    /// Creates an empty aggregate for the given date.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            total_requests: 0,
            total_input_tokens: 0,
            total_output_tokens: 0,
            total_cost_usd: 0.0,
            models_used: BTreeMap::new(),
        }
    }

    /// Folds one record into this aggregate.
    pub fn record(&mut self, usage: &UsageRecord) {
        self.total_requests += 1;
        self.total_input_tokens += usage.input_tokens;
        self.total_output_tokens += usage.output_tokens;
        self.total_cost_usd += usage.cost_usd;
        *self.models_used.entry(usage.model.clone()).or_insert(0) += 1;
    }

    /// Total tokens (input + output) for this date.
    pub fn total_tokens(&self) -> u64 {
        self.total_input_tokens + self.total_output_tokens
    }

    /// Display strings for this aggregate's totals.
    pub fn formatted(&self) -> FormattedTotals {
        FormattedTotals::from_totals(
            self.total_input_tokens,
            self.total_output_tokens,
            self.total_cost_usd,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_totals() {
        let record = UsageRecord::new("llama3-70b-8192", 1500, 800, 0.001517, "req_1");
        assert_eq!(record.total_tokens, 2300);
        assert_eq!(record.date_key().len(), 10);
    }

    #[test]
    fn test_zeroed_record() {
        let record = UsageRecord::zeroed();
        assert_eq!(record.input_tokens, 0);
        assert_eq!(record.output_tokens, 0);
        assert_eq!(record.total_tokens, 0);
        assert_eq!(record.cost_usd, 0.0);
        assert!(record.model.is_empty());
        assert!(record.request_id.is_empty());
    }

    #[test]
    fn test_aggregate_record_fold() {
        let mut aggregate = DailyAggregate::new("2026-08-30");

        let a = UsageRecord::new("llama3-70b-8192", 1500, 800, 0.001517, "req_1");
        let b = UsageRecord::new("llama3-8b-8192", 800, 400, 0.000072, "req_2");
        let c = UsageRecord::new("llama3-70b-8192", 2000, 1200, 0.002128, "req_3");

        aggregate.record(&a);
        aggregate.record(&b);
        aggregate.record(&c);

        assert_eq!(aggregate.total_requests, 3);
        assert_eq!(aggregate.total_input_tokens, 4300);
        assert_eq!(aggregate.total_output_tokens, 2400);
        assert_eq!(aggregate.total_tokens(), 6700);
        assert!((aggregate.total_cost_usd - 0.003717).abs() < 1e-12);
        assert_eq!(aggregate.models_used.get("llama3-70b-8192"), Some(&2));
        assert_eq!(aggregate.models_used.get("llama3-8b-8192"), Some(&1));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut aggregate = DailyAggregate::new("2026-08-30");
        aggregate.record(&UsageRecord::new("qwen3-32b", 100, 50, 0.0001, "req_1"));

        let json = serde_json::to_string(&aggregate).unwrap();
        let back: DailyAggregate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, aggregate);
    }
}
