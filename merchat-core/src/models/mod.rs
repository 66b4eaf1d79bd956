//! Domain models for Merchat usage metering.
//!
//! ## Submodules
//!
//! - [`usage`] - Per-call records and daily aggregates
//! - [`summary`] - Aggregate query results and the reporting period

mod summary;
mod usage;

// Re-export everything at the models level
pub use summary::{DailySummary, FormattedTotals, MonthlySummary, Period, TotalSummary};
pub use usage::{DailyAggregate, UsageRecord};
