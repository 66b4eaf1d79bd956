// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Merchat Core
//!
//! Core types for the Merchat usage-metering subsystem.
//!
//! This crate provides the foundational abstractions used by the store and
//! CLI crates:
//!
//! - Usage models ([`UsageRecord`], [`DailyAggregate`])
//! - Aggregate summaries ([`DailySummary`], [`MonthlySummary`], [`TotalSummary`])
//! - The pricing catalog ([`PricingCatalog`], [`ModelRates`])
//! - Display formatting helpers
//! - Error types
//!
//! Records are immutable once created: a record's cost is computed from the
//! pricing catalog at creation time and never recomputed, so later pricing
//! changes do not retroactively alter stored data.

pub mod error;
pub mod format;
pub mod models;
pub mod pricing;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    DailyAggregate, DailySummary, FormattedTotals, MonthlySummary, Period, TotalSummary,
    UsageRecord,
};

// Re-export pricing types
pub use pricing::{DEFAULT_RATES, ModelRates, PricingCatalog};
