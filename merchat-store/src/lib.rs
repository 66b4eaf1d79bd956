// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Merchat Store
//!
//! Usage metering state and persistence for Merchat.
//!
//! This crate provides:
//!
//! - **UsageMeter**: records completed completion calls into daily aggregates
//!   and an append-only log, persisting both after every mutation
//! - **SummaryReporter**: read-only day/month/all-time queries over the same
//!   in-memory state
//! - **Persistence**: tolerant JSON load/save helpers for the two artifacts
//!
//! ## Usage
//!
//! ```ignore
//! use merchat_store::{MeterConfig, UsageMeter};
//!
//! let config = MeterConfig::default().enabled(true);
//! let meter = UsageMeter::load(config).await;
//!
//! // Once per completed upstream call
//! let record = meter.track("llama3-70b-8192", 1500, 800, None).await;
//!
//! // Read-only reporting
//! let reporter = meter.reporter();
//! let total = reporter.total().await;
//! println!("all-time cost: {}", total.formatted.cost_usd);
//! ```
//!
//! `track` serializes its whole read-modify-append-persist sequence behind a
//! single write lock, so concurrent callers never lose updates. Persistence
//! failures are logged and absorbed; metering never fails the chat path.

pub mod error;
pub mod meter;
pub mod persistence;
pub mod reporter;

pub use error::StoreError;
pub use meter::{MeterConfig, SCHEMA_VERSION, UsageMeter};
pub use persistence::{
    LoadOutcome, default_aggregates_path, default_data_dir, default_log_path, load_dataset,
    load_json, save_json,
};
pub use reporter::SummaryReporter;
