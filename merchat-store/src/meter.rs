//! The usage meter.
//!
//! Records one [`UsageRecord`] per completed completion call, folds it into
//! the day's aggregate, appends it to the usage log, and persists both
//! artifacts. The whole sequence runs under a single write lock so
//! concurrent callers are strictly serialized and no increment is lost.

use chrono::Utc;
use merchat_core::{DailyAggregate, PricingCatalog, UsageRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::persistence::{
    LoadOutcome, default_aggregates_path, default_log_path, load_dataset, save_json,
};
use crate::reporter::SummaryReporter;

/// Schema version written into both durable artifacts.
///
/// Artifacts carrying a different version are treated like corruption:
/// warned and loaded as empty, so evolution never breaks the tolerant-load
/// contract.
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Configuration
// ============================================================================

/// Meter configuration, fixed at construction.
///
/// Construct one instance at process start and pass the meter by reference
/// to every caller; there is no implicit global.
#[derive(Debug, Clone)]
pub struct MeterConfig {
    /// Whether tracking is enabled. When disabled, [`UsageMeter::track`]
    /// returns a zero-valued record and performs no I/O.
    pub enabled: bool,
    /// Path of the daily-aggregates artifact.
    pub aggregates_path: PathBuf,
    /// Path of the usage-log artifact.
    pub log_path: PathBuf,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            aggregates_path: default_aggregates_path(),
            log_path: default_log_path(),
        }
    }
}

impl MeterConfig {
    /// Sets the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Places both artifacts under the given directory.
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.aggregates_path = dir.join("daily_aggregates.json");
        self.log_path = dir.join("usage_log.json");
        self
    }
}

// ============================================================================
// Durable Artifacts
// ============================================================================

/// Owned aggregates artifact, as read from disk.
#[derive(Debug, Deserialize)]
struct AggregatesArtifact {
    schema_version: u32,
    #[serde(default)]
    aggregates: BTreeMap<String, DailyAggregate>,
}

/// Borrowing aggregates artifact, as written to disk.
#[derive(Serialize)]
struct AggregatesArtifactRef<'a> {
    schema_version: u32,
    aggregates: &'a BTreeMap<String, DailyAggregate>,
}

/// Owned usage-log artifact, as read from disk.
#[derive(Debug, Deserialize)]
struct LogArtifact {
    schema_version: u32,
    #[serde(default)]
    entries: Vec<UsageRecord>,
}

/// Borrowing usage-log artifact, as written to disk.
#[derive(Serialize)]
struct LogArtifactRef<'a> {
    schema_version: u32,
    entries: &'a [UsageRecord],
}

// ============================================================================
// Inner State
// ============================================================================

/// In-memory metering state shared between the meter and its reporters.
#[derive(Debug, Default)]
pub(crate) struct MeterState {
    /// Per-date aggregates, keyed by ISO `YYYY-MM-DD`.
    pub(crate) aggregates: BTreeMap<String, DailyAggregate>,
    /// Append-only usage log, in insertion order.
    pub(crate) log: Vec<UsageRecord>,
}

// ============================================================================
// Usage Meter
// ============================================================================

/// Records completed calls and owns the metering state.
///
/// The only writer of the shared state; [`SummaryReporter`] handles read
/// through the same lock.
pub struct UsageMeter {
    inner: Arc<RwLock<MeterState>>,
    config: MeterConfig,
    catalog: PricingCatalog,
}

impl UsageMeter {
    /// Loads a meter with the built-in pricing catalog.
    ///
    /// Both datasets are loaded independently and tolerantly: a corrupt log
    /// does not invalidate the aggregates, and vice versa.
    pub async fn load(config: MeterConfig) -> Self {
        Self::load_with_catalog(config, PricingCatalog::new()).await
    }

    /// Loads a meter with a custom pricing catalog.
    pub async fn load_with_catalog(config: MeterConfig, catalog: PricingCatalog) -> Self {
        let aggregates = load_aggregates(&config.aggregates_path).await;
        let log = load_log(&config.log_path).await;

        info!(
            enabled = config.enabled,
            days = aggregates.len(),
            entries = log.len(),
            "Usage meter loaded"
        );

        Self {
            inner: Arc::new(RwLock::new(MeterState { aggregates, log })),
            config,
            catalog,
        }
    }

    /// Returns true if tracking is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Returns a read-only reporting handle over this meter's state.
    pub fn reporter(&self) -> SummaryReporter {
        SummaryReporter::new(Arc::clone(&self.inner))
    }

    /// Records one completed completion call.
    ///
    /// When disabled, returns a zero-valued record without touching state or
    /// disk. When enabled, resolves pricing, then takes the write lock and
    /// builds the record, folds it into today's aggregate, appends it to the
    /// log, and persists both artifacts before returning. Timestamp and
    /// generated id are assigned inside the critical section, so the log's
    /// append order is also its timestamp order; concurrent `track` calls
    /// are strictly serialized with each other and with the in-flight save.
    ///
    /// A persistence failure is logged and absorbed; the in-memory state
    /// stays correct and the next successful save closes the gap.
    pub async fn track(
        &self,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
        request_id: Option<String>,
    ) -> UsageRecord {
        if !self.config.enabled {
            return UsageRecord::zeroed();
        }

        // Pricing is pure; only record construction needs the lock.
        let rates = self.catalog.resolve(model);
        let cost_usd = rates.cost(input_tokens, output_tokens);

        let mut state = self.inner.write().await;

        let request_id =
            request_id.unwrap_or_else(|| format!("req_{}", Utc::now().timestamp_millis()));
        let record = UsageRecord::new(model, input_tokens, output_tokens, cost_usd, request_id);

        let date = record.date_key();
        state
            .aggregates
            .entry(date.clone())
            .or_insert_with(|| DailyAggregate::new(date))
            .record(&record);
        state.log.push(record.clone());

        self.persist(&state).await;

        debug!(
            model = %record.model,
            input_tokens = record.input_tokens,
            output_tokens = record.output_tokens,
            cost_usd = record.cost_usd,
            request_id = %record.request_id,
            "Tracked completion call"
        );

        record
    }

    /// Best-effort save of both artifacts. Failures are warned, not raised.
    async fn persist(&self, state: &MeterState) {
        let aggregates = AggregatesArtifactRef {
            schema_version: SCHEMA_VERSION,
            aggregates: &state.aggregates,
        };
        if let Err(e) = save_json(&self.config.aggregates_path, &aggregates).await {
            warn!(
                path = %self.config.aggregates_path.display(),
                error = %e,
                "Failed to save daily aggregates"
            );
        }

        let log = LogArtifactRef {
            schema_version: SCHEMA_VERSION,
            entries: &state.log,
        };
        if let Err(e) = save_json(&self.config.log_path, &log).await {
            warn!(
                path = %self.config.log_path.display(),
                error = %e,
                "Failed to save usage log"
            );
        }
    }
}

// ============================================================================
// Artifact Loading
// ============================================================================

async fn load_aggregates(path: &Path) -> BTreeMap<String, DailyAggregate> {
    match load_dataset::<AggregatesArtifact>(path).await {
        LoadOutcome::Loaded(artifact) => {
            if artifact.schema_version == SCHEMA_VERSION {
                artifact.aggregates
            } else {
                warn!(
                    path = %path.display(),
                    found = artifact.schema_version,
                    supported = SCHEMA_VERSION,
                    "Unsupported aggregates schema version, starting empty"
                );
                BTreeMap::new()
            }
        }
        LoadOutcome::Missing | LoadOutcome::Corrupt => BTreeMap::new(),
    }
}

async fn load_log(path: &Path) -> Vec<UsageRecord> {
    match load_dataset::<LogArtifact>(path).await {
        LoadOutcome::Loaded(artifact) => {
            if artifact.schema_version == SCHEMA_VERSION {
                artifact.entries
            } else {
                warn!(
                    path = %path.display(),
                    found = artifact.schema_version,
                    supported = SCHEMA_VERSION,
                    "Unsupported usage log schema version, starting empty"
                );
                Vec::new()
            }
        }
        LoadOutcome::Missing | LoadOutcome::Corrupt => Vec::new(),
    }
}
