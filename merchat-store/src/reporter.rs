//! Read-only summary queries.
//!
//! A [`SummaryReporter`] shares the meter's state behind the same lock, so
//! every query reflects all `track` calls that completed before the read
//! began. No query path mutates anything.

use chrono::Utc;
use merchat_core::{DailySummary, MonthlySummary, TotalSummary, UsageRecord};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::meter::MeterState;

/// Returns today's ISO `YYYY-MM-DD` date key (UTC).
fn today_key() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Read-only reporting handle over the metering state.
///
/// Cheap to clone; all clones observe the same state.
#[derive(Clone)]
pub struct SummaryReporter {
    inner: Arc<RwLock<MeterState>>,
}

impl SummaryReporter {
    pub(crate) fn new(inner: Arc<RwLock<MeterState>>) -> Self {
        Self { inner }
    }

    /// Returns the aggregate for one date (today by default).
    ///
    /// Exact key lookup; `None` when no aggregate exists for that date.
    pub async fn daily(&self, date: Option<&str>) -> Option<DailySummary> {
        let key = date.map_or_else(today_key, str::to_string);
        self.inner
            .read()
            .await
            .aggregates
            .get(&key)
            .cloned()
            .map(DailySummary::new)
    }

    /// Returns the summary for one calendar month.
    ///
    /// A month with no data yields all-zero sums, not an error.
    pub async fn monthly(&self, year: i32, month: u32) -> MonthlySummary {
        let state = self.inner.read().await;
        MonthlySummary::for_month(year, month, &state.aggregates)
    }

    /// Returns the all-time summary.
    pub async fn total(&self) -> TotalSummary {
        let state = self.inner.read().await;
        TotalSummary::from_aggregates(&state.aggregates)
    }

    /// Returns the most recent `limit` log entries in chronological order.
    pub async fn recent_entries(&self, limit: usize) -> Vec<UsageRecord> {
        let state = self.inner.read().await;
        let start = state.log.len().saturating_sub(limit);
        state.log[start..].to_vec()
    }
}
