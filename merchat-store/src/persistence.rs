//! File persistence helpers.
//!
//! Handles loading and saving the two metering artifacts. Loads are
//! tolerant: a missing file and an unreadable file are distinguished but
//! both recover to an empty dataset rather than failing the process.

use serde::{Serialize, de::DeserializeOwned};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default metering data directory.
///
/// - Linux: `~/.local/share/merchat/usage`
/// - macOS: `~/Library/Application Support/merchat/usage`
/// - Windows: `%APPDATA%\merchat\usage`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("merchat").join("usage"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default daily-aggregates artifact path.
pub fn default_aggregates_path() -> PathBuf {
    default_data_dir().join("daily_aggregates.json")
}

/// Returns the default usage-log artifact path.
pub fn default_log_path() -> PathBuf {
    default_data_dir().join("usage_log.json")
}

// ============================================================================
// Load Outcome
// ============================================================================

/// Result of a tolerant dataset load.
///
/// Distinguishes "no data yet" from "data present but unreadable" so callers
/// and tests can tell the two recovery paths apart.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    /// Artifact present and parsed.
    Loaded(T),
    /// Artifact absent. Expected on first run; not a warning.
    Missing,
    /// Artifact present but unreadable or unparseable.
    Corrupt,
}

impl<T: Default> LoadOutcome<T> {
    /// Unwraps the loaded data, or an empty dataset for the recovery arms.
    pub fn into_data(self) -> T {
        match self {
            LoadOutcome::Loaded(data) => data,
            LoadOutcome::Missing | LoadOutcome::Corrupt => T::default(),
        }
    }

}

// ============================================================================
// File Operations
// ============================================================================

/// Saves data to a JSON file.
///
/// Creates parent directories if they don't exist and writes atomically
/// (temp file + rename) so a crash mid-write cannot corrupt the artifact.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            debug!(path = %parent.display(), "Creating data directory");
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), "JSON file saved");
    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Loads a dataset, classifying the outcome.
///
/// An absent file is [`LoadOutcome::Missing`] and stays silent. Any read or
/// parse failure is [`LoadOutcome::Corrupt`] and is warned, with the dataset
/// treated as empty by the caller.
pub async fn load_dataset<T: DeserializeOwned>(path: &Path) -> LoadOutcome<T> {
    match load_json(path).await {
        Ok(data) => LoadOutcome::Loaded(data),
        Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Artifact not found, starting empty");
            LoadOutcome::Missing
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Artifact unreadable, starting empty");
            LoadOutcome::Corrupt
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
