//! Store error types.

use thiserror::Error;

/// Errors that can occur while loading or saving metering state.
///
/// These never propagate out of [`crate::UsageMeter::track`]; write failures
/// are logged and absorbed so metering cannot fail the chat path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
