//! Core error types for Merchat.

use thiserror::Error;

/// Core error type for Merchat operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unrecognized reporting period at the query boundary.
    #[error("Invalid period '{0}': expected one of 'today', 'month', 'total'")]
    InvalidPeriod(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
