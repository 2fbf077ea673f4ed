//! Error types for the sync engine.

use geosafe_consensus::ApprovalRejection;
use std::time::Duration;
use thiserror::Error;

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing or performing actions.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure talking to the report service
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The report service did not answer in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The report service answered with a non-success status
    #[error("Rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The approval was refused before any request was sent
    #[error("Approval rejected: {0}")]
    Approval(#[from] ApprovalRejection),

    /// The acting user lacks the role for this action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether retrying later (next poll, user retry) may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout(_) => true,
            Error::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<geosafe_model::Error> for Error {
    fn from(e: geosafe_model::Error) -> Self {
        match e {
            geosafe_model::Error::InvalidInput(msg) => Error::InvalidInput(msg),
            other => Error::InvalidInput(other.to_string()),
        }
    }
}
