//! Error types for the report model.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating or decoding model values.
#[derive(Debug, Error)]
pub enum Error {
    /// A draft or location failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The user-info header could not be decoded
    #[error("Invalid identity: {0}")]
    InvalidIdentity(#[from] serde_json::Error),
}
