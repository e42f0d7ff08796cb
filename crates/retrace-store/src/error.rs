//! Error types for retrace-store

use thiserror::Error;

/// Errors that can occur in the run-history persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend connection error
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// Backend read error
    #[error("Store read failed: {0}")]
    Read(String),

    /// Backend append error
    #[error("Store append failed: {0}")]
    Append(String),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Run record not found
    #[error("Run not found: {0}")]
    RunNotFound(String),

    /// Append would violate the timestamp ordering invariant
    #[error("Run {run_id} is not newer than the latest stored record")]
    OutOfOrderAppend { run_id: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
