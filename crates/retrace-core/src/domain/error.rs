//! Domain-level error taxonomy for retrace.

use retrace_store::StoreError;

/// Errors produced by the source-control collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("commit {hash} is not resolvable in repository history")]
    Unresolvable { hash: String },

    #[error("source-control command failed: {0}")]
    Command(String),
}

/// Retrace domain errors.
#[derive(Debug, thiserror::Error)]
pub enum BisectError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("source-control error: {0}")]
    Scm(#[from] ScmError),

    #[error("environment capture failed: {0}")]
    Capture(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for retrace domain operations.
pub type Result<T> = std::result::Result<T, BisectError>;
