//! Domain models for retrace.
//!
//! Canonical definitions for the derived entities of bisection analysis:
//! - `VersionChange` / `CommitRange`: package movement between snapshots
//! - `BisectionResult`: per-test outcome of the analysis
//! - `BisectError`: domain error taxonomy

pub mod change;
pub mod error;

// Re-export main types and errors
pub use change::{BisectionResult, CommitRange, CommitSummary, NoPassReason, VersionChange};
pub use error::{BisectError, Result, ScmError};
