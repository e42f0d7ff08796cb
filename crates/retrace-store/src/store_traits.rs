//! Storage trait definition for the run-history store.
//!
//! The store is append-only and read-mostly: every CI run appends exactly
//! one record, and bisection reads history backwards from the current
//! run's timestamp. Backends are free to index however they like as long
//! as the contract below holds.

use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::records::RunRecord;

/// Append-only history of CI run records.
///
/// Guarantees:
/// - `append` preserves total ordering of records by timestamp (backends
///   may reject out-of-order appends or sort on read, but `list_before`
///   must always return descending timestamps).
/// - `list_before` returns only records with timestamp strictly earlier
///   than the bound, newest first, at most `limit` of them.
/// - Appended records are immutable.
///
/// A backend with an index by `(test_id, status)` may answer history
/// searches directly; the contract callers rely on is "most recent
/// strictly-earlier record", regardless of substrate.
pub trait RunRecordStore: Send + Sync {
    /// Append one run's record to the history.
    fn append(&self, record: &RunRecord) -> StoreResult<()>;

    /// List records strictly earlier than `before`, newest first.
    fn list_before(&self, before: DateTime<Utc>, limit: usize) -> StoreResult<Vec<RunRecord>>;
}
