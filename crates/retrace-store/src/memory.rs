//! In-memory fake for the run-history store (testing only)
//!
//! Provides `MemoryRunStore`, which satisfies the `RunRecordStore`
//! contract without any external dependencies.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};
use crate::records::RunRecord;
use crate::store_traits::RunRecordStore;

/// In-memory run store backed by a `Mutex<Vec<RunRecord>>`.
///
/// Records are kept sorted by timestamp ascending; `list_before` walks
/// the tail backwards.
#[derive(Debug, Default)]
pub struct MemoryRunStore {
    records: Mutex<Vec<RunRecord>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-existing history (test setup helper).
    pub fn with_records(records: impl IntoIterator<Item = RunRecord>) -> Self {
        let mut records: Vec<RunRecord> = records.into_iter().collect();
        records.sort_by_key(|r| r.timestamp);
        Self {
            records: Mutex::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RunRecordStore for MemoryRunStore {
    fn append(&self, record: &RunRecord) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        if let Some(last) = records.last() {
            if record.timestamp <= last.timestamp {
                return Err(StoreError::OutOfOrderAppend {
                    run_id: record.run_id.to_string(),
                });
            }
        }
        records.push(record.clone());
        Ok(())
    }

    fn list_before(&self, before: DateTime<Utc>, limit: usize) -> StoreResult<Vec<RunRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.timestamp < before)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Store whose reads always fail (test helper for degraded-history paths).
#[derive(Debug, Default)]
pub struct FailingRunStore;

impl RunRecordStore for FailingRunStore {
    fn append(&self, _record: &RunRecord) -> StoreResult<()> {
        Err(StoreError::Append("store offline".to_string()))
    }

    fn list_before(&self, _before: DateTime<Utc>, _limit: usize) -> StoreResult<Vec<RunRecord>> {
        Err(StoreError::Read("store offline".to_string()))
    }
}
