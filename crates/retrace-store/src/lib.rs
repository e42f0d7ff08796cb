//! Run-history persistence contract for retrace (Layer 0).
//!
//! This crate defines the record types one CI run persists, the
//! append/read trait the bisection engine consumes, and an in-memory
//! fake satisfying the trait contract for tests. Actual backends (side
//! branch, object store, database) live outside the core and only need
//! to honor the `RunRecordStore` contract.

pub mod error;
pub mod memory;
pub mod records;
pub mod store_traits;

pub use error::{StoreError, StoreResult};
pub use memory::{FailingRunStore, MemoryRunStore};
pub use records::{
    PackageInfo, PackageSnapshot, RepoInfo, RunId, RunRecord, TestResult, TestStatus,
};
pub use store_traits::RunRecordStore;
