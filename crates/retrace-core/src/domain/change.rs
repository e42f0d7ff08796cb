//! Derived comparison types: version changes, commit ranges, bisection
//! outcomes.

use std::collections::BTreeMap;

use retrace_store::{PackageInfo, RunRecord};
use serde::{Deserialize, Serialize};

/// One package's version movement between two snapshots.
///
/// Derived, never persisted. An absent `from` means the package is newly
/// introduced; an absent `to` means it was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionChange {
    /// Case-normalized package name.
    pub package: String,

    /// Endpoint in the older snapshot, if present there.
    pub from: Option<PackageInfo>,

    /// Endpoint in the newer snapshot, if present there.
    pub to: Option<PackageInfo>,
}

impl VersionChange {
    /// Whether both endpoints carry the same version string (a nightly
    /// rebuild where only the embedded commit moved).
    pub fn is_revision_only(&self) -> bool {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => from.version == to.version,
            _ => false,
        }
    }

    /// The commit range bounded by this change, when both endpoints
    /// expose an extractable commit hash.
    pub fn commit_range(&self) -> Option<CommitRange> {
        let from = self.from.as_ref()?.commit_hash.as_deref()?;
        let to = self.to.as_ref()?.commit_hash.as_deref()?;
        Some(CommitRange {
            from_commit: from.to_string(),
            to_commit: to.to_string(),
        })
    }
}

/// Endpoint commits bounding a package's regression window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRange {
    pub from_commit: String,
    pub to_commit: String,
}

/// One commit in a shortlog supplied by the source-control collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Abbreviated or full commit hash.
    pub hash: String,

    /// One-line description.
    pub summary: String,
}

/// Why history search found no prior passing run.
///
/// Distinguished internally for logging; all variants render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoPassReason {
    /// The store holds no earlier records at all.
    EmptyHistory,

    /// The test appears in history but never with a passing result.
    NeverPassed,

    /// The test id does not appear in any earlier record (new test).
    UnknownTest,

    /// The lookback horizon was reached before a pass was found.
    HorizonReached,

    /// The store read failed; history is unavailable.
    StoreUnavailable,
}

/// Outcome of bisection for one failing test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BisectionResult {
    /// No run was found in which this test passed.
    NoPriorPass { reason: NoPassReason },

    /// A last-pass run exists; the window between it and the current run
    /// bounds the regression.
    RegressionWindow {
        /// The most recent strictly-earlier run where the test passed.
        last_pass: RunRecord,

        /// Tracked-package changes, ordered alphabetically by name.
        changes: Vec<VersionChange>,

        /// Package → endpoint commits, for changes where both endpoints
        /// exposed a hash.
        commit_ranges: BTreeMap<String, CommitRange>,

        /// Package → shortlog (oldest first) for ranges the
        /// source-control collaborator resolved.
        commits: BTreeMap<String, Vec<CommitSummary>>,
    },
}

impl BisectionResult {
    /// Whether this result carries a regression window.
    pub fn has_window(&self) -> bool {
        matches!(self, BisectionResult::RegressionWindow { .. })
    }
}
