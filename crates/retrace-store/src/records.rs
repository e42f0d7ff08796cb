//! Run-history record types.
//!
//! Canonical definitions for the entities persisted per CI run:
//! - `PackageSnapshot`: immutable package name → version mapping
//! - `RunRecord`: one CI execution's snapshot plus per-test outcomes
//!
//! All types are plain serde structs so any backend can store them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Unique identifier for a CI run.
///
/// Opaque to the engine; the store guarantees run ids are totally ordered
/// by their record's timestamp, which is what history search relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random RunId.
    pub fn new() -> Self {
        RunId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version info captured for a single installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Version string exactly as reported by the package manager.
    pub version: String,

    /// Source commit hash extracted from the version string, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
}

impl PackageInfo {
    /// Create package info with no commit hash.
    pub fn version_only(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            commit_hash: None,
        }
    }

    /// Create package info with an extracted commit hash.
    pub fn with_commit(version: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            commit_hash: Some(commit_hash.into()),
        }
    }
}

/// Immutable mapping of package name → captured version info.
///
/// Names are case-normalized (lowercased) at insertion so lookups are
/// stable across package managers that report mixed case. Backed by a
/// `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSnapshot {
    packages: BTreeMap<String, PackageInfo>,
}

impl PackageSnapshot {
    /// Build a snapshot from (name, info) pairs, normalizing names.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, PackageInfo)>) -> Self {
        let packages = entries
            .into_iter()
            .map(|(name, info)| (name.to_ascii_lowercase(), info))
            .collect();
        Self { packages }
    }

    /// Look up a package by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&PackageInfo> {
        self.packages.get(&name.to_ascii_lowercase())
    }

    /// Whether the snapshot contains a package.
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(&name.to_ascii_lowercase())
    }

    /// Iterate packages in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PackageInfo)> {
        self.packages.iter()
    }

    /// Package names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.packages.keys()
    }

    /// Number of captured packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// SHA-256 content digest of the snapshot (lowercase hex).
    ///
    /// Deterministic over the sorted entries; two snapshots with the same
    /// packages, versions, and commit hashes share a digest.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, info) in &self.packages {
            hasher.update(name.as_bytes());
            hasher.update(b"\0");
            hasher.update(info.version.as_bytes());
            hasher.update(b"\0");
            if let Some(hash) = &info.commit_hash {
                hasher.update(hash.as_bytes());
            }
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize())
    }
}

/// Outcome of a single test in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
}

/// Per-test result stored in a run record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Whether the test passed or failed.
    pub status: TestStatus,

    /// Wall-clock duration in milliseconds, when the producer reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl TestResult {
    /// A passing result with no duration.
    pub fn pass() -> Self {
        Self {
            status: TestStatus::Pass,
            duration_ms: None,
        }
    }

    /// A failing result with no duration.
    pub fn fail() -> Self {
        Self {
            status: TestStatus::Fail,
            duration_ms: None,
        }
    }
}

/// Host-repository commit captured alongside a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    /// Full commit SHA of the repository HEAD at run time.
    pub commit: String,

    /// One-line commit message.
    pub message: String,
}

impl RepoInfo {
    /// Short form of the commit (first 8 hex chars).
    pub fn short_commit(&self) -> &str {
        &self.commit[..8.min(self.commit.len())]
    }
}

/// One CI execution's environment snapshot plus per-test outcomes.
///
/// Created at the end of a run, appended to the store, immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique identifier for this run.
    pub run_id: RunId,

    /// When the run executed.
    pub timestamp: DateTime<Utc>,

    /// Package environment captured for this run.
    pub snapshot: PackageSnapshot,

    /// Test id → outcome for every test the run reported on.
    pub test_results: BTreeMap<String, TestResult>,

    /// Host-repository commit, when the producer captured it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoInfo>,
}

impl RunRecord {
    /// Create a run record for the given id and timestamp.
    pub fn new(run_id: RunId, timestamp: DateTime<Utc>, snapshot: PackageSnapshot) -> Self {
        Self {
            run_id,
            timestamp,
            snapshot,
            test_results: BTreeMap::new(),
            repo: None,
        }
    }

    /// Record a test outcome.
    pub fn with_result(mut self, test_id: impl Into<String>, result: TestResult) -> Self {
        self.test_results.insert(test_id.into(), result);
        self
    }

    /// Attach host-repository info.
    pub fn with_repo(mut self, repo: RepoInfo) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Outcome of a single test, if the run reported on it.
    pub fn result_for(&self, test_id: &str) -> Option<&TestResult> {
        self.test_results.get(test_id)
    }

    /// Whether the given test passed in this run.
    pub fn passed(&self, test_id: &str) -> bool {
        matches!(
            self.result_for(test_id),
            Some(TestResult {
                status: TestStatus::Pass,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(entries: &[(&str, &str)]) -> PackageSnapshot {
        PackageSnapshot::from_entries(
            entries
                .iter()
                .map(|(name, version)| (name.to_string(), PackageInfo::version_only(*version))),
        )
    }

    #[test]
    fn test_snapshot_normalizes_names() {
        let snap = snapshot(&[("NumPy", "1.24.0")]);
        assert!(snap.contains("numpy"));
        assert!(snap.contains("NUMPY"));
        assert_eq!(snap.get("numpy").unwrap().version, "1.24.0");
    }

    #[test]
    fn test_snapshot_iteration_is_sorted() {
        let snap = snapshot(&[("pandas", "2.0.0"), ("numpy", "1.24.0"), ("xarray", "2024.1")]);
        let names: Vec<_> = snap.names().cloned().collect();
        assert_eq!(names, vec!["numpy", "pandas", "xarray"]);
    }

    #[test]
    fn test_snapshot_digest_deterministic() {
        let a = snapshot(&[("numpy", "1.24.0"), ("pandas", "2.0.0")]);
        let b = snapshot(&[("pandas", "2.0.0"), ("numpy", "1.24.0")]);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_snapshot_digest_sensitive_to_commit_hash() {
        let a = PackageSnapshot::from_entries([(
            "numpy".to_string(),
            PackageInfo::with_commit("2.1.0.dev0", "abc123d"),
        )]);
        let b = PackageSnapshot::from_entries([(
            "numpy".to_string(),
            PackageInfo::with_commit("2.1.0.dev0", "def456a"),
        )]);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_run_record_roundtrip() {
        let record = RunRecord::new(
            RunId("run-1".to_string()),
            Utc::now(),
            snapshot(&[("numpy", "1.24.0")]),
        )
        .with_result("test_mean", TestResult::pass())
        .with_result("test_std", TestResult::fail())
        .with_repo(RepoInfo {
            commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
            message: "initial".to_string(),
        });

        let json = serde_json::to_string(&record).expect("serialize");
        let deserialized: RunRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record, deserialized);
    }

    #[test]
    fn test_run_record_passed() {
        let record = RunRecord::new(RunId::new(), Utc::now(), PackageSnapshot::default())
            .with_result("test_a", TestResult::pass())
            .with_result("test_b", TestResult::fail());

        assert!(record.passed("test_a"));
        assert!(!record.passed("test_b"));
        assert!(!record.passed("test_never_seen"));
    }

    #[test]
    fn test_repo_info_short_commit() {
        let repo = RepoInfo {
            commit: "0123456789abcdef".to_string(),
            message: "m".to_string(),
        };
        assert_eq!(repo.short_commit(), "01234567");
    }
}
