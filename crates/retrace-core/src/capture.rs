//! Environment capture: the current run's package snapshot.
//!
//! Captures installed package versions from the same interpreter
//! environment that ran the tests, feeding every version string through
//! the hash extractor.

use std::process::Command;

use retrace_store::{PackageInfo, PackageSnapshot};
use serde::Deserialize;
use tracing::debug;

use crate::config::TrackedPackages;
use crate::domain::{BisectError, Result};
use crate::version::{parse_version, VersionOrigin};

/// Produces the current run's package snapshot.
pub trait EnvironmentCapture {
    /// Capture versions for the tracked packages.
    ///
    /// With [`TrackedPackages::List`], packages the environment does not
    /// contain are simply absent from the snapshot (the diff reports the
    /// missing endpoint).
    fn capture(&self, tracked: &TrackedPackages) -> Result<PackageSnapshot>;
}

/// One entry of `pip list --format=json` output.
#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: String,
    version: String,
}

/// Environment capture backed by a pip invocation.
///
/// Runs `<python> -m pip list --format=json` so versions come from the
/// exact interpreter that executed the tests, not whichever pip is first
/// on PATH.
pub struct PipCapture {
    python_command: Vec<String>,
    origin: VersionOrigin,
}

impl PipCapture {
    /// Create a capture around the given interpreter invocation, e.g.
    /// `["python3"]` or `["conda", "run", "python"]`.
    pub fn new(python_command: Vec<String>, origin: VersionOrigin) -> Self {
        Self {
            python_command,
            origin,
        }
    }

    fn list_installed(&self) -> Result<Vec<PipListEntry>> {
        let (program, args) = self
            .python_command
            .split_first()
            .ok_or_else(|| BisectError::Capture("empty python command".to_string()))?;

        let output = Command::new(program)
            .args(args)
            .args(["-m", "pip", "list", "--format=json"])
            .output()
            .map_err(|e| BisectError::Capture(format!("failed to run pip: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BisectError::Capture(format!("pip list failed: {stderr}")));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| BisectError::Capture(format!("malformed pip output: {e}")))
    }
}

impl EnvironmentCapture for PipCapture {
    fn capture(&self, tracked: &TrackedPackages) -> Result<PackageSnapshot> {
        let installed = self.list_installed()?;
        debug!(event = "capture.listed", count = installed.len());

        let entries = installed.into_iter().filter_map(|entry| {
            let name = entry.name.to_ascii_lowercase();
            let keep = match tracked {
                TrackedPackages::All => true,
                TrackedPackages::List(names) => names.iter().any(|n| *n == name),
            };
            keep.then(|| {
                let parsed = parse_version(&entry.version, self.origin);
                (name, parsed.into_package_info())
            })
        });

        Ok(PackageSnapshot::from_entries(entries))
    }
}

/// Build a snapshot from already-known (name, version) pairs.
///
/// For producers that capture versions upstream (an action step, a lock
/// file) and only need hash extraction applied.
pub fn snapshot_from_versions<'a>(
    versions: impl IntoIterator<Item = (&'a str, &'a str)>,
    origin: VersionOrigin,
) -> PackageSnapshot {
    PackageSnapshot::from_entries(versions.into_iter().map(|(name, version)| {
        let parsed = parse_version(version, origin);
        (name.to_string(), parsed.into_package_info())
    }))
}
