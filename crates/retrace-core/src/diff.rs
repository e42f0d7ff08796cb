//! Package-snapshot diffing.
//!
//! Produces the ordered change list between the last-pass and current
//! snapshots, restricted to the tracked-package configuration.

use std::collections::BTreeSet;

use retrace_store::PackageSnapshot;

use crate::config::TrackedPackages;
use crate::domain::VersionChange;

/// Diff two snapshots under the tracked-package configuration.
///
/// Changes come back ordered alphabetically by package name. A package
/// present in both snapshots with an identical version string and
/// identical commit hash is a no-op and excluded. An identical version
/// with a different commit hash is a change (nightly rebuild). Packages
/// absent from both snapshots are skipped.
pub fn diff_snapshots(
    old: &PackageSnapshot,
    new: &PackageSnapshot,
    tracked: &TrackedPackages,
) -> Vec<VersionChange> {
    // Identical content short-circuits the walk entirely.
    if old.digest() == new.digest() {
        return Vec::new();
    }

    let names: BTreeSet<String> = match tracked {
        TrackedPackages::List(names) => names.iter().map(|n| n.to_ascii_lowercase()).collect(),
        TrackedPackages::All => old
            .names()
            .chain(new.names())
            .map(|n| n.to_string())
            .collect(),
    };

    names
        .into_iter()
        .filter_map(|package| {
            let from = old.get(&package).cloned();
            let to = new.get(&package).cloned();
            match (&from, &to) {
                (None, None) => None,
                (Some(a), Some(b)) if a == b => None,
                _ => Some(VersionChange { package, from, to }),
            }
        })
        .collect()
}
