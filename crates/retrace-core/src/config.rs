//! Engine configuration.
//!
//! Everything that used to be ambient, process-wide state in comparable
//! tooling (tracked packages, lookback bounds, report budgets) is an
//! explicit field here, passed into the engine at construction.

use serde::{Deserialize, Serialize};

use crate::version::VersionOrigin;

/// Which packages participate in snapshot diffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "names", rename_all = "snake_case")]
pub enum TrackedPackages {
    /// Diff only the named packages; one absent from a snapshot yields a
    /// change with the corresponding endpoint absent.
    List(Vec<String>),

    /// Diff over the union of package names from both snapshots.
    All,
}

impl TrackedPackages {
    /// Build a tracked list from user input, normalizing names. The
    /// single entry "all" (any case) selects [`TrackedPackages::All`].
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim().to_ascii_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        if names.len() == 1 && names[0] == "all" {
            TrackedPackages::All
        } else {
            TrackedPackages::List(names)
        }
    }
}

/// Horizon bounding the backward history scan.
///
/// Keeps search cost bounded on stores with long, mostly-failing
/// histories. Either bound stops the scan; `max_age` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lookback {
    /// Maximum number of earlier records to examine.
    pub max_runs: usize,

    /// Oldest record age considered, in seconds relative to the current
    /// run's timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_secs: Option<i64>,
}

impl Lookback {
    /// The time-window bound as a `chrono::Duration`, if configured.
    pub fn max_age(&self) -> Option<chrono::Duration> {
        self.max_age_secs.map(chrono::Duration::seconds)
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self {
            max_runs: 200,
            max_age_secs: None,
        }
    }
}

/// Configuration for one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Packages included in diff analysis.
    pub tracked: TrackedPackages,

    /// Provenance of captured version strings, selecting the hash
    /// extraction rule.
    pub origin: VersionOrigin,

    /// History-search horizon.
    pub lookback: Lookback,

    /// Character budget per rendered test section. Commit lists are
    /// truncated first, with a count of omitted entries.
    pub section_char_budget: usize,

    /// Character budget for the whole report. Sections are truncated
    /// lowest-priority first (no-prior-pass sections collapse before
    /// regression windows lose content).
    pub report_char_budget: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tracked: TrackedPackages::All,
            origin: VersionOrigin::Standard,
            lookback: Lookback::default(),
            // GitHub issue bodies cap at 65536 characters; leave headroom
            // for the surrounding issue template.
            section_char_budget: 4_000,
            report_char_budget: 60_000,
        }
    }
}
