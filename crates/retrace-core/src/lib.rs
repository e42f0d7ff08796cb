//! Retrace Core Library
//!
//! Bisection analysis of CI test regressions: given the failing tests of
//! the current run, find each test's most recent passing run, diff the
//! two package environments, resolve commit ranges from version-embedded
//! hashes, and render a Markdown report fragment per test.
//!
//! Re-exports core components for programmatic access.

pub mod capture;
pub mod config;
pub mod diff;
pub mod domain;
pub mod engine;
pub mod history;
pub mod links;
pub mod obs;
pub mod report;
pub mod scm;
pub mod telemetry;
pub mod version;

pub use domain::{
    BisectError, BisectionResult, CommitRange, CommitSummary, NoPassReason, Result, ScmError,
    VersionChange,
};

pub use capture::{snapshot_from_versions, EnvironmentCapture, PipCapture};
pub use config::{EngineConfig, Lookback, TrackedPackages};
pub use diff::diff_snapshots;
pub use engine::{AnalysisOutcome, BisectionEngine};
pub use history::{find_last_pass, SearchOutcome};
pub use links::compare_url;
pub use report::{render_report, render_test_section, write_report};
pub use scm::{is_git_repo, GitCli, SourceControl};
pub use version::{parse_version, ParsedVersion, VersionOrigin};

pub use retrace_store::{
    PackageInfo, PackageSnapshot, RepoInfo, RunId, RunRecord, RunRecordStore, TestResult,
    TestStatus,
};

pub use obs::{emit_analysis_finished, emit_analysis_started, emit_append_failed, AnalysisSpan};
pub use telemetry::init_tracing;

/// Retrace version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
