//! Structured observability hooks for the analysis lifecycle.
//!
//! This module provides:
//! - A run-scoped tracing span via the `AnalysisSpan` RAII guard
//! - Emission functions for key lifecycle events: start, finish, append
//!   failure
//!
//! Events are emitted at `info!` level; degraded paths use `warn!`.

use tracing::{info, warn};

/// RAII guard that enters an analysis-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = AnalysisSpan::enter("run-12345");
/// // Tracing calls are now associated with run_id = "run-12345"
/// ```
pub struct AnalysisSpan {
    _span: tracing::span::EnteredSpan,
}

impl AnalysisSpan {
    /// Create and enter a span tagged with the run id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("retrace.analysis", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: analysis started with the failing-test count.
pub fn emit_analysis_started(run_id: &str, failing_tests: usize) {
    info!(event = "analysis.started", run_id = %run_id, failing_tests = failing_tests);
}

/// Emit event: analysis finished with per-test outcome counts.
pub fn emit_analysis_finished(run_id: &str, tests: usize, windows: usize) {
    info!(
        event = "analysis.finished",
        run_id = %run_id,
        tests = tests,
        windows = windows,
        no_prior_pass = tests - windows,
    );
}

/// Emit event: appending the current run's record failed (warning level).
pub fn emit_append_failed(run_id: &str, error: &dyn std::fmt::Display) {
    warn!(event = "analysis.append_failed", run_id = %run_id, error = %error);
}
