//! Engine facade: one invocation per CI run.
//!
//! Processes the failing-test list sequentially, renders the combined
//! report, and appends the current run's record only after every history
//! read — a run must never bisect against itself.

use retrace_store::{RunRecord, RunRecordStore};

use crate::config::EngineConfig;
use crate::domain::BisectionResult;
use crate::obs::{emit_analysis_finished, emit_analysis_started, emit_append_failed, AnalysisSpan};
use crate::report::{build, render_report};
use crate::scm::SourceControl;

/// Output of one engine invocation.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Combined Markdown report, one section per failing test.
    pub report: String,

    /// Per-test results in processing order.
    pub results: Vec<(String, BisectionResult)>,

    /// Set when appending the current run's record failed. The report
    /// and results above do not depend on the append succeeding.
    pub store_warning: Option<String>,
}

/// Bisection engine for one repository's CI history.
pub struct BisectionEngine {
    store: Box<dyn RunRecordStore>,
    scm: Box<dyn SourceControl>,
    config: EngineConfig,
}

impl BisectionEngine {
    /// Create an engine over the given collaborators.
    pub fn new(
        store: Box<dyn RunRecordStore>,
        scm: Box<dyn SourceControl>,
        config: EngineConfig,
    ) -> Self {
        Self { store, scm, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one CI run's failures and persist its record.
    ///
    /// Each failing test is processed exactly once (duplicates in the
    /// input are dropped, first occurrence wins). All history reads
    /// happen before the single append of `current`, and an append
    /// failure is surfaced as a warning rather than an error.
    pub fn analyze(&self, current: &RunRecord, failing_tests: &[String]) -> AnalysisOutcome {
        let _span = AnalysisSpan::enter(&current.run_id.to_string());
        emit_analysis_started(&current.run_id.to_string(), failing_tests.len());

        let mut seen = std::collections::BTreeSet::new();
        let results: Vec<(String, BisectionResult)> = failing_tests
            .iter()
            .filter(|test_id| seen.insert(test_id.as_str()))
            .map(|test_id| {
                let result = build(
                    test_id,
                    current,
                    self.store.as_ref(),
                    self.scm.as_ref(),
                    &self.config,
                );
                (test_id.clone(), result)
            })
            .collect();

        let report = render_report(&results, current, &self.config);

        let store_warning = match self.store.append(current) {
            Ok(()) => None,
            Err(err) => {
                emit_append_failed(&current.run_id.to_string(), &err);
                Some(format!("failed to store run record: {err}"))
            }
        };

        let windows = results.iter().filter(|(_, r)| r.has_window()).count();
        emit_analysis_finished(&current.run_id.to_string(), results.len(), windows);

        AnalysisOutcome {
            report,
            results,
            store_warning,
        }
    }
}
