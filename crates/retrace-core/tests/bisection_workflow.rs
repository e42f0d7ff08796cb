//! End-to-end engine tests over the in-memory store and a scripted
//! source-control collaborator.

use chrono::{DateTime, TimeZone, Utc};
use retrace_core::{
    snapshot_from_versions, BisectionEngine, BisectionResult, CommitSummary, EngineConfig,
    Lookback, NoPassReason, RunId, RunRecord, ScmError, SourceControl, TestResult,
    TrackedPackages, VersionOrigin,
};
use retrace_store::MemoryRunStore;

/// Scripted collaborator answering every range with the same shortlog.
struct ScriptedScm(Vec<CommitSummary>);

impl ScriptedScm {
    fn commits(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(hash, summary)| CommitSummary {
                    hash: hash.to_string(),
                    summary: summary.to_string(),
                })
                .collect(),
        )
    }
}

impl SourceControl for ScriptedScm {
    fn commit_range_summary(
        &self,
        _from_hash: &str,
        _to_hash: &str,
    ) -> Result<Vec<CommitSummary>, ScmError> {
        Ok(self.0.clone())
    }
}

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
}

fn run(
    id: &str,
    at: DateTime<Utc>,
    packages: &[(&str, &str)],
    results: &[(&str, bool)],
) -> RunRecord {
    let mut record = RunRecord::new(
        RunId(id.to_string()),
        at,
        snapshot_from_versions(packages.iter().copied(), VersionOrigin::Standard),
    );
    for (test_id, passed) in results {
        let result = if *passed {
            TestResult::pass()
        } else {
            TestResult::fail()
        };
        record = record.with_result(*test_id, result);
    }
    record
}

#[test]
fn full_regression_window_report() {
    // History: test passed on the old numpy nightly, fails on the new one.
    let store = MemoryRunStore::with_records([
        run(
            "run-100",
            ts(1, 12),
            &[("numpy", "2.1.0.dev0+10.gaaaaaaa1"), ("pandas", "2.0.0")],
            &[("test_mean", true), ("test_std", true)],
        ),
        run(
            "run-101",
            ts(2, 12),
            &[("numpy", "2.1.0.dev0+15.gcccccc33"), ("pandas", "2.0.0")],
            &[("test_mean", true), ("test_std", false)],
        ),
    ]);

    let scm = ScriptedScm::commits(&[
        ("dddd0001", "BUG: rewrite reduction kernel"),
        ("dddd0002", "MAINT: bump build matrix"),
    ]);
    let engine = BisectionEngine::new(Box::new(store), Box::new(scm), EngineConfig::default());

    let current = run(
        "run-102",
        ts(3, 12),
        &[("numpy", "2.1.0.dev0+20.gbbbbbbb2"), ("pandas", "2.0.0")],
        &[("test_mean", false), ("test_std", false)],
    );

    let outcome = engine.analyze(
        &current,
        &["test_mean".to_string(), "test_std".to_string()],
    );

    // test_mean last passed in run-101; test_std in run-100.
    let (_, mean_result) = &outcome.results[0];
    let BisectionResult::RegressionWindow {
        last_pass,
        changes,
        commit_ranges,
        commits,
    } = mean_result
    else {
        panic!("expected window for test_mean");
    };
    assert_eq!(last_pass.run_id.0, "run-101");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].package, "numpy");
    assert_eq!(commit_ranges["numpy"].from_commit, "cccccc33");
    assert_eq!(commit_ranges["numpy"].to_commit, "bbbbbbb2");
    assert_eq!(commits["numpy"].len(), 2);

    let (_, std_result) = &outcome.results[1];
    let BisectionResult::RegressionWindow { last_pass, .. } = std_result else {
        panic!("expected window for test_std");
    };
    assert_eq!(last_pass.run_id.0, "run-100");

    // Report layout.
    assert!(outcome.report.contains("## test_mean"));
    assert!(outcome.report.contains("## test_std"));
    assert!(outcome.report.contains("### Package changes since last pass"));
    assert!(outcome.report.contains("dddd0001 BUG: rewrite reduction kernel"));
    assert!(outcome.report.contains("- Last passed in run #run-101 on "));
    assert!(outcome.store_warning.is_none());
}

#[test]
fn new_test_reports_no_prior_pass() {
    let store = MemoryRunStore::with_records([run(
        "run-100",
        ts(1, 12),
        &[("numpy", "1.24.0")],
        &[("test_old", true)],
    )]);
    let engine = BisectionEngine::new(
        Box::new(store),
        Box::new(ScriptedScm::commits(&[])),
        EngineConfig::default(),
    );

    let current = run(
        "run-101",
        ts(2, 12),
        &[("numpy", "1.24.0")],
        &[("test_brand_new", false)],
    );
    let outcome = engine.analyze(&current, &["test_brand_new".to_string()]);

    assert!(matches!(
        outcome.results[0].1,
        BisectionResult::NoPriorPass {
            reason: NoPassReason::UnknownTest
        }
    ));
    assert!(outcome
        .report
        .contains("No recent successful run found for this test"));
    assert!(!outcome.report.contains("Package changes"));
}

#[test]
fn code_only_regression_is_called_out() {
    let store = MemoryRunStore::with_records([run(
        "run-100",
        ts(1, 12),
        &[("numpy", "1.24.0")],
        &[("test_a", true)],
    )]);
    let engine = BisectionEngine::new(
        Box::new(store),
        Box::new(ScriptedScm::commits(&[])),
        EngineConfig::default(),
    );

    // Same environment, test regressed anyway.
    let current = run(
        "run-101",
        ts(2, 12),
        &[("numpy", "1.24.0")],
        &[("test_a", false)],
    );
    let outcome = engine.analyze(&current, &["test_a".to_string()]);

    assert!(outcome.report.contains("- No tracked dependency changed"));
}

#[test]
fn lookback_horizon_bounds_search() {
    // 30 failing runs between the current run and the only pass.
    let mut records = vec![run(
        "run-0",
        ts(1, 0),
        &[("numpy", "1.24.0")],
        &[("test_a", true)],
    )];
    for hour in 1..=30 {
        records.push(run(
            &format!("run-{hour}"),
            ts(1, 0) + chrono::Duration::hours(hour),
            &[("numpy", "1.25.0")],
            &[("test_a", false)],
        ));
    }
    let store = MemoryRunStore::with_records(records);

    let config = EngineConfig {
        lookback: Lookback {
            max_runs: 10,
            max_age_secs: None,
        },
        ..EngineConfig::default()
    };
    let engine = BisectionEngine::new(Box::new(store), Box::new(ScriptedScm::commits(&[])), config);

    let current = run(
        "run-current",
        ts(3, 0),
        &[("numpy", "1.25.0")],
        &[("test_a", false)],
    );
    let outcome = engine.analyze(&current, &["test_a".to_string()]);

    assert!(matches!(
        outcome.results[0].1,
        BisectionResult::NoPriorPass {
            reason: NoPassReason::HorizonReached
        }
    ));
}

#[test]
fn nightly_origin_flows_through_capture_and_diff() {
    let old = snapshot_from_versions(
        [("numpy", "2.1.0.dev0+123.aaaaaa11")],
        VersionOrigin::NightlyIndex,
    );
    let new = snapshot_from_versions(
        [("numpy", "2.1.0.dev0+124.bbbbbb22")],
        VersionOrigin::NightlyIndex,
    );

    let store = MemoryRunStore::with_records([RunRecord::new(
        RunId("run-0".to_string()),
        ts(1, 0),
        old,
    )
    .with_result("test_a", TestResult::pass())]);

    let config = EngineConfig {
        origin: VersionOrigin::NightlyIndex,
        tracked: TrackedPackages::List(vec!["numpy".to_string()]),
        ..EngineConfig::default()
    };
    let scm = ScriptedScm::commits(&[("cccc0001", "ENH: vectorize")]);
    let engine = BisectionEngine::new(Box::new(store), Box::new(scm), config);

    let current = RunRecord::new(RunId("run-1".to_string()), ts(2, 0), new)
        .with_result("test_a", TestResult::fail());
    let outcome = engine.analyze(&current, &["test_a".to_string()]);

    let BisectionResult::RegressionWindow { commit_ranges, .. } = &outcome.results[0].1 else {
        panic!("expected window");
    };
    assert_eq!(commit_ranges["numpy"].from_commit, "aaaaaa11");
    assert_eq!(commit_ranges["numpy"].to_commit, "bbbbbb22");
}
