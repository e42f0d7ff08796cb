//! Trait contract tests for RunRecordStore.
//!
//! These tests verify the behavioral contract of the store trait using
//! the in-memory fake. Any conforming backend must pass these.

use chrono::{DateTime, TimeZone, Utc};
use retrace_store::{
    MemoryRunStore, PackageInfo, PackageSnapshot, RunId, RunRecord, RunRecordStore, StoreError,
    TestResult,
};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
}

fn record(run_id: &str, at: DateTime<Utc>, packages: &[(&str, &str)]) -> RunRecord {
    let snapshot = PackageSnapshot::from_entries(
        packages
            .iter()
            .map(|(name, version)| (name.to_string(), PackageInfo::version_only(*version))),
    );
    RunRecord::new(RunId(run_id.to_string()), at, snapshot)
}

#[test]
fn list_before_returns_descending_timestamps() {
    let store = MemoryRunStore::new();
    for day in 1..=4 {
        store
            .append(&record(&format!("run-{day}"), ts(day, 12), &[]))
            .unwrap();
    }

    let listed = store.list_before(ts(5, 0), 10).unwrap();
    let ids: Vec<_> = listed.iter().map(|r| r.run_id.0.as_str()).collect();
    assert_eq!(ids, vec!["run-4", "run-3", "run-2", "run-1"]);
}

#[test]
fn list_before_excludes_the_bound_itself() {
    let store = MemoryRunStore::new();
    store.append(&record("run-1", ts(1, 12), &[])).unwrap();

    assert!(store.list_before(ts(1, 12), 10).unwrap().is_empty());
    assert_eq!(store.list_before(ts(1, 13), 10).unwrap().len(), 1);
}

#[test]
fn list_before_over_empty_store_is_empty() {
    let store = MemoryRunStore::new();
    assert!(store.list_before(ts(1, 0), 10).unwrap().is_empty());
}

#[test]
fn append_preserves_order_invariant() {
    let store = MemoryRunStore::new();
    store.append(&record("run-2", ts(2, 0), &[])).unwrap();

    let err = store.append(&record("run-1", ts(1, 0), &[])).unwrap_err();
    assert!(matches!(err, StoreError::OutOfOrderAppend { .. }));

    // The failed append must not have mutated the history.
    assert_eq!(store.len(), 1);
}

#[test]
fn appended_records_round_trip_unchanged() {
    let store = MemoryRunStore::new();
    let original = record("run-1", ts(1, 0), &[("numpy", "1.24.0"), ("pandas", "2.0.0")])
        .with_result("test_mean", TestResult::pass())
        .with_result("test_std", TestResult::fail());
    store.append(&original).unwrap();

    let listed = store.list_before(ts(2, 0), 1).unwrap();
    assert_eq!(listed[0], original);
}

#[test]
fn limit_bounds_the_scan() {
    let store = MemoryRunStore::new();
    for day in 1..=9 {
        store
            .append(&record(&format!("run-{day}"), ts(day, 0), &[]))
            .unwrap();
    }

    let listed = store.list_before(ts(10, 0), 3).unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].run_id.0, "run-9");
    assert_eq!(listed[2].run_id.0, "run-7");
}
