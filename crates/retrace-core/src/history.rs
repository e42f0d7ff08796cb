//! History search: the most recent strictly-earlier passing run.

use chrono::{DateTime, Utc};
use retrace_store::{RunRecord, RunRecordStore};
use tracing::warn;

use crate::config::Lookback;
use crate::domain::NoPassReason;

/// How many records to pull from the store per read.
const SCAN_PAGE: usize = 50;

/// Outcome of a history search for one test.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The most recent strictly-earlier run where the test passed.
    Found(RunRecord),

    /// No passing run found; the reason is logged but all reasons render
    /// the same way downstream.
    Missing(NoPassReason),
}

impl SearchOutcome {
    /// The found record, if any.
    pub fn record(&self) -> Option<&RunRecord> {
        match self {
            SearchOutcome::Found(record) => Some(record),
            SearchOutcome::Missing(_) => None,
        }
    }
}

/// Scan history backward from `before` for the most recent run in which
/// `test_id` passed.
///
/// The scan walks records in descending timestamp order and stops at the
/// first pass, at the lookback horizon, or when the store is exhausted.
/// Store read failures are non-fatal: they degrade to a miss with reason
/// [`NoPassReason::StoreUnavailable`].
pub fn find_last_pass(
    store: &dyn RunRecordStore,
    test_id: &str,
    before: DateTime<Utc>,
    lookback: &Lookback,
) -> SearchOutcome {
    let oldest_allowed = lookback.max_age().map(|age| before - age);

    let mut scanned = 0usize;
    let mut saw_any = false;
    let mut saw_test = false;
    let mut cursor = before;

    while scanned < lookback.max_runs {
        let page_size = SCAN_PAGE.min(lookback.max_runs - scanned);
        let page = match store.list_before(cursor, page_size) {
            Ok(page) => page,
            Err(err) => {
                warn!(
                    event = "history.read_failed",
                    test_id = %test_id,
                    error = %err,
                );
                return SearchOutcome::Missing(NoPassReason::StoreUnavailable);
            }
        };
        if page.is_empty() {
            break;
        }

        for record in page {
            if let Some(oldest) = oldest_allowed {
                if record.timestamp < oldest {
                    return SearchOutcome::Missing(if saw_test {
                        NoPassReason::NeverPassed
                    } else {
                        NoPassReason::HorizonReached
                    });
                }
            }

            saw_any = true;
            if record.result_for(test_id).is_some() {
                saw_test = true;
            }
            if record.passed(test_id) {
                return SearchOutcome::Found(record);
            }

            cursor = record.timestamp;
            scanned += 1;
        }
    }

    let reason = if !saw_any {
        NoPassReason::EmptyHistory
    } else if scanned >= lookback.max_runs {
        NoPassReason::HorizonReached
    } else if saw_test {
        NoPassReason::NeverPassed
    } else {
        NoPassReason::UnknownTest
    };
    SearchOutcome::Missing(reason)
}
