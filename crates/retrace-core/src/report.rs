//! Bisection reporting: per-test analysis and Markdown rendering.
//!
//! For each failing test the reporter finds the last passing run, diffs
//! the two package snapshots, resolves commit ranges through the
//! source-control collaborator, and renders a Markdown fragment. Every
//! per-test failure is isolated; the worst case is a section stating
//! analysis was unavailable.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use retrace_store::{PackageInfo, RunRecord, RunRecordStore};
use tracing::warn;

use crate::config::EngineConfig;
use crate::diff::diff_snapshots;
use crate::domain::{BisectionResult, CommitSummary, VersionChange};
use crate::history::{find_last_pass, SearchOutcome};
use crate::links::compare_url;
use crate::scm::SourceControl;

/// Width one-line commit descriptions are clipped to.
const COMMIT_SUMMARY_WIDTH: usize = 60;

/// Build the bisection result for one failing test.
///
/// Range resolution failures demote the affected package to a
/// version-only change; they never fail the test's analysis.
pub fn build(
    test_id: &str,
    current: &RunRecord,
    store: &dyn RunRecordStore,
    scm: &dyn SourceControl,
    config: &EngineConfig,
) -> BisectionResult {
    let last_pass = match find_last_pass(store, test_id, current.timestamp, &config.lookback) {
        SearchOutcome::Found(record) => record,
        SearchOutcome::Missing(reason) => {
            return BisectionResult::NoPriorPass { reason };
        }
    };

    let changes = diff_snapshots(&last_pass.snapshot, &current.snapshot, &config.tracked);

    let mut commit_ranges = BTreeMap::new();
    let mut commits = BTreeMap::new();
    for change in &changes {
        let Some(range) = change.commit_range() else {
            continue;
        };
        match scm.commit_range_summary(&range.from_commit, &range.to_commit) {
            Ok(summaries) => {
                commits.insert(change.package.clone(), summaries);
                commit_ranges.insert(change.package.clone(), range);
            }
            Err(err) => {
                // Demoted to a version-only change.
                warn!(
                    event = "report.range_unresolvable",
                    test_id = %test_id,
                    package = %change.package,
                    error = %err,
                );
            }
        }
    }

    BisectionResult::RegressionWindow {
        last_pass,
        changes,
        commit_ranges,
        commits,
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(width).collect();
        format!("{clipped}...")
    }
}

fn format_endpoint(info: &PackageInfo) -> String {
    match &info.commit_hash {
        Some(hash) => format!("{} ({})", info.version, &hash[..8.min(hash.len())]),
        None => info.version.clone(),
    }
}

fn format_change_line(change: &VersionChange) -> String {
    match (&change.from, &change.to) {
        (None, Some(to)) => format!("- {}: (new) → {}", change.package, format_endpoint(to)),
        (Some(from), None) => {
            format!("- {}: {} → (removed)", change.package, format_endpoint(from))
        }
        (Some(from), Some(to)) => {
            let rendered = format!(
                "{}: {} → {}",
                change.package,
                format_endpoint(from),
                format_endpoint(to)
            );
            if change.is_revision_only() {
                format!("- {rendered} (git revision changed)")
            } else if let Some(url) = compare_url(&change.package, &from.version, &to.version) {
                format!("- [{rendered}]({url})")
            } else {
                format!("- {rendered}")
            }
        }
        // Diff never emits a change with both endpoints absent.
        (None, None) => format!("- {}: unchanged", change.package),
    }
}

fn commit_block(package: &str, summaries: &[CommitSummary]) -> Vec<String> {
    let mut lines = Vec::with_capacity(summaries.len() + 1);
    lines.push(format!("### Commits for {package}"));
    for commit in summaries {
        lines.push(format!(
            "- {} {}",
            commit.hash,
            clip(&commit.summary, COMMIT_SUMMARY_WIDTH)
        ));
    }
    lines
}

fn code_change_block(last_pass: &RunRecord, current: &RunRecord) -> Vec<String> {
    let mut lines = vec!["### Code changes since last pass".to_string()];
    match (&last_pass.repo, &current.repo) {
        (Some(prev), Some(curr)) if prev.commit != curr.commit => {
            lines.push(format!(
                "- {} ({})",
                prev.short_commit(),
                clip(&prev.message, COMMIT_SUMMARY_WIDTH)
            ));
            lines.push(format!(
                "- → {} ({})",
                curr.short_commit(),
                clip(&curr.message, COMMIT_SUMMARY_WIDTH)
            ));
        }
        _ => lines.push("- No code changes detected".to_string()),
    }
    lines
}

/// Render one test's section, honoring the per-section character budget.
///
/// Truncation is deterministic: commit lists shrink first (with a count
/// of omitted entries), then the package-change list, and as a last
/// resort the section collapses to its header plus a truncation note.
pub fn render_test_section(
    test_id: &str,
    result: &BisectionResult,
    current: &RunRecord,
    section_char_budget: usize,
) -> String {
    match result {
        BisectionResult::NoPriorPass { .. } => [
            format!("## {test_id}"),
            "### Analysis".to_string(),
            "- No recent successful run found for this test".to_string(),
        ]
        .join("\n"),
        BisectionResult::RegressionWindow {
            last_pass,
            changes,
            commits,
            ..
        } => {
            let mut commit_budget = usize::MAX;
            let mut change_budget = usize::MAX;
            loop {
                let rendered = render_window_section(
                    test_id,
                    last_pass,
                    current,
                    changes,
                    commits,
                    commit_budget,
                    change_budget,
                );
                if rendered.len() <= section_char_budget {
                    return rendered;
                }

                if commit_budget == usize::MAX {
                    commit_budget = commits.values().map(Vec::len).max().unwrap_or(0);
                }
                if commit_budget > 0 {
                    commit_budget -= 1;
                    continue;
                }
                if change_budget == usize::MAX {
                    change_budget = changes.len();
                }
                if change_budget > 0 {
                    change_budget -= 1;
                    continue;
                }

                return [
                    format!("## {test_id}"),
                    "- (section truncated: exceeds size budget)".to_string(),
                ]
                .join("\n");
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render_window_section(
    test_id: &str,
    last_pass: &RunRecord,
    current: &RunRecord,
    changes: &[VersionChange],
    commits: &BTreeMap<String, Vec<CommitSummary>>,
    commit_budget: usize,
    change_budget: usize,
) -> String {
    let mut lines = vec![
        format!("## {test_id}"),
        "### Package changes since last pass".to_string(),
    ];

    if changes.is_empty() {
        // Signals a code-only or environmental regression.
        lines.push("- No tracked dependency changed".to_string());
    } else {
        let shown = changes.len().min(change_budget);
        for change in &changes[..shown] {
            lines.push(format_change_line(change));
        }
        if shown < changes.len() {
            lines.push(format!("- … and {} more changes", changes.len() - shown));
        }

        for (package, summaries) in commits {
            if summaries.is_empty() {
                continue;
            }
            let shown = summaries.len().min(commit_budget);
            let mut block = commit_block(package, &summaries[..shown]);
            if shown < summaries.len() {
                block.push(format!("- … and {} more commits", summaries.len() - shown));
            }
            lines.extend(block);
        }
    }

    lines.extend(code_change_block(last_pass, current));
    lines.push(format!(
        "- Last passed in run #{} on {}",
        last_pass.run_id,
        last_pass.timestamp.to_rfc3339()
    ));
    lines.join("\n")
}

/// One-line summary used when the overall budget forces a collapse.
fn render_collapsed(test_id: &str, result: &BisectionResult) -> String {
    match result {
        BisectionResult::NoPriorPass { .. } => {
            format!("- {test_id}: no prior successful run found")
        }
        BisectionResult::RegressionWindow { last_pass, .. } => format!(
            "- {test_id}: regressed since run #{} (details omitted for size)",
            last_pass.run_id
        ),
    }
}

/// Render the combined report for all analyzed tests.
///
/// Sections appear in input order. When the whole report exceeds the
/// overall budget, no-prior-pass sections collapse to one-liners first;
/// regression-window sections collapse next, last test first, so the
/// earliest failures keep their detail.
pub fn render_report(
    results: &[(String, BisectionResult)],
    current: &RunRecord,
    config: &EngineConfig,
) -> String {
    let mut sections: Vec<String> = results
        .iter()
        .map(|(test_id, result)| {
            render_test_section(test_id, result, current, config.section_char_budget)
        })
        .collect();

    let total = |sections: &[String]| {
        sections.iter().map(String::len).sum::<usize>() + 2 * sections.len().saturating_sub(1)
    };

    if total(&sections) > config.report_char_budget {
        // Lowest priority first: collapse NoPriorPass sections.
        for (i, (test_id, result)) in results.iter().enumerate() {
            if total(&sections) <= config.report_char_budget {
                break;
            }
            if !result.has_window() {
                sections[i] = render_collapsed(test_id, result);
            }
        }
        // Then regression windows, last test first.
        for (i, (test_id, result)) in results.iter().enumerate().rev() {
            if total(&sections) <= config.report_char_budget {
                break;
            }
            if result.has_window() {
                sections[i] = render_collapsed(test_id, result);
            }
        }
    }

    sections.join("\n\n")
}

/// Write the rendered report where the issue-writing step picks it up.
pub fn write_report(path: &Path, report: &str) -> anyhow::Result<()> {
    std::fs::write(path, report).with_context(|| format!("write {:?}", path))?;
    Ok(())
}
