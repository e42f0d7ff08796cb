//! Source-control collaborator: commit-range shortlogs.
//!
//! The engine only ever asks one question of source control: "what
//! happened between these two commits?". Implementations answer with an
//! oldest-first shortlog or a typed failure the reporter demotes to a
//! version-only change.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::{CommitSummary, ScmError};

/// Read-only view of a source repository's history.
pub trait SourceControl: Send + Sync {
    /// Shortlog of commits in `(from, to]`, oldest first.
    ///
    /// Returns [`ScmError::Unresolvable`] when either endpoint is
    /// unknown to the repository (shallow clone, unrelated fork, hash
    /// extracted from a stale version string).
    fn commit_range_summary(
        &self,
        from_hash: &str,
        to_hash: &str,
    ) -> Result<Vec<CommitSummary>, ScmError>;
}

/// Source control backed by the `git` CLI.
///
/// Runs read-only `git` commands in the configured repository directory.
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    /// Create a handle for the repository at `repo_dir`.
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<std::process::Output, ScmError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| ScmError::Command(format!("failed to run git: {e}")))
    }

    fn resolve(&self, hash: &str) -> Result<(), ScmError> {
        let spec = format!("{hash}^{{commit}}");
        let output = self.run_git(&["rev-parse", "--verify", "--quiet", &spec])?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ScmError::Unresolvable {
                hash: hash.to_string(),
            })
        }
    }
}

impl SourceControl for GitCli {
    fn commit_range_summary(
        &self,
        from_hash: &str,
        to_hash: &str,
    ) -> Result<Vec<CommitSummary>, ScmError> {
        self.resolve(from_hash)?;
        self.resolve(to_hash)?;

        let range = format!("{from_hash}..{to_hash}");
        let output = self.run_git(&["log", "--reverse", "--format=%h %s", &range])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScmError::Command(format!("git log {range} failed: {stderr}")));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once(' ') {
                Some((hash, summary)) => CommitSummary {
                    hash: hash.to_string(),
                    summary: summary.to_string(),
                },
                None => CommitSummary {
                    hash: line.to_string(),
                    summary: String::new(),
                },
            })
            .collect())
    }
}

/// Check whether a directory is inside a git work tree.
pub fn is_git_repo(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
