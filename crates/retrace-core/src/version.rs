//! Commit-hash extraction from package version strings.
//!
//! Version strings produced by setuptools-scm and nightly wheel builds
//! embed the source commit (`2.1.0.dev0+123.gabc123d`). Two extraction
//! strategies exist, selected by the declared origin of the string —
//! never inferred from the string itself:
//!
//! - [`VersionOrigin::Standard`]: the `g`-prefixed local-version marker.
//! - [`VersionOrigin::NightlyIndex`]: the scientific-python nightly
//!   index, which places the bare short hash as the final local-segment
//!   component.
//!
//! Parsing never fails; a string with no recognizable hash yields
//! `commit_hash = None` and the input version unchanged.

use std::sync::OnceLock;

use regex::Regex;
use retrace_store::PackageInfo;
use serde::{Deserialize, Serialize};

/// Provenance of a captured version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrigin {
    /// A regular index (PyPI, internal mirror); setuptools-scm style
    /// `g<hex>` markers.
    Standard,

    /// The scientific-python nightly wheel index; positional short-hash
    /// segments, falling back to the standard rule.
    NightlyIndex,
}

/// A version string with its extracted commit hash, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedVersion {
    /// The input version string, unchanged.
    pub version: String,

    /// Commit hash embedded in the string, if one was recognized.
    pub commit_hash: Option<String>,
}

impl ParsedVersion {
    /// Convert into the persisted package-info form.
    pub fn into_package_info(self) -> PackageInfo {
        PackageInfo {
            version: self.version,
            commit_hash: self.commit_hash,
        }
    }
}

fn marker_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Most specific first: dot-separated local-segment marker,
            // then plus-joined marker, then a bare marker anywhere.
            Regex::new(r"(?i)\.g([0-9a-f]{7,40})").unwrap(),
            Regex::new(r"(?i)\+g([0-9a-f]{7,40})").unwrap(),
            Regex::new(r"(?i)g([0-9a-f]{7,40})").unwrap(),
        ]
    })
}

fn match_markers(input: &str) -> Option<String> {
    marker_patterns()
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .map(|captures| captures[1].to_string())
}

/// Standard rule: `g<hex>` marker following a `.` or `+` separator.
///
/// The local-version segment (after the last `+`) is searched first so
/// a string carrying several `g<hex>`-like substrings resolves to the
/// canonical one. Hashes shorter than 7 hex digits never match.
fn extract_standard(version: &str) -> Option<String> {
    if let Some(plus) = version.rfind('+') {
        let local = &version[plus..];
        if let Some(hash) = match_markers(local) {
            return Some(hash);
        }
    }
    match_markers(version)
}

/// Nightly rule: the final dot-separated component of the local segment
/// is the bare short hash (`2.1.0.dev0+123.abc123d`).
///
/// A component qualifies only if it is pure hex, 7–40 chars, and not
/// all-numeric (date and counter segments stay numeric). Falls back to
/// the standard rule, since nightly indexes also carry `g`-marked
/// strings.
fn extract_nightly(version: &str) -> Option<String> {
    if let Some(plus) = version.rfind('+') {
        let local = &version[plus + 1..];
        if let Some(last) = local.rsplit('.').next() {
            let is_hex = (7..=40).contains(&last.len())
                && last.chars().all(|c| c.is_ascii_hexdigit());
            let all_numeric = last.chars().all(|c| c.is_ascii_digit());
            if is_hex && !all_numeric {
                return Some(last.to_string());
            }
        }
    }
    extract_standard(version)
}

/// Parse a version string under the given origin.
///
/// Never fails: unrecognized input comes back with `commit_hash = None`.
pub fn parse_version(version: &str, origin: VersionOrigin) -> ParsedVersion {
    let commit_hash = match origin {
        VersionOrigin::Standard => extract_standard(version),
        VersionOrigin::NightlyIndex => extract_nightly(version),
    };
    ParsedVersion {
        version: version.to_string(),
        commit_hash,
    }
}
