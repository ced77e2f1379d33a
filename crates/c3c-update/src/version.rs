//! Version parsing, release channels, and identifier formatting

use semver::Version;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, UpdateError};

/// Remote identifier reported when the remote could not be queried
pub const RATE_LIMITED_SENTINEL: &str = "0.0.0-GITHUB-RATELIMITED";

/// Remote identifier reported for custom builds
pub const CUSTOM_SENTINEL: &str = "0.0.0-custom";

/// Length of the abbreviated commit hashes being compared
pub const SHORT_HASH_LEN: usize = 7;

/// Manifest file carrying the installed version
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Recognised prerelease tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreReleaseTrack {
    Alpha,
    Beta,
}

impl fmt::Display for PreReleaseTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseTrack::Alpha => write!(f, "alpha"),
            PreReleaseTrack::Beta => write!(f, "beta"),
        }
    }
}

/// Release channel implied by a version's prerelease tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseChannel {
    /// No prerelease tag
    Stable,

    /// `alpha` or `beta` prerelease, tracked against the default branch
    PreRelease(PreReleaseTrack),

    /// Any other prerelease tag; never updated automatically
    Custom(String),
}

impl ReleaseChannel {
    /// Classify a version by the first identifier of its prerelease tag
    pub fn of(version: &Version) -> Self {
        if version.pre.is_empty() {
            return ReleaseChannel::Stable;
        }

        let first = version.pre.as_str().split('.').next().unwrap_or_default();
        match first {
            "alpha" => ReleaseChannel::PreRelease(PreReleaseTrack::Alpha),
            "beta" => ReleaseChannel::PreRelease(PreReleaseTrack::Beta),
            other => ReleaseChannel::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseChannel::Stable => write!(f, "stable"),
            ReleaseChannel::PreRelease(track) => write!(f, "{}", track),
            ReleaseChannel::Custom(tag) => write!(f, "custom ({})", tag),
        }
    }
}

/// Format a commit hash as a zero-numeric sentinel version
pub fn git_sentinel(hash: &str) -> String {
    format!("0.0.0-git.{}", hash)
}

/// Abbreviate a full commit SHA
pub fn short_hash(sha: &str) -> &str {
    match sha.char_indices().nth(SHORT_HASH_LEN) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

/// Parse a release tag, ignoring a leading `v`
pub fn parse_tag(tag: &str) -> Option<Version> {
    Version::parse(tag.trim().trim_start_matches('v')).ok()
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    version: String,
}

/// Read the installed version from the installation's package manifest
pub fn read_installed_version(install_root: &Path) -> Result<Version> {
    let manifest_path = install_root.join(PACKAGE_MANIFEST);
    let content = fs::read_to_string(&manifest_path)?;
    let manifest: PackageManifest = serde_json::from_str(&content).map_err(|e| {
        UpdateError::malformed(format!("{}: {}", manifest_path.display(), e))
    })?;

    Version::parse(&manifest.version).map_err(|_| UpdateError::invalid_version(manifest.version))
}
