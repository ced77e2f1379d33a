//! Update availability resolution
//!
//! What "newer" means depends on the release channel of the running version:
//! - alpha/beta builds running from a checkout compare commit hashes against
//!   the default branch tip
//! - stable builds (or any build when forced) compare against the latest tag
//! - custom builds never report an update and never touch the network

use c3c_core::types::TagOrder;
use semver::Version;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, UpdateError};
use crate::git::SourceControl;
use crate::releases::RemoteSource;
use crate::version::{
    git_sentinel, parse_tag, short_hash, ReleaseChannel, CUSTOM_SENTINEL, RATE_LIMITED_SENTINEL,
};

/// Whether the installation is a live source-control checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepositoryContext {
    pub is_checkout: bool,
}

impl RepositoryContext {
    /// Probe `dir` once with the source-control client
    pub async fn probe(git: &dyn SourceControl, dir: &std::path::Path) -> Self {
        let is_checkout = git.is_checkout(dir).await;
        debug!("Checkout probe for {}: {}", dir.display(), is_checkout);
        Self { is_checkout }
    }
}

/// Facts about the running installation, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct UpdateContext {
    /// Version the installation reports
    pub current_version: Version,

    /// Directory updates are applied to
    pub install_root: PathBuf,

    /// Checkout probe result
    pub repository: RepositoryContext,
}

/// Result of an update check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateDecision {
    /// Whether a newer version exists
    pub available: bool,

    /// Tag name or sentinel version describing the remote
    pub remote_identifier: String,

    /// Version or sentinel version describing the installation
    pub local_identifier: String,

    /// The remote could not be queried and a fallback was substituted
    pub degraded: bool,
}

/// Decides whether an update is available for the current channel
#[derive(Clone)]
pub struct VersionResolver {
    context: Arc<UpdateContext>,
    remote: Arc<dyn RemoteSource>,
    git: Arc<dyn SourceControl>,
    tag_order: TagOrder,
}

impl VersionResolver {
    pub fn new(
        context: Arc<UpdateContext>,
        remote: Arc<dyn RemoteSource>,
        git: Arc<dyn SourceControl>,
    ) -> Self {
        Self {
            context,
            remote,
            git,
            tag_order: TagOrder::default(),
        }
    }

    /// Shared installation facts
    pub fn context(&self) -> Arc<UpdateContext> {
        Arc::clone(&self.context)
    }

    /// Choose how the latest tag is picked from the remote list
    pub fn with_tag_order(mut self, tag_order: TagOrder) -> Self {
        self.tag_order = tag_order;
        self
    }

    /// Classify the remote state into an update decision.
    ///
    /// Never fails: remote errors produce a degraded "no update" decision.
    pub async fn resolve(&self, force_stable: bool) -> UpdateDecision {
        let channel = ReleaseChannel::of(&self.context.current_version);
        debug!(
            "Resolving update for {} on {} channel (force_stable={})",
            self.context.current_version, channel, force_stable
        );

        match channel {
            ReleaseChannel::PreRelease(_)
                if self.context.repository.is_checkout && !force_stable =>
            {
                self.resolve_commit().await
            }
            ReleaseChannel::Stable => self.resolve_tag().await,
            _ if force_stable => self.resolve_tag().await,
            _ => {
                debug!("Custom build, skipping remote lookup");
                UpdateDecision {
                    available: false,
                    remote_identifier: CUSTOM_SENTINEL.to_string(),
                    local_identifier: self.context.current_version.to_string(),
                    degraded: false,
                }
            }
        }
    }

    async fn resolve_commit(&self) -> UpdateDecision {
        let local = self.git.short_head(&self.context.install_root).await;
        if local.is_empty() {
            info!("Cannot read the checkout's HEAD, treating installation as stable");
            return self.resolve_tag().await;
        }
        // git lengthens an ambiguous abbreviation; compare on exactly the same prefix length
        let local = short_hash(&local).to_string();

        let remote = match self.remote.branch_tip().await {
            Ok(sha) => short_hash(&sha).to_string(),
            Err(e) => {
                warn!("Failed to query branch tip: {}", e);
                return UpdateDecision {
                    available: false,
                    remote_identifier: RATE_LIMITED_SENTINEL.to_string(),
                    local_identifier: git_sentinel(&local),
                    degraded: true,
                };
            }
        };

        UpdateDecision {
            available: remote != local,
            remote_identifier: git_sentinel(&remote),
            local_identifier: git_sentinel(&local),
            degraded: false,
        }
    }

    async fn resolve_tag(&self) -> UpdateDecision {
        let current = &self.context.current_version;
        let degraded = || UpdateDecision {
            available: false,
            remote_identifier: RATE_LIMITED_SENTINEL.to_string(),
            local_identifier: current.to_string(),
            degraded: true,
        };

        let tag = match self.latest_release_tag().await {
            Ok(tag) => tag,
            Err(e) => {
                warn!("Failed to resolve latest release: {}", e);
                return degraded();
            }
        };

        let Some(latest) = parse_tag(&tag) else {
            warn!("Latest tag '{}' is not a semantic version", tag);
            return degraded();
        };

        let available = current.cmp_precedence(&latest).is_lt();
        if available {
            info!("Update available: {} -> {}", current, tag);
        } else {
            debug!("Already on latest version: {}", current);
        }

        UpdateDecision {
            available,
            remote_identifier: tag,
            local_identifier: current.to_string(),
            degraded: false,
        }
    }

    /// Query the remote for the latest release tag
    pub async fn latest_release_tag(&self) -> Result<String> {
        let tags = self.remote.tags().await?;
        pick_latest(tags, self.tag_order)
            .ok_or_else(|| UpdateError::malformed("remote returned no usable tags"))
    }
}

/// Pick the latest tag according to `order`
fn pick_latest(tags: Vec<String>, order: TagOrder) -> Option<String> {
    match order {
        TagOrder::AsReturned => tags.into_iter().last(),
        TagOrder::Semver => tags
            .into_iter()
            .filter_map(|tag| parse_tag(&tag).map(|v| (v, tag)))
            .max_by(|(a, _), (b, _)| a.cmp_precedence(b))
            .map(|(_, tag)| tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_latest_as_returned() {
        assert_eq!(
            pick_latest(tags(&["1.2.0", "1.10.0", "1.3.0"]), TagOrder::AsReturned),
            Some("1.3.0".to_string())
        );
        assert_eq!(pick_latest(vec![], TagOrder::AsReturned), None);
    }

    #[test]
    fn test_pick_latest_semver() {
        assert_eq!(
            pick_latest(
                tags(&["1.2.0", "v1.10.0", "nightly", "1.3.0"]),
                TagOrder::Semver
            ),
            Some("v1.10.0".to_string())
        );
        assert_eq!(pick_latest(tags(&["nightly"]), TagOrder::Semver), None);
    }
}
