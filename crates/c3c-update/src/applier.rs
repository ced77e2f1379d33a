//! Update application
//!
//! Two mutually exclusive strategies, picked by the checkout probe:
//! - control-synced: stash, pull, reinstall dependencies
//! - archive-merge: download the latest tagged snapshot, overlay it onto the
//!   installation, reinstall dependencies
//!
//! Only one apply may run at a time; callers serialize invocations.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ApplyFailure;
use crate::git::SourceControl;
use crate::installer::{DependencyInstaller, InstallMode};
use crate::merge::{extract_archive, TreeMerger};
use crate::releases::RemoteSource;
use crate::resolver::{UpdateContext, VersionResolver};

/// Stages of an apply operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyStage {
    Idle,
    Syncing,
    Resolving,
    Downloading,
    Extracting,
    Merging,
    Installing,
    Succeeded,
}

impl fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplyStage::Idle => "idle",
            ApplyStage::Syncing => "syncing",
            ApplyStage::Resolving => "resolving",
            ApplyStage::Downloading => "downloading",
            ApplyStage::Extracting => "extracting",
            ApplyStage::Merging => "merging",
            ApplyStage::Installing => "installing",
            ApplyStage::Succeeded => "succeeded",
        };
        f.write_str(name)
    }
}

/// Terminal result of an apply operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    /// Whether the update was applied
    pub succeeded: bool,

    /// Success payload or failure reason tag
    pub detail: String,

    /// Last stage entered; the failing stage when `succeeded` is false
    pub stage: ApplyStage,
}

/// Tracks the current stage so a failure can report where it happened
#[derive(Debug)]
struct StageTracker {
    current: ApplyStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: ApplyStage::Idle,
        }
    }

    fn enter(&mut self, stage: ApplyStage) {
        debug!("Apply stage: {} -> {}", self.current, stage);
        self.current = stage;
    }
}

/// Applies an update in place
pub struct UpdateApplier {
    context: Arc<UpdateContext>,
    resolver: VersionResolver,
    remote: Arc<dyn RemoteSource>,
    git: Arc<dyn SourceControl>,
    installer: Arc<dyn DependencyInstaller>,
    lock_file: String,
    merger: TreeMerger,
}

impl UpdateApplier {
    pub fn new(
        context: Arc<UpdateContext>,
        resolver: VersionResolver,
        remote: Arc<dyn RemoteSource>,
        git: Arc<dyn SourceControl>,
        installer: Arc<dyn DependencyInstaller>,
        lock_file: impl Into<String>,
    ) -> Self {
        Self {
            context,
            resolver,
            remote,
            git,
            installer,
            lock_file: lock_file.into(),
            merger: TreeMerger::new(),
        }
    }

    /// Replace the merger used by the archive strategy
    pub fn with_merger(mut self, merger: TreeMerger) -> Self {
        self.merger = merger;
        self
    }

    /// Apply the update and report the outcome
    pub async fn apply(&self) -> ApplyOutcome {
        let mut stages = StageTracker::new();

        let result = if self.context.repository.is_checkout {
            info!("Updating checkout at {}", self.context.install_root.display());
            self.apply_control_synced(&mut stages).await
        } else {
            info!(
                "Updating installation at {} from release snapshot",
                self.context.install_root.display()
            );
            self.apply_archive_merge(&mut stages).await
        };

        match result {
            Ok(detail) => {
                stages.enter(ApplyStage::Succeeded);
                info!("Update applied ({})", detail);
                ApplyOutcome {
                    succeeded: true,
                    detail,
                    stage: stages.current,
                }
            }
            Err(failure) => {
                warn!("Update failed while {}: {}", stages.current, failure);
                ApplyOutcome {
                    succeeded: false,
                    detail: failure.to_string(),
                    stage: stages.current,
                }
            }
        }
    }

    async fn apply_control_synced(
        &self,
        stages: &mut StageTracker,
    ) -> Result<String, ApplyFailure> {
        let root = self.context.install_root.as_path();
        stages.enter(ApplyStage::Syncing);

        // Best effort; a failed stash surfaces through the pull.
        match self.git.stash(root).await {
            Ok(out) if !out.success() => warn!("git stash exited with {}", out.code),
            Err(e) => warn!("git stash failed to start: {}", e),
            Ok(_) => {}
        }

        let pull = self.git.pull(root).await?;
        if !pull.success() {
            return Err(ApplyFailure::Git(pull.code));
        }

        stages.enter(ApplyStage::Installing);
        self.reinstall(root, InstallMode::Standard).await?;

        Ok("true".to_string())
    }

    async fn apply_archive_merge(
        &self,
        stages: &mut StageTracker,
    ) -> Result<String, ApplyFailure> {
        let root = self.context.install_root.as_path();

        stages.enter(ApplyStage::Resolving);
        let tag = self.resolver.latest_release_tag().await.map_err(|e| {
            warn!("Failed to resolve latest release: {}", e);
            ApplyFailure::RateLimited
        })?;
        info!("Latest release: {}", tag);

        stages.enter(ApplyStage::Downloading);
        let archive = self.remote.fetch_archive(&tag).await?;
        debug!("Downloaded {} bytes", archive.len());

        stages.enter(ApplyStage::Extracting);
        let extracted = extract_archive(&archive, root)?;

        stages.enter(ApplyStage::Merging);
        self.merger.merge(&extracted.root, root)?;

        stages.enter(ApplyStage::Installing);
        self.reinstall(root, InstallMode::Deep).await?;

        Ok(extracted.entry_count.to_string())
    }

    async fn reinstall(&self, root: &Path, mode: InstallMode) -> Result<(), ApplyFailure> {
        remove_lock_file(&root.join(&self.lock_file))?;

        let code = self.installer.reinstall(root, mode).await?;
        if code != 0 {
            return Err(ApplyFailure::Npm(code));
        }
        Ok(())
    }
}

fn remove_lock_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_lock_file_tolerates_absence() {
        let temp = TempDir::new().unwrap();
        let lock = temp.path().join("package-lock.json");
        remove_lock_file(&lock).unwrap();

        fs::write(&lock, "{}").unwrap();
        remove_lock_file(&lock).unwrap();
        assert!(!lock.exists());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ApplyStage::Downloading.to_string(), "downloading");
        assert_eq!(ApplyStage::Succeeded.to_string(), "succeeded");
    }
}
