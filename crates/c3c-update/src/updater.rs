//! Updater facade
//!
//! Wires configuration into the remote source, source-control client and
//! dependency installer, probes the installation once, and exposes the two
//! public operations: checking for an update and installing it.

use c3c_core::types::UpdaterConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::applier::{ApplyOutcome, UpdateApplier};
use crate::error::Result;
use crate::git::{GitCli, SourceControl};
use crate::installer::{DependencyInstaller, NpmInstaller};
use crate::merge::TreeMerger;
use crate::releases::{GitHubSource, RemoteSource};
use crate::resolver::{RepositoryContext, UpdateContext, UpdateDecision, VersionResolver};
use crate::version::read_installed_version;

/// Self-update manager for a C3C installation
pub struct Updater {
    context: Arc<UpdateContext>,

    /// Availability checks
    resolver: VersionResolver,

    /// In-place application
    applier: UpdateApplier,
}

impl Updater {
    /// Build an updater for the installation at `install_root`.
    ///
    /// Reads the installed version from the package manifest and probes
    /// whether the root is a source-control checkout.
    pub async fn from_config(
        config: &UpdaterConfig,
        install_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let install_root = install_root.into();
        let current_version = read_installed_version(&install_root)?;

        let remote: Arc<dyn RemoteSource> =
            Arc::new(GitHubSource::new(config.github.clone(), &config.network)?);
        let git: Arc<dyn SourceControl> = Arc::new(GitCli::new(config.tools.git.clone()));
        let installer: Arc<dyn DependencyInstaller> = Arc::new(NpmInstaller::new(
            config.tools.npm.clone(),
            config.tools.deep_depth,
        ));

        let repository = RepositoryContext::probe(git.as_ref(), &install_root).await;
        let context = UpdateContext {
            current_version,
            install_root,
            repository,
        };

        debug!(
            "Updater initialized: version={}, root={:?}, checkout={}",
            context.current_version, context.install_root, context.repository.is_checkout
        );

        let resolver = VersionResolver::new(Arc::new(context), remote.clone(), git.clone())
            .with_tag_order(config.resolution.tag_order);
        Ok(Self::assemble(
            resolver,
            remote,
            git,
            installer,
            &config.tools.lock_file,
        ))
    }

    /// Build an updater from already-constructed collaborators
    pub fn with_collaborators(
        context: UpdateContext,
        remote: Arc<dyn RemoteSource>,
        git: Arc<dyn SourceControl>,
        installer: Arc<dyn DependencyInstaller>,
        lock_file: &str,
    ) -> Self {
        let resolver = VersionResolver::new(Arc::new(context), remote.clone(), git.clone());
        Self::assemble(resolver, remote, git, installer, lock_file)
    }

    fn assemble(
        resolver: VersionResolver,
        remote: Arc<dyn RemoteSource>,
        git: Arc<dyn SourceControl>,
        installer: Arc<dyn DependencyInstaller>,
        lock_file: &str,
    ) -> Self {
        let context = resolver.context();
        let applier = UpdateApplier::new(
            context.clone(),
            resolver.clone(),
            remote,
            git,
            installer,
            lock_file,
        );
        Self {
            context,
            resolver,
            applier,
        }
    }

    /// Replace the merger used when applying a release snapshot
    pub fn with_merger(mut self, merger: TreeMerger) -> Self {
        self.applier = self.applier.with_merger(merger);
        self
    }

    /// Facts about the running installation
    pub fn context(&self) -> &UpdateContext {
        &self.context
    }

    /// Report whether a newer version exists.
    ///
    /// `force_stable` compares against the latest tag even on a prerelease
    /// build.
    pub async fn check_for_update(&self, force_stable: bool) -> UpdateDecision {
        self.resolver.resolve(force_stable).await
    }

    /// Apply the latest update to the installation
    pub async fn install_update(&self) -> ApplyOutcome {
        self.applier.apply().await
    }
}
