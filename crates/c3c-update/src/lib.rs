//! Self-update engine for C3C installations
//!
//! Provides:
//! - Release-channel aware update checks against GitHub
//! - In-place update of source-control checkouts (stash, pull, reinstall)
//! - In-place update of plain installations from a tagged release snapshot
//! - Cross-device safe file moves and recursive tree merging

pub mod applier;
pub mod error;
pub mod git;
pub mod installer;
pub mod materialize;
pub mod merge;
pub mod releases;
pub mod resolver;
pub mod updater;
pub mod version;
pub mod walker;

pub use applier::{ApplyOutcome, ApplyStage, UpdateApplier};
pub use error::{ApplyFailure, Result, UpdateError};
pub use releases::{GitHubSource, RemoteSource};
pub use resolver::{RepositoryContext, UpdateContext, UpdateDecision, VersionResolver};
pub use updater::Updater;
pub use walker::DirectoryWalker;

/// Version of the updater itself
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
