//! Error types for c3c-update

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using c3c-update's Error type
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Errors raised while talking to the remote source or touching the filesystem
#[derive(Error, Debug)]
pub enum UpdateError {
    /// The remote answered with a non-success status
    #[error("HTTP/1.1 {status}")]
    HttpStatus { status: u16 },

    /// Transport failure, timeout, or undecodable body
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote answered but the payload is unusable
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Walk root does not exist
    #[error("No such directory: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// Directory could not be created
    #[error("Cannot create directory {}: {source}", path.display())]
    Materialize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failed part-way
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Snapshot archive is unusable
    #[error("Invalid archive: {message}")]
    Archive { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error from c3c-core
    #[error(transparent)]
    Config(#[from] c3c_core::Error),

    /// Installed version could not be determined
    #[error("Invalid version: {version}")]
    InvalidVersion { version: String },
}

impl UpdateError {
    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an invalid archive error
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive {
            message: message.into(),
        }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }
}

/// Why an update could not be applied
///
/// The `Display` form is the reason tag handed back to callers in
/// [`ApplyOutcome::detail`](crate::applier::ApplyOutcome).
#[derive(Error, Debug)]
pub enum ApplyFailure {
    /// `git pull` exited non-zero
    #[error("GIT-{0}")]
    Git(i32),

    /// The dependency installer exited non-zero
    #[error("NPM-{0}")]
    Npm(i32),

    /// The latest release tag could not be determined
    #[error("GITHUB-RATE-LIMITED.")]
    RateLimited,

    /// Anything else (HTTP status, filesystem, archive)
    #[error("Error: {0}")]
    Failed(#[from] UpdateError),
}

impl From<io::Error> for ApplyFailure {
    fn from(err: io::Error) -> Self {
        Self::Failed(UpdateError::Io(err))
    }
}
