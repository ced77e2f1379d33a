//! Runtime configuration types for the updater
//!
//! These types control where update information comes from, how the HTTP
//! client behaves, and which external tools are invoked while applying an
//! update.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Complete updater configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdaterConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// GitHub repository settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// External tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Version resolution settings
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("C3CBot/{} request/0.0", env!("CARGO_PKG_VERSION"))
}

/// GitHub repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// Repository owner
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Base URL for the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL for source snapshot archives
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// Branch tracked by prerelease checkouts
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            api_url: default_api_url(),
            archive_url: default_archive_url(),
            default_branch: default_branch(),
        }
    }
}

fn default_repo_owner() -> String {
    "lequanglam".to_string()
}
fn default_repo_name() -> String {
    "c3c".to_string()
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_archive_url() -> String {
    "https://github.com".to_string()
}
fn default_branch() -> String {
    "master".to_string()
}

/// External tools invoked while applying an update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolsConfig {
    /// Source-control client executable
    #[serde(default = "default_git")]
    pub git: String,

    /// Dependency installer executable
    #[serde(default = "default_npm")]
    pub npm: String,

    /// Lock file removed before reinstalling dependencies
    #[serde(default = "default_lock_file")]
    pub lock_file: String,

    /// Depth passed to the installer for a full transitive refresh
    #[serde(default = "default_deep_depth")]
    pub deep_depth: u32,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: default_git(),
            npm: default_npm(),
            lock_file: default_lock_file(),
            deep_depth: default_deep_depth(),
        }
    }
}

fn default_git() -> String {
    "git".to_string()
}
fn default_npm() -> String {
    if cfg!(windows) {
        "npm.cmd".to_string()
    } else {
        "npm".to_string()
    }
}
fn default_lock_file() -> String {
    "package-lock.json".to_string()
}
fn default_deep_depth() -> u32 {
    9999
}

/// Version resolution settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolutionConfig {
    /// How the latest tag is picked from the remote tag list
    #[serde(default)]
    pub tag_order: TagOrder,
}

/// Strategy for picking the latest release tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagOrder {
    /// Trust the remote ordering and take the last tag
    #[default]
    AsReturned,

    /// Take the tag with the highest semantic version
    Semver,
}

impl fmt::Display for TagOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagOrder::AsReturned => write!(f, "as-returned"),
            TagOrder::Semver => write!(f, "semver"),
        }
    }
}

impl FromStr for TagOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "as-returned" => Ok(TagOrder::AsReturned),
            "semver" => Ok(TagOrder::Semver),
            other => Err(format!("unknown tag order: {}", other)),
        }
    }
}
