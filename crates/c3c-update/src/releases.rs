//! Remote source of truth for versions and release snapshots

use async_trait::async_trait;
use bytes::Bytes;
use c3c_core::types::{GitHubConfig, NetworkConfig};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, UpdateError};

/// Media type requested from the GitHub REST API
const GITHUB_ACCEPT: &str = "application/vnd.github.v3.full+json";

/// Prefix of tag references in the refs API
const TAG_REF_PREFIX: &str = "refs/tags/";

/// A git reference as returned by the refs API
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    /// Fully qualified reference name (e.g., "refs/tags/1.2.0")
    #[serde(rename = "ref")]
    pub reference: String,

    /// Object the reference points at
    pub object: GitObject,
}

/// Target object of a git reference
#[derive(Debug, Clone, Deserialize)]
pub struct GitObject {
    /// Full commit SHA
    pub sha: String,
}

impl GitRef {
    /// Tag name without the `refs/tags/` prefix
    pub fn tag_name(&self) -> &str {
        self.reference
            .strip_prefix(TAG_REF_PREFIX)
            .unwrap_or(&self.reference)
    }
}

/// Read-only queries against the remote repository
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Full SHA of the default branch tip
    async fn branch_tip(&self) -> Result<String>;

    /// Tag names in the order the remote returned them
    async fn tags(&self) -> Result<Vec<String>>;

    /// Compressed snapshot of the repository at `tag`
    async fn fetch_archive(&self, tag: &str) -> Result<Bytes>;
}

/// [`RemoteSource`] backed by the GitHub REST API and archive endpoint
pub struct GitHubSource {
    client: reqwest::Client,
    github: GitHubConfig,
}

impl GitHubSource {
    /// Create a source from configuration
    pub fn new(github: GitHubConfig, network: &NetworkConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = reqwest::Client::builder()
            .user_agent(&network.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()?;

        Ok(Self { client, github })
    }

    fn repo_api_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.github.api_url.trim_end_matches('/'),
            self.github.repo_owner,
            self.github.repo_name
        )
    }

    /// URL of the snapshot archive for `tag`
    pub fn archive_url(&self, tag: &str) -> String {
        format!(
            "{}/{}/{}/archive/{}.tar.gz",
            self.github.archive_url.trim_end_matches('/'),
            self.github.repo_owner,
            self.github.repo_name,
            tag
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(UpdateError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| UpdateError::malformed(e.to_string()))
    }
}

#[async_trait]
impl RemoteSource for GitHubSource {
    async fn branch_tip(&self) -> Result<String> {
        let url = format!(
            "{}/git/ref/heads/{}",
            self.repo_api_url(),
            self.github.default_branch
        );
        let head: GitRef = self.get_json(&url).await?;
        Ok(head.object.sha)
    }

    async fn tags(&self) -> Result<Vec<String>> {
        let url = format!("{}/git/refs/tags", self.repo_api_url());
        let refs: Vec<GitRef> = self.get_json(&url).await?;
        Ok(refs.iter().map(|r| r.tag_name().to_string()).collect())
    }

    async fn fetch_archive(&self, tag: &str) -> Result<Bytes> {
        let url = self.archive_url(tag);
        debug!("Downloading snapshot from: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(UpdateError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}
