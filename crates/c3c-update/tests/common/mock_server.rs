//! Wiremock helpers for the GitHub refs API and archive endpoint
//!
//! The mock server plays both the API host and the archive host, so a
//! single `GitHubConfig` from [`github_config`] points everything at it.

use c3c_core::types::{GitHubConfig, NetworkConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Repository configuration pointing at `server`
pub fn github_config(server: &MockServer) -> GitHubConfig {
    GitHubConfig {
        repo_owner: REPO_OWNER.to_string(),
        repo_name: REPO_NAME.to_string(),
        api_url: server.uri(),
        archive_url: server.uri(),
        default_branch: DEFAULT_BRANCH.to_string(),
    }
}

/// Network configuration with a short timeout
pub fn network_config() -> NetworkConfig {
    network_config_with_timeout(5)
}

/// Network configuration giving up after `secs`
pub fn network_config_with_timeout(secs: u64) -> NetworkConfig {
    NetworkConfig {
        http_timeout_secs: secs,
        ..NetworkConfig::default()
    }
}

fn tags_path() -> String {
    format!("/repos/{}/{}/git/refs/tags", REPO_OWNER, REPO_NAME)
}

fn branch_path() -> String {
    format!(
        "/repos/{}/{}/git/ref/heads/{}",
        REPO_OWNER, REPO_NAME, DEFAULT_BRANCH
    )
}

fn archive_path(tag: &str) -> String {
    format!("/{}/{}/archive/{}.tar.gz", REPO_OWNER, REPO_NAME, tag)
}

/// Body of the refs API listing `tags`
pub fn tags_body(tags: &[&str]) -> serde_json::Value {
    let refs: Vec<_> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            json!({
                "ref": format!("refs/tags/{}", tag),
                "node_id": format!("REF_{}", i),
                "object": { "sha": format!("{:040x}", i + 1), "type": "commit" }
            })
        })
        .collect();
    json!(refs)
}

/// Serve `tags` from the refs API, expecting exactly `calls` requests
pub async fn mock_tags(server: &MockServer, tags: &[&str], calls: u64) {
    Mock::given(method("GET"))
        .and(path(tags_path()))
        .and(header("accept", "application/vnd.github.v3.full+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tags_body(tags)))
        .expect(calls)
        .mount(server)
        .await;
}

/// Serve `tags` from the refs API only after `delay`
pub async fn mock_tags_delayed(server: &MockServer, tags: &[&str], delay: Duration) {
    Mock::given(method("GET"))
        .and(path(tags_path()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(tags_body(tags))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Serve `sha` as the default branch tip only after `delay`
pub async fn mock_branch_tip_delayed(server: &MockServer, sha: &str, delay: Duration) {
    let body = json!({
        "ref": format!("refs/heads/{}", DEFAULT_BRANCH),
        "object": { "sha": sha, "type": "commit" }
    });
    Mock::given(method("GET"))
        .and(path(branch_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
        .mount(server)
        .await;
}

/// Fail the refs API with `status`
pub async fn mock_tags_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(tags_path()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve a body from the refs API that is not a ref list
pub async fn mock_tags_malformed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(tags_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\":\"nope\"}"))
        .mount(server)
        .await;
}

/// Serve `sha` as the default branch tip, expecting exactly `calls` requests
pub async fn mock_branch_tip(server: &MockServer, sha: &str, calls: u64) {
    let body = json!({
        "ref": format!("refs/heads/{}", DEFAULT_BRANCH),
        "object": { "sha": sha, "type": "commit" }
    });
    Mock::given(method("GET"))
        .and(path(branch_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

/// Fail the branch endpoint with `status`
pub async fn mock_branch_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(branch_path()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve `bytes` as the snapshot for `tag`
pub async fn mock_archive(server: &MockServer, tag: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(archive_path(tag)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .expect(1)
        .mount(server)
        .await;
}

/// Fail the snapshot download for `tag` with `status`
pub async fn mock_archive_status(server: &MockServer, tag: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(archive_path(tag)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
