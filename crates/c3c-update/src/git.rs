//! Source-control collaborator

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use crate::version::SHORT_HASH_LEN;

/// Exit status and captured stdout of a finished subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `-1` when the process was killed by a signal
    pub code: i32,

    /// Captured standard output
    pub stdout: String,
}

impl CommandOutput {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        }
    }
}

/// Operations the updater needs from the source-control client
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Whether `dir` is inside a live working tree
    async fn is_checkout(&self, dir: &Path) -> bool;

    /// Put local modifications aside
    async fn stash(&self, dir: &Path) -> io::Result<CommandOutput>;

    /// Pull the tracked upstream
    async fn pull(&self, dir: &Path) -> io::Result<CommandOutput>;

    /// Abbreviated hash of HEAD, empty when it cannot be determined
    async fn short_head(&self, dir: &Path) -> String;
}

/// [`SourceControl`] implemented by invoking the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, dir: &Path, args: &[&str]) -> io::Result<CommandOutput> {
        debug!("Running: {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .current_dir(dir)
            .args(args)
            .output()
            .await?;
        Ok(output.into())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

#[async_trait]
impl SourceControl for GitCli {
    async fn is_checkout(&self, dir: &Path) -> bool {
        match self.run(dir, &["rev-parse", "--is-inside-work-tree"]).await {
            Ok(out) => out.success() && out.stdout.lines().next() == Some("true"),
            Err(e) => {
                debug!("git unavailable: {}", e);
                false
            }
        }
    }

    async fn stash(&self, dir: &Path) -> io::Result<CommandOutput> {
        self.run(dir, &["stash"]).await
    }

    async fn pull(&self, dir: &Path) -> io::Result<CommandOutput> {
        self.run(dir, &["pull"]).await
    }

    async fn short_head(&self, dir: &Path) -> String {
        let short = format!("--short={}", SHORT_HASH_LEN);
        match self.run(dir, &["rev-parse", short.as_str(), "HEAD"]).await {
            Ok(out) if out.success() => out.stdout.replace(['\r', '\n'], ""),
            Ok(out) => {
                debug!("git rev-parse exited with {}", out.code);
                String::new()
            }
            Err(e) => {
                debug!("git unavailable: {}", e);
                String::new()
            }
        }
    }
}
