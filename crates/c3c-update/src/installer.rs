//! Dependency-installation collaborator

use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// How thoroughly dependencies are refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Plain reinstall from the manifest
    Standard,

    /// Re-resolve the whole transitive dependency tree
    Deep,
}

/// Reinstalls the application's dependencies
#[async_trait]
pub trait DependencyInstaller: Send + Sync {
    /// Run the installer in `dir` and return its exit code
    async fn reinstall(&self, dir: &Path, mode: InstallMode) -> io::Result<i32>;
}

/// [`DependencyInstaller`] backed by `npm`
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    program: String,
    deep_depth: u32,
}

impl NpmInstaller {
    pub fn new(program: impl Into<String>, deep_depth: u32) -> Self {
        Self {
            program: program.into(),
            deep_depth,
        }
    }

    /// Arguments passed to npm for `mode`
    pub fn args(&self, mode: InstallMode) -> Vec<String> {
        match mode {
            InstallMode::Standard => vec!["install".to_string()],
            InstallMode::Deep => vec![
                "--depth".to_string(),
                self.deep_depth.to_string(),
                "update".to_string(),
            ],
        }
    }
}

#[async_trait]
impl DependencyInstaller for NpmInstaller {
    async fn reinstall(&self, dir: &Path, mode: InstallMode) -> io::Result<i32> {
        let args = self.args(mode);
        info!("Reinstalling dependencies: {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .current_dir(dir)
            .args(&args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await?;

        let code = status.code().unwrap_or(-1);
        debug!("{} exited with {}", self.program, code);
        Ok(code)
    }
}
