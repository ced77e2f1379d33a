//! Recording fakes for the subprocess collaborators

use async_trait::async_trait;
use c3c_update::git::{CommandOutput, SourceControl};
use c3c_update::installer::{DependencyInstaller, InstallMode};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Source-control fake with scripted exit codes
#[derive(Debug, Clone)]
pub struct FakeGit {
    pub checkout: bool,
    pub head: String,
    pub stash_code: i32,
    pub pull_code: i32,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeGit {
    /// Not a checkout; every command succeeds
    pub fn plain() -> Self {
        Self {
            checkout: false,
            head: String::new(),
            stash_code: 0,
            pull_code: 0,
            calls: Arc::default(),
        }
    }

    /// A checkout whose HEAD is `head`
    pub fn checkout(head: &str) -> Self {
        Self {
            checkout: true,
            head: head.to_string(),
            ..Self::plain()
        }
    }

    pub fn with_stash_code(mut self, code: i32) -> Self {
        self.stash_code = code;
        self
    }

    pub fn with_pull_code(mut self, code: i32) -> Self {
        self.pull_code = code;
        self
    }

    /// Subcommands invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl SourceControl for FakeGit {
    async fn is_checkout(&self, _dir: &Path) -> bool {
        self.checkout
    }

    async fn stash(&self, _dir: &Path) -> io::Result<CommandOutput> {
        self.record("stash");
        Ok(CommandOutput {
            code: self.stash_code,
            stdout: String::new(),
        })
    }

    async fn pull(&self, _dir: &Path) -> io::Result<CommandOutput> {
        self.record("pull");
        Ok(CommandOutput {
            code: self.pull_code,
            stdout: String::new(),
        })
    }

    async fn short_head(&self, _dir: &Path) -> String {
        self.record("rev-parse");
        self.head.clone()
    }
}

/// Dependency installer fake that records the mode and whether the lock
/// file was present when it ran
#[derive(Debug, Clone, Default)]
pub struct FakeInstaller {
    pub exit_code: i32,
    pub lock_file: String,
    runs: Arc<Mutex<Vec<(InstallMode, bool)>>>,
}

impl FakeInstaller {
    pub fn new(lock_file: &str) -> Self {
        Self {
            exit_code: 0,
            lock_file: lock_file.to_string(),
            runs: Arc::default(),
        }
    }

    pub fn failing(lock_file: &str, code: i32) -> Self {
        Self {
            exit_code: code,
            ..Self::new(lock_file)
        }
    }

    /// `(mode, lock file present)` per invocation
    pub fn runs(&self) -> Vec<(InstallMode, bool)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl DependencyInstaller for FakeInstaller {
    async fn reinstall(&self, dir: &Path, mode: InstallMode) -> io::Result<i32> {
        let lock_present = dir.join(&self.lock_file).exists();
        self.runs.lock().unwrap().push((mode, lock_present));
        Ok(self.exit_code)
    }
}
