//! Recursive file enumeration
//!
//! Traversal is depth-first. Order within a directory follows the order the
//! operating system returns entries in, so callers must not rely on it.

use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, UpdateError};

/// Enumerates non-directory entries under a root whose path matches a pattern
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    pattern: Option<Regex>,
    recursive: bool,
}

impl DirectoryWalker {
    /// Walker matching paths against `pattern`, recursive by default
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern: Some(pattern),
            recursive: true,
        }
    }

    /// Walker matching every file
    pub fn all() -> Self {
        Self {
            pattern: None,
            recursive: true,
        }
    }

    /// Descend into subdirectories or stay at the top level
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Collect every matching path eagerly
    pub fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        self.walk_each(root, |path| files.push(path))?;
        Ok(files)
    }

    /// Invoke `on_match` for each matching path as it is discovered
    ///
    /// Returns the number of matches.
    pub fn walk_each<F>(&self, root: &Path, mut on_match: F) -> Result<usize>
    where
        F: FnMut(PathBuf),
    {
        if !root.exists() {
            return Err(UpdateError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut walk = WalkDir::new(root).min_depth(1).follow_links(false);
        if !self.recursive {
            walk = walk.max_depth(1);
        }

        let mut matched = 0;
        for entry in walk {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            if self.matches(entry.path()) {
                matched += 1;
                on_match(entry.into_path());
            }
        }

        Ok(matched)
    }

    fn matches(&self, path: &Path) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(&path.to_string_lossy()),
            None => true,
        }
    }
}
