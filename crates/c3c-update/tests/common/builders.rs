//! Builders for snapshot archives and installation directories

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::path::Path;
use tar::{Builder, EntryType, Header};
use tempfile::TempDir;

use super::constants::*;

/// Builds a gzip-compressed tarball laid out like a GitHub tag snapshot:
/// everything lives under a single `c3c-<tag>/` directory.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    top_level: String,
    files: Vec<(String, Vec<u8>)>,
    dirs: Vec<String>,
}

impl SnapshotBuilder {
    /// Snapshot for `tag` with no entries beyond the top-level directory
    pub fn new(tag: &str) -> Self {
        Self {
            top_level: format!("{}-{}", REPO_NAME, tag),
            files: Vec::new(),
            dirs: Vec::new(),
        }
    }

    /// Add a directory entry at `path` (relative to the top level)
    pub fn dir(mut self, path: &str) -> Self {
        self.dirs.push(path.to_string());
        self
    }

    /// Add a file at `path` (relative to the top level)
    pub fn file(mut self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((path.to_string(), content.as_ref().to_vec()));
        self
    }

    /// The standard snapshot used across tests: `index.js`, `package.json`
    /// and `lib/util.js`
    pub fn standard(tag: &str) -> Self {
        Self::new(tag)
            .file("index.js", INDEX_JS_NEW)
            .file(
                "package.json",
                format!("{{\"name\":\"c3c\",\"version\":\"{}\"}}\n", tag),
            )
            .dir("lib")
            .file("lib/util.js", UTIL_JS)
    }

    /// Number of tar entries `build` produces
    pub fn entry_count(&self) -> usize {
        1 + self.dirs.len() + self.files.len()
    }

    /// Produce the `.tar.gz` bytes
    pub fn build(&self) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut tar = Builder::new(encoder);

        append_dir(&mut tar, &format!("{}/", self.top_level));
        for dir in &self.dirs {
            append_dir(&mut tar, &format!("{}/{}/", self.top_level, dir));
        }
        for (path, content) in &self.files {
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            tar.append_data(
                &mut header,
                format!("{}/{}", self.top_level, path),
                content.as_slice(),
            )
            .unwrap();
        }

        tar.into_inner().unwrap().finish().unwrap()
    }
}

fn append_dir<W: std::io::Write>(tar: &mut Builder<W>, path: &str) {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    header.set_cksum();
    tar.append_data(&mut header, path, std::io::empty()).unwrap();
}

/// Create an installation directory reporting `version`, with an old
/// `index.js`, a lock file and a local-only file
pub fn create_installation(version: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(
        root.join("package.json"),
        format!("{{\"name\":\"c3c\",\"version\":\"{}\"}}\n", version),
    )
    .unwrap();
    fs::write(root.join("index.js"), INDEX_JS_OLD).unwrap();
    fs::write(root.join(LOCK_FILE), "{}").unwrap();
    fs::write(root.join("notes.txt"), LOCAL_NOTES).unwrap();
    temp
}

/// Every file under `root`, relative and sorted
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| !e.file_type().is_dir())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
