//! Snapshot extraction and in-place tree merge
//!
//! A release snapshot is unpacked next to the installation, then every file
//! is moved over the installation at the same relative path. There is no
//! rollback: a failure part-way leaves the files moved so far in place.

use flate2::read::GzDecoder;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::{debug, info, warn};

use crate::error::{Result, UpdateError};
use crate::materialize::{ensure_dir, DEFAULT_DIR_MODE};
use crate::walker::DirectoryWalker;

/// Rename primitive used by [`relocate_with`]
pub type RenameFn = fn(&Path, &Path) -> io::Result<()>;

/// How a file reached its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Atomic rename
    Renamed,

    /// Copy to destination, then delete the source
    Copied,

    /// Symlink recreated at the destination, then the source removed
    Relinked,
}

/// Move `from` to `to` with an atomic rename, copying across devices
pub fn relocate(from: &Path, to: &Path) -> io::Result<MoveKind> {
    relocate_with(from, to, |a, b| fs::rename(a, b))
}

/// Move `from` to `to` using `rename`.
///
/// Only a cross-device failure falls back to copy-then-delete; any other
/// rename error is returned untouched. The source is removed only once the
/// destination holds every byte. Symlinks are never followed: a link is
/// recreated with the same target instead of being copied through.
pub fn relocate_with<R>(from: &Path, to: &Path, rename: R) -> io::Result<MoveKind>
where
    R: FnOnce(&Path, &Path) -> io::Result<()>,
{
    match rename(from, to) {
        Ok(()) => Ok(MoveKind::Renamed),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "Rename across devices, copying {} -> {}",
                from.display(),
                to.display()
            );
            let metadata = fs::symlink_metadata(from)?;
            if metadata.file_type().is_symlink() {
                relink(from, to)?;
                fs::remove_file(from)?;
                return Ok(MoveKind::Relinked);
            }

            let expected = metadata.len();
            let written = fs::copy(from, to)?;
            if written != expected {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "short copy to {}: {} of {} bytes",
                        to.display(),
                        written,
                        expected
                    ),
                ));
            }
            fs::remove_file(from)?;
            Ok(MoveKind::Copied)
        }
        Err(e) => Err(e),
    }
}

/// Recreate the symlink at `from` as `to`, replacing whatever `to` holds
fn relink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    match fs::symlink_metadata(to) {
        Ok(existing) if existing.is_dir() => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a directory", to.display()),
            ))
        }
        Ok(_) => fs::remove_file(to)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(&target, to)?;

    #[cfg(windows)]
    {
        let resolved = from.parent().map(|p| p.join(&target));
        if resolved.is_some_and(|p| p.is_dir()) {
            std::os::windows::fs::symlink_dir(&target, to)?;
        } else {
            std::os::windows::fs::symlink_file(&target, to)?;
        }
    }

    Ok(())
}

/// A snapshot unpacked under the installation root
#[derive(Debug, Clone)]
pub struct ExtractedArchive {
    /// The single top-level directory the snapshot unpacked into
    pub root: PathBuf,

    /// Number of entries (files, directories, links) unpacked from the archive
    pub entry_count: usize,
}

/// Unpack a gzip-compressed tarball into `dest`.
///
/// Every entry must live under the same top-level directory. Entries that
/// would escape `dest` are skipped by the tar reader.
pub fn extract_archive(bytes: &[u8], dest: &Path) -> Result<ExtractedArchive> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    let mut top_level: Option<OsString> = None;
    let mut entry_count = 0;

    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.header().entry_type().is_pax_global_extensions() {
            continue;
        }

        let path = entry.path()?.into_owned();
        let first = match path.components().find(|c| !matches!(c, Component::CurDir)) {
            Some(Component::Normal(name)) => name.to_os_string(),
            _ => {
                return Err(UpdateError::archive(format!(
                    "unexpected entry path: {}",
                    path.display()
                )))
            }
        };

        match &top_level {
            None => top_level = Some(first),
            Some(existing) if *existing == first => {}
            Some(existing) => {
                return Err(UpdateError::archive(format!(
                    "multiple top-level entries: {} and {}",
                    existing.to_string_lossy(),
                    first.to_string_lossy()
                )))
            }
        }

        if entry.unpack_in(dest)? {
            entry_count += 1;
        } else {
            warn!("Skipped archive entry outside the snapshot: {}", path.display());
        }
    }

    let top_level = top_level.ok_or_else(|| UpdateError::archive("archive is empty"))?;
    let root = dest.join(top_level);
    info!(
        "Extracted {} entries into {}",
        entry_count,
        root.display()
    );

    Ok(ExtractedArchive { root, entry_count })
}

/// Files moved by a completed merge
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Paths relative to the installation root
    pub moved: Vec<PathBuf>,

    /// How many of them needed the copy fallback
    pub copied: usize,
}

/// Overlays an extracted tree onto the installation root
#[derive(Debug, Clone)]
pub struct TreeMerger {
    rename: RenameFn,
}

impl TreeMerger {
    pub fn new() -> Self {
        Self {
            rename: |from, to| fs::rename(from, to),
        }
    }

    /// Replace the rename primitive
    pub fn with_rename(mut self, rename: RenameFn) -> Self {
        self.rename = rename;
        self
    }

    /// Move every file under `source_root` to the same relative path under
    /// `install_root`, then delete `source_root`.
    pub fn merge(&self, source_root: &Path, install_root: &Path) -> Result<MergeReport> {
        let files = DirectoryWalker::all().walk(source_root)?;
        debug!("Merging {} files from {}", files.len(), source_root.display());

        let mut report = MergeReport::default();
        for file in files {
            if let Err(e) = self.move_one(&file, source_root, install_root, &mut report) {
                warn!(
                    moved = ?report.moved,
                    "Merge aborted after {} files; installation is partially updated",
                    report.moved.len()
                );
                return Err(e);
            }
        }

        fs::remove_dir_all(source_root)?;
        info!(
            "Merged {} files ({} copied across devices)",
            report.moved.len(),
            report.copied
        );
        Ok(report)
    }

    fn move_one(
        &self,
        file: &Path,
        source_root: &Path,
        install_root: &Path,
        report: &mut MergeReport,
    ) -> Result<()> {
        let relative = file
            .strip_prefix(source_root)
            .map_err(|_| UpdateError::archive(format!("{} escaped the tree", file.display())))?;
        let dest = install_root.join(relative);

        if let Some(parent) = dest.parent() {
            ensure_dir(parent, DEFAULT_DIR_MODE)?;
        }

        if relocate_with(file, &dest, self.rename)? == MoveKind::Copied {
            report.copied += 1;
        }
        report.moved.push(relative.to_path_buf());
        Ok(())
    }
}

impl Default for TreeMerger {
    fn default() -> Self {
        Self::new()
    }
}
