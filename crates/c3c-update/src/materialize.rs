//! Directory creation ahead of file writes

use std::fs::DirBuilder;
use std::path::Path;

use crate::error::{Result, UpdateError};

/// Permission bits for directories created during a merge (before umask)
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// Create `path` and any missing ancestors with `mode`.
///
/// Succeeds when `path` is already a directory. Fails when something that is
/// not a directory occupies `path` or one of its ancestors. `mode` is ignored
/// on non-Unix platforms.
pub fn ensure_dir(path: &Path, mode: u32) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(path)
        .map_err(|source| UpdateError::Materialize {
            path: path.to_path_buf(),
            source,
        })
}
