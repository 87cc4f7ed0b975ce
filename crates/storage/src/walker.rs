//! Volume tree enumeration.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Start a fresh walk of the volume tree under `root`.
///
/// Yields regular files only, in traversal order. Symlinks are not followed.
/// An unreadable directory is logged and skipped along with its subtree.
pub fn walk(root: &Path) -> ChunkPaths {
    ChunkPaths {
        inner: WalkDir::new(root).follow_links(false).into_iter(),
    }
}

/// Lazy sequence of file paths from one walk. See [`walk`].
pub struct ChunkPaths {
    inner: walkdir::IntoIter,
}

impl Iterator for ChunkPaths {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) if entry.file_type().is_file() => return Some(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable entry during volume walk"
                    );
                }
            }
        }
    }
}
