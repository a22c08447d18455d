//! Filesystem capability used by the resolver.
//!
//! The resolver only needs a handful of primitives, so they sit behind
//! [`FileSystem`] to let tests observe calls or simulate failures.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Filesystem operations the resolver depends on.
pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing regular file.
    fn file_exists(&self, path: &Path) -> bool;

    /// Create `path` and its parents. Must succeed if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Immediate child directories of `path`.
    fn subdirectories(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Every file below `path`, at any depth.
    fn files_recursive(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Remove `path` and everything below it.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs` and `walkdir`.
///
/// Listings come back sorted by file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn subdirectories(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(dirs)
    }

    fn files_recursive(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                // The root itself is unreadable: the whole listing fails.
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry under {:?}: {}", path, e);
                }
            }
        }

        Ok(files)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}
