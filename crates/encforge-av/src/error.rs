//! Error types for encforge-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised around toolchain resolution.
///
/// Resolution itself is total; these only surface from maintenance
/// operations such as pruning stale version directories.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to remove a stale version directory.
    #[error("failed to remove {}: {source}", path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refused to act on a path outside the versioned root.
    #[error("refusing to touch {} outside of {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// The descriptor is malformed.
    #[error(transparent)]
    Common(#[from] encforge_common::Error),
}

impl Error {
    /// Create a remove failed error.
    pub fn remove_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RemoveFailed {
            path: path.into(),
            source,
        }
    }

    /// Create an outside-root error.
    pub fn outside_root(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::OutsideRoot {
            path: path.into(),
            root: root.into(),
        }
    }
}
