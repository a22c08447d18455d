//! Application path layout.
//!
//! [`AppPaths`] answers two questions for the resolver: where a prebuilt
//! toolchain shipped next to the program would live, and under which
//! directory versioned installs are kept.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the directory under the data path that holds versioned installs.
const VERSIONED_DIR_NAME: &str = "ffmpeg";

/// Filesystem locations supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPaths {
    /// Directory the program itself is installed in.
    pub program_system_path: PathBuf,
    /// Writable directory for application data.
    pub program_data_path: PathBuf,
}

impl AppPaths {
    pub fn new(program_system_path: impl Into<PathBuf>, program_data_path: impl Into<PathBuf>) -> Self {
        Self {
            program_system_path: program_system_path.into(),
            program_data_path: program_data_path.into(),
        }
    }

    /// Derive a layout from a single data directory.
    ///
    /// The system path is the directory containing the running executable
    /// when it can be determined, and `<data_dir>/bin` otherwise.
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let system = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| data_dir.join("bin"));
        Self::new(system, data_dir)
    }

    /// Version-agnostic location checked for a prebuilt toolchain.
    pub fn prebuilt_root(&self) -> &Path {
        &self.program_system_path
    }

    /// Directory whose immediate children are version directories.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use encforge_common::AppPaths;
    ///
    /// let paths = AppPaths::new("/opt/app", "/data");
    /// assert_eq!(paths.versioned_root(), Path::new("/data/ffmpeg"));
    /// ```
    pub fn versioned_root(&self) -> PathBuf {
        self.program_data_path.join(VERSIONED_DIR_NAME)
    }
}

/// Whether a path is empty or consists only of whitespace.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use encforge_common::paths::is_blank;
///
/// assert!(is_blank(Path::new("")));
/// assert!(is_blank(Path::new("   ")));
/// assert!(!is_blank(Path::new("/usr/bin/ffmpeg")));
/// ```
pub fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}
