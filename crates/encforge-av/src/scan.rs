//! Fallback scan over sibling version directories.
//!
//! When the targeted version is missing, every immediate child of the
//! versioned root is searched recursively for files named like the encoder
//! and the prober. The first child holding both wins.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fs::FileSystem;

/// Order in which candidate version directories are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackOrder {
    /// Ascending directory name; the first complete directory wins.
    #[default]
    Lexicographic,
    /// Highest dotted numeric version first. Names without a leading
    /// number go last, in name order.
    NewestFirst,
}

/// A complete toolchain found under some version directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackMatch {
    pub encoder_path: PathBuf,
    pub prober_path: PathBuf,
    /// Name of the directory holding the prober.
    pub version: String,
    /// The version directory the match was found under.
    pub directory: PathBuf,
}

/// Find the first version directory under `root` containing both files.
///
/// An unreadable or missing root behaves like an empty one, and a candidate
/// that cannot be listed is skipped.
pub fn find_existing_version(
    fs: &dyn FileSystem,
    root: &Path,
    encoder_filename: &str,
    prober_filename: &str,
    order: FallbackOrder,
) -> Option<FallbackMatch> {
    let mut candidates = match fs.subdirectories(root) {
        Ok(dirs) => dirs,
        Err(e) => {
            debug!("Versioned root {:?} not readable: {}", root, e);
            return None;
        }
    };
    sort_candidates(&mut candidates, order);

    for directory in candidates {
        let files = match fs.files_recursive(&directory) {
            Ok(files) => files,
            Err(e) => {
                warn!("Skipping unreadable version directory {:?}: {}", directory, e);
                continue;
            }
        };

        let encoder = files.iter().find(|f| file_name_matches(f, encoder_filename));
        let prober = files.iter().find(|f| file_name_matches(f, prober_filename));

        let (Some(encoder), Some(prober)) = (encoder, prober) else {
            debug!("No complete toolchain in {:?}", directory);
            continue;
        };

        let version = prober
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        return Some(FallbackMatch {
            encoder_path: encoder.clone(),
            prober_path: prober.clone(),
            version,
            directory,
        });
    }

    None
}

/// Case-insensitive comparison of a path's final component with `expected`.
pub(crate) fn file_name_matches(path: &Path, expected: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase() == expected.to_lowercase())
        .unwrap_or(false)
}

fn sort_candidates(dirs: &mut [PathBuf], order: FallbackOrder) {
    match order {
        FallbackOrder::Lexicographic => dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name())),
        FallbackOrder::NewestFirst => dirs.sort_by(|a, b| {
            let ka = a.file_name().and_then(version_key);
            let kb = b.file_name().and_then(version_key);
            match (ka, kb) {
                (Some(ka), Some(kb)) => kb.cmp(&ka).then_with(|| a.file_name().cmp(&b.file_name())),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.file_name().cmp(&b.file_name()),
            }
        }),
    }
}

/// Numeric components of a version-like directory name.
///
/// Each component contributes its leading digits, so `"7.1-rc2"` becomes
/// `[7, 1]` and `"n6.1.1"` has no key.
fn version_key(name: &OsStr) -> Option<Vec<u64>> {
    let name = name.to_string_lossy();
    let mut key = Vec::new();

    for part in name.split(['.', '-', '_']) {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u64>() {
            Ok(n) => key.push(n),
            Err(_) => break,
        }
        if digits.len() != part.len() {
            break;
        }
    }

    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::StdFileSystem;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn picks_only_complete_directory() {
        let root = tempdir().unwrap();
        touch(&root.path().join("1.0/ffmpeg"));
        touch(&root.path().join("1.0/ffprobe"));
        touch(&root.path().join("2.0/ffmpeg"));

        let m = find_existing_version(
            &StdFileSystem,
            root.path(),
            "ffmpeg",
            "ffprobe",
            FallbackOrder::Lexicographic,
        )
        .unwrap();
        assert_eq!(m.version, "1.0");
        assert_eq!(m.encoder_path, root.path().join("1.0/ffmpeg"));
        assert_eq!(m.prober_path, root.path().join("1.0/ffprobe"));
        assert_eq!(m.directory, root.path().join("1.0"));
    }

    #[test]
    fn first_in_name_order_wins() {
        let root = tempdir().unwrap();
        for v in ["2.0", "10.0", "1.0"] {
            touch(&root.path().join(v).join("ffmpeg"));
            touch(&root.path().join(v).join("ffprobe"));
        }

        let m = find_existing_version(
            &StdFileSystem,
            root.path(),
            "ffmpeg",
            "ffprobe",
            FallbackOrder::Lexicographic,
        )
        .unwrap();
        assert_eq!(m.version, "1.0");

        let m = find_existing_version(
            &StdFileSystem,
            root.path(),
            "ffmpeg",
            "ffprobe",
            FallbackOrder::NewestFirst,
        )
        .unwrap();
        assert_eq!(m.version, "10.0");
    }

    #[test]
    fn version_label_comes_from_prober_directory() {
        let root = tempdir().unwrap();
        touch(&root.path().join("6.1/bin/ffmpeg"));
        touch(&root.path().join("6.1/bin/ffprobe"));

        let m = find_existing_version(
            &StdFileSystem,
            root.path(),
            "ffmpeg",
            "ffprobe",
            FallbackOrder::Lexicographic,
        )
        .unwrap();
        assert_eq!(m.version, "bin");
        assert_eq!(m.directory, root.path().join("6.1"));
        assert_eq!(m.prober_path, root.path().join("6.1/bin/ffprobe"));
    }

    #[test]
    fn matches_case_insensitively() {
        let root = tempdir().unwrap();
        touch(&root.path().join("5.0/FFMPEG.EXE"));
        touch(&root.path().join("5.0/FFProbe.exe"));

        let m = find_existing_version(
            &StdFileSystem,
            root.path(),
            "ffmpeg.exe",
            "ffprobe.exe",
            FallbackOrder::Lexicographic,
        )
        .unwrap();
        assert_eq!(m.version, "5.0");
        assert_eq!(m.encoder_path, root.path().join("5.0/FFMPEG.EXE"));
    }

    #[test]
    fn filename_match_is_not_a_path_match() {
        let root = tempdir().unwrap();
        touch(&root.path().join("1.0/ffmpeg/readme"));
        touch(&root.path().join("1.0/ffprobe-static"));

        assert!(find_existing_version(
            &StdFileSystem,
            root.path(),
            "ffmpeg",
            "ffprobe",
            FallbackOrder::Lexicographic,
        )
        .is_none());
    }

    #[test]
    fn files_directly_in_root_are_ignored() {
        let root = tempdir().unwrap();
        touch(&root.path().join("ffmpeg"));
        touch(&root.path().join("ffprobe"));

        assert!(find_existing_version(
            &StdFileSystem,
            root.path(),
            "ffmpeg",
            "ffprobe",
            FallbackOrder::Lexicographic,
        )
        .is_none());
    }

    #[test]
    fn missing_root_is_empty() {
        let root = tempdir().unwrap();
        assert!(find_existing_version(
            &StdFileSystem,
            &root.path().join("absent"),
            "ffmpeg",
            "ffprobe",
            FallbackOrder::NewestFirst,
        )
        .is_none());
    }

    #[test]
    fn version_key_parsing() {
        assert_eq!(version_key(OsStr::new("7.1")), Some(vec![7, 1]));
        assert_eq!(version_key(OsStr::new("7.1-rc2")), Some(vec![7, 1]));
        assert_eq!(version_key(OsStr::new("20240101")), Some(vec![20240101]));
        assert_eq!(version_key(OsStr::new("n6.1")), None);
        assert_eq!(version_key(OsStr::new("latest")), None);
    }

    #[test]
    fn newest_first_puts_unversioned_last() {
        let mut dirs = vec![
            PathBuf::from("/r/latest"),
            PathBuf::from("/r/4.4"),
            PathBuf::from("/r/6.0"),
            PathBuf::from("/r/6.0.1"),
        ];
        sort_candidates(&mut dirs, FallbackOrder::NewestFirst);
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/r/6.0.1"),
                PathBuf::from("/r/6.0"),
                PathBuf::from("/r/4.4"),
                PathBuf::from("/r/latest"),
            ]
        );
    }
}
