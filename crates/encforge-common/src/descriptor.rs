//! Static description of the toolchain an installation expects.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

use crate::{Error, Result};

#[cfg(windows)]
const DEFAULT_ENCODER: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const DEFAULT_ENCODER: &str = "ffmpeg";

#[cfg(windows)]
const DEFAULT_PROBER: &str = "ffprobe.exe";
#[cfg(not(windows))]
const DEFAULT_PROBER: &str = "ffprobe";

/// Expected executable filenames and the targeted toolchain version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainDescriptor {
    /// Filename of the encoder executable (e.g. `ffmpeg`).
    pub encoder_filename: String,
    /// Filename of the prober executable (e.g. `ffprobe`).
    pub prober_filename: String,
    /// Targeted version directory name, or [`Self::DISABLED_VERSION`].
    pub version: String,
}

impl ToolchainDescriptor {
    /// Version value meaning "no managed toolchain".
    pub const DISABLED_VERSION: &'static str = "0";

    pub fn new(
        encoder_filename: impl Into<String>,
        prober_filename: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            encoder_filename: encoder_filename.into(),
            prober_filename: prober_filename.into(),
            version: version.into(),
        }
    }

    /// Descriptor using the platform's usual ffmpeg/ffprobe filenames.
    pub fn platform_default(version: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENCODER, DEFAULT_PROBER, version)
    }

    /// Whether the managed toolchain is switched off.
    pub fn is_disabled(&self) -> bool {
        self.version == Self::DISABLED_VERSION
    }

    /// The version as a single directory name, if it is one.
    ///
    /// `None` for blank versions and for anything that is not exactly one
    /// plain path component (`.`, `..`, separators, roots, drive prefixes),
    /// so joining it onto the versioned root always names a direct child.
    ///
    /// # Examples
    ///
    /// ```
    /// use encforge_common::ToolchainDescriptor;
    ///
    /// assert_eq!(ToolchainDescriptor::platform_default("7.1").version_dir_name(), Some("7.1"));
    /// assert_eq!(ToolchainDescriptor::platform_default("..").version_dir_name(), None);
    /// assert_eq!(ToolchainDescriptor::platform_default("a/b").version_dir_name(), None);
    /// ```
    pub fn version_dir_name(&self) -> Option<&str> {
        let version = self.version.as_str();
        if version.trim().is_empty() || version.contains('/') || version.contains('\\') {
            return None;
        }
        let mut components = Path::new(version).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == version => Some(version),
            _ => None,
        }
    }

    /// Check that both filenames are bare, non-blank file names and that the
    /// version names a single directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use encforge_common::ToolchainDescriptor;
    ///
    /// assert!(ToolchainDescriptor::new("ffmpeg", "ffprobe", "7.1").validate().is_ok());
    /// assert!(ToolchainDescriptor::new("bin/ffmpeg", "ffprobe", "7.1").validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        check_filename("encoder", &self.encoder_filename)?;
        check_filename("prober", &self.prober_filename)?;
        if self.version_dir_name().is_none() {
            return Err(Error::invalid_input(format!(
                "version '{}' must be a single directory name",
                self.version
            )));
        }
        Ok(())
    }
}

impl Default for ToolchainDescriptor {
    fn default() -> Self {
        Self::platform_default(Self::DISABLED_VERSION)
    }
}

fn check_filename(role: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_input(format!("{role} filename is blank")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(Error::invalid_input(format!(
            "{role} filename '{name}' must not contain a path separator"
        )));
    }
    Ok(())
}
