//! Encoder/prober toolchain resolution.
//!
//! [`ToolchainResolver`] decides which pair of executables the media
//! pipeline should call. Tiers are tried in order and the first one that
//! yields both files wins:
//!
//! 1. explicit overrides for both paths
//! 2. a prebuilt pair next to the program
//! 3. the targeted version directory under the versioned root
//! 4. any other version directory holding both files
//!
//! A single override is then patched over whatever was found. Resolution
//! never fails: "nothing usable" is an empty [`ResolvedToolchain`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use encforge_common::paths::is_blank;
use encforge_common::{AppPaths, ToolchainDescriptor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::fs::{FileSystem, StdFileSystem};
use crate::scan::{self, FallbackOrder};
use crate::{Error, Result};

/// Inputs for a single resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Explicit encoder path from startup options.
    pub encoder_override: Option<PathBuf>,
    /// Explicit prober path from startup options.
    pub prober_override: Option<PathBuf>,
    /// Directory checked for a prebuilt pair.
    pub prebuilt_root: PathBuf,
    /// Directory whose children are version directories.
    pub versioned_root: PathBuf,
}

impl ResolutionRequest {
    pub fn new(prebuilt_root: impl Into<PathBuf>, versioned_root: impl Into<PathBuf>) -> Self {
        Self {
            encoder_override: None,
            prober_override: None,
            prebuilt_root: prebuilt_root.into(),
            versioned_root: versioned_root.into(),
        }
    }

    /// Build a request from the application path layout.
    pub fn from_paths(paths: &AppPaths) -> Self {
        Self::new(paths.prebuilt_root(), paths.versioned_root())
    }

    #[must_use]
    pub fn with_encoder_override(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.encoder_override = path.map(Into::into);
        self
    }

    #[must_use]
    pub fn with_prober_override(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.prober_override = path.map(Into::into);
        self
    }

    /// The encoder override, unless absent or blank.
    pub fn encoder_override(&self) -> Option<&Path> {
        self.encoder_override.as_deref().filter(|p| !is_blank(p))
    }

    /// The prober override, unless absent or blank.
    pub fn prober_override(&self) -> Option<&Path> {
        self.prober_override.as_deref().filter(|p| !is_blank(p))
    }
}

/// Outcome of a resolution: the paths to invoke and where they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedToolchain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoder_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prober_path: Option<PathBuf>,
    /// Version directory name, or [`Self::EXTERNAL_VERSION`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ResolvedToolchain {
    /// Version label for paths whose version is not tracked.
    pub const EXTERNAL_VERSION: &'static str = "external";

    /// The "no usable toolchain" value.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(encoder: impl Into<PathBuf>, prober: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            encoder_path: Some(encoder.into()),
            prober_path: Some(prober.into()),
            version: Some(version.into()),
        }
    }

    pub fn external(encoder: impl Into<PathBuf>, prober: impl Into<PathBuf>) -> Self {
        Self::new(encoder, prober, Self::EXTERNAL_VERSION)
    }

    /// True unless both paths are set.
    pub fn is_empty(&self) -> bool {
        self.encoder_path.is_none() || self.prober_path.is_none()
    }

    pub fn is_external(&self) -> bool {
        self.version.as_deref() == Some(Self::EXTERNAL_VERSION)
    }

    /// Replace each path for which a non-blank override exists.
    fn apply_overrides(&mut self, request: &ResolutionRequest) {
        if let Some(encoder) = request.encoder_override() {
            self.encoder_path = Some(encoder.to_path_buf());
        }
        if let Some(prober) = request.prober_override() {
            self.prober_path = Some(prober.to_path_buf());
        }
    }
}

/// Which step produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolchainSource {
    /// Both paths were supplied explicitly.
    Override,
    /// Found in the prebuilt location.
    Prebuilt,
    /// Found in the targeted version directory.
    Versioned,
    /// Adopted from another version directory.
    Fallback,
    /// The descriptor disables the managed toolchain.
    Disabled,
    /// Nothing usable was found.
    NotFound,
}

impl ToolchainSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Prebuilt => "prebuilt",
            Self::Versioned => "versioned",
            Self::Fallback => "fallback",
            Self::Disabled => "disabled",
            Self::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for ToolchainSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved toolchain together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub toolchain: ResolvedToolchain,
    pub source: ToolchainSource,
    /// Version directories that must survive a cleanup: the targeted
    /// directory and, for a fallback, the directory it was adopted from.
    pub retained_dirs: Vec<PathBuf>,
}

impl Resolution {
    fn new(toolchain: ResolvedToolchain, source: ToolchainSource) -> Self {
        Self {
            toolchain,
            source,
            retained_dirs: Vec::new(),
        }
    }

    /// Whether the versioned root holds the toolchain in use, which is the
    /// only case where other version directories may be considered stale.
    pub fn uses_managed_install(&self) -> bool {
        matches!(self.source, ToolchainSource::Versioned | ToolchainSource::Fallback)
    }
}

/// Resolves encoder and prober paths for a [`ToolchainDescriptor`].
#[derive(Clone)]
pub struct ToolchainResolver {
    descriptor: ToolchainDescriptor,
    fs: Arc<dyn FileSystem>,
    fallback_order: FallbackOrder,
}

impl std::fmt::Debug for ToolchainResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolchainResolver")
            .field("descriptor", &self.descriptor)
            .field("fallback_order", &self.fallback_order)
            .finish_non_exhaustive()
    }
}

impl ToolchainResolver {
    /// Resolver operating on the real filesystem.
    pub fn new(descriptor: ToolchainDescriptor) -> Self {
        Self::with_fs(descriptor, Arc::new(StdFileSystem))
    }

    /// Like [`Self::new`], rejecting descriptors whose filenames are blank
    /// or contain path separators, or whose version is not a single
    /// directory name.
    pub fn try_new(descriptor: ToolchainDescriptor) -> Result<Self> {
        descriptor.validate()?;
        Ok(Self::new(descriptor))
    }

    pub fn with_fs(descriptor: ToolchainDescriptor, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            descriptor,
            fs,
            fallback_order: FallbackOrder::default(),
        }
    }

    #[must_use]
    pub fn with_fallback_order(mut self, order: FallbackOrder) -> Self {
        self.fallback_order = order;
        self
    }

    pub fn descriptor(&self) -> &ToolchainDescriptor {
        &self.descriptor
    }

    /// Resolve the toolchain to use.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use encforge_av::{ResolutionRequest, ToolchainResolver};
    /// use encforge_common::{AppPaths, ToolchainDescriptor};
    ///
    /// let paths = AppPaths::new("/opt/encforge", "/var/lib/encforge");
    /// let resolver = ToolchainResolver::new(ToolchainDescriptor::platform_default("7.1"));
    /// let toolchain = resolver.resolve(&ResolutionRequest::from_paths(&paths));
    /// if toolchain.is_empty() {
    ///     println!("transcoding disabled: no toolchain");
    /// }
    /// ```
    pub fn resolve(&self, request: &ResolutionRequest) -> ResolvedToolchain {
        self.resolve_detailed(request).toolchain
    }

    /// Resolve the toolchain and report which step decided.
    pub fn resolve_detailed(&self, request: &ResolutionRequest) -> Resolution {
        let mut resolution = self.locate(request);
        resolution.toolchain.apply_overrides(request);

        if resolution.toolchain.is_empty() {
            info!("No usable toolchain ({})", resolution.source);
        } else {
            info!(
                "Using toolchain {} from {}: encoder={:?} prober={:?}",
                resolution.toolchain.version.as_deref().unwrap_or("?"),
                resolution.source,
                resolution.toolchain.encoder_path,
                resolution.toolchain.prober_path,
            );
        }

        resolution
    }

    fn locate(&self, request: &ResolutionRequest) -> Resolution {
        if let (Some(encoder), Some(prober)) = (request.encoder_override(), request.prober_override()) {
            debug!("Both toolchain paths overridden");
            return Resolution::new(
                ResolvedToolchain::external(encoder, prober),
                ToolchainSource::Override,
            );
        }

        if let Some(toolchain) = self.check_prebuilt(&request.prebuilt_root) {
            return Resolution::new(toolchain, ToolchainSource::Prebuilt);
        }

        if self.descriptor.is_disabled() {
            debug!("Managed toolchain disabled by descriptor");
            return Resolution::new(ResolvedToolchain::empty(), ToolchainSource::Disabled);
        }

        let mut retained_dirs = Vec::new();

        if let Some(version) = self.descriptor.version_dir_name() {
            let target_dir = request.versioned_root.join(version);
            let found = self.check_versioned(&target_dir);
            retained_dirs.push(target_dir);

            if let Some(toolchain) = found {
                return Resolution {
                    toolchain,
                    source: ToolchainSource::Versioned,
                    retained_dirs,
                };
            }
        } else {
            warn!(
                "Toolchain version {:?} is not a single directory name; skipping versioned install check",
                self.descriptor.version
            );
        }

        match scan::find_existing_version(
            self.fs.as_ref(),
            &request.versioned_root,
            &self.descriptor.encoder_filename,
            &self.descriptor.prober_filename,
            self.fallback_order,
        ) {
            Some(found) => {
                info!(
                    "Version {} not installed; falling back to {:?}",
                    self.descriptor.version, found.directory
                );
                retained_dirs.push(found.directory);
                Resolution {
                    toolchain: ResolvedToolchain::new(found.encoder_path, found.prober_path, found.version),
                    source: ToolchainSource::Fallback,
                    retained_dirs,
                }
            }
            None => Resolution {
                toolchain: ResolvedToolchain::empty(),
                source: ToolchainSource::NotFound,
                retained_dirs,
            },
        }
    }

    fn check_prebuilt(&self, root: &Path) -> Option<ResolvedToolchain> {
        let encoder = root.join(&self.descriptor.encoder_filename);
        let prober = root.join(&self.descriptor.prober_filename);

        if self.fs.file_exists(&encoder) && self.fs.file_exists(&prober) {
            debug!("Prebuilt toolchain present in {:?}", root);
            Some(ResolvedToolchain::external(encoder, prober))
        } else {
            None
        }
    }

    /// Check `target_dir` for both files.
    ///
    /// The directory is created first, whether or not the files turn out to
    /// be there, so an external installer has a place to drop them.
    fn check_versioned(&self, target_dir: &Path) -> Option<ResolvedToolchain> {
        if let Err(e) = self.fs.create_dir_all(target_dir) {
            warn!("Could not create version directory {:?}: {}", target_dir, e);
        }

        let encoder = target_dir.join(&self.descriptor.encoder_filename);
        let prober = target_dir.join(&self.descriptor.prober_filename);

        if self.fs.file_exists(&encoder) && self.fs.file_exists(&prober) {
            Some(ResolvedToolchain::new(encoder, prober, self.descriptor.version.clone()))
        } else {
            debug!("Version {} not present in {:?}", self.descriptor.version, target_dir);
            None
        }
    }

    /// Version directories under `versioned_root` not retained by `resolution`.
    ///
    /// Empty unless the resolution uses a managed install; otherwise every
    /// version directory would look stale.
    pub fn stale_versions(&self, resolution: &Resolution, versioned_root: &Path) -> Vec<PathBuf> {
        if !resolution.uses_managed_install() {
            return Vec::new();
        }

        match self.fs.subdirectories(versioned_root) {
            Ok(dirs) => dirs
                .into_iter()
                .filter(|dir| !resolution.retained_dirs.contains(dir))
                .collect(),
            Err(e) => {
                debug!("Versioned root {:?} not readable: {}", versioned_root, e);
                Vec::new()
            }
        }
    }

    /// Remove stale version directories, or only list them when `dry_run`.
    pub fn prune_stale_versions(
        &self,
        resolution: &Resolution,
        versioned_root: &Path,
        dry_run: bool,
    ) -> Result<Vec<PathBuf>> {
        let stale = self.stale_versions(resolution, versioned_root);

        for dir in &stale {
            if dir.parent() != Some(versioned_root) {
                return Err(Error::outside_root(dir, versioned_root));
            }
            if dry_run {
                info!("Would remove stale version directory {:?}", dir);
                continue;
            }
            info!("Removing stale version directory {:?}", dir);
            self.fs
                .remove_dir_all(dir)
                .map_err(|e| Error::remove_failed(dir, e))?;
        }

        Ok(stale)
    }
}
