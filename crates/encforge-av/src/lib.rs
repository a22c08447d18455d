//! # encforge-av
//!
//! Locates the external encoder/prober pair a media pipeline delegates to.
//!
//! This crate provides functionality for:
//! - Honouring explicit path overrides
//! - Detecting a prebuilt toolchain shipped with the program
//! - Checking the versioned install directory for the targeted version
//! - Falling back to any other installed version
//! - Reporting and pruning version directories no longer in use
//!
//! ## Example
//!
//! ```no_run
//! use encforge_av::{ResolutionRequest, ToolchainResolver};
//! use encforge_common::{AppPaths, ToolchainDescriptor};
//!
//! let paths = AppPaths::new("/opt/encforge", "/var/lib/encforge");
//! let request = ResolutionRequest::from_paths(&paths)
//!     .with_encoder_override(Some("/usr/local/bin/ffmpeg"));
//!
//! let resolver = ToolchainResolver::new(ToolchainDescriptor::platform_default("7.1"));
//! let toolchain = resolver.resolve(&request);
//! println!("{:?}", toolchain.encoder_path);
//! ```

mod error;
pub mod fs;
pub mod scan;
pub mod tools;

// Re-exports
pub use error::{Error, Result};
pub use fs::{FileSystem, StdFileSystem};
pub use scan::{FallbackMatch, FallbackOrder};
pub use tools::{Resolution, ResolutionRequest, ResolvedToolchain, ToolchainResolver, ToolchainSource};
