//! Encforge-Common: Shared types and utilities.
//!
//! This crate provides the data shared between the resolver and the CLI:
//!
//! - **Descriptor**: Expected encoder/prober filenames and the targeted version
//! - **Application Paths**: Prebuilt and versioned install locations
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use encforge_common::{AppPaths, ToolchainDescriptor};
//!
//! let descriptor = ToolchainDescriptor::new("ffmpeg", "ffprobe", "7.1");
//! assert!(!descriptor.is_disabled());
//!
//! let paths = AppPaths::new("/opt/encforge/bin", "/var/lib/encforge");
//! assert!(paths.versioned_root().ends_with("ffmpeg"));
//! ```

pub mod descriptor;
pub mod error;
pub mod paths;

pub use descriptor::ToolchainDescriptor;
pub use error::{Error, Result};
pub use paths::AppPaths;
