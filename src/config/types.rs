use encforge_av::FallbackOrder;
use encforge_common::{AppPaths, ToolchainDescriptor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// Explicit executable paths. Each one wins over anything discovered.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffprobe_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Where a prebuilt toolchain is looked for (default: the executable's directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_system_path: Option<PathBuf>,

    /// Application data directory; versioned installs live in `<this>/ffmpeg`
    #[serde(default = "default_data_path")]
    pub program_data_path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("~/.local/share/encforge")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            program_system_path: None,
            program_data_path: default_data_path(),
        }
    }
}

impl PathsConfig {
    /// Expand `~` and fill in the system path.
    pub fn app_paths(&self) -> AppPaths {
        let data = expand(&self.program_data_path);
        match &self.program_system_path {
            Some(system) => AppPaths::new(expand(system), data),
            None => AppPaths::from_data_dir(data),
        }
    }
}

fn expand(path: &std::path::Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolchainConfig {
    #[serde(default = "default_encoder_filename")]
    pub encoder_filename: String,

    #[serde(default = "default_prober_filename")]
    pub prober_filename: String,

    /// Targeted version directory name; "0" disables the managed toolchain
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub fallback_order: FallbackOrder,
}

fn default_encoder_filename() -> String {
    ToolchainDescriptor::platform_default(default_version()).encoder_filename
}
fn default_prober_filename() -> String {
    ToolchainDescriptor::platform_default(default_version()).prober_filename
}
fn default_version() -> String {
    ToolchainDescriptor::DISABLED_VERSION.to_string()
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            encoder_filename: default_encoder_filename(),
            prober_filename: default_prober_filename(),
            version: default_version(),
            fallback_order: FallbackOrder::default(),
        }
    }
}

impl ToolchainConfig {
    pub fn descriptor(&self) -> ToolchainDescriptor {
        ToolchainDescriptor::new(&self.encoder_filename, &self.prober_filename, &self.version)
    }
}
