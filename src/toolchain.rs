//! Wiring between configuration and the resolver.

use encforge_av::{ResolutionRequest, Result, ToolchainResolver};
use std::path::PathBuf;

use crate::config::Config;

/// Paths given on the command line, taking precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
}

impl StartupOptions {
    /// Fill unset options from the `[tools]` section.
    pub fn merged_with(self, config: &Config) -> Self {
        Self {
            ffmpeg_path: self.ffmpeg_path.or_else(|| config.tools.ffmpeg_path.clone()),
            ffprobe_path: self.ffprobe_path.or_else(|| config.tools.ffprobe_path.clone()),
        }
    }
}

/// Build the resolver and request described by `config` and `options`.
pub fn prepare(
    config: &Config,
    options: StartupOptions,
) -> Result<(ToolchainResolver, ResolutionRequest)> {
    let options = options.merged_with(config);
    let paths = config.paths.app_paths();

    let resolver = ToolchainResolver::try_new(config.toolchain.descriptor())?
        .with_fallback_order(config.toolchain.fallback_order);
    let request = ResolutionRequest::from_paths(&paths)
        .with_encoder_override(options.ffmpeg_path)
        .with_prober_override(options.ffprobe_path);

    Ok((resolver, request))
}
