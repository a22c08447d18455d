mod cli;

use encforge::{
    config,
    toolchain::{self, StartupOptions},
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "encforge=trace,encforge_av=trace,encforge_common=debug".to_string()
        } else {
            "encforge=info,encforge_av=warn".to_string()
        }
    });

    // stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let options = StartupOptions {
        ffmpeg_path: cli.ffmpeg_path.clone(),
        ffprobe_path: cli.ffprobe_path.clone(),
    };

    match cli.command {
        Commands::Resolve { json } => resolve(cli.config.as_deref(), options, json),
        Commands::Stale { prune } => stale(cli.config.as_deref(), options, prune),
        Commands::Init { path } => init(&path),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("encforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn resolve(config_path: Option<&Path>, options: StartupOptions, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let (resolver, request) = toolchain::prepare(&config, options)?;
    let resolution = resolver.resolve_detailed(&request);

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    let toolchain = &resolution.toolchain;
    println!("Source: {}", resolution.source);
    if toolchain.is_empty() {
        println!("No usable toolchain");
    } else if let Some(ref version) = toolchain.version {
        println!("Version: {}", version);
    }
    if let Some(ref encoder) = toolchain.encoder_path {
        println!("Encoder: {}", encoder.display());
    }
    if let Some(ref prober) = toolchain.prober_path {
        println!("Prober: {}", prober.display());
    }

    Ok(())
}

fn stale(config_path: Option<&Path>, options: StartupOptions, prune: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let (resolver, request) = toolchain::prepare(&config, options)?;
    let resolution = resolver.resolve_detailed(&request);

    if !resolution.uses_managed_install() {
        println!(
            "Toolchain source is {}; no versioned install is in use",
            resolution.source
        );
        return Ok(());
    }

    let dirs = resolver.prune_stale_versions(&resolution, &request.versioned_root, !prune)?;
    if dirs.is_empty() {
        println!("No stale version directories");
        return Ok(());
    }

    let verb = if prune { "Removed" } else { "Stale" };
    for dir in &dirs {
        println!("{}: {}", verb, dir.display());
    }
    if !prune {
        println!("\nRun with --prune to delete them.");
    }

    Ok(())
}

fn init(path: &Path) -> Result<()> {
    let written = config::write_default_config(path)?;
    println!("Wrote default config to {}", written.display());
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Encoder filename: {}", config.toolchain.encoder_filename);
            println!("  Prober filename: {}", config.toolchain.prober_filename);
            println!("  Version: {}", config.toolchain.version);
            println!("  Data path: {:?}", config.paths.program_data_path);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Version: {}", config.toolchain.version);
        }
    }

    Ok(())
}
