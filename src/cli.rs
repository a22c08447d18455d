use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "encforge")]
#[command(author, version, about = "Locate the ffmpeg/ffprobe toolchain for a media pipeline")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this encoder executable regardless of what is installed
    #[arg(long, global = true)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Use this prober executable regardless of what is installed
    #[arg(long, global = true)]
    pub ffprobe_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the encoder and prober paths
    Resolve {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List installed versions no longer in use
    Stale {
        /// Delete the listed directories
        #[arg(long)]
        prune: bool,
    },

    /// Write a default configuration file
    Init {
        /// Where to write the file
        #[arg(default_value = "encforge.toml")]
        path: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
