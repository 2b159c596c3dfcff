//! Command-line argument parsing for the veld viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Veld terrain viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "veld", about = "Veld procedural terrain viewer", allow_negative_numbers = true)]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Number of noise octaves.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Chunk edge length in blocks.
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Viewport width in blocks.
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in blocks.
    #[arg(long)]
    pub height: Option<u32>,

    /// World X coordinate at the viewport center.
    #[arg(long)]
    pub center_x: Option<i32>,

    /// World Z coordinate at the viewport center.
    #[arg(long)]
    pub center_z: Option<i32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.generation.seed = seed;
        }
        if let Some(octaves) = args.octaves {
            self.generation.octaves = octaves;
        }
        if let Some(size) = args.chunk_size {
            self.world.chunk_size = size;
        }
        if let Some(w) = args.width {
            self.viewer.width = w;
        }
        if let Some(h) = args.height {
            self.viewer.height = h;
        }
        if let Some(cx) = args.center_x {
            self.viewer.center_x = cx;
        }
        if let Some(cz) = args.center_z {
            self.viewer.center_z = cz;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
