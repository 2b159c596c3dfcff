//! Configuration system for the veld terrain viewer.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization. Generation parameters funnel through the
//! validating [`BuildSettings`](veld_terrain::BuildSettings) constructor, so
//! a config file cannot smuggle invalid values past validation.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, GenerationConfig, ViewerConfig, WorldConfig, default_config_dir,
};
pub use error::ConfigError;
