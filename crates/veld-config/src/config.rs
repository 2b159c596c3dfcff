//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use veld_terrain::{BuildParams, BuildSettings, SettingsError};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain generation parameters.
    pub generation: GenerationConfig,
    /// World layout settings.
    pub world: WorldConfig,
    /// Viewport settings for the terminal viewer.
    pub viewer: ViewerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain generation parameters.
///
/// Mirrors [`BuildParams`]; values are validated when converted via
/// [`GenerationConfig::to_build_settings`], not at parse time, so a config
/// file with out-of-range values still loads and reports a precise error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed for the coherent-noise source.
    pub seed: u32,
    /// Number of noise octaves (at least 1).
    pub octaves: u32,
    /// Spatial scale divisor; larger values smooth the terrain.
    pub frequency: f64,
    /// Height scale applied to raw noise.
    pub amplitude: f64,
    /// Ocean cutoff as a fraction of world height, in [0, 1].
    pub ocean_threshold: f64,
    /// River band half-width as a fraction of world height, in [0, 1].
    pub river_threshold: f64,
    /// Mountain cutoff as a fraction of world height, in [0, 1].
    pub mountain_threshold: f64,
    /// Vertical extent of the world in height units.
    pub world_height: f64,
}

/// World layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk edge length in blocks (at least 1).
    pub chunk_size: u32,
}

/// Viewport settings for the terminal viewer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Viewport width in blocks.
    pub width: u32,
    /// Viewport height in blocks.
    pub height: u32,
    /// World X coordinate at the viewport center.
    pub center_x: i32,
    /// World Z coordinate at the viewport center.
    pub center_z: i32,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for GenerationConfig {
    fn default() -> Self {
        let reference = BuildParams::default();
        Self {
            seed: reference.seed,
            octaves: reference.octaves,
            frequency: reference.frequency,
            amplitude: reference.amplitude,
            ocean_threshold: reference.ocean_threshold,
            river_threshold: reference.river_threshold,
            mountain_threshold: reference.mountain_threshold,
            world_height: reference.world_height,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { chunk_size: 16 }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
            center_x: 0,
            center_z: 0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Validate these parameters into [`BuildSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] for any field the validating constructor
    /// rejects; the config itself is left untouched.
    pub fn to_build_settings(&self) -> Result<BuildSettings, SettingsError> {
        BuildSettings::new(BuildParams {
            seed: self.seed,
            octaves: self.octaves,
            frequency: self.frequency,
            amplitude: self.amplitude,
            ocean_threshold: self.ocean_threshold,
            river_threshold: self.river_threshold,
            mountain_threshold: self.mountain_threshold,
            world_height: self.world_height,
        })
    }
}

/// Default per-user configuration directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("veld")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
