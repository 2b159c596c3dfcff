//! Validated generation parameters shared by every chunk of a world.
//!
//! All knobs the generation algorithm reads live here as explicit fields;
//! there are no module-level constants to tune behind the caller's back.
//! Construction goes through [`BuildSettings::new`], which rejects invalid
//! values instead of clamping them, so a miswired caller fails immediately.

/// Unvalidated input for [`BuildSettings::new`].
///
/// Plain data with public fields so callers (config files, tests, CLIs) can
/// assemble parameters piecemeal. `Default` yields the standard parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildParams {
    /// Seed for the coherent-noise source.
    pub seed: u32,
    /// Number of noise octaves to composite. Must be at least 1.
    pub octaves: u32,
    /// Spatial scale divisor applied to world coordinates before sampling.
    /// Larger values produce smoother terrain. Must be finite and positive.
    pub frequency: f64,
    /// Scale applied to the raw noise value when computing height.
    /// Must be finite and positive.
    pub amplitude: f64,
    /// Fraction of `world_height` below which a cell is ocean. In `[0, 1]`.
    pub ocean_threshold: f64,
    /// Half-width of the river band around mid-height, as a fraction of
    /// `world_height`. In `[0, 1]`.
    pub river_threshold: f64,
    /// Fraction of `world_height` above which a cell is mountain. In `[0, 1]`.
    pub mountain_threshold: f64,
    /// Vertical extent of the world in height units. Must be finite and positive.
    pub world_height: f64,
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            frequency: 24.0,
            amplitude: 28.0,
            ocean_threshold: 0.5,
            river_threshold: 0.05,
            mountain_threshold: 0.7,
            world_height: 64.0,
        }
    }
}

/// Errors produced when validating [`BuildParams`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// `octaves` was zero.
    #[error("octaves must be at least 1, got {0}")]
    InvalidOctaves(u32),

    /// A field that must be finite and strictly positive was not.
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A threshold fell outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
}

/// Immutable, validated generation parameters.
///
/// A `BuildSettings` value always holds parameters that passed validation;
/// fields are read through accessors and never mutated after construction.
/// One value is shared by every chunk generated within a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildSettings {
    seed: u32,
    octaves: u32,
    frequency: f64,
    amplitude: f64,
    ocean_threshold: f64,
    river_threshold: f64,
    mountain_threshold: f64,
    world_height: f64,
}

fn check_positive(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SettingsError::NonPositive { name, value });
    }
    Ok(())
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SettingsError::ThresholdOutOfRange { name, value });
    }
    Ok(())
}

impl BuildSettings {
    /// Validates `params` and constructs the settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if `octaves` is zero, `frequency`,
    /// `amplitude`, or `world_height` is not finite and positive, or any
    /// threshold lies outside `[0, 1]`. Values are never clamped.
    pub fn new(params: BuildParams) -> Result<Self, SettingsError> {
        if params.octaves < 1 {
            return Err(SettingsError::InvalidOctaves(params.octaves));
        }
        check_positive("frequency", params.frequency)?;
        check_positive("amplitude", params.amplitude)?;
        check_positive("world_height", params.world_height)?;
        check_threshold("ocean_threshold", params.ocean_threshold)?;
        check_threshold("river_threshold", params.river_threshold)?;
        check_threshold("mountain_threshold", params.mountain_threshold)?;

        Ok(Self {
            seed: params.seed,
            octaves: params.octaves,
            frequency: params.frequency,
            amplitude: params.amplitude,
            ocean_threshold: params.ocean_threshold,
            river_threshold: params.river_threshold,
            mountain_threshold: params.mountain_threshold,
            world_height: params.world_height,
        })
    }

    /// Seed for the coherent-noise source.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Number of noise octaves.
    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Spatial scale divisor for noise sampling.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Height scale applied to the raw noise value.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Ocean cutoff as a fraction of `world_height`.
    pub fn ocean_threshold(&self) -> f64 {
        self.ocean_threshold
    }

    /// River band half-width as a fraction of `world_height`.
    pub fn river_threshold(&self) -> f64 {
        self.river_threshold
    }

    /// Mountain cutoff as a fraction of `world_height`.
    pub fn mountain_threshold(&self) -> f64 {
        self.mountain_threshold
    }

    /// Vertical extent of the world in height units.
    pub fn world_height(&self) -> f64 {
        self.world_height
    }

    /// The mid-height baseline (`world_height / 2`) that raw noise is
    /// offset around, and that the river band is centered on.
    pub fn mid_height(&self) -> f64 {
        self.world_height * 0.5
    }
}

impl Default for BuildSettings {
    /// The standard parameters. Statically valid, so no validation runs.
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            frequency: 24.0,
            amplitude: 28.0,
            ocean_threshold: 0.5,
            river_threshold: 0.05,
            mountain_threshold: 0.7,
            world_height: 64.0,
        }
    }
}
