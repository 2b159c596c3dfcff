//! Multi-octave fractal Brownian motion (fBm) over 2D Perlin noise.
//!
//! Composites several octaves of Perlin noise into a single smoothly-varying
//! field, normalized so every sample lands in `[-1, 1]`. This is the sole
//! noise collaborator of the generation algorithm.

use noise::{NoiseFn, Perlin};

/// Frequency multiplier between successive octaves.
const LACUNARITY: f64 = 2.0;

/// Amplitude multiplier between successive octaves.
const PERSISTENCE: f64 = 0.5;

/// A deterministic 2D coherent-noise field.
///
/// For a fixed `(seed, octaves)` pair the field is a pure function of its
/// input coordinates: the same sample point always yields the same value,
/// across threads and across process restarts.
pub struct NoiseField {
    noise: Perlin,
    octaves: u32,
}

impl NoiseField {
    /// Create a field from a seed and octave count.
    ///
    /// # Panics
    ///
    /// Panics if `octaves` is zero. Validated [`BuildSettings`] can never
    /// carry a zero octave count, so hitting this is a wiring bug.
    ///
    /// [`BuildSettings`]: crate::BuildSettings
    pub fn new(seed: u32, octaves: u32) -> Self {
        assert!(octaves >= 1, "noise field requires at least one octave");
        Self {
            noise: Perlin::new(seed),
            octaves,
        }
    }

    /// Sample the field at `(x, z)`.
    ///
    /// Each successive octave doubles in frequency and halves in amplitude;
    /// the weighted sum is divided by the total octave amplitude, so the
    /// result is always in `[-1, 1]`.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.noise.get([x * frequency, z * frequency]) * amplitude;
            max_amplitude += amplitude;
            frequency *= LACUNARITY;
            amplitude *= PERSISTENCE;
        }

        total / max_amplitude
    }
}
