//! Fixed-size terrain chunks and the generation algorithm.
//!
//! A [`Chunk`] owns a `chunk_size x chunk_size` grid of [`BlockType`] values
//! for one chunk-grid coordinate. [`Chunk::generate`] is the only
//! constructor, so a `Chunk` value is always fully populated; there is no
//! partially generated state to observe.

use std::hash::{Hash, Hasher};

use crate::block::BlockType;
use crate::noise_field::NoiseField;
use crate::settings::BuildSettings;

/// Default chunk edge length in blocks.
pub const DEFAULT_CHUNK_SIZE: u32 = 16;

/// Identifies a chunk's position in the chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate, in chunks.
    pub x: i32,
    /// Z coordinate, in chunks.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk coordinate owning the given world coordinate.
    ///
    /// Uses floor division, so negative world coordinates map to negative
    /// chunk coordinates (`world_x = -1` belongs to chunk `-1`, not `0`).
    pub const fn from_world(world_x: i32, world_z: i32, chunk_size: u32) -> Self {
        Self {
            x: world_x.div_euclid(chunk_size as i32),
            z: world_z.div_euclid(chunk_size as i32),
        }
    }

    /// World X coordinate of this chunk's origin corner.
    pub const fn origin_x(self, chunk_size: u32) -> i32 {
        self.x * chunk_size as i32
    }

    /// World Z coordinate of this chunk's origin corner.
    pub const fn origin_z(self, chunk_size: u32) -> i32 {
        self.z * chunk_size as i32
    }
}

/// Position of a world coordinate within its owning chunk.
///
/// Euclidean remainder: the result is in `[0, chunk_size)` for any integer
/// input, including negatives (`world = -1, chunk_size = 16` yields `15`).
pub const fn local_coord(world: i32, chunk_size: u32) -> u32 {
    world.rem_euclid(chunk_size as i32) as u32
}

/// Errors surfaced by [`Chunk::generate`].
///
/// These indicate environment defects, not transient conditions; callers
/// must not retry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GenerateError {
    /// The noise collaborator produced NaN or infinity. Surfaced instead of
    /// classified, since a non-finite height would corrupt the biome grid
    /// silently.
    #[error(
        "noise sample for world ({world_x}, {world_z}) in chunk ({cx}, {cz}) \
         is not finite: {value}"
    )]
    NonFiniteNoise {
        /// Owning chunk X coordinate.
        cx: i32,
        /// Owning chunk Z coordinate.
        cz: i32,
        /// World X coordinate of the offending sample.
        world_x: i32,
        /// World Z coordinate of the offending sample.
        world_z: i32,
        /// The non-finite value the noise field returned.
        value: f64,
    },
}

/// A generated terrain chunk: an immutable square grid of block types.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    coord: ChunkCoord,
    chunk_size: u32,
    blocks: Box<[BlockType]>,
}

impl Chunk {
    /// Generates the chunk at `coord`.
    ///
    /// Every local position samples the noise field at its world-space
    /// coordinate divided by `settings.frequency()`, offsets the scaled
    /// noise around mid-height, and classifies the resulting height. The
    /// output is a pure function of `(coord, chunk_size, settings)`:
    /// repeated generation produces bit-identical grids.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::NonFiniteNoise`] if any noise sample is NaN
    /// or infinite.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn generate(
        coord: ChunkCoord,
        chunk_size: u32,
        settings: &BuildSettings,
    ) -> Result<Self, GenerateError> {
        assert!(chunk_size >= 1, "chunk_size must be at least 1");

        let noise = NoiseField::new(settings.seed(), settings.octaves());
        let size = chunk_size as usize;
        let mut blocks = Vec::with_capacity(size * size);

        for lx in 0..size {
            for lz in 0..size {
                let world_x = lx as i32 + coord.origin_x(chunk_size);
                let world_z = lz as i32 + coord.origin_z(chunk_size);

                let n = noise.sample(
                    world_x as f64 / settings.frequency(),
                    world_z as f64 / settings.frequency(),
                );
                if !n.is_finite() {
                    return Err(GenerateError::NonFiniteNoise {
                        cx: coord.x,
                        cz: coord.z,
                        world_x,
                        world_z,
                        value: n,
                    });
                }

                let height = n * settings.amplitude() + settings.mid_height();
                blocks.push(BlockType::classify(height, settings));
            }
        }

        Ok(Self {
            coord,
            chunk_size,
            blocks: blocks.into_boxed_slice(),
        })
    }

    /// This chunk's position in the chunk grid.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Edge length of the grid in blocks.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Block type at local coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `lx` or `lz` is outside `[0, chunk_size)`. Out-of-range
    /// local coordinates signal a coordinate-translation bug in the caller;
    /// returning a default here would mask it.
    pub fn block(&self, lx: u32, lz: u32) -> BlockType {
        assert!(
            lx < self.chunk_size && lz < self.chunk_size,
            "local coordinates ({lx}, {lz}) outside chunk of size {}",
            self.chunk_size
        );
        self.blocks[(lx * self.chunk_size + lz) as usize]
    }

    /// Hash of the full grid, for determinism comparisons.
    pub fn grid_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.coord.hash(&mut hasher);
        self.blocks.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{BuildParams, BuildSettings};

    fn settings() -> BuildSettings {
        BuildSettings::new(BuildParams::default()).unwrap()
    }

    #[test]
    fn test_from_world_positive() {
        assert_eq!(ChunkCoord::from_world(0, 0, 16), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(15, 15, 16), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world(16, 16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_world(47, 31, 16), ChunkCoord::new(2, 1));
    }

    #[test]
    fn test_from_world_negative_uses_floor_division() {
        assert_eq!(ChunkCoord::from_world(-1, -1, 16), ChunkCoord::new(-1, -1));
        assert_eq!(
            ChunkCoord::from_world(-16, -16, 16),
            ChunkCoord::new(-1, -1)
        );
        assert_eq!(
            ChunkCoord::from_world(-17, -17, 16),
            ChunkCoord::new(-2, -2)
        );
    }

    #[test]
    fn test_local_coord_always_non_negative() {
        assert_eq!(local_coord(0, 16), 0);
        assert_eq!(local_coord(15, 16), 15);
        assert_eq!(local_coord(16, 16), 0);
        assert_eq!(local_coord(-1, 16), 15);
        assert_eq!(local_coord(-16, 16), 0);
        assert_eq!(local_coord(-17, 16), 15);
    }

    #[test]
    fn test_origin_round_trips_through_local() {
        for world in -100..100 {
            let coord = ChunkCoord::from_world(world, 0, 16);
            let reconstructed = coord.origin_x(16) + local_coord(world, 16) as i32;
            assert_eq!(
                reconstructed, world,
                "origin + local must reconstruct world coordinate {world}"
            );
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let coord = ChunkCoord::new(5, -10);
        let chunk_a = Chunk::generate(coord, 16, &settings()).unwrap();
        let chunk_b = Chunk::generate(coord, 16, &settings()).unwrap();

        assert_eq!(chunk_a.grid_hash(), chunk_b.grid_hash());
        for lx in 0..16 {
            for lz in 0..16 {
                assert_eq!(
                    chunk_a.block(lx, lz),
                    chunk_b.block(lx, lz),
                    "Mismatch at ({lx}, {lz})"
                );
            }
        }
    }

    #[test]
    fn test_generation_deterministic_across_threads() {
        let coord = ChunkCoord::new(3, 7);
        let handle_a = std::thread::spawn(move || {
            Chunk::generate(coord, 16, &settings()).unwrap().grid_hash()
        });
        let handle_b = std::thread::spawn(move || {
            Chunk::generate(coord, 16, &settings()).unwrap().grid_hash()
        });

        assert_eq!(
            handle_a.join().unwrap(),
            handle_b.join().unwrap(),
            "Same chunk generated on different threads must hash identically"
        );
    }

    #[test]
    fn test_different_coords_produce_different_grids() {
        let chunk_a = Chunk::generate(ChunkCoord::new(0, 0), 16, &settings()).unwrap();
        let chunk_b = Chunk::generate(ChunkCoord::new(12, -4), 16, &settings()).unwrap();
        assert_ne!(
            chunk_a.grid_hash(),
            chunk_b.grid_hash(),
            "Distant chunk coordinates should produce different terrain"
        );
    }

    #[test]
    fn test_different_seeds_produce_different_grids() {
        let seeded = BuildSettings::new(BuildParams {
            seed: 9999,
            ..Default::default()
        })
        .unwrap();
        let chunk_a = Chunk::generate(ChunkCoord::new(0, 0), 16, &settings()).unwrap();
        let chunk_b = Chunk::generate(ChunkCoord::new(0, 0), 16, &seeded).unwrap();
        assert_ne!(chunk_a.grid_hash(), chunk_b.grid_hash());
    }

    #[test]
    fn test_cells_match_manual_recomputation() {
        // Spot-check the world-coordinate formula: each cell must classify
        // the height sampled at (lx + cx*size, lz + cz*size) / frequency.
        let settings = settings();
        let coord = ChunkCoord::new(2, -3);
        let chunk = Chunk::generate(coord, 16, &settings).unwrap();
        let noise = NoiseField::new(settings.seed(), settings.octaves());

        for &(lx, lz) in &[(0, 0), (15, 15), (7, 11), (0, 15), (15, 0)] {
            let world_x = lx as i32 + coord.origin_x(16);
            let world_z = lz as i32 + coord.origin_z(16);
            let n = noise.sample(
                world_x as f64 / settings.frequency(),
                world_z as f64 / settings.frequency(),
            );
            let height = n * settings.amplitude() + settings.mid_height();
            assert_eq!(
                chunk.block(lx, lz),
                crate::BlockType::classify(height, &settings),
                "Cell ({lx}, {lz}) disagrees with direct recomputation"
            );
        }
    }

    #[test]
    #[should_panic(expected = "outside chunk")]
    fn test_out_of_range_local_coord_panics() {
        let chunk = Chunk::generate(ChunkCoord::new(0, 0), 16, &settings()).unwrap();
        let _ = chunk.block(16, 0);
    }

    #[test]
    #[should_panic(expected = "chunk_size must be at least 1")]
    fn test_zero_chunk_size_panics() {
        let _ = Chunk::generate(ChunkCoord::new(0, 0), 0, &settings());
    }

    #[test]
    fn test_small_chunk_sizes_supported() {
        let chunk = Chunk::generate(ChunkCoord::new(-1, 1), 1, &settings()).unwrap();
        assert_eq!(chunk.chunk_size(), 1);
        let _ = chunk.block(0, 0);
    }
}
