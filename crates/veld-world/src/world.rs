//! The world: an unbounded, sparse, lazily generated cache of terrain chunks.
//!
//! [`World`] is the single authority for which chunks exist and the sole
//! owner of every chunk it creates. Callers address terrain by world
//! coordinate; the world translates to a chunk lookup, generating the chunk
//! on first reference. Chunks are never evicted, so resident memory grows
//! with the set of coordinates ever touched -- an accepted scaling limit of
//! this design, not an oversight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use veld_terrain::{
    BlockType, BuildSettings, Chunk, ChunkCoord, DEFAULT_CHUNK_SIZE, GenerateError, local_coord,
};

/// A coordinate-indexed cache of lazily generated terrain chunks.
pub struct World {
    settings: BuildSettings,
    chunk_size: u32,
    chunks: DashMap<ChunkCoord, Arc<Chunk>>,
    /// Number of times the generation algorithm has run on behalf of this
    /// world. Lets tests pin down the at-most-once property.
    generated: AtomicU64,
}

impl World {
    /// Creates an empty world with the default chunk size of 16.
    pub fn new(settings: BuildSettings) -> Self {
        Self::with_chunk_size(settings, DEFAULT_CHUNK_SIZE)
    }

    /// Creates an empty world with an explicit chunk size.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(settings: BuildSettings, chunk_size: u32) -> Self {
        assert!(chunk_size >= 1, "chunk_size must be at least 1");
        Self {
            settings,
            chunk_size,
            chunks: DashMap::new(),
            generated: AtomicU64::new(0),
        }
    }

    /// Block type at a world coordinate, generating the owning chunk on
    /// first reference.
    ///
    /// Cost is `O(chunk_size^2)` noise evaluations once per chunk, `O(1)`
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Propagates [`GenerateError`] if generation hits a non-finite noise
    /// sample. Not retried here; the defect is environmental, not transient.
    pub fn get_block(&self, world_x: i32, world_z: i32) -> Result<BlockType, GenerateError> {
        let coord = ChunkCoord::from_world(world_x, world_z, self.chunk_size);
        let chunk = self.chunk(coord)?;
        Ok(chunk.block(
            local_coord(world_x, self.chunk_size),
            local_coord(world_z, self.chunk_size),
        ))
    }

    /// Human-readable label of the block at a world coordinate.
    ///
    /// Convenience wrapper over [`World::get_block`]; pure presentation.
    pub fn get_prettified_block(
        &self,
        world_x: i32,
        world_z: i32,
    ) -> Result<&'static str, GenerateError> {
        Ok(self.get_block(world_x, world_z)?.label())
    }

    /// Fetch the chunk at `coord`, generating it on first reference.
    ///
    /// The vacant-entry path holds the map shard's write lock while the
    /// chunk generates, so concurrent callers of the same coordinate block
    /// until the one in-flight generation completes and then share its
    /// result. A coordinate is never generated twice by this path.
    pub fn chunk(&self, coord: ChunkCoord) -> Result<Arc<Chunk>, GenerateError> {
        if let Some(chunk) = self.chunks.get(&coord) {
            return Ok(Arc::clone(chunk.value()));
        }
        match self.chunks.entry(coord) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let chunk = Arc::new(self.generate(coord)?);
                entry.insert(Arc::clone(&chunk));
                Ok(chunk)
            }
        }
    }

    fn generate(&self, coord: ChunkCoord) -> Result<Chunk, GenerateError> {
        self.generated.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();
        let chunk = Chunk::generate(coord, self.chunk_size, &self.settings)?;
        tracing::debug!(
            cx = coord.x,
            cz = coord.z,
            elapsed_us = started.elapsed().as_micros() as u64,
            "generated chunk"
        );
        Ok(chunk)
    }

    /// Installs a chunk generated elsewhere (a [`ChunkStreamer`] worker).
    ///
    /// If the coordinate is already cached, the existing chunk wins and the
    /// offered one is dropped; the cache never swaps a chunk out from under
    /// readers. Returns the chunk that ended up in the cache.
    ///
    /// [`ChunkStreamer`]: crate::ChunkStreamer
    pub fn insert_generated(&self, chunk: Chunk) -> Arc<Chunk> {
        let offered = Arc::new(chunk);
        match self.chunks.entry(offered.coord()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&offered));
                offered
            }
        }
    }

    /// Whether the chunk at `coord` is already cached.
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of chunks currently cached.
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of generation runs this world has performed itself.
    ///
    /// Chunks installed via [`World::insert_generated`] are not counted;
    /// their generation ran on the streamer's workers.
    pub fn generated_chunk_count(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    /// The shared build settings.
    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Edge length of every chunk in this world.
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veld_terrain::BuildParams;

    fn default_world() -> World {
        World::new(BuildSettings::new(BuildParams::default()).unwrap())
    }

    #[test]
    fn test_get_block_is_deterministic() {
        let world_a = default_world();
        let world_b = default_world();

        for &(x, z) in &[(0, 0), (100, -250), (-1, -1), (31, 17)] {
            let block_first = world_a.get_block(x, z).unwrap();
            let block_again = world_a.get_block(x, z).unwrap();
            let block_fresh = world_b.get_block(x, z).unwrap();
            assert_eq!(block_first, block_again, "repeat query changed at ({x}, {z})");
            assert_eq!(
                block_first, block_fresh,
                "fresh world disagrees at ({x}, {z})"
            );
        }
    }

    #[test]
    fn test_translation_matches_direct_chunk_access() {
        let world = default_world();
        let settings = *world.settings();

        for &(wx, wz) in &[
            (0, 0),
            (15, 15),
            (16, 16),
            (-1, -1),
            (-16, -16),
            (-17, 3),
            (47, -33),
        ] {
            let coord = ChunkCoord::from_world(wx, wz, 16);
            let direct = Chunk::generate(coord, 16, &settings).unwrap();
            let expected = direct.block(local_coord(wx, 16), local_coord(wz, 16));
            assert_eq!(
                world.get_block(wx, wz).unwrap(),
                expected,
                "translation mismatch at world ({wx}, {wz})"
            );
        }
    }

    #[test]
    fn test_negative_world_coord_maps_to_negative_chunk() {
        let world = default_world();
        world.get_block(-1, -1).unwrap();

        assert!(world.is_loaded(ChunkCoord::new(-1, -1)));
        assert!(!world.is_loaded(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_chunks_generate_at_most_once() {
        let world = default_world();

        // Scan the same 2x2-chunk area three times over.
        for _ in 0..3 {
            for x in 0..32 {
                for z in 0..32 {
                    world.get_block(x, z).unwrap();
                }
            }
        }

        assert_eq!(world.loaded_chunk_count(), 4);
        assert_eq!(
            world.generated_chunk_count(),
            4,
            "each of the 4 chunk coordinates must generate exactly once"
        );
    }

    #[test]
    fn test_end_to_end_scan_fully_classifies() {
        let world = default_world();
        let mut counts = [0usize; 4];

        for x in 0..32 {
            for z in 0..32 {
                let block = world.get_block(x, z).unwrap();
                let slot = BlockType::ALL
                    .iter()
                    .position(|&b| b == block)
                    .expect("block must be one of the four variants");
                counts[slot] += 1;
            }
        }

        assert_eq!(
            counts.iter().sum::<usize>(),
            32 * 32,
            "every cell of the 32x32 scan must classify"
        );
        assert_eq!(world.generated_chunk_count(), 4);
        for coord in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert!(world.is_loaded(ChunkCoord::new(coord.0, coord.1)));
        }
    }

    #[test]
    fn test_concurrent_same_coordinate_generates_once() {
        let world = Arc::new(default_world());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let world = Arc::clone(&world);
            handles.push(std::thread::spawn(move || {
                world.get_block(5, 5).unwrap()
            }));
        }

        let mut blocks = Vec::new();
        for handle in handles {
            blocks.push(handle.join().unwrap());
        }

        assert!(blocks.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(
            world.generated_chunk_count(),
            1,
            "8 racing callers must share a single generation"
        );
    }

    #[test]
    fn test_concurrent_distinct_coordinates_all_generate() {
        let world = Arc::new(default_world());
        let mut handles = Vec::new();

        for i in 0..8i32 {
            let world = Arc::clone(&world);
            handles.push(std::thread::spawn(move || {
                world.chunk(ChunkCoord::new(i, -i)).unwrap().coord()
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(world.loaded_chunk_count(), 8);
        assert_eq!(world.generated_chunk_count(), 8);
    }

    #[test]
    fn test_insert_generated_first_wins() {
        let world = default_world();
        let coord = ChunkCoord::new(2, 2);

        let resident = world.chunk(coord).unwrap();
        let offered = Chunk::generate(coord, 16, world.settings()).unwrap();
        let kept = world.insert_generated(offered);

        assert!(Arc::ptr_eq(&resident, &kept), "existing chunk must win");
        assert_eq!(world.loaded_chunk_count(), 1);
    }

    #[test]
    fn test_insert_generated_fills_vacant_slot() {
        let world = default_world();
        let coord = ChunkCoord::new(-3, 9);

        let chunk = Chunk::generate(coord, 16, world.settings()).unwrap();
        let hash = chunk.grid_hash();
        world.insert_generated(chunk);

        assert!(world.is_loaded(coord));
        assert_eq!(world.generated_chunk_count(), 0);
        assert_eq!(world.chunk(coord).unwrap().grid_hash(), hash);
    }

    #[test]
    fn test_prettified_block_matches_label() {
        let world = default_world();
        for &(x, z) in &[(0, 0), (-40, 120), (7, -7)] {
            let block = world.get_block(x, z).unwrap();
            assert_eq!(world.get_prettified_block(x, z).unwrap(), block.label());
        }
    }

    #[test]
    fn test_custom_chunk_size_translation() {
        let settings = BuildSettings::new(BuildParams::default()).unwrap();
        let world = World::with_chunk_size(settings, 8);

        world.get_block(-1, 0).unwrap();
        assert!(world.is_loaded(ChunkCoord::new(-1, 0)));

        world.get_block(8, 0).unwrap();
        assert!(world.is_loaded(ChunkCoord::new(1, 0)));
        assert_eq!(world.loaded_chunk_count(), 2, "(-1,0) and (1,0)");
    }

    #[test]
    #[should_panic(expected = "chunk_size must be at least 1")]
    fn test_zero_chunk_size_panics() {
        let settings = BuildSettings::new(BuildParams::default()).unwrap();
        let _ = World::with_chunk_size(settings, 0);
    }
}
