//! Procedural terrain core: build settings, coherent noise, and chunk generation.

mod block;
mod chunk;
mod noise_field;
mod settings;

pub use block::BlockType;
pub use chunk::{Chunk, ChunkCoord, DEFAULT_CHUNK_SIZE, GenerateError, local_coord};
pub use noise_field::NoiseField;
pub use settings::{BuildParams, BuildSettings, SettingsError};
