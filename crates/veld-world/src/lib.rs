//! World cache and background chunk streaming over the terrain core.

mod streamer;
mod world;

pub use streamer::{ChunkStreamer, StreamedChunk};
pub use world::World;
