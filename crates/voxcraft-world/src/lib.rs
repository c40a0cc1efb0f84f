//! Chunk storage, streaming and terrain generation for voxcraft.

pub mod chunk;
pub mod chunk_store;
pub mod error;
pub mod generation;
pub mod render;
pub mod streaming;

pub use chunk::{Chunk, EditOutcome};
pub use chunk_store::{ChunkState, ChunkStore, PendingLoad};
pub use error::{Result, WorldError};
pub use generation::{BlockSource, TerrainConfig, TerrainGenerator};
pub use render::{RecordingRenderer, RenderEvent, SectionRenderer};
pub use streaming::{
    build_chunk, ChunkBuildResult, LoadOrder, StreamingConfig, StreamingScheduler, TickReport,
};

/// World seed for procedural generation.
pub type WorldSeed = u64;
