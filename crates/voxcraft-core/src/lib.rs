//! Core types for the voxcraft workspace.
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Block types and their atlas tiles
//! - Chunk coordinates and packed chunk keys
//! - World geometry configuration
//! - Common error types

pub mod config;
pub mod coords;
pub mod error;
pub mod types;

pub use config::WorldConfig;
pub use coords::{ChunkCoord, ChunkKey};
pub use error::{CoreError, Result};
pub use types::{AtlasTiles, BlockType};
