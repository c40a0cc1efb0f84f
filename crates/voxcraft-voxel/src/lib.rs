//! Dense voxel storage for the voxcraft workspace.

pub mod grid;

pub use grid::{index, unindex, VoxelGrid};
