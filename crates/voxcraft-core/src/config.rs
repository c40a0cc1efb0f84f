//! World geometry configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Shape of every chunk in the world and how it maps to world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Voxels per section edge; also the chunk's horizontal width.
    pub side_width: usize,
    /// Number of cubic sections stacked in one chunk column.
    pub section_count: usize,
    /// Edge length of one voxel in world units.
    pub block_size: f32,
    /// Tiles per atlas row (the atlas is `atlas_size` x `atlas_size`).
    pub atlas_size: u32,
    /// World Z of a chunk's bottom face.
    pub base_elevation: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            side_width: 16,
            section_count: 16,
            block_size: 100.0,
            atlas_size: 4,
            base_elevation: -1000.0,
        }
    }
}

impl WorldConfig {
    /// Set the section edge length and section count.
    pub fn with_dimensions(mut self, side_width: usize, section_count: usize) -> Self {
        self.side_width = side_width;
        self.section_count = section_count;
        self
    }

    /// Set the voxel edge length in world units.
    pub fn with_block_size(mut self, block_size: f32) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the atlas tile grid size.
    pub fn with_atlas_size(mut self, atlas_size: u32) -> Self {
        self.atlas_size = atlas_size;
        self
    }

    /// Set the world Z of chunk bottoms.
    pub fn with_base_elevation(mut self, base_elevation: f32) -> Self {
        self.base_elevation = base_elevation;
        self
    }

    /// Voxels in one chunk column.
    #[inline]
    pub const fn voxels_per_chunk(&self) -> usize {
        self.side_width * self.side_width * self.side_width * self.section_count
    }

    /// Height of a chunk column in voxels.
    #[inline]
    pub const fn column_height(&self) -> usize {
        self.side_width * self.section_count
    }

    /// Horizontal edge length of a chunk in world units.
    #[inline]
    pub fn chunk_world_size(&self) -> f32 {
        self.side_width as f32 * self.block_size
    }

    /// Reject configurations the mesher and streamer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.side_width == 0 {
            return Err(CoreError::InvalidConfig("side_width must be > 0".into()));
        }
        if self.section_count == 0 {
            return Err(CoreError::InvalidConfig("section_count must be > 0".into()));
        }
        if self.atlas_size == 0 {
            return Err(CoreError::InvalidConfig("atlas_size must be > 0".into()));
        }
        if !(self.block_size.is_finite() && self.block_size > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        Ok(())
    }
}
