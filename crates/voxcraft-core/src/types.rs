//! Block types and their atlas tiles.

use serde::{Deserialize, Serialize};

/// Atlas tile indices used by one block type.
///
/// The side tile is shared by all four horizontal faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasTiles {
    pub top: u32,
    pub side: u32,
    pub bottom: u32,
}

impl AtlasTiles {
    /// Create a tile triple.
    #[inline]
    pub const fn new(top: u32, side: u32, bottom: u32) -> Self {
        Self { top, side, bottom }
    }

    /// Same tile on every face.
    #[inline]
    pub const fn uniform(tile: u32) -> Self {
        Self::new(tile, tile, tile)
    }
}

/// Material of a single voxel.
///
/// `Air` is always discriminant 0 and is the only block without geometry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space
    #[default]
    Air = 0,
    /// Grass block
    Grass = 1,
    /// Dirt block
    Dirt = 2,
    /// Stone block
    Stone = 3,
    /// Tree trunk block
    Wood = 4,
    /// Tree leaves block
    Leaves = 5,
}

impl BlockType {
    /// Every block type, in discriminant order.
    pub const ALL: [Self; 6] = [
        Self::Air,
        Self::Grass,
        Self::Dirt,
        Self::Stone,
        Self::Wood,
        Self::Leaves,
    ];

    /// Look up a block type by its discriminant.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Air),
            1 => Some(Self::Grass),
            2 => Some(Self::Dirt),
            3 => Some(Self::Stone),
            4 => Some(Self::Wood),
            5 => Some(Self::Leaves),
            _ => None,
        }
    }

    /// Discriminant of this block type.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Returns true if this block is air (empty)
    #[inline]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Returns true if this block is solid (not air)
    #[inline]
    pub const fn is_solid(self) -> bool {
        !self.is_air()
    }

    /// Whether a player may place this block. Air is removed, never placed.
    #[inline]
    pub const fn is_placeable(self) -> bool {
        self.is_solid()
    }

    /// Atlas tiles for this block, `None` for air.
    pub const fn atlas_tiles(self) -> Option<AtlasTiles> {
        match self {
            Self::Air => None,
            Self::Grass => Some(AtlasTiles::new(0, 3, 2)),
            Self::Dirt => Some(AtlasTiles::uniform(2)),
            Self::Stone => Some(AtlasTiles::uniform(1)),
            Self::Wood => Some(AtlasTiles::new(5, 4, 5)),
            Self::Leaves => Some(AtlasTiles::uniform(6)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_the_zero_sentinel() {
        assert_eq!(BlockType::Air.index(), 0);
        assert_eq!(BlockType::default(), BlockType::Air);
        assert!(BlockType::Air.is_air());
        assert!(!BlockType::Air.is_solid());
        assert_eq!(BlockType::ALL.iter().filter(|b| b.is_air()).count(), 1);
    }

    #[test]
    fn from_index_matches_discriminants() {
        for block in BlockType::ALL {
            assert_eq!(BlockType::from_index(block.index()), Some(block));
        }
        assert_eq!(BlockType::from_index(6), None);
    }

    #[test]
    fn only_air_lacks_tiles() {
        assert!(BlockType::Air.atlas_tiles().is_none());
        assert!(!BlockType::Air.is_placeable());
        for block in &BlockType::ALL[1..] {
            assert!(block.atlas_tiles().is_some());
            assert!(block.is_placeable());
        }
    }

    #[test]
    fn grass_tiles() {
        assert_eq!(
            BlockType::Grass.atlas_tiles(),
            Some(AtlasTiles {
                top: 0,
                side: 3,
                bottom: 2
            })
        );
    }
}
