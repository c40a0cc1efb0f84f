//! Texture atlas UV lookup.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use voxcraft_core::{AtlasTiles, BlockType};

use crate::direction::{Direction, FaceTile};

/// A square texture atlas of `size` x `size` tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasLayout {
    pub size: u32,
}

impl Default for AtlasLayout {
    fn default() -> Self {
        Self { size: 4 }
    }
}

impl AtlasLayout {
    /// Create a layout with the given tiles per row.
    #[inline]
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Edge length of one tile in UV space.
    #[inline]
    pub fn tile_extent(self) -> f32 {
        1.0 / self.size as f32
    }

    /// `(row, col)` of a tile index.
    #[inline]
    pub const fn tile_cell(self, tile: u32) -> (u32, u32) {
        (tile / self.size, tile % self.size)
    }

    /// UV of the tile's origin corner: `(col, row) / size`.
    #[inline]
    pub fn tile_offset(self, tile: u32) -> Vec2 {
        let (row, col) = self.tile_cell(tile);
        Vec2::new(col as f32, row as f32) * self.tile_extent()
    }

    /// UVs for the four vertices of a face of `block`.
    ///
    /// Returns `None` for air, which has no tiles.
    pub fn face_uvs(self, block: BlockType, direction: Direction) -> Option<[Vec2; 4]> {
        let tiles = block.atlas_tiles()?;
        let offset = self.tile_offset(tile_for(tiles, direction));
        let extent = self.tile_extent();
        Some(direction.uv_corners().map(|corner| corner * extent + offset))
    }
}

#[inline]
const fn tile_for(tiles: AtlasTiles, direction: Direction) -> u32 {
    match direction.tile() {
        FaceTile::Top => tiles.top,
        FaceTile::Side => tiles.side,
        FaceTile::Bottom => tiles.bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tile_cells() {
        let atlas = AtlasLayout::new(4);
        assert_eq!(atlas.tile_cell(0), (0, 0));
        assert_eq!(atlas.tile_cell(2), (0, 2));
        assert_eq!(atlas.tile_cell(6), (1, 2));
    }

    #[test]
    fn grass_top_and_bottom_offsets() {
        let atlas = AtlasLayout::new(4);
        let top = atlas.tile_offset(BlockType::Grass.atlas_tiles().unwrap().top);
        let bottom = atlas.tile_offset(BlockType::Grass.atlas_tiles().unwrap().bottom);

        assert_relative_eq!(top.x, 0.0);
        assert_relative_eq!(top.y, 0.0);
        assert_relative_eq!(bottom.x, 0.5);
        assert_relative_eq!(bottom.y, 0.0);
    }

    #[test]
    fn grass_face_uvs() {
        let atlas = AtlasLayout::new(4);

        let up = atlas.face_uvs(BlockType::Grass, Direction::Up).unwrap();
        let expected_up = [
            Vec2::new(0.0, 0.25),
            Vec2::new(0.25, 0.25),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.25, 0.0),
        ];
        for (got, want) in up.iter().zip(expected_up) {
            assert_relative_eq!(got.x, want.x);
            assert_relative_eq!(got.y, want.y);
        }

        let down = atlas.face_uvs(BlockType::Grass, Direction::Down).unwrap();
        let expected_down = [
            Vec2::new(0.75, 0.25),
            Vec2::new(0.5, 0.25),
            Vec2::new(0.75, 0.0),
            Vec2::new(0.5, 0.0),
        ];
        for (got, want) in down.iter().zip(expected_down) {
            assert_relative_eq!(got.x, want.x);
            assert_relative_eq!(got.y, want.y);
        }
    }

    #[test]
    fn side_faces_share_the_side_tile() {
        let atlas = AtlasLayout::new(4);
        // Wood side tile 4 is row 1, col 0.
        for dir in [
            Direction::Left,
            Direction::Right,
            Direction::Forward,
            Direction::Back,
        ] {
            let uvs = atlas.face_uvs(BlockType::Wood, dir).unwrap();
            for uv in uvs {
                assert!((0.0..=0.25).contains(&uv.x), "{dir:?} {uv}");
                assert!((0.25..=0.5).contains(&uv.y), "{dir:?} {uv}");
            }
        }
    }

    #[test]
    fn air_has_no_uvs() {
        assert!(AtlasLayout::default()
            .face_uvs(BlockType::Air, Direction::Up)
            .is_none());
    }
}
