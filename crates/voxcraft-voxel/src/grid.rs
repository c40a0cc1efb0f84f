//! Dense block storage for one chunk column.
//!
//! A column is a stack of `section_count` cubic sections, each `side` voxels
//! per edge. Voxels are addressed by `(i, j, k)` where `i` is the vertical
//! axis spanning every section and `j`, `k` are horizontal in `[0, side)`.

use std::ops::Range;

use voxcraft_core::BlockType;

/// Linear position of `(i, j, k)` in a grid with the given section edge.
///
/// No bounds checking; callers validate.
#[inline]
pub const fn index(i: usize, j: usize, k: usize, side: usize) -> usize {
    i * side * side + j * side + k
}

/// Inverse of [`index`]: `i` first, then `j`, then `k` as the remainder.
#[inline]
pub const fn unindex(pos: usize, side: usize) -> (usize, usize, usize) {
    let layer = side * side;
    let i = pos / layer;
    let j = (pos % layer) / side;
    let k = (pos % layer) % side;
    (i, j, k)
}

/// Block data for one chunk column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    side: usize,
    section_count: usize,
    blocks: Vec<BlockType>,
}

impl VoxelGrid {
    /// Build a grid by asking `populate` for every voxel.
    ///
    /// Positions are visited exactly once each, in increasing linear index
    /// order.
    pub fn generate<F>(side: usize, section_count: usize, mut populate: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> BlockType,
    {
        let len = side * side * side * section_count;
        let blocks = (0..len)
            .map(|pos| {
                let (i, j, k) = unindex(pos, side);
                populate(i, j, k)
            })
            .collect();

        Self {
            side,
            section_count,
            blocks,
        }
    }

    /// Grid with every voxel set to `block`.
    pub fn filled(side: usize, section_count: usize, block: BlockType) -> Self {
        Self {
            side,
            section_count,
            blocks: vec![block; side * side * side * section_count],
        }
    }

    /// Section edge length.
    #[inline]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Number of stacked sections.
    #[inline]
    pub const fn section_count(&self) -> usize {
        self.section_count
    }

    /// Column height in voxels.
    #[inline]
    pub const fn height(&self) -> usize {
        self.side * self.section_count
    }

    /// Total voxel count.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if the grid holds no voxels at all (zero-sized shape).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Raw blocks in linear index order.
    #[inline]
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Whether a signed position lies inside the column.
    #[inline]
    pub const fn contains(&self, i: i64, j: i64, k: i64) -> bool {
        let side = self.side as i64;
        i >= 0 && i < self.height() as i64 && j >= 0 && j < side && k >= 0 && k < side
    }

    /// Block at `(i, j, k)`, or `None` outside the column.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<BlockType> {
        if i < self.height() && j < self.side && k < self.side {
            Some(self.blocks[index(i, j, k, self.side)])
        } else {
            None
        }
    }

    /// Block at a signed position, `None` outside the column.
    #[inline]
    pub fn get_signed(&self, i: i64, j: i64, k: i64) -> Option<BlockType> {
        if self.contains(i, j, k) {
            Some(self.blocks[index(i as usize, j as usize, k as usize, self.side)])
        } else {
            None
        }
    }

    /// Write a block and return what was there before.
    ///
    /// Returns `None` and leaves the grid untouched outside the column.
    pub fn set(&mut self, i: usize, j: usize, k: usize, block: BlockType) -> Option<BlockType> {
        if i < self.height() && j < self.side && k < self.side {
            let slot = &mut self.blocks[index(i, j, k, self.side)];
            Some(std::mem::replace(slot, block))
        } else {
            None
        }
    }

    /// Section containing vertical position `i`.
    #[inline]
    pub const fn section_of(&self, i: usize) -> usize {
        i / self.side
    }

    /// Vertical range `[section * side, (section + 1) * side)`.
    #[inline]
    pub const fn section_range(&self, section: usize) -> Range<usize> {
        section * self.side..(section + 1) * self.side
    }

    /// Number of non-air voxels.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_solid()).count()
    }

    /// True if every voxel in the section is air.
    pub fn section_is_air(&self, section: usize) -> bool {
        if section >= self.section_count {
            return true;
        }
        let layer = self.side * self.side;
        let range = self.section_range(section);
        self.blocks[range.start * layer..range.end * layer]
            .iter()
            .all(|b| b.is_air())
    }
}
