//! Resident chunk record and voxel edits.

use glam::Vec3;
use voxcraft_core::{BlockType, ChunkCoord};
use voxcraft_mesh::{mesh_section, MeshSettings};
use voxcraft_voxel::VoxelGrid;

use crate::render::SectionRenderer;

/// Result of a voxel edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The voxel changed; `sections` were re-meshed, in ascending order.
    Applied { sections: Vec<usize> },
    /// The voxel already held the requested block.
    Unchanged,
    /// The point resolves outside the chunk.
    OutOfBounds,
}

impl EditOutcome {
    /// Whether the edit changed the grid.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A loaded chunk: its coordinate and voxel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub grid: VoxelGrid,
}

impl Chunk {
    /// Create a chunk from a generated grid.
    pub fn new(coord: ChunkCoord, grid: VoxelGrid) -> Self {
        Self { coord, grid }
    }

    /// Resolve a chunk-local point to voxel indices `(i, j, k)`.
    ///
    /// Each axis is divided by the block size and truncated toward zero,
    /// so small negative offsets land in voxel 0.
    pub fn resolve_point(&self, point: Vec3, block_size: f32) -> Option<(usize, usize, usize)> {
        if !(block_size.is_finite() && block_size > 0.0) || !point.is_finite() {
            return None;
        }
        let cell = (point / block_size).trunc();
        let (k, j, i) = (cell.x as i64, cell.y as i64, cell.z as i64);
        self.grid
            .contains(i, j, k)
            .then_some((i as usize, j as usize, k as usize))
    }

    /// Place `block` at a chunk-local point.
    pub fn add_voxel<R>(
        &mut self,
        point: Vec3,
        block: BlockType,
        settings: &MeshSettings,
        renderer: &mut R,
    ) -> EditOutcome
    where
        R: SectionRenderer + ?Sized,
    {
        self.set_voxel_at(point, block, settings, renderer)
    }

    /// Clear the voxel at a chunk-local point.
    pub fn remove_voxel<R>(
        &mut self,
        point: Vec3,
        settings: &MeshSettings,
        renderer: &mut R,
    ) -> EditOutcome
    where
        R: SectionRenderer + ?Sized,
    {
        self.set_voxel_at(point, BlockType::Air, settings, renderer)
    }

    /// Write one voxel and re-mesh every section whose faces it can affect.
    #[cfg_attr(
        feature = "profiling-tracy",
        tracing::instrument(level = "trace", skip_all)
    )]
    pub fn set_voxel_at<R>(
        &mut self,
        point: Vec3,
        block: BlockType,
        settings: &MeshSettings,
        renderer: &mut R,
    ) -> EditOutcome
    where
        R: SectionRenderer + ?Sized,
    {
        let Some((i, j, k)) = self.resolve_point(point, settings.block_size) else {
            tracing::debug!(coord = ?self.coord, ?point, "Edit outside chunk ignored");
            return EditOutcome::OutOfBounds;
        };

        match self.grid.set(i, j, k, block) {
            Some(previous) if previous == block => return EditOutcome::Unchanged,
            Some(_) => {}
            None => return EditOutcome::OutOfBounds,
        }

        let sections = self.affected_sections(i);
        for &section in &sections {
            self.rebuild_section(section, settings, renderer);
        }

        tracing::debug!(
            coord = ?self.coord,
            i, j, k,
            ?block,
            ?sections,
            "Voxel edited"
        );
        EditOutcome::Applied { sections }
    }

    /// Sections to re-mesh after changing a voxel at height `i`, ascending.
    fn affected_sections(&self, i: usize) -> Vec<usize> {
        let side = self.grid.side();
        let section = self.grid.section_of(i);
        let mut sections = Vec::with_capacity(3);

        if i % side == 0 && section > 0 {
            sections.push(section - 1);
        }
        sections.push(section);
        if (i + 1) % side == 0 && section + 1 < self.grid.section_count() {
            sections.push(section + 1);
        }
        sections
    }

    /// Re-mesh one section and hand it to the renderer.
    pub fn rebuild_section<R>(&self, section: usize, settings: &MeshSettings, renderer: &mut R)
    where
        R: SectionRenderer + ?Sized,
    {
        let mesh = mesh_section(&self.grid, section, settings);
        renderer.replace_section(self.coord, section, mesh);
    }
}
