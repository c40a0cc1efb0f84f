//! Face-culling mesher: one quad per exposed voxel face.

use glam::{Vec3, Vec4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use voxcraft_core::WorldConfig;
use voxcraft_voxel::VoxelGrid;

use crate::atlas::AtlasLayout;
use crate::buffer::{MeshBuffer, Tangent};
use crate::direction::Direction;

/// Color applied to every vertex.
pub const DEFAULT_VERTEX_COLOR: Vec4 = Vec4::new(0.75, 0.75, 0.75, 1.0);

/// Meshing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Requested section does not exist in the grid.
    #[error("section {section} requested but the grid only has {count} sections")]
    SectionOutOfRange { section: usize, count: usize },
}

/// Parameters that shape mesh output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSettings {
    /// Edge length of one voxel in world units.
    pub block_size: f32,
    /// Atlas used for UV lookup.
    pub atlas: AtlasLayout,
    /// Color written to every vertex.
    pub vertex_color: Vec4,
    /// Mesh the sections of a chunk on the rayon pool.
    pub parallel: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

impl MeshSettings {
    /// Settings matching a world configuration.
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            block_size: config.block_size,
            atlas: AtlasLayout::new(config.atlas_size),
            vertex_color: DEFAULT_VERTEX_COLOR,
            parallel: false,
        }
    }

    /// Enable or disable parallel section meshing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Whether the neighbor of `(i, j, k)` across `direction` is air.
///
/// Positions outside the column count as solid, so chunk-edge faces are
/// never emitted. Neighbor chunks are not consulted.
#[inline]
fn neighbor_is_air(grid: &VoxelGrid, i: usize, j: usize, k: usize, direction: Direction) -> bool {
    let (di, dj, dk) = direction.grid_offset();
    grid.get_signed(i as i64 + di, j as i64 + dj, k as i64 + dk)
        .is_some_and(|block| block.is_air())
}

/// Mesh one section, failing if the section does not exist.
#[cfg_attr(
    feature = "profiling-tracy",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn try_mesh_section(
    grid: &VoxelGrid,
    section: usize,
    settings: &MeshSettings,
) -> Result<MeshBuffer, MeshError> {
    if section >= grid.section_count() {
        return Err(MeshError::SectionOutOfRange {
            section,
            count: grid.section_count(),
        });
    }
    if grid.section_is_air(section) {
        return Ok(MeshBuffer::new());
    }

    let side = grid.side();
    let scale = settings.block_size;
    let mut mesh = MeshBuffer::new();

    for i in grid.section_range(section) {
        for j in 0..side {
            for k in 0..side {
                let Some(block) = grid.get(i, j, k) else {
                    continue;
                };
                if block.is_air() {
                    continue;
                }

                let origin = Vec3::new(k as f32, j as f32, i as f32) * scale;

                for direction in Direction::ALL {
                    if !neighbor_is_air(grid, i, j, k, direction) {
                        continue;
                    }
                    let Some(uvs) = settings.atlas.face_uvs(block, direction) else {
                        continue;
                    };
                    let corners = direction.corners().map(|c| c * scale + origin);

                    mesh.push_face(
                        corners,
                        direction.normal(),
                        Tangent::new(direction.tangent()),
                        uvs,
                        settings.vertex_color,
                    );
                }
            }
        }
    }

    Ok(mesh)
}

/// Mesh one section.
///
/// An out-of-range section is logged and yields an empty buffer.
pub fn mesh_section(grid: &VoxelGrid, section: usize, settings: &MeshSettings) -> MeshBuffer {
    try_mesh_section(grid, section, settings).unwrap_or_else(|err| {
        tracing::error!("Failed to mesh section: {err}");
        MeshBuffer::new()
    })
}

/// Mesh every section of a chunk, returned in section order.
#[cfg_attr(
    feature = "profiling-tracy",
    tracing::instrument(level = "trace", skip_all)
)]
pub fn mesh_chunk(grid: &VoxelGrid, settings: &MeshSettings) -> Vec<MeshBuffer> {
    let sections = 0..grid.section_count();
    if settings.parallel {
        // Indexed parallel iterator: collect preserves section order.
        sections
            .into_par_iter()
            .map(|section| mesh_section(grid, section, settings))
            .collect()
    } else {
        sections
            .map(|section| mesh_section(grid, section, settings))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxcraft_core::BlockType;

    fn settings() -> MeshSettings {
        MeshSettings::default()
    }

    #[test]
    fn single_voxel_in_unit_section_is_fully_culled() {
        let grid = VoxelGrid::filled(1, 1, BlockType::Stone);
        let mesh = mesh_section(&grid, 0, &settings());

        assert_eq!(mesh.triangles.len(), 0);
        assert!(mesh.is_empty());
    }

    #[test]
    fn air_section_is_empty() {
        for side in [1, 2, 8] {
            let grid = VoxelGrid::filled(side, 2, BlockType::Air);
            for section in 0..2 {
                let mesh = mesh_section(&grid, section, &settings());
                assert_eq!(mesh.vertices.len(), 0);
                assert_eq!(mesh.triangles.len(), 0);
            }
        }

        // Air above solid ground still meshes empty.
        let grid = VoxelGrid::generate(2, 2, |i, _, _| {
            if i < 2 {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        });
        assert!(mesh_section(&grid, 1, &settings()).is_empty());
        assert!(!mesh_section(&grid, 0, &settings()).is_empty());
    }

    #[test]
    fn interior_voxel_emits_six_faces() {
        let mut grid = VoxelGrid::filled(3, 1, BlockType::Air);
        grid.set(1, 1, 1, BlockType::Stone);

        let mesh = mesh_section(&grid, 0, &settings());
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangles.len(), 36);
    }

    #[test]
    fn adjacent_voxels_suppress_shared_face() {
        let mut grid = VoxelGrid::filled(4, 1, BlockType::Air);
        grid.set(1, 1, 1, BlockType::Stone);
        grid.set(1, 1, 2, BlockType::Stone);

        let mesh = mesh_section(&grid, 0, &settings());
        assert_eq!(mesh.face_count(), 10);
        assert_eq!(mesh.triangles.len(), 60);
    }

    #[test]
    fn column_edge_faces_are_suppressed() {
        // (0,0,0) and (0,0,1) touch the column edge on three sides each.
        let mut grid = VoxelGrid::filled(2, 1, BlockType::Air);
        grid.set(0, 0, 0, BlockType::Stone);
        grid.set(0, 0, 1, BlockType::Stone);

        let mesh = mesh_section(&grid, 0, &settings());
        // Only Up and Back are exposed for each voxel.
        assert_eq!(mesh.face_count(), 4);
        assert!(mesh.normals.iter().all(|n| *n == Vec3::Z || *n == Vec3::Y));
    }

    #[test]
    fn sections_see_neighbors_in_other_sections() {
        // Stone at the top of section 0 with air above it in section 1.
        let mut grid = VoxelGrid::filled(2, 2, BlockType::Air);
        grid.set(1, 0, 0, BlockType::Stone);

        let mesh = mesh_section(&grid, 0, &settings());
        // Up (into section 1), Down, Right and Back are exposed.
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.normals[0], Vec3::Z);
        assert!(mesh_section(&grid, 1, &settings()).is_empty());

        // Filling the voxel above hides the Up face.
        grid.set(2, 0, 0, BlockType::Dirt);
        let mesh = mesh_section(&grid, 0, &settings());
        assert_eq!(mesh.face_count(), 3);
        assert!(!mesh.normals.contains(&Vec3::Z));
    }

    #[test]
    fn face_order_is_voxel_then_direction() {
        let mut grid = VoxelGrid::filled(3, 1, BlockType::Air);
        grid.set(1, 1, 1, BlockType::Grass);

        let mesh = mesh_section(&grid, 0, &settings());
        let normals: Vec<Vec3> = mesh.normals.chunks(4).map(|face| face[0]).collect();
        let expected: Vec<Vec3> = Direction::ALL.iter().map(|d| d.normal()).collect();
        assert_eq!(normals, expected);
    }

    #[test]
    fn vertices_are_scaled_and_offset() {
        let mut grid = VoxelGrid::filled(3, 1, BlockType::Air);
        // i = 1 (z), j = 1 (y), k = 2 (x)
        grid.set(1, 1, 2, BlockType::Stone);
        grid.set(1, 1, 1, BlockType::Stone);

        let mesh = mesh_section(&grid, 0, &settings());
        let min = mesh.vertices.iter().fold(Vec3::splat(f32::MAX), |a, v| a.min(*v));
        let max = mesh.vertices.iter().fold(Vec3::splat(f32::MIN), |a, v| a.max(*v));
        assert_eq!(min, Vec3::new(100.0, 100.0, 100.0));
        assert_eq!(max, Vec3::new(300.0, 200.0, 200.0));
    }

    #[test]
    fn grass_uvs_follow_atlas() {
        let mut grid = VoxelGrid::filled(3, 1, BlockType::Air);
        grid.set(1, 1, 1, BlockType::Grass);

        let mesh = mesh_section(&grid, 0, &settings());
        // Up is face 0: top tile 0 at the atlas origin.
        assert_relative_eq!(mesh.uvs[0].x, 0.0);
        assert_relative_eq!(mesh.uvs[0].y, 0.25);
        // Down is face 1: bottom tile 2 starts at u = 0.5.
        assert_relative_eq!(mesh.uvs[4].x, 0.75);
        assert_relative_eq!(mesh.uvs[7].x, 0.5);
        assert_relative_eq!(mesh.uvs[7].y, 0.0);
    }

    #[test]
    fn uniform_color_and_tangents() {
        let mut grid = VoxelGrid::filled(3, 1, BlockType::Air);
        grid.set(1, 1, 1, BlockType::Leaves);

        let mesh = mesh_section(&grid, 0, &settings());
        assert!(mesh.colors.iter().all(|c| *c == DEFAULT_VERTEX_COLOR));
        assert_eq!(mesh.tangents[0].axis, Vec3::X);
        assert_eq!(mesh.tangents[8].axis, Vec3::Z);
    }

    #[test]
    fn out_of_range_section() {
        let grid = VoxelGrid::filled(2, 2, BlockType::Stone);

        assert_eq!(
            try_mesh_section(&grid, 2, &settings()),
            Err(MeshError::SectionOutOfRange {
                section: 2,
                count: 2
            })
        );
        assert!(mesh_section(&grid, 5, &settings()).is_empty());
    }

    #[test]
    fn chunk_meshing_is_ordered_and_deterministic() {
        let grid = VoxelGrid::generate(4, 3, |i, j, k| {
            if (i + j + k) % 3 == 0 {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        });

        let sequential = mesh_chunk(&grid, &settings());
        let parallel = mesh_chunk(&grid, &settings().with_parallel(true));

        assert_eq!(sequential.len(), 3);
        assert_eq!(sequential, parallel);
        for (section, mesh) in sequential.iter().enumerate() {
            assert_eq!(*mesh, mesh_section(&grid, section, &settings()));
        }
    }
}
