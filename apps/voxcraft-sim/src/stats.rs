//! Renderer stand-in that tracks what would be on the GPU.

use glam::Vec3;
use hashbrown::HashMap;
use voxcraft_core::{ChunkCoord, WorldConfig};
use voxcraft_mesh::MeshBuffer;
use voxcraft_world::SectionRenderer;

/// Uploaded size of one section.
#[derive(Debug, Clone, Copy, Default)]
struct SectionStats {
    faces: usize,
    bytes: usize,
}

/// Counts live sections and their upload sizes.
pub struct StatsRenderer {
    world: WorldConfig,
    chunks: HashMap<ChunkCoord, Vec<SectionStats>>,
    pub sections_created: usize,
    pub sections_replaced: usize,
    pub chunks_removed: usize,
}

impl StatsRenderer {
    pub fn new(world: WorldConfig) -> Self {
        Self {
            world,
            chunks: HashMap::new(),
            sections_created: 0,
            sections_replaced: 0,
            chunks_removed: 0,
        }
    }

    /// Chunks with at least one section.
    pub fn live_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Faces across every live section.
    pub fn live_faces(&self) -> usize {
        self.chunks.values().flatten().map(|s| s.faces).sum()
    }

    /// Vertex and index bytes across every live section.
    pub fn live_bytes(&self) -> usize {
        self.chunks.values().flatten().map(|s| s.bytes).sum()
    }

    /// World-space placement of a section's corner.
    fn section_origin(&self, coord: ChunkCoord, section: usize) -> Vec3 {
        let section_height = self.world.chunk_world_size() * section as f32;
        coord.world_origin(&self.world) + Vec3::Z * section_height
    }

    fn store(&mut self, coord: ChunkCoord, section: usize, mesh: &MeshBuffer) {
        let stats = SectionStats {
            faces: mesh.face_count(),
            bytes: mesh.vertex_bytes().len() + mesh.index_bytes().len(),
        };
        let sections = self.chunks.entry(coord).or_default();
        if sections.len() <= section {
            sections.resize(section + 1, SectionStats::default());
        }
        sections[section] = stats;

        tracing::trace!(
            ?coord,
            section,
            origin = ?self.section_origin(coord, section),
            faces = stats.faces,
            "Section uploaded"
        );
    }
}

impl SectionRenderer for StatsRenderer {
    fn create_section(&mut self, coord: ChunkCoord, section: usize, mesh: MeshBuffer) {
        self.sections_created += 1;
        self.store(coord, section, &mesh);
    }

    fn replace_section(&mut self, coord: ChunkCoord, section: usize, mesh: MeshBuffer) {
        self.sections_replaced += 1;
        self.store(coord, section, &mesh);
    }

    fn remove_chunk(&mut self, coord: ChunkCoord) {
        if self.chunks.remove(&coord).is_some() {
            self.chunks_removed += 1;
        }
    }
}
