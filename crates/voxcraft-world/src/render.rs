//! Boundary to the external renderer that owns GPU-side mesh sections.

use voxcraft_core::ChunkCoord;
use voxcraft_mesh::MeshBuffer;

/// Receives finished section meshes.
///
/// Upload, collision cooking and placement are the implementor's business;
/// the world only hands over owned buffers, in section order per chunk.
pub trait SectionRenderer {
    /// Create section `section` of a newly installed chunk.
    fn create_section(&mut self, coord: ChunkCoord, section: usize, mesh: MeshBuffer);

    /// Replace an existing section after an edit.
    fn replace_section(&mut self, coord: ChunkCoord, section: usize, mesh: MeshBuffer) {
        self.create_section(coord, section, mesh);
    }

    /// Drop every section of an unloaded chunk.
    fn remove_chunk(&mut self, coord: ChunkCoord);
}

/// One call received by a [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    Create {
        coord: ChunkCoord,
        section: usize,
        faces: usize,
    },
    Replace {
        coord: ChunkCoord,
        section: usize,
        faces: usize,
    },
    Remove {
        coord: ChunkCoord,
    },
}

/// Renderer that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sections replaced for `coord`, in call order.
    pub fn replaced_sections(&self, coord: ChunkCoord) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Replace { coord: c, section, .. } if *c == coord => Some(*section),
                _ => None,
            })
            .collect()
    }

    /// Sections created for `coord`, in call order.
    pub fn created_sections(&self, coord: ChunkCoord) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Create { coord: c, section, .. } if *c == coord => Some(*section),
                _ => None,
            })
            .collect()
    }
}

impl SectionRenderer for RecordingRenderer {
    fn create_section(&mut self, coord: ChunkCoord, section: usize, mesh: MeshBuffer) {
        self.events.push(RenderEvent::Create {
            coord,
            section,
            faces: mesh.face_count(),
        });
    }

    fn replace_section(&mut self, coord: ChunkCoord, section: usize, mesh: MeshBuffer) {
        self.events.push(RenderEvent::Replace {
            coord,
            section,
            faces: mesh.face_count(),
        });
    }

    fn remove_chunk(&mut self, coord: ChunkCoord) {
        self.events.push(RenderEvent::Remove { coord });
    }
}
