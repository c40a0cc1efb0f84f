//! Mesh output for one section.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Vertices emitted per quad face.
pub const VERTICES_PER_FACE: usize = 4;
/// Triangle indices emitted per quad face.
pub const INDICES_PER_FACE: usize = 6;

/// Index pattern of one face relative to its first vertex.
const FACE_INDICES: [u32; INDICES_PER_FACE] = [0, 1, 2, 3, 2, 1];

/// Per-vertex tangent basis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tangent {
    /// Tangent X axis.
    pub axis: Vec3,
    /// Flip the derived bitangent.
    pub flip_bitangent: bool,
}

impl Tangent {
    /// Tangent along `axis`, no bitangent flip.
    #[inline]
    pub const fn new(axis: Vec3) -> Self {
        Self {
            axis,
            flip_bitangent: false,
        }
    }
}

/// Interleaved vertex layout for GPU upload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 4],
    pub color: [f32; 4],
}

/// Triangle mesh of one section, with parallel per-vertex attributes.
///
/// Every face adds four vertices and six indices, so `triangles.len()` is
/// always `6 * face_count()` and every attribute vector has the same length
/// as `vertices`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub tangents: Vec<Tangent>,
    pub colors: Vec<Vec4>,
}

impl MeshBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of quad faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// True if no geometry was emitted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append one quad face.
    ///
    /// The triangle pattern `{0,1,2,3,2,1}` covers the quad with opposite
    /// windings, so the face renders from both sides.
    pub fn push_face(
        &mut self,
        corners: [Vec3; 4],
        normal: Vec3,
        tangent: Tangent,
        uvs: [Vec2; 4],
        color: Vec4,
    ) {
        let base = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&corners);
        self.triangles
            .extend(FACE_INDICES.iter().map(|offset| base + offset));
        self.normals.extend([normal; VERTICES_PER_FACE]);
        self.uvs.extend_from_slice(&uvs);
        self.tangents.extend([tangent; VERTICES_PER_FACE]);
        self.colors.extend([color; VERTICES_PER_FACE]);
    }

    /// Interleave the parallel attribute vectors.
    pub fn to_vertices(&self) -> Vec<MeshVertex> {
        (0..self.vertices.len())
            .map(|v| {
                let t = self.tangents[v];
                MeshVertex {
                    position: self.vertices[v].to_array(),
                    normal: self.normals[v].to_array(),
                    uv: self.uvs[v].to_array(),
                    tangent: [
                        t.axis.x,
                        t.axis.y,
                        t.axis.z,
                        if t.flip_bitangent { -1.0 } else { 1.0 },
                    ],
                    color: self.colors[v].to_array(),
                }
            })
            .collect()
    }

    /// Raw bytes of the interleaved vertices.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_vertices()).to_vec()
    }

    /// Raw bytes of the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> [Vec3; 4] {
        [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)]
    }

    #[test]
    fn push_face_keeps_attributes_parallel() {
        let mut mesh = MeshBuffer::new();
        for _ in 0..3 {
            mesh.push_face(
                quad(),
                Vec3::Z,
                Tangent::new(Vec3::X),
                [Vec2::ZERO; 4],
                Vec4::ONE,
            );
        }

        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.triangles.len(), 18);
        assert_eq!(mesh.normals.len(), 12);
        assert_eq!(mesh.uvs.len(), 12);
        assert_eq!(mesh.tangents.len(), 12);
        assert_eq!(mesh.colors.len(), 12);
    }

    #[test]
    fn second_face_indices_are_offset() {
        let mut mesh = MeshBuffer::new();
        for _ in 0..2 {
            mesh.push_face(
                quad(),
                Vec3::Z,
                Tangent::new(Vec3::X),
                [Vec2::ZERO; 4],
                Vec4::ONE,
            );
        }
        assert_eq!(mesh.triangles, vec![0, 1, 2, 3, 2, 1, 4, 5, 6, 7, 6, 5]);
    }

    #[test]
    fn interleaved_bytes() {
        let mut mesh = MeshBuffer::new();
        mesh.push_face(
            quad(),
            Vec3::Z,
            Tangent::new(Vec3::X),
            [Vec2::ZERO; 4],
            Vec4::ONE,
        );

        let vertices = mesh.to_vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].tangent, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            mesh.vertex_bytes().len(),
            4 * std::mem::size_of::<MeshVertex>()
        );
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }
}
