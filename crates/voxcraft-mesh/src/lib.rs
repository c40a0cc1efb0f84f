//! Section meshing for the voxcraft workspace.
//!
//! Turns one section of a [`voxcraft_voxel::VoxelGrid`] into a triangle mesh
//! with one quad per exposed voxel face, textured from a tile atlas.

pub mod atlas;
pub mod buffer;
pub mod direction;
pub mod mesher;

pub use atlas::AtlasLayout;
pub use buffer::{MeshBuffer, MeshVertex, Tangent, INDICES_PER_FACE, VERTICES_PER_FACE};
pub use direction::{Direction, FaceTile};
pub use mesher::{
    mesh_chunk, mesh_section, try_mesh_section, MeshError, MeshSettings, DEFAULT_VERTEX_COLOR,
};
