//! Mesh data structures: per-leaf grids, merged per-face surfaces, and smooth normals.

pub mod face_mesh;
pub mod leaf_mesh;
pub mod normals;

pub use face_mesh::FaceMesh;
pub use leaf_mesh::{LeafMesh, grid_indices};
pub use normals::compute_smooth_normals;
