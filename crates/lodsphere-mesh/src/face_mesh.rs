//! Merged per-face surface: all visible leaf meshes in one vertex/index buffer.

use crate::leaf_mesh::LeafMesh;
use crate::normals::compute_smooth_normals;

/// A single drawable surface assembled from many leaf meshes.
///
/// Buffers are flat and ready for a renderer's geometry object: positions
/// and normals are `f32` triples, indices are `u32` triangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceMesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals, one per position.
    pub normals: Vec<[f32; 3]>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
}

impl FaceMesh {
    /// Concatenate leaf meshes, offsetting each leaf's indices by its base
    /// vertex, then compute smooth normals across the merged buffer.
    pub fn merge<'a, I>(leaves: I, weld_tolerance: f32) -> Self
    where
        I: IntoIterator<Item = &'a LeafMesh>,
    {
        let mut positions = Vec::new();
        let mut indices = Vec::new();

        for leaf in leaves {
            let base = positions.len() as u32;
            positions.extend_from_slice(&leaf.positions);
            indices.extend(leaf.indices.iter().map(|&i| i + base));
        }

        let normals = compute_smooth_normals(&positions, &indices, weld_tolerance);
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Positions as interleaved `x, y, z` floats.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as interleaved `x, y, z` floats.
    pub fn normals_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when no leaf contributed geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
