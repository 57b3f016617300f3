//! Geometry of a single quadtree leaf: a regular vertex grid and its triangle list.

/// The mesh of one leaf chunk.
///
/// Vertices form a `resolution × resolution` row-major grid; indices are
/// triangles, 3 indices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeafMesh {
    /// Vertex positions in the planet's local frame.
    pub positions: Vec<[f32; 3]>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
}

impl LeafMesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Triangle indices for a row-major `resolution × resolution` vertex grid.
///
/// Each interior cell `(x, y)` with `i = y * resolution + x` emits
/// `{i, i+R+1, i+R}` and `{i, i+1, i+R+1}`, which winds counter-clockwise
/// around `axis_a × axis_b` when `x` runs along `axis_a` and `y` along
/// `axis_b`. A grid yields `2 (R − 1)²` triangles.
pub fn grid_indices(resolution: u32) -> Vec<u32> {
    let r = resolution;
    if r < 2 {
        return Vec::new();
    }
    let cells = ((r - 1) * (r - 1)) as usize;
    let mut indices = Vec::with_capacity(cells * 6);
    for y in 0..r - 1 {
        for x in 0..r - 1 {
            let i = y * r + x;
            indices.extend_from_slice(&[i, i + r + 1, i + r, i, i + 1, i + r + 1]);
        }
    }
    indices
}
