//! Quadtree node covering a square patch of one cube face.

use std::sync::OnceLock;

use glam::DVec3;
use lodsphere_cubesphere::{ChunkKey, CubeFace, FaceBasis, cube_to_sphere};
use lodsphere_mesh::{LeafMesh, grid_indices};

use crate::context::LodContext;

/// Shape of a chunk: a leaf with a lazily built mesh, or four children.
#[derive(Debug)]
enum ChunkState {
    /// Rendered as one patch. The mesh is built on first request and kept
    /// until the chunk subdivides.
    Leaf {
        /// Memoized leaf geometry.
        mesh: OnceLock<LeafMesh>,
    },
    /// Subdivided into four quadrants, ordered as [`ChunkKey::children`].
    Internal {
        /// The four child chunks.
        children: Box<[Chunk; 4]>,
    },
}

impl ChunkState {
    fn empty_leaf() -> Self {
        ChunkState::Leaf {
            mesh: OnceLock::new(),
        }
    }
}

/// One node of a face quadtree.
///
/// The footprint is a square on the unit cube face centered at
/// `center_cube` with half side `half_extent`, spanned by the face's
/// `axis_a`/`axis_b`. Children own nothing of their parent; the parent is
/// named by [`Chunk::parent_key`].
#[derive(Debug)]
pub struct Chunk {
    key: ChunkKey,
    center_cube: DVec3,
    half_extent: f64,
    basis: FaceBasis,
    state: ChunkState,
}

impl Chunk {
    /// A leaf covering the whole face, in the owning face's frame.
    pub fn root(face: CubeFace, basis: FaceBasis) -> Self {
        debug_assert_eq!(basis.local_up, face.normal());
        Self {
            key: ChunkKey::root(face),
            center_cube: basis.local_up,
            half_extent: 1.0,
            basis,
            state: ChunkState::empty_leaf(),
        }
    }

    pub fn key(&self) -> ChunkKey {
        self.key
    }

    pub fn depth(&self) -> u8 {
        self.key.depth
    }

    /// Key of the enclosing chunk, `None` for a face root.
    pub fn parent_key(&self) -> Option<ChunkKey> {
        self.key.parent()
    }

    pub fn center_cube(&self) -> DVec3 {
        self.center_cube
    }

    pub fn half_extent(&self) -> f64 {
        self.half_extent
    }

    pub fn basis(&self) -> &FaceBasis {
        &self.basis
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.state, ChunkState::Leaf { .. })
    }

    /// The four children, if subdivided.
    pub fn children(&self) -> Option<&[Chunk; 4]> {
        match &self.state {
            ChunkState::Leaf { .. } => None,
            ChunkState::Internal { children } => Some(children),
        }
    }

    /// Whether this leaf currently holds a built mesh.
    pub fn has_mesh(&self) -> bool {
        match &self.state {
            ChunkState::Leaf { mesh } => mesh.get().is_some(),
            ChunkState::Internal { .. } => false,
        }
    }

    /// Center of the footprint projected onto the sphere, planet-local.
    pub fn sphere_center(&self, radius: f64) -> DVec3 {
        cube_to_sphere(self.center_cube, radius).unwrap_or(DVec3::ZERO)
    }

    /// Decide this chunk's shape for the current viewer, recursively.
    ///
    /// Splits while the viewer is within the depth's LOD distance of the
    /// projected center and the depth limit allows it; otherwise collapses
    /// to a leaf, dropping the subtree and its meshes. Existing children are
    /// kept and re-evaluated, so repeated calls with the same viewer leave
    /// the tree unchanged.
    pub fn evaluate(&mut self, ctx: &LodContext<'_>) {
        let world_center = ctx.to_world(self.sphere_center(ctx.radius));
        let distance = world_center.distance(ctx.viewer);

        if !ctx.should_subdivide(self.depth(), distance) {
            self.collapse();
            return;
        }

        if self.is_leaf() {
            self.subdivide();
        }
        if let ChunkState::Internal { children } = &mut self.state {
            for child in children.iter_mut() {
                child.evaluate(ctx);
            }
        }
    }

    /// Replace a leaf with four quarter-size children. No-op on an internal
    /// node or at the deepest addressable key.
    fn subdivide(&mut self) {
        if !self.is_leaf() {
            return;
        }
        let Some(keys) = self.key.children() else {
            return;
        };
        let child_half = self.half_extent * 0.5;
        let children = keys.map(|key| {
            let sa = if key.x & 1 == 1 { 1.0 } else { -1.0 };
            let sb = if key.y & 1 == 1 { 1.0 } else { -1.0 };
            Chunk {
                key,
                center_cube: self.center_cube
                    + self.basis.axis_a * (sa * child_half)
                    + self.basis.axis_b * (sb * child_half),
                half_extent: child_half,
                basis: self.basis,
                state: ChunkState::empty_leaf(),
            }
        });
        self.state = ChunkState::Internal {
            children: Box::new(children),
        };
    }

    /// Drop all children. A chunk that is already a leaf keeps its mesh.
    fn collapse(&mut self) {
        if !self.is_leaf() {
            self.state = ChunkState::empty_leaf();
        }
    }

    /// Reset to a bare leaf with no mesh.
    pub(crate) fn reset(&mut self) {
        self.state = ChunkState::empty_leaf();
    }

    /// All leaves under this chunk that pass the horizon test, in tree order.
    pub fn collect_visible_leaves(&self, ctx: &LodContext<'_>) -> Vec<&Chunk> {
        let mut out = Vec::new();
        self.collect_visible_into(ctx, &mut out);
        out
    }

    fn collect_visible_into<'a>(&'a self, ctx: &LodContext<'_>, out: &mut Vec<&'a Chunk>) {
        match &self.state {
            ChunkState::Leaf { .. } => {
                let world_center = ctx.to_world(self.sphere_center(ctx.radius));
                if ctx.culler.is_visible(world_center) {
                    out.push(self);
                }
            }
            ChunkState::Internal { children } => {
                for child in children.iter() {
                    child.collect_visible_into(ctx, out);
                }
            }
        }
    }

    /// The leaf's mesh, built on first use. `None` for internal nodes.
    pub fn mesh(&self, ctx: &LodContext<'_>) -> Option<&LeafMesh> {
        match &self.state {
            ChunkState::Leaf { mesh } => {
                Some(mesh.get_or_init(|| self.generate_mesh(ctx.radius, ctx.resolution)))
            }
            ChunkState::Internal { .. } => None,
        }
    }

    /// Sample a `resolution × resolution` grid over the footprint and
    /// project every sample onto the sphere.
    ///
    /// Depends only on this chunk's footprint, the radius and the
    /// resolution; yields `resolution²` vertices and
    /// `2 (resolution − 1)²` outward-wound triangles.
    pub fn generate_mesh(&self, radius: f64, resolution: u32) -> LeafMesh {
        let r = resolution.max(2);
        let step = 1.0 / (r - 1) as f64;
        let mut positions = Vec::with_capacity((r as usize).pow(2));

        for y in 0..r {
            for x in 0..r {
                let px = x as f64 * step;
                let py = y as f64 * step;
                let cube_point = self.center_cube
                    + self.basis.axis_a * ((px * 2.0 - 1.0) * self.half_extent)
                    + self.basis.axis_b * ((py * 2.0 - 1.0) * self.half_extent);
                let vertex = cube_to_sphere(cube_point, radius).unwrap_or(DVec3::ZERO);
                positions.push(vertex.as_vec3().to_array());
            }
        }

        LeafMesh {
            positions,
            indices: grid_indices(r),
        }
    }

    /// Visit every node, parents before children.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Chunk)) {
        f(self);
        if let ChunkState::Internal { children } = &self.state {
            for child in children.iter() {
                child.visit(f);
            }
        }
    }

    /// Number of leaves under this chunk.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |c| {
            if c.is_leaf() {
                count += 1;
            }
        });
        count
    }

    /// Depth of the deepest leaf under this chunk.
    pub fn max_leaf_depth(&self) -> u8 {
        let mut deepest = 0;
        self.visit(&mut |c| deepest = deepest.max(c.depth()));
        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon_culling::DEFAULT_CULLING_MIN_ANGLE;
    use crate::lod_table::LodDistances;

    const RADIUS: f64 = 100.0;

    fn sample_table() -> LodDistances {
        LodDistances::custom(vec![
            f64::INFINITY,
            600.0,
            300.0,
            150.0,
            75.0,
            25.0,
            11.7,
            5.6,
            2.8,
        ])
        .unwrap()
    }

    fn ctx_at(table: &LodDistances, viewer: DVec3) -> LodContext<'_> {
        LodContext::new(
            RADIUS,
            DVec3::ZERO,
            viewer,
            table,
            8,
            8,
            DEFAULT_CULLING_MIN_ANGLE,
        )
    }

    fn face_root(face: CubeFace) -> Chunk {
        Chunk::root(face, face.basis())
    }

    fn leaf_keys(chunk: &Chunk) -> Vec<ChunkKey> {
        let mut keys = Vec::new();
        chunk.visit(&mut |c| {
            if c.is_leaf() {
                keys.push(c.key());
            }
        });
        keys
    }

    #[test]
    fn test_root_footprint() {
        let root = face_root(CubeFace::PosZ);
        assert_eq!(root.center_cube(), DVec3::Z);
        assert_eq!(root.half_extent(), 1.0);
        assert_eq!(root.depth(), 0);
        assert!(root.is_leaf());
        assert_eq!(root.parent_key(), None);
    }

    #[test]
    fn test_children_tile_parent_at_every_depth() {
        let table = LodDistances::custom(vec![f64::INFINITY; 9]).unwrap();
        let ctx = ctx_at(&table, DVec3::new(0.0, 0.0, 150.0));
        let mut root = face_root(CubeFace::PosX);
        // Full tree down to depth 8.
        root.evaluate(&ctx);

        root.visit(&mut |parent| {
            let Some(children) = parent.children() else {
                return;
            };
            let b = parent.basis();
            let h = parent.half_extent();
            let mut area = 0.0;
            for child in children {
                assert_eq!(child.depth(), parent.depth() + 1);
                assert_eq!(child.parent_key(), Some(parent.key()));
                assert!((child.half_extent() - h / 2.0).abs() < 1e-15);
                let offset = child.center_cube() - parent.center_cube();
                assert!(offset.dot(b.local_up).abs() < 1e-12, "child left the face plane");
                let oa = offset.dot(b.axis_a);
                let ob = offset.dot(b.axis_b);
                // Each child sits exactly in one quadrant, flush with the parent edges.
                assert!((oa.abs() - h / 2.0).abs() < 1e-12);
                assert!((ob.abs() - h / 2.0).abs() < 1e-12);
                area += (2.0 * child.half_extent()).powi(2);
            }
            assert!((area - (2.0 * h).powi(2)).abs() < 1e-12);
            // Quadrant signs are all distinct: no overlap, no gap.
            let mut signs: Vec<(bool, bool)> = children
                .iter()
                .map(|c| {
                    let o = c.center_cube() - parent.center_cube();
                    (o.dot(b.axis_a) > 0.0, o.dot(b.axis_b) > 0.0)
                })
                .collect();
            signs.sort();
            signs.dedup();
            assert_eq!(signs.len(), 4);
        });
        assert_eq!(root.leaf_count(), 4usize.pow(8));
        assert_eq!(root.max_leaf_depth(), 8);
    }

    #[test]
    fn test_child_center_matches_key_footprint() {
        let table = LodDistances::custom(vec![f64::INFINITY; 9]).unwrap();
        let ctx = LodContext {
            max_depth: 3,
            ..ctx_at(&table, DVec3::new(0.0, 0.0, 150.0))
        };
        let mut root = face_root(CubeFace::NegY);
        root.evaluate(&ctx);
        root.visit(&mut |c| {
            let (s0, t0, s1, t1) = c.key().footprint();
            let expected = c.basis().cube_point((s0 + s1) / 2.0, (t0 + t1) / 2.0);
            assert!((c.center_cube() - expected).length() < 1e-12, "{}", c.key());
        });
    }

    #[test]
    fn test_depth_never_exceeds_max() {
        // Every threshold infinite: the distance test always passes.
        let table = LodDistances::custom(vec![f64::INFINITY; 12]).unwrap();
        let ctx = LodContext {
            max_depth: 3,
            ..ctx_at(&table, DVec3::new(0.0, 0.0, 101.0))
        };
        let mut root = face_root(CubeFace::PosZ);
        root.evaluate(&ctx);
        assert_eq!(root.max_leaf_depth(), 3);
        root.visit(&mut |c| {
            assert!(c.depth() <= 3);
            if c.depth() == 3 {
                assert!(c.is_leaf());
            }
        });
    }

    #[test]
    fn test_missing_table_entry_refuses_split() {
        let table = LodDistances::custom(vec![f64::INFINITY, f64::INFINITY]).unwrap();
        let ctx = ctx_at(&table, DVec3::new(0.0, 0.0, 101.0));
        let mut root = face_root(CubeFace::PosZ);
        root.evaluate(&ctx);
        assert_eq!(root.max_leaf_depth(), 2);
        assert_eq!(root.leaf_count(), 16);
    }

    #[test]
    fn test_root_always_splits_and_far_viewer_stops_at_depth_one() {
        let table = sample_table();
        let ctx = ctx_at(&table, DVec3::new(0.0, 0.0, 700.0));
        for face in CubeFace::ALL {
            let mut root = face_root(face);
            root.evaluate(&ctx);
            assert_eq!(root.leaf_count(), 4, "{face:?}");
            assert_eq!(root.max_leaf_depth(), 1, "{face:?}");
        }
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let table = sample_table();
        let ctx = ctx_at(&table, DVec3::new(30.0, 20.0, 140.0));
        let mut root = face_root(CubeFace::PosZ);
        root.evaluate(&ctx);
        let first = leaf_keys(&root);
        root.evaluate(&ctx);
        assert_eq!(first, leaf_keys(&root));
        assert!(first.len() > 4);
    }

    #[test]
    fn test_moving_away_collapses() {
        let table = sample_table();
        let mut root = face_root(CubeFace::PosZ);
        root.evaluate(&ctx_at(&table, DVec3::new(0.0, 0.0, 120.0)));
        let near_leaves = root.leaf_count();

        root.evaluate(&ctx_at(&table, DVec3::new(0.0, 0.0, 5000.0)));
        assert_eq!(root.leaf_count(), 4);
        assert!(near_leaves > 4);
    }

    #[test]
    fn test_leaf_mesh_shape() {
        let root = face_root(CubeFace::NegZ);
        let mesh = root.generate_mesh(RADIUS, 8);
        assert_eq!(mesh.vertex_count(), 64);
        assert_eq!(mesh.triangle_count(), 98);
        assert_eq!(mesh.indices.len(), 294);
    }

    #[test]
    fn test_mesh_vertices_lie_on_sphere() {
        let table = sample_table();
        let ctx = ctx_at(&table, DVec3::new(0.0, 60.0, 90.0));
        for face in CubeFace::ALL {
            let mut root = face_root(face);
            root.evaluate(&ctx);
            root.visit(&mut |c| {
                if let Some(mesh) = c.mesh(&ctx) {
                    assert_eq!(mesh.vertex_count(), 64);
                    for p in &mesh.positions {
                        let len = glam::Vec3::from(*p).length() as f64;
                        assert!((len - RADIUS).abs() < 1e-3, "{} off sphere: {len}", c.key());
                    }
                }
            });
        }
    }

    #[test]
    fn test_mesh_winding_faces_outward() {
        let root = face_root(CubeFace::PosY);
        let mesh = root.generate_mesh(RADIUS, 8);
        for tri in mesh.indices.chunks_exact(3) {
            let a = glam::Vec3::from(mesh.positions[tri[0] as usize]);
            let b = glam::Vec3::from(mesh.positions[tri[1] as usize]);
            let c = glam::Vec3::from(mesh.positions[tri[2] as usize]);
            let n = (b - a).cross(c - a);
            assert!(n.dot(a + b + c) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn test_mesh_corners_match_footprint() {
        let root = face_root(CubeFace::PosX);
        let mesh = root.generate_mesh(1.0, 8);
        let b = root.basis();
        let corner = b.cube_point(-1.0, -1.0).normalize().as_vec3();
        assert!((glam::Vec3::from(mesh.positions[0]) - corner).length() < 1e-6);
        let last = b.cube_point(1.0, 1.0).normalize().as_vec3();
        assert!((glam::Vec3::from(mesh.positions[63]) - last).length() < 1e-6);
    }

    #[test]
    fn test_mesh_cache_lifecycle() {
        let table = sample_table();
        let far = ctx_at(&table, DVec3::new(0.0, 0.0, 5000.0));
        let near = ctx_at(&table, DVec3::new(0.0, 0.0, 110.0));

        let mut root = face_root(CubeFace::PosZ);
        assert!(!root.has_mesh());
        assert!(root.mesh(&far).is_some());
        assert!(root.has_mesh());

        // Subdividing discards the leaf mesh.
        root.evaluate(&near);
        assert!(!root.is_leaf());
        assert!(!root.has_mesh());
        assert!(root.mesh(&near).is_none());

        // Collapsing back yields a fresh, unmeshed leaf.
        root.reset();
        assert!(root.is_leaf());
        assert!(!root.has_mesh());
    }

    #[test]
    fn test_stable_leaf_keeps_its_mesh() {
        let table = sample_table();
        let ctx = ctx_at(&table, DVec3::new(0.0, 0.0, 700.0));
        let mut root = face_root(CubeFace::PosZ);
        root.evaluate(&ctx);
        for leaf in root.collect_visible_leaves(&ctx) {
            leaf.mesh(&ctx);
        }
        root.evaluate(&ctx);
        let children = root.children().unwrap();
        assert!(children.iter().all(Chunk::has_mesh));
    }

    #[test]
    fn test_visible_leaves_are_leaves() {
        let table = sample_table();
        let ctx = ctx_at(&table, DVec3::new(80.0, 0.0, 80.0));
        let mut root = face_root(CubeFace::PosX);
        root.evaluate(&ctx);
        let visible = root.collect_visible_leaves(&ctx);
        assert!(!visible.is_empty());
        assert!(visible.iter().all(|c| c.is_leaf()));
        assert!(visible.len() <= root.leaf_count());
    }

    #[test]
    fn test_opposite_face_is_culled() {
        let table = sample_table();
        let ctx = ctx_at(&table, DVec3::new(0.0, 0.0, 700.0));
        let mut root = face_root(CubeFace::NegZ);
        root.evaluate(&ctx);
        assert!(root.collect_visible_leaves(&ctx).is_empty());
    }
}
