//! Per-face quadtree controller: owns the root chunk and the merged face mesh.

use std::hash::{Hash, Hasher};

use lodsphere_cubesphere::{ChunkKey, CubeFace, FaceBasis};
use lodsphere_mesh::FaceMesh;
use rustc_hash::FxHasher;
use tracing::debug;

use crate::chunk::Chunk;
use crate::context::LodContext;

/// Weld cell size for seam normals, as a fraction of the radius.
const WELD_FRACTION: f64 = 1e-5;

/// How a face decides that its visible leaf set changed between passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RebuildPolicy {
    /// Re-merge only when the number of visible leaves changes. Cheap, but
    /// two different leaf sets of the same size look identical.
    LeafCount,
    /// Re-merge when the identity of any visible leaf changes.
    #[default]
    LeafSet,
}

/// Summary of the visible leaf set used for change detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleSignature {
    /// Number of visible leaves.
    pub count: usize,
    /// Hash of the visible leaf keys in tree order.
    pub fingerprint: u64,
}

impl VisibleSignature {
    fn from_leaves(leaves: &[&Chunk]) -> Self {
        let mut hasher = FxHasher::default();
        for leaf in leaves {
            leaf.key().hash(&mut hasher);
        }
        Self {
            count: leaves.len(),
            fingerprint: hasher.finish(),
        }
    }

    fn differs(&self, other: &Self, policy: RebuildPolicy) -> bool {
        match policy {
            RebuildPolicy::LeafCount => self.count != other.count,
            RebuildPolicy::LeafSet => self != other,
        }
    }
}

/// Outcome of processing one face in a generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceUpdate {
    /// Whether the merged mesh was rebuilt.
    pub rebuilt: bool,
    /// Leaves in the tree after evaluation.
    pub leaves: usize,
    /// Leaves that passed the horizon test.
    pub visible_leaves: usize,
}

/// One cube face of the planet.
///
/// Holds the face basis, the quadtree root, and the mesh merged from the
/// currently visible leaves.
#[derive(Debug)]
pub struct TerrainFace {
    face: CubeFace,
    basis: FaceBasis,
    root: Chunk,
    policy: RebuildPolicy,
    last_visible: Option<VisibleSignature>,
    mesh: FaceMesh,
}

impl TerrainFace {
    /// Create a face with an unsplit root and an empty mesh.
    pub fn new(face: CubeFace, policy: RebuildPolicy) -> Self {
        let basis = Self::build_basis(face);
        Self {
            face,
            basis,
            root: Chunk::root(face, basis),
            policy,
            last_visible: None,
            mesh: FaceMesh::default(),
        }
    }

    /// Derive `axis_a`/`axis_b` from the face normal.
    pub fn build_basis(face: CubeFace) -> FaceBasis {
        FaceBasis::from_local_up(face.normal())
    }

    /// Which cube face this is.
    pub fn face(&self) -> CubeFace {
        self.face
    }

    /// The face's local frame.
    pub fn basis(&self) -> &FaceBasis {
        &self.basis
    }

    /// Root of the quadtree (read-only).
    pub fn root(&self) -> &Chunk {
        &self.root
    }

    /// The merged mesh of all visible leaves from the last rebuild.
    pub fn mesh(&self) -> &FaceMesh {
        &self.mesh
    }

    /// Signature of the visible set from the last merge.
    pub fn last_visible(&self) -> Option<VisibleSignature> {
        self.last_visible
    }

    /// Build the tree from a fresh root and merge unconditionally.
    pub fn construct_tree(&mut self, ctx: &LodContext<'_>) -> FaceUpdate {
        self.root.reset();
        self.root.evaluate(ctx);
        let leaves = self.root.collect_visible_leaves(ctx);
        let signature = VisibleSignature::from_leaves(&leaves);
        self.mesh = merge_leaves(&leaves, ctx);
        self.last_visible = Some(signature);

        debug!(
            face = ?self.face,
            visible = signature.count,
            vertices = self.mesh.vertex_count(),
            "constructed face tree"
        );
        FaceUpdate {
            rebuilt: true,
            leaves: self.root.leaf_count(),
            visible_leaves: signature.count,
        }
    }

    /// Re-evaluate the existing tree and re-merge only if the visible set
    /// changed under the face's [`RebuildPolicy`].
    pub fn update_tree(&mut self, ctx: &LodContext<'_>) -> FaceUpdate {
        self.root.evaluate(ctx);
        let leaves = self.root.collect_visible_leaves(ctx);
        let signature = VisibleSignature::from_leaves(&leaves);

        let rebuilt = self
            .last_visible
            .is_none_or(|last| signature.differs(&last, self.policy));
        if rebuilt {
            self.mesh = merge_leaves(&leaves, ctx);
            self.last_visible = Some(signature);
            debug!(
                face = ?self.face,
                visible = signature.count,
                vertices = self.mesh.vertex_count(),
                "rebuilt face mesh"
            );
        }

        FaceUpdate {
            rebuilt,
            leaves: self.root.leaf_count(),
            visible_leaves: signature.count,
        }
    }

    /// Keys of the leaves that are currently visible, in tree order.
    pub fn visible_keys(&self, ctx: &LodContext<'_>) -> Vec<ChunkKey> {
        self.root
            .collect_visible_leaves(ctx)
            .iter()
            .map(|c| c.key())
            .collect()
    }
}

/// Concatenate the meshes of `leaves` into one surface with smooth normals.
fn merge_leaves(leaves: &[&Chunk], ctx: &LodContext<'_>) -> FaceMesh {
    let weld = (ctx.radius * WELD_FRACTION) as f32;
    FaceMesh::merge(leaves.iter().filter_map(|leaf| leaf.mesh(ctx)), weld)
}
