//! Planet orchestration: six faces, one LOD table, one viewer.

use std::thread;

use glam::DVec3;
use lodsphere_cubesphere::{ChunkKey, CubeFace};
use tracing::{info, warn};

use crate::context::LodContext;
use crate::face::{FaceUpdate, RebuildPolicy, TerrainFace};
use crate::horizon_culling::DEFAULT_CULLING_MIN_ANGLE;
use crate::lod_table::LodDistances;
use crate::LodError;

/// Largest accepted number of vertex samples per leaf side.
pub const MAX_RESOLUTION: u32 = 256;

/// Construction parameters for a [`Planet`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetSettings {
    /// Sphere radius.
    pub radius: f64,
    /// Planet center in world space.
    pub center: DVec3,
    /// Explicit LOD table. `None` derives one from the radius.
    pub lod_distances: Option<Vec<f64>>,
    /// Horizon culling threshold in radians.
    pub culling_min_angle: f64,
    /// Deepest chunk depth.
    pub max_depth: u8,
    /// Vertex samples per leaf side.
    pub resolution: u32,
    /// Change detector used by every face.
    pub rebuild_policy: RebuildPolicy,
}

impl Default for PlanetSettings {
    fn default() -> Self {
        Self {
            radius: 100.0,
            center: DVec3::ZERO,
            lod_distances: None,
            culling_min_angle: DEFAULT_CULLING_MIN_ANGLE,
            max_depth: 8,
            resolution: 8,
            rebuild_policy: RebuildPolicy::default(),
        }
    }
}

impl PlanetSettings {
    /// Check every parameter and build the LOD table.
    pub fn validate(&self) -> Result<LodDistances, LodError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(LodError::InvalidRadius(self.radius));
        }
        if !self.center.is_finite() {
            return Err(LodError::InvalidCenter(self.center.to_array()));
        }
        if self.max_depth > ChunkKey::MAX_DEPTH {
            return Err(LodError::MaxDepthTooLarge {
                requested: self.max_depth,
                limit: ChunkKey::MAX_DEPTH,
            });
        }
        if self.culling_min_angle.is_nan()
            || self.culling_min_angle <= 0.0
            || self.culling_min_angle > std::f64::consts::PI
        {
            return Err(LodError::InvalidCullingAngle(self.culling_min_angle));
        }
        if !(2..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(LodError::InvalidResolution(self.resolution));
        }
        // A fully split face must still be addressable with u32 indices.
        let leaves = 4u64.checked_pow(u32::from(self.max_depth));
        let vertices = leaves.and_then(|n| n.checked_mul(u64::from(self.resolution).pow(2)));
        if vertices.is_none_or(|n| n > u64::from(u32::MAX)) {
            return Err(LodError::FaceTooLarge {
                resolution: self.resolution,
                max_depth: self.max_depth,
            });
        }

        let table = match &self.lod_distances {
            Some(distances) => LodDistances::custom(distances.clone())?,
            None => LodDistances::from_radius(self.radius),
        };
        let required = self.max_depth as usize + 1;
        if table.len() < required {
            return Err(LodError::LodTableTooShort {
                len: table.len(),
                max_depth: self.max_depth,
                required,
            });
        }
        Ok(table)
    }
}

/// Aggregate numbers for one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Faces whose merged mesh was rebuilt.
    pub faces_rebuilt: usize,
    /// Leaves that passed the horizon test, all faces.
    pub visible_leaves: usize,
    /// Leaves in all six trees.
    pub total_leaves: usize,
    /// Vertices across all merged face meshes.
    pub vertices: usize,
    /// Triangles across all merged face meshes.
    pub triangles: usize,
}

impl PassStats {
    fn accumulate(&mut self, update: FaceUpdate, face: &TerrainFace) {
        if update.rebuilt {
            self.faces_rebuilt += 1;
        }
        self.visible_leaves += update.visible_leaves;
        self.total_leaves += update.leaves;
        self.vertices += face.mesh().vertex_count();
        self.triangles += face.mesh().triangle_count();
    }
}

/// Fixed surface parameters shared by every pass.
#[derive(Clone, Copy, Debug)]
struct Surface {
    radius: f64,
    center: DVec3,
    culling_min_angle: f64,
    max_depth: u8,
    resolution: u32,
}

impl Surface {
    fn context<'a>(&self, viewer: DVec3, lod_distances: &'a LodDistances) -> LodContext<'a> {
        LodContext::new(
            self.radius,
            self.center,
            viewer,
            lod_distances,
            self.max_depth,
            self.resolution,
            self.culling_min_angle,
        )
    }
}

/// A cube-sphere planet with viewer-driven quadtree LOD.
///
/// The planet owns the six faces and the LOD table. The host moves the
/// viewer with [`Planet::set_viewer_position`] and calls
/// [`Planet::generation_pass`] when it wants the meshes refreshed.
#[derive(Debug)]
pub struct Planet {
    surface: Surface,
    viewer: DVec3,
    viewer_distance: f64,
    lod_distances: LodDistances,
    faces: [TerrainFace; 6],
    constructed: bool,
}

impl Planet {
    /// Validate `settings` and build the six faces with unsplit roots.
    pub fn new(settings: PlanetSettings, viewer: DVec3) -> Result<Self, LodError> {
        let lod_distances = settings.validate().inspect_err(|err| {
            warn!("Rejected planet configuration: {err}");
        })?;
        let faces = CubeFace::ALL.map(|face| TerrainFace::new(face, settings.rebuild_policy));

        info!(
            "Planet initialized: radius {}, max depth {}, {} LOD entries",
            settings.radius,
            settings.max_depth,
            lod_distances.len()
        );

        Ok(Self {
            surface: Surface {
                radius: settings.radius,
                center: settings.center,
                culling_min_angle: settings.culling_min_angle,
                max_depth: settings.max_depth,
                resolution: settings.resolution,
            },
            viewer,
            viewer_distance: viewer.distance(settings.center),
            lod_distances,
            faces,
            constructed: false,
        })
    }

    /// Move the viewer. Takes effect on the next generation pass.
    pub fn set_viewer_position(&mut self, viewer: DVec3) {
        self.viewer = viewer;
        self.viewer_distance = viewer.distance(self.surface.center);
    }

    pub fn viewer_position(&self) -> DVec3 {
        self.viewer
    }

    /// Distance from the viewer to the planet center.
    pub fn viewer_distance(&self) -> f64 {
        self.viewer_distance
    }

    pub fn radius(&self) -> f64 {
        self.surface.radius
    }

    pub fn center(&self) -> DVec3 {
        self.surface.center
    }

    pub fn max_depth(&self) -> u8 {
        self.surface.max_depth
    }

    pub fn resolution(&self) -> u32 {
        self.surface.resolution
    }

    pub fn lod_distances(&self) -> &LodDistances {
        &self.lod_distances
    }

    /// All six faces in [`CubeFace::ALL`] order.
    pub fn faces(&self) -> &[TerrainFace; 6] {
        &self.faces
    }

    pub fn face(&self, face: CubeFace) -> &TerrainFace {
        &self.faces[face as usize]
    }

    /// Whether the first pass has run.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Refresh all six faces for the current viewer on the calling thread.
    ///
    /// The first pass constructs each tree; later passes update in place.
    pub fn generation_pass(&mut self) -> PassStats {
        let construct = !self.constructed;
        let ctx = self.surface.context(self.viewer, &self.lod_distances);

        let mut stats = PassStats::default();
        for face in &mut self.faces {
            let update = run_face(face, &ctx, construct);
            stats.accumulate(update, face);
        }

        self.finish_pass(stats)
    }

    /// Same as [`Planet::generation_pass`] with each face on its own scoped
    /// thread. Results are identical.
    pub fn generation_pass_parallel(&mut self) -> PassStats {
        let construct = !self.constructed;
        let ctx = self.surface.context(self.viewer, &self.lod_distances);

        let updates: Vec<FaceUpdate> = thread::scope(|scope| {
            let handles: Vec<_> = self
                .faces
                .iter_mut()
                .map(|face| {
                    let ctx = &ctx;
                    scope.spawn(move || run_face(face, ctx, construct))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        let mut stats = PassStats::default();
        for (update, face) in updates.into_iter().zip(&self.faces) {
            stats.accumulate(update, face);
        }

        self.finish_pass(stats)
    }

    fn finish_pass(&mut self, stats: PassStats) -> PassStats {
        self.constructed = true;
        info!(
            "Generation pass at distance {:.2}: {} faces rebuilt, {}/{} leaves visible, {} vertices, {} triangles",
            self.viewer_distance,
            stats.faces_rebuilt,
            stats.visible_leaves,
            stats.total_leaves,
            stats.vertices,
            stats.triangles
        );
        stats
    }
}

fn run_face(face: &mut TerrainFace, ctx: &LodContext<'_>, construct: bool) -> FaceUpdate {
    if construct {
        face.construct_tree(ctx)
    } else {
        face.update_tree(ctx)
    }
}
