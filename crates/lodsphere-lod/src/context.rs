//! Read-only state shared by every chunk during one generation pass.

use glam::DVec3;

use crate::horizon_culling::HorizonCuller;
use crate::lod_table::LodDistances;

/// Everything a chunk needs to decide its shape and produce its mesh.
///
/// Built once per pass by the planet and borrowed by all faces; nothing in
/// here is mutated while the pass runs, so faces may be processed on
/// separate threads.
#[derive(Clone, Debug)]
pub struct LodContext<'a> {
    /// Sphere radius.
    pub radius: f64,
    /// Planet center in world space.
    pub center: DVec3,
    /// Viewer position in world space.
    pub viewer: DVec3,
    /// Per-depth subdivision distances.
    pub lod_distances: &'a LodDistances,
    /// Deepest allowed chunk depth.
    pub max_depth: u8,
    /// Vertex samples per leaf side.
    pub resolution: u32,
    /// Horizon test for this viewer.
    pub culler: HorizonCuller,
}

impl<'a> LodContext<'a> {
    /// Build a context and its horizon culler.
    pub fn new(
        radius: f64,
        center: DVec3,
        viewer: DVec3,
        lod_distances: &'a LodDistances,
        max_depth: u8,
        resolution: u32,
        culling_min_angle: f64,
    ) -> Self {
        Self {
            radius,
            center,
            viewer,
            lod_distances,
            max_depth,
            resolution,
            culler: HorizonCuller::new(viewer, center, radius, culling_min_angle),
        }
    }

    /// Planet-local point to world space.
    #[inline]
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        local + self.center
    }

    /// Whether a chunk at `depth`, `distance` away from the viewer, should split.
    pub fn should_subdivide(&self, depth: u8, distance: f64) -> bool {
        depth < self.max_depth && self.lod_distances.allows_subdivision(depth, distance)
    }
}
