//! Horizon culling for a spherical planet.
//!
//! A leaf is kept when the angle at the planet center between the viewer
//! and the leaf's surface point is below a fixed threshold. The angle comes
//! from the law of cosines over the triangle (planet center, viewer, leaf),
//! so it needs only three distances and no camera orientation.

use glam::DVec3;

/// Default culling threshold: 110 degrees, in radians.
pub const DEFAULT_CULLING_MIN_ANGLE: f64 = 1.919_862_18;

/// How far past ±1 the cosine ratio may drift from rounding before the
/// sample is treated as undefined.
const RATIO_SLACK: f64 = 1e-9;

/// Horizon culling state computed once per generation pass.
#[derive(Clone, Debug)]
pub struct HorizonCuller {
    /// Viewer position in world space.
    viewer: DVec3,
    /// Planet radius.
    radius: f64,
    /// Distance from viewer to planet center.
    viewer_distance: f64,
    /// Leaves at this angle or wider are culled.
    min_angle: f64,
}

impl HorizonCuller {
    /// Create a culler for the given viewer and planet.
    pub fn new(viewer: DVec3, planet_center: DVec3, radius: f64, min_angle: f64) -> Self {
        Self {
            viewer,
            radius,
            viewer_distance: viewer.distance(planet_center),
            min_angle,
        }
    }

    /// Angle at the planet center between the viewer and a surface point.
    ///
    /// `acos((R² + D² − A²) / (2·R·D))` with `D` the viewer's distance to the
    /// center and `A` its distance to the point. Returns `None` when the
    /// angle is undefined: the viewer sits on the planet center, a distance
    /// is not finite, or the ratio leaves `[-1, 1]` by more than rounding.
    pub fn angle_to(&self, surface_point: DVec3) -> Option<f64> {
        let r = self.radius;
        let d = self.viewer_distance;
        let a = self.viewer.distance(surface_point);

        let denom = 2.0 * r * d;
        if denom.is_nan() || denom <= 0.0 {
            return None;
        }
        let ratio = (r * r + d * d - a * a) / denom;
        if !ratio.is_finite() || ratio.abs() > 1.0 + RATIO_SLACK {
            return None;
        }
        Some(ratio.clamp(-1.0, 1.0).acos())
    }

    /// Whether a surface point passes the horizon test.
    pub fn is_visible(&self, surface_point: DVec3) -> bool {
        self.angle_to(surface_point)
            .is_some_and(|angle| angle < self.min_angle)
    }

    /// Distance from the viewer to the planet center.
    pub fn viewer_distance(&self) -> f64 {
        self.viewer_distance
    }

    /// Viewer height above the surface, zero when inside the sphere.
    pub fn viewer_altitude(&self) -> f64 {
        (self.viewer_distance - self.radius).max(0.0)
    }
}
