//! Cube-to-sphere projection by normalization.

use glam::DVec3;

/// Project a point on the cube surface onto a sphere of the given radius.
///
/// The point is normalized and scaled. Returns `None` for the degenerate
/// origin, which has no direction.
#[inline]
#[must_use]
pub fn cube_to_sphere(cube_point: DVec3, radius: f64) -> Option<DVec3> {
    cube_point.try_normalize().map(|dir| dir * radius)
}

/// Project onto the unit sphere.
#[inline]
#[must_use]
pub fn cube_to_unit_sphere(cube_point: DVec3) -> Option<DVec3> {
    cube_to_sphere(cube_point, 1.0)
}
