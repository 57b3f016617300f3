//! Area-weighted smooth vertex normals.

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Compute smooth per-vertex normals for an indexed triangle list.
///
/// Each triangle contributes its unnormalized face normal (whose length is
/// twice its area) to its three corners; the sums are then normalized.
/// Vertices whose positions fall into the same `weld_tolerance` cell share
/// one accumulated normal, so seams between separately generated patches
/// shade smoothly. A tolerance of `0.0` disables welding.
///
/// Vertices referenced by no triangle, or whose sum cancels out, get a zero
/// normal.
pub fn compute_smooth_normals(
    positions: &[[f32; 3]],
    indices: &[u32],
    weld_tolerance: f32,
) -> Vec<[f32; 3]> {
    let slots = weld_slots(positions, weld_tolerance);
    let slot_count = slots.iter().copied().max().map_or(0, |m| m + 1);
    let mut sums = vec![Vec3::ZERO; slot_count];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from(positions[a]);
        let pb = Vec3::from(positions[b]);
        let pc = Vec3::from(positions[c]);
        let face_normal = (pb - pa).cross(pc - pa);
        sums[slots[a]] += face_normal;
        sums[slots[b]] += face_normal;
        sums[slots[c]] += face_normal;
    }

    slots
        .iter()
        .map(|&slot| sums[slot].normalize_or_zero().to_array())
        .collect()
}

/// Map every vertex to an accumulation slot shared by coincident positions.
fn weld_slots(positions: &[[f32; 3]], weld_tolerance: f32) -> Vec<usize> {
    if weld_tolerance <= 0.0 {
        return (0..positions.len()).collect();
    }

    let inv = 1.0 / weld_tolerance as f64;
    let mut cells: FxHashMap<[i64; 3], usize> = FxHashMap::default();
    positions
        .iter()
        .map(|p| {
            let key = [
                (p[0] as f64 * inv).round() as i64,
                (p[1] as f64 * inv).round() as i64,
                (p[2] as f64 * inv).round() as i64,
            ];
            let next = cells.len();
            *cells.entry(key).or_insert(next)
        })
        .collect()
}
