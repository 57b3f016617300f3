//! The six faces of a cubesphere and their local orthonormal bases.

use glam::DVec3;

/// The six faces of the cube that forms the cubesphere.
///
/// Each variant corresponds to a face whose outward normal points
/// along the named axis direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +X face
    PosX = 0,
    /// −X face
    NegX = 1,
    /// +Y face
    PosY = 2,
    /// −Y face
    NegY = 3,
    /// +Z face
    PosZ = 4,
    /// −Z face
    NegZ = 5,
}

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// The opposite face (e.g., `PosX` → `NegX`).
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::PosX => CubeFace::NegX,
            CubeFace::NegX => CubeFace::PosX,
            CubeFace::PosY => CubeFace::NegY,
            CubeFace::NegY => CubeFace::PosY,
            CubeFace::PosZ => CubeFace::NegZ,
            CubeFace::NegZ => CubeFace::PosZ,
        }
    }

    /// Outward-pointing unit normal for this face (the face's local up).
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::PosX => DVec3::X,
            CubeFace::NegX => DVec3::NEG_X,
            CubeFace::PosY => DVec3::Y,
            CubeFace::NegY => DVec3::NEG_Y,
            CubeFace::PosZ => DVec3::Z,
            CubeFace::NegZ => DVec3::NEG_Z,
        }
    }

    /// The orthonormal basis spanning this face.
    #[must_use]
    pub fn basis(self) -> FaceBasis {
        FaceBasis::from_local_up(self.normal())
    }
}

/// Local frame of one cube face.
///
/// `axis_a` is a coordinate swizzle of `local_up` and `axis_b` is derived
/// from the cross product, so `axis_a × axis_b == local_up` on every face
/// and adjacent faces share their edges exactly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBasis {
    /// Outward face normal.
    pub local_up: DVec3,
    /// First in-plane axis, `(up.y, up.z, up.x)`.
    pub axis_a: DVec3,
    /// Second in-plane axis, `up × axis_a`.
    pub axis_b: DVec3,
}

impl FaceBasis {
    /// Derive the basis from a face normal.
    #[must_use]
    pub fn from_local_up(local_up: DVec3) -> Self {
        let axis_a = DVec3::new(local_up.y, local_up.z, local_up.x);
        let axis_b = local_up.cross(axis_a);
        Self {
            local_up,
            axis_a,
            axis_b,
        }
    }

    /// Point on the unit cube face for in-plane coordinates `(s, t) ∈ [-1, 1]²`.
    #[inline]
    #[must_use]
    pub fn cube_point(&self, s: f64, t: f64) -> DVec3 {
        self.local_up + self.axis_a * s + self.axis_b * t
    }
}
