//! Planet configuration errors.

/// Errors raised when a planet is built from an invalid configuration.
///
/// All of these are caller contract violations and are reported before any
/// geometry is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LodError {
    /// Sphere radius is zero, negative, or not finite.
    #[error("planet radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// Planet center has a non-finite component.
    #[error("planet center must be finite, got {0:?}")]
    InvalidCenter([f64; 3]),

    /// The LOD table has fewer entries than `max_depth + 1`.
    #[error("LOD table has {len} entries but max depth {max_depth} needs {required}")]
    LodTableTooShort {
        /// Number of entries supplied.
        len: usize,
        /// Configured maximum depth.
        max_depth: u8,
        /// Minimum number of entries.
        required: usize,
    },

    /// An LOD distance is NaN, zero, or negative.
    #[error("LOD distance at depth {depth} must be positive, got {value}")]
    InvalidLodDistance {
        /// Depth of the offending entry.
        depth: usize,
        /// The offending value.
        value: f64,
    },

    /// An LOD distance is larger than the one before it.
    #[error("LOD distances must not increase with depth: depth {depth} has {value} > {previous}")]
    LodTableNotMonotonic {
        /// Depth of the offending entry.
        depth: usize,
        /// Distance at `depth - 1`.
        previous: f64,
        /// Distance at `depth`.
        value: f64,
    },

    /// Culling angle outside `(0, π]` radians.
    #[error("culling angle must be in (0, pi] radians, got {0}")]
    InvalidCullingAngle(f64),

    /// Leaf grid resolution outside `2..=MAX_RESOLUTION` samples per side.
    #[error("chunk resolution must be between 2 and 256, got {0}")]
    InvalidResolution(u32),

    /// A fully subdivided face would need more vertices than `u32` indices address.
    #[error("resolution {resolution} at max depth {max_depth} overflows 32-bit mesh indices")]
    FaceTooLarge {
        /// Requested samples per leaf side.
        resolution: u32,
        /// Requested maximum depth.
        max_depth: u8,
    },

    /// Maximum depth beyond what chunk keys can address.
    #[error("max depth {requested} exceeds the supported limit {limit}")]
    MaxDepthTooLarge {
        /// Requested maximum depth.
        requested: u8,
        /// Deepest supported depth.
        limit: u8,
    },
}
