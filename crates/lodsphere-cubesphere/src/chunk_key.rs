//! Unique chunk identifier on the cubesphere.

use crate::CubeFace;

/// Uniquely identifies a quadtree node on the cubesphere.
///
/// - `face`: which of the 6 cube faces this chunk belongs to.
/// - `depth`: quadtree depth. Depth 0 covers the whole face.
/// - `x`, `y`: grid coordinates within the face at this depth, `x` along the
///   face's `axis_a` and `y` along `axis_b`. At depth `d` the face is divided
///   into a `2^d × 2^d` grid.
///
/// Keys are plain values; they never own the node they name. A chunk's
/// parent is reachable through [`ChunkKey::parent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// Which cube face this chunk belongs to.
    pub face: CubeFace,
    /// Quadtree depth (0 = whole face).
    pub depth: u8,
    /// Grid coordinate along `axis_a`.
    pub x: u32,
    /// Grid coordinate along `axis_b`.
    pub y: u32,
}

impl ChunkKey {
    /// Deepest depth a key can address.
    pub const MAX_DEPTH: u8 = 31;

    /// Number of chunks along one axis at the given depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds [`Self::MAX_DEPTH`].
    #[must_use]
    pub fn grid_size(depth: u8) -> u32 {
        assert!(
            depth <= Self::MAX_DEPTH,
            "depth {depth} exceeds MAX_DEPTH {}",
            Self::MAX_DEPTH
        );
        1 << depth
    }

    /// The root key covering an entire face.
    #[must_use]
    pub fn root(face: CubeFace) -> Self {
        Self {
            face,
            depth: 0,
            x: 0,
            y: 0,
        }
    }

    /// Construct a `ChunkKey`, validating that `x` and `y` are within
    /// the grid bounds for the given depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds [`Self::MAX_DEPTH`] or if `x`/`y` are out of range.
    #[must_use]
    pub fn new(face: CubeFace, depth: u8, x: u32, y: u32) -> Self {
        let size = Self::grid_size(depth);
        assert!(x < size, "x={x} out of range for depth {depth} (max {size})");
        assert!(y < size, "y={y} out of range for depth {depth} (max {size})");
        Self { face, depth, x, y }
    }

    /// Footprint of this chunk in face-plane coordinates.
    ///
    /// Returns `(s_min, t_min, s_max, t_max)` with all values in `[-1, 1]`,
    /// `s` along `axis_a` and `t` along `axis_b`.
    #[must_use]
    pub fn footprint(&self) -> (f64, f64, f64, f64) {
        let size = Self::grid_size(self.depth) as f64;
        let s_min = 2.0 * self.x as f64 / size - 1.0;
        let t_min = 2.0 * self.y as f64 / size - 1.0;
        let s_max = 2.0 * (self.x + 1) as f64 / size - 1.0;
        let t_max = 2.0 * (self.y + 1) as f64 / size - 1.0;
        (s_min, t_min, s_max, t_max)
    }

    /// The parent key one level up, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<ChunkKey> {
        if self.depth == 0 {
            return None;
        }
        Some(ChunkKey {
            face: self.face,
            depth: self.depth - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// The four child keys one level down.
    ///
    /// Ordered `[(x, y), (x+1, y), (x, y+1), (x+1, y+1)]` at the child depth,
    /// i.e. quadrant `i` has `x` offset `i & 1` and `y` offset `i >> 1`.
    /// Returns `None` at [`Self::MAX_DEPTH`].
    #[must_use]
    pub fn children(&self) -> Option<[ChunkKey; 4]> {
        if self.depth >= Self::MAX_DEPTH {
            return None;
        }
        let child_depth = self.depth + 1;
        let cx = self.x * 2;
        let cy = self.y * 2;
        Some([
            ChunkKey::new(self.face, child_depth, cx, cy),
            ChunkKey::new(self.face, child_depth, cx + 1, cy),
            ChunkKey::new(self.face, child_depth, cx, cy + 1),
            ChunkKey::new(self.face, child_depth, cx + 1, cy + 1),
        ])
    }
}

impl std::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:?}, depth={}, x={}, y={})",
            self.face, self.depth, self.x, self.y
        )
    }
}
