//! Per-depth subdivision distances.

use crate::LodError;

/// Maximum viewer distance at which a chunk of each depth may subdivide.
///
/// `distance(depth)` is compared against the distance from the viewer to the
/// chunk's projected center. Entries never increase with depth, so detail
/// tightens toward the viewer. Depth 0 is normally infinite so the root of
/// every face is always split once.
#[derive(Clone, Debug, PartialEq)]
pub struct LodDistances {
    distances: Vec<f64>,
}

impl LodDistances {
    /// Table derived from the sphere radius, covering depths 0 through 8.
    ///
    /// `[∞, 6R, 3R, 1.5R, 0.75R, 0.25R, R/12, R/36, R/108]`: the first few
    /// levels halve, the finer ones shrink by thirds.
    pub fn from_radius(radius: f64) -> Self {
        let mut distances = Vec::with_capacity(9);
        distances.push(f64::INFINITY);
        let mut d = radius * 6.0;
        distances.push(d);
        for _ in 0..3 {
            d /= 2.0;
            distances.push(d);
        }
        for _ in 0..4 {
            d /= 3.0;
            distances.push(d);
        }
        Self { distances }
    }

    /// Validate and wrap an explicit table.
    ///
    /// Every entry must be positive (infinity is allowed) and no entry may
    /// exceed the one before it.
    pub fn custom(distances: Vec<f64>) -> Result<Self, LodError> {
        for (depth, &value) in distances.iter().enumerate() {
            if value.is_nan() || value <= 0.0 {
                return Err(LodError::InvalidLodDistance { depth, value });
            }
            if depth > 0 && value > distances[depth - 1] {
                return Err(LodError::LodTableNotMonotonic {
                    depth,
                    previous: distances[depth - 1],
                    value,
                });
            }
        }
        Ok(Self { distances })
    }

    /// Subdivision distance for `depth`, if the table has one.
    pub fn get(&self, depth: u8) -> Option<f64> {
        self.distances.get(depth as usize).copied()
    }

    /// Whether a chunk at `depth` and `distance` from the viewer may split.
    ///
    /// Depths past the end of the table never split; a NaN distance never
    /// passes the comparison.
    pub fn allows_subdivision(&self, depth: u8, distance: f64) -> bool {
        self.get(depth).is_some_and(|limit| distance <= limit)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// The raw distances.
    pub fn as_slice(&self) -> &[f64] {
        &self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_radius_values() {
        let table = LodDistances::from_radius(100.0);
        assert_eq!(table.len(), 9);
        assert!(table.get(0).unwrap().is_infinite());
        let expected = [600.0, 300.0, 150.0, 75.0, 25.0, 100.0 / 12.0, 100.0 / 36.0, 100.0 / 108.0];
        for (i, want) in expected.iter().enumerate() {
            let got = table.get(i as u8 + 1).unwrap();
            assert!((got - want).abs() < 1e-9, "depth {}: {got} != {want}", i + 1);
        }
    }

    #[test]
    fn test_from_radius_is_valid_custom_table() {
        let table = LodDistances::from_radius(6371.0);
        assert!(LodDistances::custom(table.as_slice().to_vec()).is_ok());
    }

    #[test]
    fn test_rejects_increasing_entry() {
        let err = LodDistances::custom(vec![f64::INFINITY, 100.0, 200.0]).unwrap_err();
        assert_eq!(
            err,
            LodError::LodTableNotMonotonic {
                depth: 2,
                previous: 100.0,
                value: 200.0
            }
        );
    }

    #[test]
    fn test_rejects_non_positive_and_nan() {
        assert!(matches!(
            LodDistances::custom(vec![10.0, 0.0]),
            Err(LodError::InvalidLodDistance { depth: 1, .. })
        ));
        assert!(matches!(
            LodDistances::custom(vec![f64::NAN]),
            Err(LodError::InvalidLodDistance { depth: 0, .. })
        ));
        assert!(matches!(
            LodDistances::custom(vec![10.0, -1.0]),
            Err(LodError::InvalidLodDistance { depth: 1, .. })
        ));
    }

    #[test]
    fn test_equal_entries_are_allowed() {
        assert!(LodDistances::custom(vec![50.0, 50.0, 10.0]).is_ok());
    }

    #[test]
    fn test_allows_subdivision_boundary() {
        let table = LodDistances::custom(vec![f64::INFINITY, 600.0]).unwrap();
        assert!(table.allows_subdivision(0, 1e300));
        assert!(table.allows_subdivision(1, 600.0));
        assert!(!table.allows_subdivision(1, 600.0001));
        assert!(!table.allows_subdivision(2, 0.0), "missing entry never splits");
        assert!(!table.allows_subdivision(1, f64::NAN));
    }
}
