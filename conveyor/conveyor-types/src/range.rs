//! Coverage ranges along the leg-stands path.

/// The `[min, max]` span of path coordinates a conveyor line occupies.
///
/// With no conveyor segments both bounds are zero. `min <= max` is not
/// otherwise enforced.
///
/// # Example
///
/// ```
/// use conveyor_types::CoverageRange;
///
/// let range = CoverageRange::new(0.0, 10.0);
/// assert!(range.contains(0.0));
/// assert!(range.contains(10.0));
/// assert!(!range.contains(11.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageRange {
    /// Smallest covered path coordinate.
    pub min: f64,
    /// Largest covered path coordinate.
    pub max: f64,
}

impl CoverageRange {
    /// Creates a range from its bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `coordinate` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, coordinate: f64) -> bool {
        self.min <= coordinate && coordinate <= self.max
    }

    /// Bit-for-bit equality, distinguishing `0.0` from `-0.0`.
    #[must_use]
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.min.to_bits() == other.min.to_bits() && self.max.to_bits() == other.max.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let range = CoverageRange::default();
        assert!(range.bitwise_eq(&CoverageRange::new(0.0, 0.0)));
        assert!(range.contains(0.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = CoverageRange::new(-2.0, 3.0);
        assert!(range.contains(-2.0));
        assert!(range.contains(3.0));
        assert!(!range.contains(-3.0));
        assert!(!range.contains(4.0));
    }

    #[test]
    fn test_bitwise_eq_signed_zero() {
        let a = CoverageRange::new(0.0, 1.0);
        let b = CoverageRange::new(-0.0, 1.0);
        assert_eq!(a, b);
        assert!(!a.bitwise_eq(&b));
    }
}
