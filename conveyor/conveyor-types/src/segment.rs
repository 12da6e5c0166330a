//! Conveyor segments as seen by the leg-stand engine.

use nalgebra::{Matrix3, Vector3};

use crate::transform::Transform3;

/// The family a conveyor segment belongs to.
///
/// Only affects how wide the supporting legs are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConveyorKind {
    /// Flat belt conveyor.
    #[default]
    Belt,
    /// Straight roller conveyor; rollers overhang the frame on both sides.
    Roller,
    /// Curved roller conveyor; slightly wider than its nominal width.
    CurvedRoller,
}

/// A read-only view of one conveyor in the line.
///
/// The segment's length along the line is the X scale of its basis; the
/// segment spans `±length / 2` around its origin in its own frame.
///
/// # Example
///
/// ```
/// use conveyor_types::ConveyorSegment;
/// use nalgebra::Vector3;
///
/// let segment = ConveyorSegment::straight(4.0, Vector3::new(2.0, 1.0, 0.0));
/// assert_eq!(segment.transform.scale().x, 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConveyorSegment {
    /// Transform relative to the conveyors group.
    pub transform: Transform3,
    /// Conveyor family.
    pub kind: ConveyorKind,
}

impl ConveyorSegment {
    /// Creates a belt segment with the given transform.
    #[must_use]
    pub const fn new(transform: Transform3) -> Self {
        Self {
            transform,
            kind: ConveyorKind::Belt,
        }
    }

    /// Creates an axis-aligned segment of the given length centred on `origin`.
    #[must_use]
    pub fn straight(length: f64, origin: Vector3<f64>) -> Self {
        Self::new(Transform3::new(
            Matrix3::from_diagonal(&Vector3::new(length, 1.0, 1.0)),
            origin,
        ))
    }

    /// Sets the conveyor family.
    #[must_use]
    pub const fn with_kind(mut self, kind: ConveyorKind) -> Self {
        self.kind = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_segment_length_is_x_scale() {
        let segment = ConveyorSegment::straight(3.0, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(segment.transform.basis, Matrix3::from_diagonal(&Vector3::new(3.0, 1.0, 1.0)));
        assert_eq!(segment.transform.origin.x, 1.0);
        assert_eq!(segment.kind, ConveyorKind::Belt);
    }

    #[test]
    fn test_with_kind() {
        let segment =
            ConveyorSegment::straight(1.0, Vector3::zeros()).with_kind(ConveyorKind::Roller);
        assert_eq!(segment.kind, ConveyorKind::Roller);
    }
}
