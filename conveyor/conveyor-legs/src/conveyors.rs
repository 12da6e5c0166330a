//! The conveyors group: the sibling node holding every conveyor segment.

use conveyor_types::{ConveyorKind, ConveyorSegment, Transform3};
use nalgebra::{Matrix3, Rotation3, Vector3};

/// The conveyor line the legs support.
///
/// Segment transforms are relative to the group; the group transform is
/// relative to the assembly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConveyorsGroup {
    transform: Transform3,
    segments: Vec<ConveyorSegment>,
}

impl ConveyorsGroup {
    /// Creates an empty line with the given group transform.
    #[must_use]
    pub const fn new(transform: Transform3) -> Self {
        Self {
            transform,
            segments: Vec::new(),
        }
    }

    /// Appends a segment.
    #[must_use]
    pub fn with_segment(mut self, segment: ConveyorSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Group transform.
    #[must_use]
    pub const fn transform(&self) -> &Transform3 {
        &self.transform
    }

    /// Segments in line order.
    #[must_use]
    pub fn segments(&self) -> &[ConveyorSegment] {
        &self.segments
    }

    /// Kind of the first segment, which decides leg width.
    #[must_use]
    pub fn first_kind(&self) -> Option<ConveyorKind> {
        self.segments.first().map(|s| s.kind)
    }

    pub(crate) fn set_transform(&mut self, transform: Transform3) -> bool {
        if self.transform == transform {
            return false;
        }
        self.transform = transform;
        true
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<ConveyorSegment> {
        &mut self.segments
    }

    /// Tilts the line by `angle` radians around Z.
    ///
    /// The rotation is applied in unscaled assembly space, so the assembly
    /// scale is divided back out of the basis. The origin is kept. Returns
    /// `true` if the transform changed.
    pub(crate) fn set_angle(&mut self, angle: f64, assembly_scale: &Vector3<f64>) -> bool {
        let unscale = Matrix3::from_diagonal(&assembly_scale.map(|s| if s == 0.0 { 0.0 } else { 1.0 / s }));
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into_inner();
        self.set_transform(Transform3::new(unscale * rotation, self.transform.origin))
    }
}
