//! Coverage: the span of path coordinates the conveyor line sits above.

use conveyor_types::{AssemblyConfig, CoverageRange, Transform3};
use nalgebra::Point3;

use crate::conveyors::ConveyorsGroup;
use crate::path::LegStandsPath;

/// Computes the coverage range of the conveyor line in leg-stands space.
///
/// Each segment contributes two grab points: its ends pulled inward by
/// `margin_ends` and dropped by `grabs_offset`, mapped through the segment's
/// rotation and translation relative to the leg-stands group. The range is
/// the min and max path coordinate over all grab points. An empty line
/// yields `(0, 0)`.
///
/// # Example
///
/// ```
/// use conveyor_legs::{ConveyorsGroup, StraightPath, compute_coverage};
/// use conveyor_types::{AssemblyConfig, ConveyorSegment, Transform3};
/// use nalgebra::Vector3;
///
/// let line = ConveyorsGroup::default()
///     .with_segment(ConveyorSegment::straight(10.0, Vector3::new(5.0, 0.0, 0.0)));
/// let config = AssemblyConfig::default().with_margin_ends(1.0);
///
/// let range = compute_coverage(&StraightPath, &line, &Transform3::identity(), &config);
/// assert_eq!((range.min, range.max), (1.0, 9.0));
/// ```
#[must_use]
pub fn compute_coverage(
    path: &dyn LegStandsPath,
    conveyors: &ConveyorsGroup,
    group_transform: &Transform3,
    config: &AssemblyConfig,
) -> CoverageRange {
    let to_group = group_transform.affine_inverse() * *conveyors.transform();

    conveyors
        .segments()
        .iter()
        .flat_map(|segment| {
            let local = to_group * segment.transform;
            let half = (local.scale().x * 0.5).abs();
            let frame = local.orthonormalized();
            [
                Point3::new(-half + config.margin_ends, -config.grabs_offset, 0.0),
                Point3::new(half - config.margin_ends, -config.grabs_offset, 0.0),
            ]
            .map(|grab| path.path_position(&frame.transform_point(&grab)))
        })
        .fold(None, |range: Option<CoverageRange>, coordinate| {
            Some(range.map_or(CoverageRange::new(coordinate, coordinate), |r| {
                CoverageRange::new(r.min.min(coordinate), r.max.max(coordinate))
            }))
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::StraightPath;
    use approx::assert_relative_eq;
    use conveyor_types::ConveyorSegment;
    use nalgebra::{Matrix3, Rotation3, Vector3};

    fn config() -> AssemblyConfig {
        AssemblyConfig::default().with_margin_ends(0.0).with_grabs_offset(0.0)
    }

    fn line(segments: &[(f64, f64)]) -> ConveyorsGroup {
        segments.iter().fold(ConveyorsGroup::default(), |line, &(length, x)| {
            line.with_segment(ConveyorSegment::straight(length, Vector3::new(x, 0.0, 0.0)))
        })
    }

    #[test]
    fn test_empty_line_is_zero() {
        let range = compute_coverage(
            &StraightPath,
            &ConveyorsGroup::default(),
            &Transform3::identity(),
            &config(),
        );
        assert!(range.bitwise_eq(&CoverageRange::new(0.0, 0.0)));
    }

    #[test]
    fn test_single_segment_extent() {
        let range = compute_coverage(&StraightPath, &line(&[(4.0, 3.0)]), &Transform3::identity(), &config());
        assert_relative_eq!(range.min, 1.0);
        assert_relative_eq!(range.max, 5.0);
    }

    #[test]
    fn test_group_offset_shifts_range() {
        let group = Transform3::from_translation(Vector3::new(2.0, -1.0, 0.0));
        let range = compute_coverage(&StraightPath, &line(&[(4.0, 3.0)]), &group, &config());
        assert_relative_eq!(range.min, -1.0);
        assert_relative_eq!(range.max, 3.0);
    }

    #[test]
    fn test_grab_offset_projects_on_tilted_line() {
        let angle = 0.3_f64;
        let conveyors = ConveyorsGroup::new(Transform3::new(
            Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into_inner(),
            Vector3::zeros(),
        ))
        .with_segment(ConveyorSegment::straight(2.0, Vector3::zeros()));
        let config = config().with_grabs_offset(1.0);

        let range = compute_coverage(&StraightPath, &conveyors, &Transform3::identity(), &config);
        // Grab points are (-1, -1) and (1, -1) rotated by the tilt.
        let (s, c) = angle.sin_cos();
        assert_relative_eq!(range.min, -c + s, epsilon = 1e-12);
        assert_relative_eq!(range.max, c + s, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_scale_is_not_applied_twice() {
        let conveyors = ConveyorsGroup::new(Transform3::new(
            Matrix3::from_diagonal(&Vector3::new(2.0, 1.0, 1.0)),
            Vector3::zeros(),
        ))
        .with_segment(ConveyorSegment::straight(3.0, Vector3::zeros()));
        let range = compute_coverage(&StraightPath, &conveyors, &Transform3::identity(), &config());
        assert_relative_eq!(range.min, -3.0);
        assert_relative_eq!(range.max, 3.0);
    }

    #[test]
    fn test_margin_wider_than_segment_swaps_ends() {
        let config = config().with_margin_ends(2.0);
        let range = compute_coverage(&StraightPath, &line(&[(2.0, 0.0)]), &Transform3::identity(), &config);
        assert_relative_eq!(range.min, -1.0);
        assert_relative_eq!(range.max, 1.0);
    }

    #[test]
    fn test_adding_segments_never_shrinks() {
        let segments = [(4.0, 0.0), (2.0, 5.0), (1.0, 2.0), (6.0, -4.0), (0.5, 1.0)];
        let mut previous: Option<CoverageRange> = None;
        for n in 1..=segments.len() {
            let range = compute_coverage(
                &StraightPath,
                &line(&segments[..n]),
                &Transform3::identity(),
                &config(),
            );
            if let Some(prev) = previous {
                assert!(range.min <= prev.min);
                assert!(range.max >= prev.max);
            }
            previous = Some(range);
        }
    }
}
