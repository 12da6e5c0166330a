//! The leg-stands path.
//!
//! The path is the surface, parallel to the group's Y axis, that the conveyor
//! line sits directly above. A path coordinate is a scalar position along it:
//! the X coordinate for straight lines, an angle for curved ones.
//!
//! Implementations must round-trip coordinates: for any pose `p` and
//! coordinate `s`, `path_position(pose_at(s, p).position) == s` (up to float
//! rounding). The 3D pose itself need not round-trip, since the path may
//! normalise height or rotation away.

use std::fmt;

use nalgebra::{Point3, Vector3};

/// Position and YXZ Euler rotation of a leg in group space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegPose {
    /// Base position of the leg.
    pub position: Point3<f64>,
    /// Euler rotation in radians.
    pub rotation: Vector3<f64>,
}

impl LegPose {
    /// Creates a pose.
    #[must_use]
    pub const fn new(position: Point3<f64>, rotation: Vector3<f64>) -> Self {
        Self { position, rotation }
    }
}

/// Mapping between group-space positions and path coordinates.
pub trait LegStandsPath: fmt::Debug {
    /// Projects a group-space point onto the path and returns its coordinate.
    fn path_position(&self, position: &Point3<f64>) -> f64;

    /// Pose on the path at `path_position`.
    ///
    /// Whatever the path does not constrain (such as height) is taken from
    /// `current`.
    fn pose_at(&self, path_position: f64, current: &LegPose) -> LegPose;

    /// Moves `current` onto the path without changing its coordinate.
    fn snap(&self, current: &LegPose) -> LegPose {
        self.pose_at(self.path_position(&current.position), current)
    }
}

/// The path of a straight conveyor line: the group's XY plane.
///
/// Path coordinate is X. Placing a leg zeroes Z, keeps Y and keeps only the
/// Z rotation.
///
/// # Example
///
/// ```
/// use conveyor_legs::{LegPose, LegStandsPath, StraightPath};
/// use nalgebra::{Point3, Vector3};
///
/// let path = StraightPath;
/// let current = LegPose::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.1, 0.2, 0.3));
/// let placed = path.pose_at(5.0, &current);
///
/// assert_eq!(placed.position, Point3::new(5.0, 2.0, 0.0));
/// assert_eq!(placed.rotation, Vector3::new(0.0, 0.0, 0.3));
/// assert_eq!(path.path_position(&placed.position), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StraightPath;

impl LegStandsPath for StraightPath {
    fn path_position(&self, position: &Point3<f64>) -> f64 {
        position.x
    }

    fn pose_at(&self, path_position: f64, current: &LegPose) -> LegPose {
        LegPose::new(
            Point3::new(path_position, current.position.y, 0.0),
            Vector3::new(0.0, 0.0, current.rotation.z),
        )
    }
}
