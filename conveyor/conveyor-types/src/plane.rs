//! Infinite planes and ray intersection.

use nalgebra::{Point3, Vector3};

use crate::transform::Transform3;

/// Tolerance for parallel rays and for rays starting on the plane.
pub const PLANE_EPSILON: f64 = 1e-5;

/// A plane `normal · p = d` with a unit normal.
///
/// # Example
///
/// ```
/// use conveyor_types::Plane;
/// use nalgebra::{Point3, Vector3};
///
/// let floor = Plane::from_normal_point(Vector3::y(), &Point3::new(0.0, 3.0, 0.0));
/// let hit = floor.intersects_ray(&Point3::new(1.0, 1.0, 0.0), &Vector3::y());
/// assert_eq!(hit, Some(Point3::new(1.0, 3.0, 0.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    /// Unit normal.
    pub normal: Vector3<f64>,
    /// Signed distance from the origin along the normal.
    pub d: f64,
}

impl Plane {
    /// Creates the plane through `point` with the given normal.
    ///
    /// The normal is normalized; a zero normal falls back to +Y.
    #[must_use]
    pub fn from_normal_point(normal: Vector3<f64>, point: &Point3<f64>) -> Self {
        let normal = normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::y);
        Self {
            normal,
            d: normal.dot(&point.coords),
        }
    }

    /// A point on the plane (the one closest to the origin).
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from(self.normal * self.d)
    }

    /// Signed distance from `point` to the plane, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.d
    }

    /// Maps the plane through an affine transform.
    ///
    /// Normals go through the inverse-transpose of the basis so the plane
    /// stays correct under non-uniform scale.
    #[must_use]
    pub fn transformed(&self, transform: &Transform3) -> Self {
        let point = transform.transform_point(&self.center());
        let normal_basis = transform
            .basis
            .try_inverse()
            .map_or(transform.basis, |inv| inv.transpose());
        Self::from_normal_point(normal_basis * self.normal, &point)
    }

    /// Intersects a ray with the plane.
    ///
    /// Returns `None` when the ray is parallel to the plane or the plane lies
    /// behind the ray origin.
    #[must_use]
    pub fn intersects_ray(&self, from: &Point3<f64>, direction: &Vector3<f64>) -> Option<Point3<f64>> {
        let den = self.normal.dot(direction);
        if den.abs() <= PLANE_EPSILON {
            return None;
        }
        let dist = self.signed_distance(from) / den;
        if dist > PLANE_EPSILON {
            return None;
        }
        Some(*from - direction * dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;

    #[test]
    fn test_ray_hits_plane_ahead() {
        let plane = Plane::from_normal_point(Vector3::y(), &Point3::new(0.0, 2.0, 0.0));
        let hit = plane.intersects_ray(&Point3::new(0.0, 1.0, 0.0), &Vector3::y());
        assert_relative_eq!(hit.map_or(f64::NAN, |p| p.y), 2.0);
    }

    #[test]
    fn test_ray_misses_plane_behind() {
        let plane = Plane::from_normal_point(Vector3::y(), &Point3::new(0.0, -1.0, 0.0));
        assert!(plane
            .intersects_ray(&Point3::new(0.0, 1.0, 0.0), &Vector3::y())
            .is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = Plane::from_normal_point(Vector3::y(), &Point3::origin());
        assert!(plane
            .intersects_ray(&Point3::new(0.0, 1.0, 0.0), &Vector3::x())
            .is_none());
    }

    #[test]
    fn test_downward_normal_still_hits() {
        let plane = Plane::from_normal_point(-Vector3::y(), &Point3::new(0.0, 5.0, 0.0));
        let hit = plane.intersects_ray(&Point3::origin(), &Vector3::y());
        assert_relative_eq!(hit.map_or(f64::NAN, |p| p.y), 5.0);
    }

    #[test]
    fn test_transformed_translation_and_tilt() {
        let plane = Plane::from_normal_point(Vector3::y(), &Point3::origin());
        let lifted = plane.transformed(&Transform3::from_translation(Vector3::new(0.0, 4.0, 0.0)));
        assert_relative_eq!(lifted.d, 4.0);

        let tilt = Transform3::from_euler_scale(
            &Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_4),
            &Vector3::new(1.0, 1.0, 1.0),
            Vector3::zeros(),
        );
        let tilted = plane.transformed(&tilt);
        let expected = Vector3::new(-1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(tilted.normal, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_transformed_non_uniform_scale_keeps_points_on_plane() {
        let plane = Plane::from_normal_point(Vector3::new(1.0, 1.0, 0.0), &Point3::new(1.0, 0.0, 0.0));
        let t = Transform3::new(
            Matrix3::from_diagonal(&Vector3::new(3.0, 1.0, 1.0)),
            Vector3::zeros(),
        );
        let moved = plane.transformed(&t);
        let on_plane = t.transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(moved.signed_distance(&on_plane), 0.0, epsilon = 1e-12);
    }
}
