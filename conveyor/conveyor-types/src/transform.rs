//! Affine transforms with a free-form basis.
//!
//! Conveyor segments encode their length as the X scale of their basis, so
//! transforms here keep a full 3x3 basis (rotation, scale and shear) rather
//! than an isometry. Composition follows the usual parent-times-child order.

use std::ops::Mul;

use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// An affine transform: a 3x3 basis followed by a translation.
///
/// Equality is exact (component-wise `==`), which is what change detection
/// relies on.
///
/// # Example
///
/// ```
/// use conveyor_types::Transform3;
/// use nalgebra::{Point3, Vector3};
///
/// let parent = Transform3::from_translation(Vector3::new(10.0, 0.0, 0.0));
/// let child = Transform3::from_translation(Vector3::new(0.0, 2.0, 0.0));
///
/// let p = (parent * child).transform_point(&Point3::origin());
/// assert_eq!(p, Point3::new(10.0, 2.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform3 {
    /// Basis; columns are the transformed X, Y and Z axes.
    pub basis: Matrix3<f64>,
    /// Translation applied after the basis.
    pub origin: Vector3<f64>,
}

impl Default for Transform3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3 {
    /// Creates a transform from a basis and an origin.
    #[must_use]
    pub const fn new(basis: Matrix3<f64>, origin: Vector3<f64>) -> Self {
        Self { basis, origin }
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// A pure translation.
    #[must_use]
    pub fn from_translation(origin: Vector3<f64>) -> Self {
        Self::new(Matrix3::identity(), origin)
    }

    /// Builds a transform from YXZ Euler angles (radians), a local scale and
    /// an origin. The basis is `Ry * Rx * Rz * diag(scale)`.
    #[must_use]
    pub fn from_euler_scale(euler: &Vector3<f64>, scale: &Vector3<f64>, origin: Vector3<f64>) -> Self {
        Self::new(
            basis_from_euler(euler) * Matrix3::from_diagonal(scale),
            origin,
        )
    }

    /// Inverse of the full affine transform.
    ///
    /// A singular basis has no inverse; it maps to the zero basis so that
    /// downstream geometry degenerates instead of producing NaNs.
    #[must_use]
    pub fn affine_inverse(&self) -> Self {
        let basis = self.basis.try_inverse().unwrap_or_else(Matrix3::zeros);
        Self::new(basis, -(basis * self.origin))
    }

    /// Strips scale and shear from the basis with Gram-Schmidt over its
    /// columns (X first). The origin is kept.
    #[must_use]
    pub fn orthonormalized(&self) -> Self {
        let x = self.basis.column(0).into_owned();
        let y = self.basis.column(1).into_owned();
        let z = self.basis.column(2).into_owned();

        let x = normalize_or_zero(&x);
        let y = normalize_or_zero(&(y - x * x.dot(&y)));
        let z = normalize_or_zero(&(z - x * x.dot(&z) - y * y.dot(&z)));

        Self::new(Matrix3::from_columns(&[x, y, z]), self.origin)
    }

    /// Per-axis scale: column lengths, negated when the basis mirrors.
    #[must_use]
    pub fn scale(&self) -> Vector3<f64> {
        let sign = if self.basis.determinant() < 0.0 { -1.0 } else { 1.0 };
        Vector3::new(
            self.basis.column(0).norm(),
            self.basis.column(1).norm(),
            self.basis.column(2).norm(),
        ) * sign
    }

    /// YXZ Euler angles (radians) of the rotation part of the basis.
    #[must_use]
    pub fn euler(&self) -> Vector3<f64> {
        euler_from_basis(&self.orthonormalized().basis)
    }

    /// Maps a point through the transform.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.basis * point.coords + self.origin)
    }
}

impl Mul for Transform3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.basis * rhs.basis, self.basis * rhs.origin + self.origin)
    }
}

impl Mul<&Transform3> for &Transform3 {
    type Output = Transform3;

    fn mul(self, rhs: &Transform3) -> Transform3 {
        *self * *rhs
    }
}

/// Rotation basis for YXZ Euler angles: `Ry * Rx * Rz`.
#[must_use]
pub fn basis_from_euler(euler: &Vector3<f64>) -> Matrix3<f64> {
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), euler.y);
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), euler.x);
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), euler.z);
    (ry * rx * rz).into_inner()
}

/// YXZ Euler angles of an orthonormal basis.
///
/// Gimbal-locked bases (pitch of ±90°) fold all yaw into Y and report a zero
/// roll.
#[must_use]
pub fn euler_from_basis(m: &Matrix3<f64>) -> Vector3<f64> {
    const LOCK: f64 = 1.0 - 1e-5;
    let m12 = m[(1, 2)];
    if m12 >= LOCK {
        return Vector3::new(
            -std::f64::consts::FRAC_PI_2,
            -m[(0, 1)].atan2(m[(0, 0)]),
            0.0,
        );
    }
    if m12 <= -LOCK {
        return Vector3::new(
            std::f64::consts::FRAC_PI_2,
            m[(0, 1)].atan2(m[(0, 0)]),
            0.0,
        );
    }
    Vector3::new(
        (-m12).asin(),
        m[(0, 2)].atan2(m[(2, 2)]),
        m[(1, 0)].atan2(m[(1, 1)]),
    )
}

fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
}
