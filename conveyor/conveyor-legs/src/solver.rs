//! Leg heights, grab rotations and visibility.
//!
//! Each leg is extended along its own up axis until it meets the conveyor
//! support plane: the plane `grabs_offset` below the conveyors group's XZ
//! plane.

use conveyor_types::{AssemblyConfig, CoverageRange, Plane, Transform3};
use nalgebra::{Matrix3, Point3, Vector3};

use crate::group::LegStandsGroup;
use crate::path::LegStandsPath;
use crate::stand::LegStand;

/// Conveyor support plane in leg-stands space.
#[must_use]
pub fn support_plane(conveyors: &Transform3, group: &Transform3, grabs_offset: f64) -> Plane {
    Plane::from_normal_point(Vector3::y(), &Point3::new(0.0, -grabs_offset, 0.0))
        .transformed(&(group.affine_inverse() * *conveyors))
}

/// Solves height, grab rotation and visibility for every leg in the group.
///
/// Returns the number of visible legs.
pub(crate) fn solve_heights(
    path: &dyn LegStandsPath,
    group: &mut LegStandsGroup,
    conveyors: &Transform3,
    config: &AssemblyConfig,
    coverage: &CoverageRange,
) -> usize {
    let plane = support_plane(conveyors, group.transform(), config.grabs_offset);
    let global_basis = group.global_basis();
    let global_normal = global_basis
        .try_inverse()
        .map_or(plane.normal, |inverse| inverse.transpose() * plane.normal);

    let mut visible = 0;
    for leg in group.legs_mut() {
        solve_leg(path, leg, &plane, &global_normal, &global_basis, coverage);
        visible += usize::from(leg.visible);
    }
    visible
}

fn solve_leg(
    path: &dyn LegStandsPath,
    leg: &mut LegStand,
    plane: &Plane,
    global_normal: &Vector3<f64>,
    group_global_basis: &Matrix3<f64>,
    coverage: &CoverageRange,
) {
    let up = normalize_or_zero(&leg.basis().column(1).into_owned());
    let Some(hit) = plane.intersects_ray(&(leg.position + up), &up) else {
        leg.visible = false;
        leg.set_height(1.0);
        return;
    };

    leg.set_height(nalgebra::distance(&hit, &leg.position));

    let side = normalize_or_zero(&(group_global_basis * leg.basis()).column(2).into_owned());
    let projected = slide(global_normal, &side);
    leg.grabs_rotation = signed_angle(&Vector3::y(), &projected, &side).to_degrees();

    let tip = leg.position + leg.basis().column(1).into_owned();
    leg.visible = coverage.contains(path.path_position(&tip));
}

fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// Removes the component of `v` along the unit vector `normal`.
fn slide(v: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    v - normal * v.dot(normal)
}

/// Angle from `from` to `to`, signed by the side of `axis` the turn is on.
fn signed_angle(from: &Vector3<f64>, to: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    let cross = from.cross(to);
    let angle = cross.norm().atan2(from.dot(to));
    if cross.dot(axis) < 0.0 { -angle } else { angle }
}
