//! The leg-stands group: the node whose children are the leg stands.

use conveyor_types::{Transform3, basis_from_euler};
use nalgebra::{Matrix3, Vector3};

use crate::error::{LegStandsError, LegStandsResult};
use crate::stand::LegStand;

/// Parent of every leg stand, aligned with the conveyors group.
#[derive(Debug, Clone, PartialEq)]
pub struct LegStandsGroup {
    transform: Transform3,
    parent_global_basis: Matrix3<f64>,
    children: Vec<LegStand>,
}

impl Default for LegStandsGroup {
    fn default() -> Self {
        Self::new(Transform3::identity())
    }
}

impl LegStandsGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(transform: Transform3) -> Self {
        Self {
            transform,
            parent_global_basis: Matrix3::identity(),
            children: Vec::new(),
        }
    }

    /// Appends a leg in sibling order.
    #[must_use]
    pub fn with_leg(mut self, leg: LegStand) -> Self {
        self.children.push(leg);
        self
    }

    /// Sets the global basis of the assembly the group hangs from.
    #[must_use]
    pub const fn with_parent_global_basis(mut self, basis: Matrix3<f64>) -> Self {
        self.parent_global_basis = basis;
        self
    }

    /// Group transform relative to the assembly.
    #[must_use]
    pub const fn transform(&self) -> &Transform3 {
        &self.transform
    }

    /// Group basis in world space.
    #[must_use]
    pub fn global_basis(&self) -> Matrix3<f64> {
        self.parent_global_basis * self.transform.basis
    }

    /// Legs in sibling order.
    #[must_use]
    pub fn legs(&self) -> &[LegStand] {
        &self.children
    }

    /// Looks up a leg by name.
    #[must_use]
    pub fn leg(&self, name: &str) -> Option<&LegStand> {
        self.children.iter().find(|leg| leg.name() == name)
    }

    pub(crate) fn legs_mut(&mut self) -> &mut Vec<LegStand> {
        &mut self.children
    }

    pub(crate) fn leg_mut(&mut self, name: &str) -> Option<&mut LegStand> {
        self.children.iter_mut().find(|leg| leg.name() == name)
    }

    pub(crate) fn set_transform(&mut self, transform: Transform3) -> bool {
        if self.transform == transform {
            return false;
        }
        self.transform = transform;
        true
    }

    pub(crate) fn set_parent_global_basis(&mut self, basis: Matrix3<f64>) -> bool {
        if self.parent_global_basis == basis {
            return false;
        }
        self.parent_global_basis = basis;
        true
    }

    /// Appends a leg, rejecting duplicate names.
    pub(crate) fn insert(&mut self, leg: LegStand) -> LegStandsResult<()> {
        if self.leg(leg.name()).is_some() {
            return Err(LegStandsError::DuplicateLeg {
                name: leg.name().to_owned(),
            });
        }
        self.children.push(leg);
        Ok(())
    }

    /// Removes a leg by name.
    pub(crate) fn remove(&mut self, name: &str) -> LegStandsResult<LegStand> {
        let index = self
            .position_of(name)
            .ok_or_else(|| LegStandsError::LegNotFound {
                name: name.to_owned(),
            })?;
        Ok(self.children.remove(index))
    }

    pub(crate) fn position_of(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|leg| leg.name() == name)
    }

    /// Moves the child at `from` to sibling index `to`.
    ///
    /// Out-of-range targets leave the order unchanged.
    pub(crate) fn move_child(&mut self, from: usize, to: usize) {
        if from >= self.children.len() || to >= self.children.len() || from == to {
            return;
        }
        let leg = self.children.remove(from);
        self.children.insert(to, leg);
    }

    /// Whether any two legs share a name.
    pub(crate) fn first_duplicate(&self) -> Option<&str> {
        self.children.iter().enumerate().find_map(|(i, leg)| {
            self.children[..i]
                .iter()
                .any(|other| other.name() == leg.name())
                .then(|| leg.name())
        })
    }
}

/// Constrains a group transform to follow the conveyors group.
///
/// Keeps X and Y of the origin, takes Z from the conveyors, and keeps only
/// the conveyors' yaw for rotation. The group's own scale survives. The
/// basis is `Ry * diag(scale)`, so locking a locked transform is a no-op.
#[must_use]
pub fn lock_to_conveyors(transform: &Transform3, conveyors: &Transform3) -> Transform3 {
    let origin = Vector3::new(transform.origin.x, transform.origin.y, conveyors.origin.z);
    let yaw = Vector3::new(0.0, conveyors.euler().y, 0.0);
    let basis = basis_from_euler(&yaw) * Matrix3::from_diagonal(&transform.scale());
    Transform3::new(basis, origin)
}
