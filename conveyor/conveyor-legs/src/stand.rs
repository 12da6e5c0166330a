//! Leg stand nodes.

use conveyor_types::{ConveyorKind, LegIndex, LegModel, Transform3};
use nalgebra::{Matrix3, Point3, Vector3};

use crate::path::LegPose;

/// Width of the leg model at unit Z scale.
pub const LEG_BASE_WIDTH: f64 = 2.0;

/// Opaque handle of a scene that owns a leg from outside the edited scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// Which scene a leg is saved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LegOwner {
    /// The scene currently being edited.
    #[default]
    EditedScene,
    /// Some other scene, such as the one an instanced assembly came from.
    Foreign(OwnerId),
}

/// A single leg stand under the conveyor line.
///
/// The name encodes the leg's identity (see [`LegIndex`]) and cannot be
/// changed once created.
///
/// # Example
///
/// ```
/// use conveyor_legs::LegStand;
/// use conveyor_types::LegIndex;
/// use nalgebra::Point3;
///
/// let leg = LegStand::new("AutoLegsStand2").with_position(Point3::new(4.0, 0.0, 0.0));
/// assert_eq!(leg.index(), LegIndex::Interval(1));
/// assert!(leg.visible);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LegStand {
    name: String,
    model: Option<LegModel>,
    /// Base position in group space.
    pub position: Point3<f64>,
    /// YXZ Euler rotation in radians.
    pub rotation: Vector3<f64>,
    /// X is unused, Y is the leg height, Z is the width factor.
    pub scale: Vector3<f64>,
    /// Whether the leg is drawn.
    pub visible: bool,
    /// Rotation of the grab at the leg tip, in degrees.
    pub grabs_rotation: f64,
    /// Scene the leg is saved into.
    pub owner: LegOwner,
}

impl LegStand {
    /// Creates a leg at the group origin with unit scale.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: None,
            position: Point3::origin(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            visible: true,
            grabs_rotation: 0.0,
            owner: LegOwner::EditedScene,
        }
    }

    /// Instantiates a leg from a model.
    #[must_use]
    pub fn from_model(name: impl Into<String>, model: LegModel) -> Self {
        Self {
            model: Some(model),
            ..Self::new(name)
        }
    }

    /// Sets the base position.
    #[must_use]
    pub const fn with_position(mut self, position: Point3<f64>) -> Self {
        self.position = position;
        self
    }

    /// Sets the Euler rotation.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Vector3<f64>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the owner.
    #[must_use]
    pub const fn with_owner(mut self, owner: LegOwner) -> Self {
        self.owner = owner;
        self
    }

    /// The leg's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity decoded from the name.
    #[must_use]
    pub fn index(&self) -> LegIndex {
        LegIndex::from_name(&self.name)
    }

    /// Whether the engine manages this leg.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.index().is_auto()
    }

    /// The model this leg was instantiated from, if any.
    #[must_use]
    pub fn model(&self) -> Option<&LegModel> {
        self.model.as_ref()
    }

    /// Rotation-and-scale basis: `Ry * Rx * Rz * diag(scale)`.
    #[must_use]
    pub fn basis(&self) -> Matrix3<f64> {
        self.transform().basis
    }

    /// Local transform relative to the group.
    #[must_use]
    pub fn transform(&self) -> Transform3 {
        Transform3::from_euler_scale(&self.rotation, &self.scale, self.position.coords)
    }

    /// Current position and rotation.
    #[must_use]
    pub const fn pose(&self) -> LegPose {
        LegPose::new(self.position, self.rotation)
    }

    /// Applies a pose. Returns `true` if position or rotation changed.
    pub fn set_pose(&mut self, pose: &LegPose) -> bool {
        let changed = self.position != pose.position || self.rotation != pose.rotation;
        self.position = pose.position;
        self.rotation = pose.rotation;
        changed
    }

    /// Scales the leg to span `target_width`, keeping its height.
    pub fn set_width(&mut self, target_width: f64) {
        self.scale = Vector3::new(1.0, self.scale.y, target_width / LEG_BASE_WIDTH);
    }

    /// Sets the height, keeping the width.
    pub fn set_height(&mut self, height: f64) {
        self.scale = Vector3::new(1.0, height, self.scale.z);
    }
}

/// Width legs must span for a conveyor of nominal `width`.
///
/// Roller conveyors overhang their frame, so legs under them are widened.
#[must_use]
pub fn leg_target_width(width: f64, kind: Option<ConveyorKind>) -> f64 {
    match kind {
        Some(ConveyorKind::CurvedRoller) => width * 1.055,
        Some(ConveyorKind::Roller) => 0.051f64.mul_add(2.0, width),
        Some(ConveyorKind::Belt) | None => width,
    }
}
