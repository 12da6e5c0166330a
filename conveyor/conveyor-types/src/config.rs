//! Assembly configuration read by the leg-stand engine.
//!
//! # Example
//!
//! ```
//! use conveyor_types::{AssemblyConfig, LegModel};
//!
//! let config = AssemblyConfig::default()
//!     .with_width(1.2)
//!     .with_interval(3.0)
//!     .with_end_legs(true, false)
//!     .with_model(LegModel::new("parts/ConveyorLegBC.tscn"));
//!
//! assert!(config.validate().is_ok());
//! ```

use nalgebra::Vector3;

use crate::error::ConfigError;

/// Smallest permitted spacing between interval legs.
pub const MIN_INTERVAL: f64 = 0.5;

/// Reference to the model auto-placed legs are instantiated from.
///
/// Compared by resource path; changing it purges and rebuilds every auto leg.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegModel {
    resource: String,
}

impl LegModel {
    /// Creates a model reference from a resource path.
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
        }
    }

    /// The resource path.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

/// Tunable parameters owned by the conveyor assembly.
///
/// Out-of-range values are clamped at the point of use rather than rejected;
/// only non-finite numbers fail [`validate`](Self::validate).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssemblyConfig {
    /// Nominal conveyor width.
    pub width: f64,
    /// Assembly scale.
    pub scale: Vector3<f64>,
    /// Tilt of the conveyor line around Z, in radians.
    pub conveyor_angle: f64,
    /// Whether interval-aligned legs are placed.
    pub interval_legs_enabled: bool,
    /// Spacing of interval legs; clamped to at least [`MIN_INTERVAL`].
    pub interval: f64,
    /// Whether a fixed leg sits at the front of the coverage range.
    pub end_leg_front: bool,
    /// Whether a fixed leg sits at the rear of the coverage range.
    pub end_leg_rear: bool,
    /// Gap kept between a fixed end leg and the nearest interval leg; clamped to at least 0.
    pub end_legs_margin: f64,
    /// Inset of the coverage range from each conveyor end.
    pub margin_ends: f64,
    /// Height of the leg-stands group above the assembly origin.
    pub floor_offset: f64,
    /// Horizontal shift of the interval grid along the line.
    pub interval_legs_offset: f64,
    /// Reach of the rotating grab at each leg's tip, excluded from leg height.
    pub grabs_offset: f64,
    /// Model auto legs are created from; no legs are created while unset.
    pub model: Option<LegModel>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            scale: Vector3::new(1.0, 1.0, 1.0),
            conveyor_angle: 0.0,
            interval_legs_enabled: true,
            interval: 2.0,
            end_leg_front: true,
            end_leg_rear: true,
            end_legs_margin: 0.5,
            margin_ends: 0.2,
            floor_offset: 0.0,
            interval_legs_offset: 0.0,
            grabs_offset: 0.382,
            model: None,
        }
    }
}

impl AssemblyConfig {
    /// Sets the nominal conveyor width.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Sets the assembly scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the conveyor tilt in radians.
    #[must_use]
    pub fn with_conveyor_angle(mut self, angle: f64) -> Self {
        self.conveyor_angle = angle;
        self
    }

    /// Sets the interval leg spacing.
    #[must_use]
    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = interval;
        self
    }

    /// Enables or disables interval legs.
    #[must_use]
    pub fn with_interval_legs(mut self, enabled: bool) -> Self {
        self.interval_legs_enabled = enabled;
        self
    }

    /// Enables or disables the fixed front and rear legs.
    #[must_use]
    pub fn with_end_legs(mut self, front: bool, rear: bool) -> Self {
        self.end_leg_front = front;
        self.end_leg_rear = rear;
        self
    }

    /// Sets the margin between fixed end legs and interval legs.
    #[must_use]
    pub fn with_end_legs_margin(mut self, margin: f64) -> Self {
        self.end_legs_margin = margin;
        self
    }

    /// Sets the coverage inset from conveyor ends.
    #[must_use]
    pub fn with_margin_ends(mut self, margin: f64) -> Self {
        self.margin_ends = margin;
        self
    }

    /// Sets the grab reach.
    #[must_use]
    pub fn with_grabs_offset(mut self, offset: f64) -> Self {
        self.grabs_offset = offset;
        self
    }

    /// Sets the floor and horizontal offsets of the leg-stands group.
    #[must_use]
    pub fn with_offsets(mut self, floor: f64, horizontal: f64) -> Self {
        self.floor_offset = floor;
        self.interval_legs_offset = horizontal;
        self
    }

    /// Sets the leg model.
    #[must_use]
    pub fn with_model(mut self, model: LegModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Clears the leg model.
    #[must_use]
    pub fn without_model(mut self) -> Self {
        self.model = None;
        self
    }

    /// Front margin applied to the interval grid: the end-leg margin when a
    /// front leg exists, otherwise zero.
    #[must_use]
    pub fn front_margin(&self) -> f64 {
        if self.end_leg_front {
            self.end_legs_margin
        } else {
            0.0
        }
    }

    /// Rear counterpart of [`front_margin`](Self::front_margin).
    #[must_use]
    pub fn rear_margin(&self) -> f64 {
        if self.end_leg_rear {
            self.end_legs_margin
        } else {
            0.0
        }
    }

    /// Clamps the interval and end-leg margin into their legal ranges.
    ///
    /// Returns `true` if anything changed.
    #[allow(clippy::float_cmp)]
    pub fn clamp_placement(&mut self) -> bool {
        let interval = self.interval.max(MIN_INTERVAL);
        let margin = self.end_legs_margin.max(0.0);
        let changed = interval != self.interval || margin != self.end_legs_margin;
        self.interval = interval;
        self.end_legs_margin = margin;
        changed
    }

    /// Checks every numeric field is finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("width", self.width),
            ("scale.x", self.scale.x),
            ("scale.y", self.scale.y),
            ("scale.z", self.scale.z),
            ("conveyor_angle", self.conveyor_angle),
            ("interval", self.interval),
            ("end_legs_margin", self.end_legs_margin),
            ("margin_ends", self.margin_ends),
            ("floor_offset", self.floor_offset),
            ("interval_legs_offset", self.interval_legs_offset),
            ("grabs_offset", self.grabs_offset),
        ];
        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, value)) => Err(ConfigError::NonFinite { field, value }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AssemblyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let config = AssemblyConfig::default().with_interval(f64::NAN);
        let err = config.validate();
        assert!(matches!(
            err,
            Err(ConfigError::NonFinite {
                field: "interval",
                ..
            })
        ));
    }

    #[test]
    fn test_clamp_placement() {
        let mut config = AssemblyConfig::default()
            .with_interval(0.1)
            .with_end_legs_margin(-3.0);
        assert!(config.clamp_placement());
        assert!((config.interval - MIN_INTERVAL).abs() < f64::EPSILON);
        assert!(config.end_legs_margin.abs() < f64::EPSILON);
        assert!(!config.clamp_placement());
    }

    #[test]
    fn test_margins_follow_end_legs() {
        let config = AssemblyConfig::default()
            .with_end_legs(true, false)
            .with_end_legs_margin(1.0);
        assert!((config.front_margin() - 1.0).abs() < f64::EPSILON);
        assert!(config.rear_margin().abs() < f64::EPSILON);
    }

    #[test]
    fn test_model_equality_is_by_resource() {
        assert_eq!(LegModel::new("a.tscn"), LegModel::new("a.tscn"));
        assert_ne!(LegModel::new("a.tscn"), LegModel::new("b.tscn"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = AssemblyConfig::default().with_model(LegModel::new("leg.tscn"));
        let json = serde_json::to_string(&config).ok();
        assert!(json.is_some());

        let parsed: Result<AssemblyConfig, _> = serde_json::from_str(&json.unwrap_or_default());
        assert_eq!(parsed.ok(), Some(config));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Result<AssemblyConfig, _> = serde_json::from_str(r#"{"width": 2.5}"#);
        let config = parsed.unwrap_or_default();
        assert!((config.width - 2.5).abs() < f64::EPSILON);
        assert!((config.interval - 2.0).abs() < f64::EPSILON);
    }
}
