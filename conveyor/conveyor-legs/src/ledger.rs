//! Change detection between update cycles.
//!
//! The ledger holds every placement input as observed at the end of the
//! previous cycle. Floats are compared exactly: a cycle that changes nothing
//! must leave the next cycle with nothing to do.

#![allow(clippy::float_cmp)]

use conveyor_types::{AssemblyConfig, CoverageRange, LegModel, Transform3};
use nalgebra::Vector3;

use crate::stand::LEG_BASE_WIDTH;

/// Placement inputs observed during one cycle.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    conveyors_transform: Transform3,
    group_transform: Transform3,
    target_width: f64,
    interval_legs_enabled: bool,
    interval: f64,
    end_leg_front: bool,
    end_leg_rear: bool,
    end_legs_margin: f64,
    model: Option<LegModel>,
    coverage: CoverageRange,
}

impl Snapshot {
    pub(crate) fn observe(
        config: &AssemblyConfig,
        conveyors_transform: &Transform3,
        group_transform: &Transform3,
        target_width: f64,
        coverage: CoverageRange,
    ) -> Self {
        Self {
            conveyors_transform: *conveyors_transform,
            group_transform: *group_transform,
            target_width,
            interval_legs_enabled: config.interval_legs_enabled,
            interval: config.interval,
            end_leg_front: config.end_leg_front,
            end_leg_rear: config.end_leg_rear,
            end_legs_margin: config.end_legs_margin,
            model: config.model.clone(),
            coverage,
        }
    }
}

/// Which stages a cycle must run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct Changes {
    pub model: bool,
    pub target_width: bool,
    pub placement: bool,
    pub conveyors_transform: bool,
    pub group_transform: bool,
    pub coverage: bool,
}

impl Changes {
    /// Whether the height solver's inputs moved, ignoring the leg set.
    pub(crate) const fn geometry(&self) -> bool {
        self.conveyors_transform || self.group_transform || self.coverage
    }
}

/// Previous-cycle values of every tracked input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Ledger {
    conveyors_transform: Option<Transform3>,
    group_transform: Option<Transform3>,
    target_width: f64,
    conveyor_angle: Option<f64>,
    assembly_scale: Option<Vector3<f64>>,
    floor_offset: f64,
    interval_legs_offset: f64,
    interval_legs_enabled: bool,
    interval: f64,
    end_leg_front: bool,
    end_leg_rear: bool,
    end_legs_margin: f64,
    model: Option<LegModel>,
    coverage: CoverageRange,
}

impl Ledger {
    /// Seeds the ledger for a freshly loaded assembly.
    ///
    /// Transforms and tilt start unknown so the first cycle applies them.
    /// Flags start off, so enabled end and interval legs count as changes.
    /// Offsets start at the group's current scaled position, so saved
    /// config offsets that disagree with it move the group.
    pub(crate) fn new(config: &AssemblyConfig, group_transform: &Transform3) -> Self {
        let scaled = group_transform.origin.component_mul(&config.scale);
        Self {
            conveyors_transform: None,
            group_transform: None,
            target_width: LEG_BASE_WIDTH,
            conveyor_angle: None,
            assembly_scale: None,
            floor_offset: scaled.y,
            interval_legs_offset: scaled.x,
            interval_legs_enabled: false,
            interval: config.interval,
            end_leg_front: false,
            end_leg_rear: false,
            end_legs_margin: 0.5,
            model: config.model.clone(),
            coverage: CoverageRange::default(),
        }
    }

    pub(crate) fn changes(&self, now: &Snapshot) -> Changes {
        let model = self.model != now.model;
        let coverage = !self.coverage.bitwise_eq(&now.coverage);
        let placement = model
            || coverage
            || self.interval_legs_enabled != now.interval_legs_enabled
            || self.interval != now.interval
            || self.end_leg_front != now.end_leg_front
            || self.end_leg_rear != now.end_leg_rear
            || self.end_legs_margin != now.end_legs_margin;
        Changes {
            model,
            target_width: self.target_width != now.target_width,
            placement,
            conveyors_transform: self.conveyors_transform != Some(now.conveyors_transform),
            group_transform: self.group_transform != Some(now.group_transform),
            coverage,
        }
    }

    pub(crate) fn commit(&mut self, now: Snapshot) {
        self.conveyors_transform = Some(now.conveyors_transform);
        self.group_transform = Some(now.group_transform);
        self.target_width = now.target_width;
        self.interval_legs_enabled = now.interval_legs_enabled;
        self.interval = now.interval;
        self.end_leg_front = now.end_leg_front;
        self.end_leg_rear = now.end_leg_rear;
        self.end_legs_margin = now.end_legs_margin;
        self.model = now.model;
        self.coverage = now.coverage;
    }

    pub(crate) fn tilt_changed(&self, config: &AssemblyConfig) -> bool {
        self.conveyor_angle != Some(config.conveyor_angle) || self.assembly_scale != Some(config.scale)
    }

    pub(crate) fn commit_tilt(&mut self, config: &AssemblyConfig) {
        self.conveyor_angle = Some(config.conveyor_angle);
        self.assembly_scale = Some(config.scale);
    }

    /// Two-way binding between the config offsets and the group position.
    ///
    /// An offset changed in the config since the last sync moves the group;
    /// otherwise the offset is read back from the group's scaled position.
    /// The config wins when both moved. Returns `true` if the group moved.
    pub(crate) fn sync_offsets(&mut self, config: &mut AssemblyConfig, group_transform: &mut Transform3) -> bool {
        let scale = config.scale;
        let scaled = group_transform.origin.component_mul(&scale);
        let x_changed = config.interval_legs_offset != self.interval_legs_offset;
        let y_changed = config.floor_offset != self.floor_offset;

        if x_changed {
            group_transform.origin.x = unscale(config.interval_legs_offset, scale.x);
        } else {
            config.interval_legs_offset = scaled.x;
        }
        if y_changed {
            group_transform.origin.y = unscale(config.floor_offset, scale.y);
        } else {
            config.floor_offset = scaled.y;
        }

        self.interval_legs_offset = config.interval_legs_offset;
        self.floor_offset = config.floor_offset;
        x_changed || y_changed
    }
}

fn unscale(value: f64, scale: f64) -> f64 {
    if scale == 0.0 { 0.0 } else { value / scale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot(config: &AssemblyConfig, coverage: CoverageRange) -> Snapshot {
        Snapshot::observe(
            config,
            &Transform3::identity(),
            &Transform3::identity(),
            config.width,
            coverage,
        )
    }

    #[test]
    fn test_first_cycle_sees_everything() {
        let config = AssemblyConfig::default();
        let ledger = Ledger::new(&config, &Transform3::identity());
        let changes = ledger.changes(&snapshot(&config, CoverageRange::default()));

        assert!(changes.placement);
        assert!(changes.conveyors_transform);
        assert!(changes.group_transform);
        assert!(changes.target_width);
        assert!(!changes.model);
        assert!(!changes.coverage);
        assert!(ledger.tilt_changed(&config));
    }

    #[test]
    fn test_commit_settles() {
        let config = AssemblyConfig::default();
        let mut ledger = Ledger::new(&config, &Transform3::identity());
        let now = snapshot(&config, CoverageRange::new(1.0, 4.0));
        ledger.commit(now.clone());
        ledger.commit_tilt(&config);

        assert_eq!(ledger.changes(&now), Changes::default());
        assert!(!ledger.tilt_changed(&config));
    }

    #[test]
    fn test_coverage_change_triggers_placement() {
        let config = AssemblyConfig::default();
        let mut ledger = Ledger::new(&config, &Transform3::identity());
        ledger.commit(snapshot(&config, CoverageRange::new(1.0, 4.0)));

        let changes = ledger.changes(&snapshot(&config, CoverageRange::new(1.0, 4.5)));
        assert!(changes.coverage);
        assert!(changes.placement);
        assert!(changes.geometry());
        assert!(!changes.group_transform);
    }

    #[test]
    fn test_model_change_triggers_purge() {
        let config = AssemblyConfig::default();
        let mut ledger = Ledger::new(&config, &Transform3::identity());
        ledger.commit(snapshot(&config, CoverageRange::default()));

        let config = config.with_model(LegModel::new("leg.tscn"));
        let changes = ledger.changes(&snapshot(&config, CoverageRange::default()));
        assert!(changes.model);
        assert!(changes.placement);
    }

    #[test]
    fn test_sync_reads_back_group_position() {
        let mut config = AssemblyConfig::default().with_scale(Vector3::new(2.0, 2.0, 2.0));
        let mut group = Transform3::from_translation(Vector3::new(1.0, -0.5, 0.0));
        let mut ledger = Ledger::new(&config, &group);

        assert!(!ledger.sync_offsets(&mut config, &mut group));
        assert_relative_eq!(config.interval_legs_offset, 2.0);
        assert_relative_eq!(config.floor_offset, -1.0);

        group.origin.y = -1.0;
        assert!(!ledger.sync_offsets(&mut config, &mut group));
        assert_relative_eq!(config.floor_offset, -2.0);
    }

    #[test]
    fn test_sync_config_wins() {
        let mut config = AssemblyConfig::default().with_scale(Vector3::new(2.0, 2.0, 2.0));
        let mut group = Transform3::identity();
        let mut ledger = Ledger::new(&config, &group);
        ledger.sync_offsets(&mut config, &mut group);

        group.origin.y = 3.0;
        config.floor_offset = -4.0;
        assert!(ledger.sync_offsets(&mut config, &mut group));
        assert_relative_eq!(group.origin.y, -2.0);
        assert_relative_eq!(config.floor_offset, -4.0);
        assert!(!ledger.sync_offsets(&mut config, &mut group));
    }
}
