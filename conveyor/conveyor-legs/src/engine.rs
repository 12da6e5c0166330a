//! The leg-stands engine: owns the assembly state and runs update cycles.

use conveyor_types::{AssemblyConfig, ConveyorSegment, CoverageRange, Transform3};
use nalgebra::Matrix3;
use tracing::{debug, info, trace};

use crate::conveyors::ConveyorsGroup;
use crate::coverage::compute_coverage;
use crate::error::{LegStandsError, LegStandsResult};
use crate::group::{LegStandsGroup, lock_to_conveyors};
use crate::instances::{LegInstanceManager, Reconciled};
use crate::ledger::{Ledger, Snapshot};
use crate::path::{LegPose, LegStandsPath, StraightPath};
use crate::placement::IntervalLayout;
use crate::report::UpdateReport;
use crate::solver::solve_heights;
use crate::stand::{LegStand, leg_target_width};

/// Keeps the leg stands under a conveyor line placed, sized and visible.
///
/// Every mutator marks the engine dirty; the host calls [`process`] once per
/// frame and a cycle runs only when something changed. Within a cycle each
/// stage runs only if the inputs it depends on differ from the previous
/// cycle, so an unchanged assembly costs one coverage computation.
///
/// [`process`]: Self::process
///
/// # Example
///
/// ```
/// use conveyor_legs::{ConveyorsGroup, LegStandsEngine, LegStandsGroup};
/// use conveyor_types::{AssemblyConfig, ConveyorSegment, LegModel};
/// use nalgebra::Vector3;
///
/// let config = AssemblyConfig::default()
///     .with_interval(3.0)
///     .with_end_legs(false, false)
///     .with_margin_ends(0.0)
///     .with_grabs_offset(0.0)
///     .with_offsets(-2.0, 0.0)
///     .with_model(LegModel::new("leg.tscn"));
/// let line = ConveyorsGroup::default()
///     .with_segment(ConveyorSegment::straight(10.0, Vector3::new(5.0, 0.0, 0.0)));
///
/// let mut engine = LegStandsEngine::new(config, line, LegStandsGroup::default())?;
/// let report = engine.process().unwrap_or_default();
///
/// assert_eq!(report.created, 4);
/// assert!(engine.process().is_none());
/// # Ok::<(), conveyor_legs::LegStandsError>(())
/// ```
#[derive(Debug)]
pub struct LegStandsEngine {
    config: AssemblyConfig,
    conveyors: ConveyorsGroup,
    group: LegStandsGroup,
    path: Box<dyn LegStandsPath>,
    manager: LegInstanceManager,
    ledger: Ledger,
    coverage: CoverageRange,
    editable: bool,
    path_changed: bool,
    placement_stale: bool,
    solve_stale: bool,
    needs_update: bool,
}

impl LegStandsEngine {
    /// Takes ownership of a loaded assembly.
    ///
    /// Locks the group to the conveyors, applies saved offsets and records
    /// the owners of legs saved into foreign scenes. No legs are touched
    /// until the first cycle.
    ///
    /// # Errors
    ///
    /// Returns [`LegStandsError::Config`] if the config has non-finite
    /// values, or [`LegStandsError::DuplicateLeg`] if two legs share a name.
    pub fn new(config: AssemblyConfig, conveyors: ConveyorsGroup, group: LegStandsGroup) -> LegStandsResult<Self> {
        config.validate()?;
        if let Some(name) = group.first_duplicate() {
            return Err(LegStandsError::DuplicateLeg { name: name.to_owned() });
        }

        let mut group = group;
        group.set_transform(lock_to_conveyors(group.transform(), conveyors.transform()));
        let ledger = Ledger::new(&config, group.transform());
        let manager = LegInstanceManager::new(&group);

        let mut engine = Self {
            config,
            conveyors,
            group,
            path: Box::new(StraightPath),
            manager,
            ledger,
            coverage: CoverageRange::default(),
            editable: false,
            path_changed: true,
            placement_stale: false,
            solve_stale: false,
            needs_update: true,
        };
        engine.sync_offsets();
        engine.coverage = engine.compute_coverage();

        info!(
            legs = engine.group.legs().len(),
            segments = engine.conveyors.segments().len(),
            "Leg stands engine ready"
        );
        Ok(engine)
    }

    /// Replaces the straight path, e.g. with a curved layout.
    #[must_use]
    pub fn with_path(mut self, path: impl LegStandsPath + 'static) -> Self {
        self.set_path(Box::new(path));
        self
    }

    // ==================== Accessors ====================

    /// Current configuration, including clamped and mirrored values.
    #[must_use]
    pub const fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// The conveyor line.
    #[must_use]
    pub const fn conveyors(&self) -> &ConveyorsGroup {
        &self.conveyors
    }

    /// The leg-stands group.
    #[must_use]
    pub const fn group(&self) -> &LegStandsGroup {
        &self.group
    }

    /// Legs in sibling order.
    #[must_use]
    pub fn legs(&self) -> &[LegStand] {
        self.group.legs()
    }

    /// Looks up a leg by name.
    #[must_use]
    pub fn leg(&self, name: &str) -> Option<&LegStand> {
        self.group.leg(name)
    }

    /// Coverage range as of the last cycle or construction.
    #[must_use]
    pub const fn coverage(&self) -> CoverageRange {
        self.coverage
    }

    /// Interval grid for the current coverage and config.
    #[must_use]
    pub fn layout(&self) -> IntervalLayout {
        let mut config = self.config.clone();
        config.clamp_placement();
        self.fit_layout(&config)
    }

    /// The active path.
    #[must_use]
    pub fn path(&self) -> &dyn LegStandsPath {
        self.path.as_ref()
    }

    /// Whether [`process`](Self::process) will run a cycle.
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Whether the host reports the legs as user-editable.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        self.editable
    }

    // ==================== Mutators ====================

    /// Replaces the path; every leg is snapped onto it next cycle.
    pub fn set_path(&mut self, path: Box<dyn LegStandsPath>) {
        self.path = path;
        self.path_changed = true;
        self.needs_update = true;
    }

    /// Sets whether the user can edit legs directly.
    ///
    /// While editable, every cycle snaps and rewidens all legs.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        self.needs_update = true;
    }

    /// Edits the configuration.
    ///
    /// Offsets changed by `edit` move the group; untouched offsets are read
    /// back from the group position.
    ///
    /// # Errors
    ///
    /// Returns [`LegStandsError::Config`] and restores the previous config if
    /// the edit leaves a non-finite value.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut AssemblyConfig)) -> LegStandsResult<()> {
        let previous = self.config.clone();
        edit(&mut self.config);
        if let Err(err) = self.config.validate() {
            self.config = previous;
            return Err(err.into());
        }
        self.sync_offsets();
        self.needs_update = true;
        Ok(())
    }

    /// Moves the leg-stands group. The transform is locked to the conveyors
    /// and mirrored into the config offsets.
    pub fn set_group_transform(&mut self, transform: Transform3) {
        let locked = lock_to_conveyors(&transform, self.conveyors.transform());
        if self.group.set_transform(locked) {
            self.sync_offsets();
            self.needs_update = true;
        }
    }

    /// Moves the conveyors group; the leg-stands group follows.
    pub fn set_conveyors_transform(&mut self, transform: Transform3) {
        if self.conveyors.set_transform(transform) {
            self.relock_group();
            self.needs_update = true;
        }
    }

    /// Sets the global basis of the assembly, which orients the grabs.
    pub fn set_parent_global_basis(&mut self, basis: Matrix3<f64>) {
        if self.group.set_parent_global_basis(basis) {
            self.solve_stale = true;
            self.needs_update = true;
        }
    }

    /// Appends a conveyor segment to the line.
    pub fn push_segment(&mut self, segment: ConveyorSegment) {
        self.conveyors.segments_mut().push(segment);
        self.needs_update = true;
    }

    /// Replaces the conveyor segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LegStandsError::SegmentOutOfRange`] if there is no such segment.
    pub fn set_segment(&mut self, index: usize, segment: ConveyorSegment) -> LegStandsResult<()> {
        let segments = self.conveyors.segments_mut();
        let len = segments.len();
        let slot = segments
            .get_mut(index)
            .ok_or(LegStandsError::SegmentOutOfRange { index, len })?;
        *slot = segment;
        self.needs_update = true;
        Ok(())
    }

    /// Removes the conveyor segment at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`LegStandsError::SegmentOutOfRange`] if there is no such segment.
    pub fn remove_segment(&mut self, index: usize) -> LegStandsResult<ConveyorSegment> {
        let segments = self.conveyors.segments_mut();
        if index >= segments.len() {
            return Err(LegStandsError::SegmentOutOfRange {
                index,
                len: segments.len(),
            });
        }
        let segment = segments.remove(index);
        self.needs_update = true;
        Ok(segment)
    }

    /// Adds a leg, typically a user-placed one.
    ///
    /// A leg named like an auto leg joins the managed set.
    ///
    /// # Errors
    ///
    /// Returns [`LegStandsError::DuplicateLeg`] if the name is taken.
    pub fn add_leg(&mut self, leg: LegStand) -> LegStandsResult<()> {
        let auto = leg.is_auto();
        self.group.insert(leg)?;
        self.placement_stale |= auto;
        self.solve_stale = true;
        self.needs_update = true;
        Ok(())
    }

    /// Removes a leg by name.
    ///
    /// Removing an auto leg makes the next cycle rebuild the required set,
    /// so a still-required leg comes back under the same name.
    ///
    /// # Errors
    ///
    /// Returns [`LegStandsError::LegNotFound`] if no leg has this name.
    pub fn remove_leg(&mut self, name: &str) -> LegStandsResult<LegStand> {
        let leg = self.group.remove(name)?;
        self.placement_stale |= leg.is_auto();
        self.needs_update = true;
        Ok(leg)
    }

    /// Moves a leg. Its height and visibility are re-solved next cycle.
    ///
    /// # Errors
    ///
    /// Returns [`LegStandsError::LegNotFound`] if no leg has this name.
    pub fn move_leg(&mut self, name: &str, pose: &LegPose) -> LegStandsResult<()> {
        let leg = self
            .group
            .leg_mut(name)
            .ok_or_else(|| LegStandsError::LegNotFound { name: name.to_owned() })?;
        if leg.set_pose(pose) {
            self.solve_stale = true;
            self.needs_update = true;
        }
        Ok(())
    }

    // ==================== Update cycle ====================

    /// Runs one cycle if anything changed since the last one.
    pub fn process(&mut self) -> Option<UpdateReport> {
        self.needs_update.then(|| self.update())
    }

    /// Runs one cycle unconditionally.
    ///
    /// Running it again without changing any input creates, removes and
    /// moves nothing.
    #[allow(clippy::too_many_lines)]
    pub fn update(&mut self) -> UpdateReport {
        let mut report = UpdateReport::default();

        if self.ledger.tilt_changed(&self.config) {
            if self.conveyors.set_angle(self.config.conveyor_angle, &self.config.scale) {
                trace!(angle = self.config.conveyor_angle, "Tilted conveyors");
                self.relock_group();
            }
            self.ledger.commit_tilt(&self.config);
        }

        let target_width = leg_target_width(self.config.width, self.conveyors.first_kind());
        self.coverage = self.compute_coverage();
        let coverage_at_start = self.coverage;
        let changes = self.ledger.changes(&self.snapshot(target_width));

        debug!(
            placement = changes.placement,
            coverage = changes.coverage,
            model = changes.model,
            min = self.coverage.min,
            max = self.coverage.max,
            "Updating leg stands"
        );

        if changes.model {
            report.purged = LegInstanceManager::purge_auto_legs(&mut self.group);
        }

        if self.editable || self.path_changed {
            let snapped = LegInstanceManager::snap_all_to_path(self.path.as_ref(), &mut self.group);
            trace!(snapped, "Snapped leg stands to path");
        }
        self.path_changed = false;

        if self.editable || changes.target_width {
            LegInstanceManager::update_all_widths(&mut self.group, target_width);
        }

        let mut reconciled = Reconciled::default();
        if changes.placement || self.placement_stale {
            self.config.clamp_placement();
            let layout = self.fit_layout(&self.config);
            report.adjusted = LegInstanceManager::adjust_auto_positions(
                self.path.as_ref(),
                &mut self.group,
                &self.coverage,
                &layout,
            );
            reconciled = self.manager.reconcile(
                self.path.as_ref(),
                &mut self.group,
                &self.config,
                &self.coverage,
                &layout,
                target_width,
            );
            report.created = reconciled.created;
            report.removed = reconciled.removed;
            self.placement_stale = false;
        }

        let children_changed = report.adjusted != 0 || report.purged != 0 || reconciled.any() || self.solve_stale;
        if children_changed || changes.geometry() {
            report.visible = Some(solve_heights(
                self.path.as_ref(),
                &mut self.group,
                self.conveyors.transform(),
                &self.config,
                &self.coverage,
            ));
        }
        self.solve_stale = false;

        debug_assert!(
            self.compute_coverage().bitwise_eq(&coverage_at_start),
            "coverage changed during a leg stands update"
        );

        let committed = self.snapshot(target_width);
        self.ledger.commit(committed);
        self.needs_update = false;

        if !report.is_noop() {
            debug!(%report, "Leg stands updated");
        }
        report
    }

    // ==================== Internals ====================

    fn compute_coverage(&self) -> CoverageRange {
        compute_coverage(self.path.as_ref(), &self.conveyors, self.group.transform(), &self.config)
    }

    fn fit_layout(&self, config: &AssemblyConfig) -> IntervalLayout {
        if self.conveyors.segments().is_empty() {
            IntervalLayout::empty(config.interval)
        } else {
            IntervalLayout::compute(&self.coverage, config)
        }
    }

    fn snapshot(&self, target_width: f64) -> Snapshot {
        Snapshot::observe(
            &self.config,
            self.conveyors.transform(),
            self.group.transform(),
            target_width,
            self.coverage,
        )
    }

    fn relock_group(&mut self) {
        let locked = lock_to_conveyors(self.group.transform(), self.conveyors.transform());
        if self.group.set_transform(locked) {
            self.sync_offsets();
        }
    }

    fn sync_offsets(&mut self) {
        let mut transform = *self.group.transform();
        if self.ledger.sync_offsets(&mut self.config, &mut transform) {
            self.group.set_transform(transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conveyor_types::LegModel;
    use nalgebra::{Point3, Vector3};

    fn config() -> AssemblyConfig {
        AssemblyConfig::default()
            .with_margin_ends(0.0)
            .with_grabs_offset(0.0)
            .with_offsets(-2.0, 0.0)
            .with_model(LegModel::new("leg.tscn"))
    }

    fn line() -> ConveyorsGroup {
        ConveyorsGroup::default().with_segment(ConveyorSegment::straight(10.0, Vector3::new(5.0, 0.0, 0.0)))
    }

    fn engine(config: AssemblyConfig) -> LegStandsEngine {
        LegStandsEngine::new(config, line(), LegStandsGroup::default()).unwrap_or_else(|err| panic!("{err}"))
    }

    #[test]
    fn test_new_applies_saved_offsets() {
        let engine = engine(config());
        assert_eq!(engine.group().transform().origin, Vector3::new(0.0, -2.0, 0.0));
        assert!(engine.needs_update());
        assert_eq!(engine.coverage(), CoverageRange::new(0.0, 10.0));
    }

    #[test]
    fn test_new_rejects_duplicate_names() {
        let group = LegStandsGroup::default()
            .with_leg(LegStand::new("A"))
            .with_leg(LegStand::new("A"));
        let result = LegStandsEngine::new(config(), line(), group);
        assert!(matches!(result, Err(LegStandsError::DuplicateLeg { .. })));
    }

    #[test]
    fn test_process_clears_dirty_bit() {
        let mut engine = engine(config());
        assert!(engine.process().is_some());
        assert!(!engine.needs_update());
        assert!(engine.process().is_none());
    }

    #[test]
    fn test_rejected_config_is_rolled_back() {
        let mut engine = engine(config());
        let result = engine.update_config(|c| c.width = f64::INFINITY);
        assert!(matches!(result, Err(LegStandsError::Config(_))));
        assert_eq!(engine.config().width, 1.0);
    }

    #[test]
    fn test_floor_offset_moves_group() {
        let mut engine = engine(config());
        engine.update();
        assert!(engine.update_config(|c| c.floor_offset = -3.0).is_ok());
        assert_eq!(engine.group().transform().origin.y, -3.0);

        let report = engine.update();
        assert!(report.solved());
        assert_eq!(report.created, 0);
        assert!(engine.legs().iter().all(|leg| (leg.scale.y - 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_group_move_mirrors_into_config() {
        let mut engine = engine(config());
        engine.set_group_transform(Transform3::from_translation(Vector3::new(0.5, -1.5, 4.0)));
        let origin = engine.group().transform().origin;
        assert_eq!(origin, Vector3::new(0.5, -1.5, 0.0));
        assert_eq!(engine.config().floor_offset, -1.5);
        assert_eq!(engine.config().interval_legs_offset, 0.5);
    }

    #[test]
    fn test_interval_is_clamped_in_cycle() {
        let mut engine = engine(config().with_interval(0.1).with_end_legs_margin(-1.0));
        engine.update();
        assert_eq!(engine.config().interval, 0.5);
        assert_eq!(engine.config().end_legs_margin, 0.0);
    }

    #[test]
    fn test_segment_errors() {
        let mut engine = engine(config());
        let segment = ConveyorSegment::straight(1.0, Vector3::zeros());
        assert_eq!(
            engine.set_segment(3, segment),
            Err(LegStandsError::SegmentOutOfRange { index: 3, len: 1 })
        );
        assert!(engine.remove_segment(1).is_err());
        assert!(engine.remove_segment(0).is_ok());
        assert!(engine.conveyors().segments().is_empty());
    }

    #[test]
    fn test_move_leg_forces_solver() {
        let mut engine = engine(config());
        engine.update();
        let pose = LegPose::new(Point3::new(20.0, 0.0, 0.0), Vector3::zeros());
        assert!(engine.move_leg("AutoLegsStand1", &pose).is_ok());

        let report = engine.process().unwrap_or_default();
        assert!(report.solved());
        assert_eq!(report.created, 0);
        assert_eq!(engine.leg("AutoLegsStand1").map(|leg| leg.visible), Some(false));
    }

    #[test]
    fn test_move_missing_leg() {
        let mut engine = engine(config());
        let pose = LegPose::new(Point3::origin(), Vector3::zeros());
        assert!(matches!(
            engine.move_leg("Nope", &pose),
            Err(LegStandsError::LegNotFound { .. })
        ));
    }

    #[test]
    fn test_unchanged_parent_basis_stays_clean() {
        let mut engine = engine(config());
        engine.update();
        engine.set_parent_global_basis(Matrix3::identity());
        assert!(!engine.needs_update());

        engine.set_parent_global_basis(Matrix3::from_diagonal(&Vector3::new(2.0, 2.0, 2.0)));
        assert!(engine.needs_update());
        assert!(engine.process().is_some_and(|report| report.solved()));
    }

    #[test]
    fn test_empty_line_layout_is_empty() {
        let config = config().with_end_legs(false, false);
        let engine = LegStandsEngine::new(config, ConveyorsGroup::default(), LegStandsGroup::default())
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(engine.coverage(), CoverageRange::default());
        assert_eq!(engine.layout().count, 0);
    }
}
