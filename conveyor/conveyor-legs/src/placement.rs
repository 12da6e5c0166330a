//! Interval placement: where auto legs go along the coverage range.
//!
//! Interval legs sit on a global grid of multiples of the interval, clipped
//! to the coverage range shrunk by the end-leg margins. Fixed front and rear
//! legs sit exactly on the range ends.

use conveyor_types::{AssemblyConfig, CoverageRange, LegIndex};

/// The interval grid for one coverage range.
///
/// # Example
///
/// ```
/// use conveyor_legs::IntervalLayout;
/// use conveyor_types::{AssemblyConfig, CoverageRange};
///
/// let config = AssemblyConfig::default()
///     .with_interval(3.0)
///     .with_end_legs(false, false);
/// let layout = IntervalLayout::compute(&CoverageRange::new(0.0, 10.0), &config);
///
/// assert_eq!(layout.count, 4);
/// assert_eq!(layout.positions().collect::<Vec<_>>(), [0.0, 3.0, 6.0, 9.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalLayout {
    /// Path coordinate of interval leg 0.
    pub first: f64,
    /// Last grid coordinate inside the margins.
    pub last: f64,
    /// Grid spacing.
    pub interval: f64,
    /// Number of interval legs required.
    pub count: usize,
}

impl IntervalLayout {
    /// Fits the grid to `coverage` using the config's interval and margins.
    ///
    /// The config is expected to be clamped already (see
    /// [`AssemblyConfig::clamp_placement`]).
    #[must_use]
    pub fn compute(coverage: &CoverageRange, config: &AssemblyConfig) -> Self {
        let interval = config.interval;
        // Grid steps are whole numbers, so counting in steps is exact.
        let first_step = ((coverage.min + config.front_margin()) / interval).ceil();
        let last_step = ((coverage.max - config.rear_margin()) / interval).floor();
        let first = first_step * interval;
        let last = last_step * interval;
        let count = if !config.interval_legs_enabled || first_step > last_step {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let steps = (last_step - first_step) as usize;
            steps.saturating_add(1)
        };
        Self {
            first,
            last,
            interval,
            count,
        }
    }

    /// A grid with no legs, for a line with no conveyor segments.
    ///
    /// The line's `(0, 0)` coverage is a placeholder, not a span to fill.
    #[must_use]
    pub const fn empty(interval: f64) -> Self {
        Self {
            first: 0.0,
            last: -interval,
            interval,
            count: 0,
        }
    }

    /// Path coordinate of interval leg `index`.
    ///
    /// Not clamped to the coverage range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, index: usize) -> f64 {
        (index as f64).mul_add(self.interval, self.first)
    }

    /// Coordinates of every required interval leg, in index order.
    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(|i| self.position(i))
    }
}

/// Path coordinate an auto leg belongs at; `None` for non-auto legs.
#[must_use]
pub fn auto_leg_position(index: LegIndex, coverage: &CoverageRange, layout: &IntervalLayout) -> Option<f64> {
    match index {
        LegIndex::Front => Some(coverage.min),
        LegIndex::Rear => Some(coverage.max),
        LegIndex::Interval(i) => Some(layout.position(i)),
        LegIndex::NonAuto => None,
    }
}

/// Whether an auto leg with this identity should exist.
#[must_use]
pub fn is_required(index: LegIndex, layout: &IntervalLayout, config: &AssemblyConfig) -> bool {
    match index {
        LegIndex::Front => config.end_leg_front,
        LegIndex::Rear => config.end_leg_rear,
        LegIndex::Interval(i) => config.interval_legs_enabled && i < layout.count,
        LegIndex::NonAuto => false,
    }
}

/// Every required auto identity in sibling order: front, intervals, rear.
#[must_use]
pub fn required_legs(layout: &IntervalLayout, config: &AssemblyConfig) -> Vec<LegIndex> {
    let front = config.end_leg_front.then_some(LegIndex::Front);
    let rear = config.end_leg_rear.then_some(LegIndex::Rear);
    front
        .into_iter()
        .chain((0..layout.count).map(LegIndex::Interval))
        .chain(rear)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(interval: f64) -> AssemblyConfig {
        AssemblyConfig::default()
            .with_interval(interval)
            .with_end_legs(false, false)
    }

    #[test]
    fn test_no_margins() {
        let layout = IntervalLayout::compute(&CoverageRange::new(0.0, 10.0), &config(3.0));
        assert_relative_eq!(layout.first, 0.0);
        assert_relative_eq!(layout.last, 9.0);
        assert_eq!(layout.count, 4);
    }

    #[test]
    fn test_front_margin() {
        let config = config(3.0).with_end_legs(true, false).with_end_legs_margin(1.0);
        let coverage = CoverageRange::new(0.0, 10.0);
        let layout = IntervalLayout::compute(&coverage, &config);

        assert_eq!(layout.positions().collect::<Vec<_>>(), [3.0, 6.0, 9.0]);
        assert_eq!(auto_leg_position(LegIndex::Front, &coverage, &layout), Some(0.0));
        assert_eq!(
            required_legs(&layout, &config),
            [
                LegIndex::Front,
                LegIndex::Interval(0),
                LegIndex::Interval(1),
                LegIndex::Interval(2),
            ]
        );
    }

    #[test]
    fn test_grid_is_global() {
        let layout = IntervalLayout::compute(&CoverageRange::new(0.7, 5.2), &config(2.0));
        assert_eq!(layout.positions().collect::<Vec<_>>(), [2.0, 4.0]);

        let layout = IntervalLayout::compute(&CoverageRange::new(-3.5, -0.1), &config(2.0));
        assert_eq!(layout.positions().collect::<Vec<_>>(), [-2.0]);
    }

    #[test]
    fn test_empty_range_has_no_interval_legs() {
        let layout = IntervalLayout::compute(&CoverageRange::new(0.2, 0.8), &config(1.0));
        assert!(layout.first > layout.last);
        assert_eq!(layout.count, 0);
    }

    #[test]
    fn test_empty_layout_has_no_interval_legs() {
        let config = config(2.0);
        let layout = IntervalLayout::empty(config.interval);
        assert_eq!(layout.count, 0);
        assert!(layout.first > layout.last);
        assert_eq!(layout.positions().count(), 0);
        assert!(!is_required(LegIndex::Interval(0), &layout, &config));
        assert!(required_legs(&layout, &config).is_empty());
    }

    #[test]
    fn test_huge_span_count_saturates() {
        let layout = IntervalLayout::compute(&CoverageRange::new(-1e300, 1e300), &config(0.5));
        assert_eq!(layout.count, usize::MAX);
    }

    #[test]
    fn test_disabled_interval_legs() {
        let config = config(1.0).with_interval_legs(false);
        let layout = IntervalLayout::compute(&CoverageRange::new(0.0, 10.0), &config);
        assert_eq!(layout.count, 0);
        assert!(!is_required(LegIndex::Interval(0), &layout, &config));
    }

    #[test]
    fn test_positions_past_count_are_not_clamped() {
        let coverage = CoverageRange::new(0.0, 4.0);
        let layout = IntervalLayout::compute(&coverage, &config(2.0));
        assert_eq!(layout.count, 3);
        assert_eq!(auto_leg_position(LegIndex::Interval(5), &coverage, &layout), Some(10.0));
        assert!(!is_required(LegIndex::Interval(3), &layout, &config(2.0)));
    }

    #[test]
    fn test_end_legs_on_range_ends() {
        let coverage = CoverageRange::new(-1.5, 6.25);
        let config = config(2.0).with_end_legs(true, true);
        let layout = IntervalLayout::compute(&coverage, &config);
        assert_eq!(auto_leg_position(LegIndex::Front, &coverage, &layout), Some(-1.5));
        assert_eq!(auto_leg_position(LegIndex::Rear, &coverage, &layout), Some(6.25));
        assert_eq!(auto_leg_position(LegIndex::NonAuto, &coverage, &layout), None);
        assert!(is_required(LegIndex::Rear, &layout, &config));
        assert_eq!(required_legs(&layout, &config).last(), Some(&LegIndex::Rear));
    }
}
