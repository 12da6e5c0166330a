//! Creation, removal and bulk edits of leg stand instances.

use conveyor_types::{AssemblyConfig, CoverageRange, LegIndex};
use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::group::LegStandsGroup;
use crate::path::LegStandsPath;
use crate::placement::{IntervalLayout, auto_leg_position, is_required, required_legs};
use crate::stand::{LegOwner, LegStand, OwnerId};

/// Legs added and removed by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Reconciled {
    pub created: usize,
    pub removed: usize,
}

impl Reconciled {
    pub(crate) const fn any(&self) -> bool {
        self.created != 0 || self.removed != 0
    }
}

/// Manages the auto legs of one group.
///
/// Remembers which legs were saved into a foreign scene when the group was
/// loaded, so a leg removed and later re-created under the same name goes
/// back to that scene.
#[derive(Debug, Clone, Default)]
pub(crate) struct LegInstanceManager {
    foreign_owners: HashMap<String, OwnerId>,
}

impl LegInstanceManager {
    pub(crate) fn new(group: &LegStandsGroup) -> Self {
        let foreign_owners: HashMap<_, _> = group
            .legs()
            .iter()
            .filter_map(|leg| match leg.owner {
                LegOwner::Foreign(owner) => Some((leg.name().to_owned(), owner)),
                LegOwner::EditedScene => None,
            })
            .collect();
        if !foreign_owners.is_empty() {
            debug!(count = foreign_owners.len(), "Recorded foreign leg owners");
        }
        Self { foreign_owners }
    }

    pub(crate) fn owner_for(&self, name: &str) -> LegOwner {
        self.foreign_owners
            .get(name)
            .map_or(LegOwner::EditedScene, |&owner| LegOwner::Foreign(owner))
    }

    /// Removes every auto leg. Returns how many were removed.
    pub(crate) fn purge_auto_legs(group: &mut LegStandsGroup) -> usize {
        let before = group.legs().len();
        group.legs_mut().retain(|leg| !leg.is_auto());
        let removed = before - group.legs().len();
        debug!(removed, "Purged auto leg stands");
        removed
    }

    /// Moves every leg, auto or not, onto the path. Returns how many moved.
    pub(crate) fn snap_all_to_path(path: &dyn LegStandsPath, group: &mut LegStandsGroup) -> usize {
        group
            .legs_mut()
            .iter_mut()
            .map(|leg| {
                let snapped = path.snap(&leg.pose());
                leg.set_pose(&snapped)
            })
            .filter(|&moved| moved)
            .count()
    }

    /// Rewidens every leg, auto or not.
    pub(crate) fn update_all_widths(group: &mut LegStandsGroup, target_width: f64) {
        for leg in group.legs_mut() {
            leg.set_width(target_width);
        }
    }

    /// Moves existing auto legs to their slots on the current grid.
    ///
    /// Returns how many legs actually moved.
    pub(crate) fn adjust_auto_positions(
        path: &dyn LegStandsPath,
        group: &mut LegStandsGroup,
        coverage: &CoverageRange,
        layout: &IntervalLayout,
    ) -> usize {
        let mut moved = 0;
        for leg in group.legs_mut() {
            let Some(position) = auto_leg_position(leg.index(), coverage, layout) else {
                continue;
            };
            let pose = path.pose_at(position, &leg.pose());
            if leg.set_pose(&pose) {
                trace!(name = leg.name(), position, "Moved auto leg stand");
                moved += 1;
            }
        }
        moved
    }

    /// Brings the set of auto legs in line with the layout.
    ///
    /// Unneeded auto legs are always removed. Missing ones are created only
    /// when the config names a model.
    pub(crate) fn reconcile(
        &self,
        path: &dyn LegStandsPath,
        group: &mut LegStandsGroup,
        config: &AssemblyConfig,
        coverage: &CoverageRange,
        layout: &IntervalLayout,
        target_width: f64,
    ) -> Reconciled {
        let before = group.legs().len();
        group.legs_mut().retain(|leg| {
            let index = leg.index();
            let keep = !index.is_auto() || is_required(index, layout, config);
            if !keep {
                debug!(name = leg.name(), "Removed auto leg stand");
            }
            keep
        });
        let removed = before - group.legs().len();

        let Some(model) = &config.model else {
            return Reconciled { created: 0, removed };
        };

        let mut created = 0;
        for index in required_legs(layout, config) {
            let Some(name) = index.name() else {
                continue;
            };
            if group.leg(&name).is_some() {
                continue;
            }
            let Some(position) = auto_leg_position(index, coverage, layout) else {
                continue;
            };

            let owner = self.owner_for(&name);
            let mut leg = LegStand::from_model(name, model.clone()).with_owner(owner);
            let pose = path.pose_at(position, &leg.pose());
            leg.set_pose(&pose);
            leg.set_width(target_width);
            debug!(name = leg.name(), position, "Created auto leg stand");

            group.legs_mut().push(leg);
            if let Some(sibling) = sibling_index(index, config) {
                let last = group.legs().len() - 1;
                group.move_child(last, sibling);
            }
            created += 1;
        }

        Reconciled { created, removed }
    }
}

/// Sibling slot for a new auto leg: front first, then intervals in order.
/// Rear legs stay where they were appended.
fn sibling_index(index: LegIndex, config: &AssemblyConfig) -> Option<usize> {
    match index {
        LegIndex::Front => Some(0),
        LegIndex::Interval(i) => Some(i + usize::from(config.end_leg_front)),
        LegIndex::Rear | LegIndex::NonAuto => None,
    }
}
