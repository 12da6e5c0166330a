//! Outcome of one update cycle.

/// What an update cycle did to the leg stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Auto legs instantiated.
    pub created: usize,

    /// Auto legs removed because they were no longer required.
    pub removed: usize,

    /// Existing auto legs moved to a new grid position.
    pub adjusted: usize,

    /// Auto legs removed by a model change.
    pub purged: usize,

    /// Legs left visible, or `None` if the height solver did not run.
    pub visible: Option<usize>,
}

impl UpdateReport {
    /// Whether the number of legs changed.
    #[must_use]
    pub const fn changed_leg_count(&self) -> bool {
        self.created != 0 || self.removed != 0 || self.purged != 0
    }

    /// Whether heights and visibility were recomputed.
    #[must_use]
    pub const fn solved(&self) -> bool {
        self.visible.is_some()
    }

    /// Whether the cycle touched no leg at all.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        !self.changed_leg_count() && self.adjusted == 0 && !self.solved()
    }
}

impl std::fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Leg stands: {} created, {} removed, {} adjusted, {} purged",
            self.created, self.removed, self.adjusted, self.purged
        )?;
        match self.visible {
            Some(visible) => write!(f, ", {visible} visible"),
            None => Ok(()),
        }
    }
}
