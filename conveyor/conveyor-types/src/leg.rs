//! Leg-stand identity and its encoding in child names.
//!
//! Auto-placed legs are recognised purely by name:
//!
//! | Identity          | Name                  |
//! |-------------------|-----------------------|
//! | `Front`           | `AutoLegsStandFront`  |
//! | `Rear`            | `AutoLegsStandRear`   |
//! | `Interval(i)`     | `AutoLegsStand{i+1}`  |
//!
//! Any other name is a user-placed (`NonAuto`) leg.

use std::fmt;

/// Name prefix shared by every auto-placed leg.
pub const AUTO_LEG_NAME_PREFIX: &str = "AutoLegsStand";
/// Reserved name of the fixed front leg.
pub const AUTO_LEG_NAME_FRONT: &str = "AutoLegsStandFront";
/// Reserved name of the fixed rear leg.
pub const AUTO_LEG_NAME_REAR: &str = "AutoLegsStandRear";

/// Identity of a leg stand within the leg-stands group.
///
/// # Example
///
/// ```
/// use conveyor_types::LegIndex;
///
/// assert_eq!(LegIndex::from_name("AutoLegsStand3"), LegIndex::Interval(2));
/// assert_eq!(LegIndex::Interval(2).name().as_deref(), Some("AutoLegsStand3"));
/// assert_eq!(LegIndex::from_name("MyLeg"), LegIndex::NonAuto);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LegIndex {
    /// Fixed leg at the start of the coverage range.
    Front,
    /// Interval-aligned leg, 0-based.
    Interval(usize),
    /// Fixed leg at the end of the coverage range.
    Rear,
    /// User-placed leg; never created, deleted or renumbered automatically.
    NonAuto,
}

impl LegIndex {
    /// Recovers the identity encoded in a leg name.
    ///
    /// Interval suffixes must be canonical decimal numbers starting at 1
    /// (`AutoLegsStand1`, not `AutoLegsStand01` or `AutoLegsStand+1`), so
    /// that every auto identity has exactly one name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == AUTO_LEG_NAME_FRONT {
            return Self::Front;
        }
        if name == AUTO_LEG_NAME_REAR {
            return Self::Rear;
        }
        let Some(suffix) = name.strip_prefix(AUTO_LEG_NAME_PREFIX) else {
            return Self::NonAuto;
        };
        if suffix.is_empty()
            || suffix.starts_with('0')
            || !suffix.bytes().all(|b| b.is_ascii_digit())
        {
            return Self::NonAuto;
        }
        match suffix.parse::<usize>() {
            // Names start at 1, indices at 0.
            Ok(number) => Self::Interval(number - 1),
            Err(_) => Self::NonAuto,
        }
    }

    /// The reserved name for this identity, or `None` for `NonAuto`.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        match self {
            Self::Front => Some(AUTO_LEG_NAME_FRONT.to_string()),
            Self::Rear => Some(AUTO_LEG_NAME_REAR.to_string()),
            Self::Interval(index) => Some(format!("{AUTO_LEG_NAME_PREFIX}{}", index + 1)),
            Self::NonAuto => None,
        }
    }

    /// Whether the engine manages this leg.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        !matches!(self, Self::NonAuto)
    }
}

impl fmt::Display for LegIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Rear => write!(f, "rear"),
            Self::Interval(index) => write!(f, "interval #{index}"),
            Self::NonAuto => write!(f, "non-auto"),
        }
    }
}
