//! Automatic leg stands for conveyor assemblies.
//!
//! This crate keeps the support legs under a line of conveyor segments
//! placed, sized and visible as the line and its configuration change:
//!
//! - **Coverage**: the span of path coordinates the line sits above
//! - **Placement**: interval legs on a global grid, plus fixed front and
//!   rear legs at the ends of the span
//! - **Change detection**: a ledger of last-cycle inputs so each stage runs
//!   only when its inputs moved
//! - **Instances**: creation and removal of auto legs, identified by name
//! - **Heights**: each leg is extended up to the conveyor support plane and
//!   hidden when its tip falls outside the span
//!
//! # Overview
//!
//! The host owns scheduling. It builds a [`LegStandsEngine`] from the
//! assembly's [`AssemblyConfig`], [`ConveyorsGroup`] and [`LegStandsGroup`],
//! reports changes through the engine's mutators and calls
//! [`LegStandsEngine::process`] once per frame. Cycles are synchronous and
//! never overlap.
//!
//! Layouts other than a straight line plug in through [`LegStandsPath`].
//!
//! # Example
//!
//! ```
//! use conveyor_legs::{ConveyorsGroup, LegStandsEngine, LegStandsGroup};
//! use conveyor_types::{AssemblyConfig, ConveyorSegment, LegModel};
//! use nalgebra::Vector3;
//!
//! let config = AssemblyConfig::default()
//!     .with_offsets(-1.5, 0.0)
//!     .with_model(LegModel::new("parts/ConveyorLegBC.tscn"));
//! let line = ConveyorsGroup::default()
//!     .with_segment(ConveyorSegment::straight(8.0, Vector3::new(4.0, 0.0, 0.0)));
//!
//! let mut engine = LegStandsEngine::new(config, line, LegStandsGroup::default())?;
//! engine.process();
//!
//! assert!(engine.leg("AutoLegsStandFront").is_some());
//! assert!(engine.leg("AutoLegsStandRear").is_some());
//!
//! // Lengthening the line adds interval legs.
//! engine.push_segment(ConveyorSegment::straight(8.0, Vector3::new(12.0, 0.0, 0.0)));
//! let report = engine.process().unwrap_or_default();
//! assert!(report.created > 0);
//! # Ok::<(), conveyor_legs::LegStandsError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization of the value types in `conveyor-types`

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod conveyors;
mod coverage;
mod engine;
mod error;
mod group;
mod instances;
mod ledger;
mod path;
mod placement;
mod report;
mod solver;
mod stand;

pub use conveyors::ConveyorsGroup;
pub use coverage::compute_coverage;
pub use engine::LegStandsEngine;
pub use error::{LegStandsError, LegStandsResult};
pub use group::{LegStandsGroup, lock_to_conveyors};
pub use path::{LegPose, LegStandsPath, StraightPath};
pub use placement::{IntervalLayout, auto_leg_position, is_required, required_legs};
pub use report::UpdateReport;
pub use solver::support_plane;
pub use stand::{LEG_BASE_WIDTH, LegOwner, LegStand, OwnerId, leg_target_width};
