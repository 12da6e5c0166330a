//! Core value types for conveyor leg-stand placement.
//!
//! This crate provides the foundational types shared by the leg-stand
//! engine and its host:
//!
//! - [`Transform3`] - Affine transform with a free-form (scaled) basis
//! - [`Plane`] - Infinite plane with ray intersection
//! - [`ConveyorSegment`] / [`ConveyorKind`] - Read-only view of one conveyor
//! - [`CoverageRange`] - Span of path coordinates covered by the line
//! - [`LegIndex`] - Leg identity and its name encoding
//! - [`AssemblyConfig`] / [`LegModel`] - Tunable assembly parameters
//!
//! # Layer 0 Crate
//!
//! No engine or scene-graph dependencies. Hosts map their own node
//! transforms onto [`Transform3`].
//!
//! # Coordinate System
//!
//! Follows the host scene convention:
//! - X: along a straight conveyor line
//! - Y: up
//! - Z: across the line
//!
//! All coordinates are `f64`.
//!
//! # Example
//!
//! ```
//! use conveyor_types::{ConveyorSegment, CoverageRange, LegIndex};
//! use nalgebra::Vector3;
//!
//! let segment = ConveyorSegment::straight(4.0, Vector3::new(2.0, 1.0, 0.0));
//! assert_eq!(segment.transform.scale().x, 4.0);
//!
//! let range = CoverageRange::new(0.0, 4.0);
//! assert!(range.contains(2.0));
//!
//! assert_eq!(LegIndex::from_name("AutoLegsStandFront"), LegIndex::Front);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all value types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod leg;
mod plane;
mod range;
mod segment;
mod transform;

pub use config::{AssemblyConfig, LegModel, MIN_INTERVAL};
pub use error::ConfigError;
pub use leg::{AUTO_LEG_NAME_FRONT, AUTO_LEG_NAME_PREFIX, AUTO_LEG_NAME_REAR, LegIndex};
pub use plane::{PLANE_EPSILON, Plane};
pub use range::CoverageRange;
pub use segment::{ConveyorKind, ConveyorSegment};
pub use transform::{Transform3, basis_from_euler, euler_from_basis};

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Point3, Vector3};
