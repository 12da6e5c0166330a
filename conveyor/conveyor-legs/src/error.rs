//! Error types for host-facing leg-stand operations.

use conveyor_types::ConfigError;
use thiserror::Error;

/// Result type for leg-stand operations.
pub type LegStandsResult<T> = Result<T, LegStandsError>;

/// Errors returned by the engine's mutators.
///
/// The update cycle itself never fails; these only guard the host API.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum LegStandsError {
    /// A leg with this name is already a child of the group.
    #[error("leg stand '{name}' already exists")]
    DuplicateLeg {
        /// The duplicate name.
        name: String,
    },

    /// No leg with this name exists.
    #[error("leg stand '{name}' not found")]
    LegNotFound {
        /// The missing name.
        name: String,
    },

    /// A conveyor segment index past the end of the line.
    #[error("conveyor segment {index} out of range (line has {len})")]
    SegmentOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of segments in the line.
        len: usize,
    },

    /// The updated configuration was rejected.
    #[error("invalid assembly config: {0}")]
    Config(#[from] ConfigError),
}
