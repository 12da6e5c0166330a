//! Error types for assembly configuration.

use thiserror::Error;

/// Errors raised when validating an [`AssemblyConfig`](crate::AssemblyConfig).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric field is NaN or infinite.
    #[error("config field '{field}' must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}
