//! Error types for the simulation core.
//!
//! Invalid configuration is rejected where it enters the crate (scenario
//! loading, config patches, well creation) so the integrator only ever sees
//! values inside their valid domain. Theme failures have their own type in
//! [`crate::simulation::theme`] because they are recoverable and never touch
//! simulation state.

use std::fmt;

/// Top-level error enum for the gravfield core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A configuration value is outside its valid domain.
    InvalidConfig {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the valid range.
        valid_range: &'static str,
    },

    /// A viewport dimension is not strictly positive.
    InvalidViewport {
        width: f64,
        height: f64,
    },

    /// A palette list or one of its palettes was empty.
    EmptyPalette,

    /// A palette index past the end of the palette list.
    PaletteIndex {
        index: usize,
        len: usize,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfig {
                name,
                value,
                valid_range,
            } => write!(
                f,
                "config value '{}' = {} is outside valid range {}",
                name, value, valid_range
            ),
            SimError::InvalidViewport { width, height } => {
                write!(f, "viewport {}x{} must have positive dimensions", width, height)
            }
            SimError::EmptyPalette => write!(f, "palette must contain at least one color"),
            SimError::PaletteIndex { index, len } => {
                write!(f, "palette index {} out of range, {} palettes loaded", index, len)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
