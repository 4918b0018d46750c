//! Error types for color stages.

use thiserror::Error;

/// Color stage error.
///
/// Only configuration problems surface here. Numeric edge cases inside the
/// stages are handled with floors and never produce an error.
#[derive(Debug, Error)]
pub enum ColorError {
    /// Log space name is not in the descriptor table.
    #[error("unknown log space '{name}' (available: {available})")]
    UnknownLogSpace {
        /// Requested name.
        name: String,
        /// Comma separated list of known names.
        available: String,
    },

    /// Chromatic adaptation name not recognised.
    #[error("unknown chromatic adaptation '{0}'")]
    UnknownAdaptation(String),

    /// Gamut matrix contains NaN or infinity.
    #[error("matrix error: {0}")]
    MatrixError(String),

    /// Image buffer problem.
    #[error(transparent)]
    Image(#[from] logdev_core::Error),
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
