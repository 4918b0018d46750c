//! Error types for image construction.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when building an [`Image`](crate::Image).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Zero-sized or overflowing dimensions.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// Buffer length does not match the dimensions.
    ///
    /// For an RGB image the buffer must hold exactly `width * height * 3`
    /// samples (or, for strided input, enough samples to cover every row).
    #[error("buffer holds {actual} samples, expected {expected}")]
    BufferSize {
        /// Required sample count
        expected: usize,
        /// Provided sample count
        actual: usize,
    },
}
