//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while loading or building a LUT.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid LUT size.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Domain with `max <= min` on some axis.
    #[error("invalid LUT domain: [{min:?}, {max:?}]")]
    InvalidDomain {
        /// Lower bounds
        min: [f32; 3],
        /// Upper bounds
        max: [f32; 3],
    },

    /// Malformed cube file.
    #[error("parse error at line {line}: {msg}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        msg: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
