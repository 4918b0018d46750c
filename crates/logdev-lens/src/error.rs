//! Error types for lens correction.

use thiserror::Error;

/// Lens correction error.
///
/// None of these are fatal to a development run; the pipeline logs them
/// and keeps the uncorrected image.
#[derive(Debug, Error)]
pub enum LensError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed database XML.
    #[error("XML error in {file}: {msg}")]
    Xml {
        /// Offending file.
        file: String,
        /// Parser message.
        msg: String,
    },

    /// No database could be loaded.
    #[error("no lens database available: {0}")]
    NoDatabase(String),

    /// The database has no profile for this lens.
    #[error("no profile for lens '{0}'")]
    ProfileNotFound(String),

    /// The profile has no data for the requested correction.
    #[error("profile '{lens}' has no {kind} calibration")]
    NoCalibration {
        /// Lens model.
        lens: String,
        /// Correction kind.
        kind: &'static str,
    },

    /// Metadata lacks fields correction depends on.
    #[error("missing metadata: {0}")]
    MissingMetadata(String),
}

/// Result type for lens operations.
pub type LensResult<T> = Result<T, LensError>;
