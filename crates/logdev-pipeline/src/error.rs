//! Error types for the development pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Pipeline error.
///
/// Configuration variants are raised before any pixel work starts and end
/// the whole invocation. The rest describe one unit's failure and are
/// caught at the unit boundary during batch runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid setting value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Input path does not exist.
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    /// Directory input paired with a non-directory output.
    #[error("output {0} must be a directory when the input is a directory")]
    OutputNotDirectory(PathBuf),

    /// Directory holds no supported camera files.
    #[error("no supported RAW files in {0}")]
    NoInputs(PathBuf),

    /// Worker pool could not start.
    #[error("worker pool: {0}")]
    Pool(String),

    /// Colour stage error.
    #[error(transparent)]
    Color(#[from] logdev_color::ColorError),

    /// Decode, metadata or encode error.
    #[error(transparent)]
    Io(#[from] logdev_io::IoError),

    /// Filesystem error while planning.
    #[error("{path}: {source}")]
    Fs {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A unit panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// A single-file run failed.
    #[error("{unit}: {source}")]
    Unit {
        /// Unit identity.
        unit: String,
        /// What went wrong.
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// True for errors that abort the whole invocation.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::InputNotFound(_)
                | Self::OutputNotDirectory(_)
                | Self::NoInputs(_)
                | Self::Pool(_)
                | Self::Color(logdev_color::ColorError::UnknownLogSpace { .. })
                | Self::Color(logdev_color::ColorError::UnknownAdaptation(_))
        )
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Fs {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
