//! Optional stage results.

use std::fmt;

/// Result of an optional stage.
///
/// Only `Applied` changes the image. `Skipped` is a decision (disabled,
/// nothing configured, missing inputs) and `Failed` a degraded-mode
/// condition; neither stops the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage ran and changed the image.
    Applied,
    /// The stage did not run.
    Skipped(String),
    /// The stage tried and failed; the image is unchanged.
    Failed(String),
}

impl StageOutcome {
    /// True for [`StageOutcome::Applied`].
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Skipped(why) => write!(f, "skipped ({why})"),
            Self::Failed(why) => write!(f, "failed ({why})"),
        }
    }
}
