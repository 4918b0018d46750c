//! # logdev-pipeline
//!
//! Turns camera RAW files into log-encoded 16-bit rasters.
//!
//! - [`meter`] - exposure gain from image content, four modes
//! - [`Pipeline`] - one image through every stage, in a fixed order
//! - [`plan`] / [`run`] - single file or parallel batch
//! - [`LogSink`] - where progress messages go
//!
//! ## Failure model
//!
//! Configuration errors ([`PipelineError::is_config`]) stop an invocation
//! before any pixel work. A unit that fails is reported under its file name
//! and never affects its siblings. Optional stages (lens correction, LUT)
//! degrade to a passthrough and report a [`StageOutcome`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use logdev_pipeline::{plan, run, Pipeline, PipelineSettings, TracingSink};
//!
//! let settings = PipelineSettings {
//!     log_space: "S-Log3".into(),
//!     ..Default::default()
//! };
//! let jobs = settings.jobs;
//! let ext = settings.format.extension();
//! let pipeline = Pipeline::standard(settings)?;
//! let work = plan(Path::new("card/DCIM"), Path::new("graded"), ext)?;
//! let report = run(&pipeline, work, jobs, &TracingSink)?;
//! println!("{}", report.summary());
//! # Ok::<(), logdev_pipeline::PipelineError>(())
//! ```

#![warn(missing_docs)]

mod batch;
mod error;
mod metering;
mod pipeline;
mod settings;
mod sink;
mod stage;

use std::any::Any;

pub use batch::{
    is_raw_file, plan, run, run_batch, run_unit, BatchReport, Plan, UnitReport, WorkUnit, RAW_EXTENSIONS,
};
pub use error::{PipelineError, PipelineResult};
pub use metering::{apply_gain, meter, Exposure, Metering, MeteringDetail, MeteringMode, MeteringParams};
pub use pipeline::{Collaborators, Pipeline, UnitSummary};
pub use settings::{LensSettings, PipelineSettings, DEFAULT_JOBS};
pub use sink::{ChannelSink, LogRecord, LogSink, TracingSink, UnitLog};
pub use stage::StageOutcome;

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}
