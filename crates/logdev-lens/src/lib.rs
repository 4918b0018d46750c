//! # logdev-lens
//!
//! Lens correction from lensfun calibration data.
//!
//! - [`LensDatabase`] - lensfun XML loader and lens lookup
//! - [`LensProfile`] - per-lens calibrations, interpolated by focal length
//! - [`ProfileCorrector`] - the [`LensCorrector`] the pipeline uses by default
//!
//! # Models
//!
//! | Correction | Models |
//! |------------|--------|
//! | Distortion | `ptlens`, `poly3`, `poly5` |
//! | TCA | `linear`, `poly3` |
//! | Vignetting | `pa` |
//!
//! Crop factor differences between the calibration body and the shooting
//! body are not compensated.

#![warn(missing_docs)]

mod correct;
mod db;
mod error;
mod profile;

pub use correct::{correct_with_profile, devignette, remap, LensCorrector, LensToggles, ProfileCorrector};
pub use db::{Camera, LensDatabase, SYSTEM_PATHS};
pub use error::{LensError, LensResult};
pub use profile::{AtFocal, DistortionModel, LensProfile, TcaModel, Vignetting};
