//! # logdev-core
//!
//! Foundation types shared by every stage of the development pipeline.
//!
//! - [`Image`] - dense `height x width x 3` f32 raster, RGB interleaved
//! - [`Error`] / [`Result`] - construction errors
//! - [`LensMetadata`] - camera and lens facts for one file
//!
//! ## Ownership model
//!
//! An [`Image`] always owns one contiguous buffer. Stages either mutate it in
//! place or return a fresh image that replaces the old one; nothing keeps a
//! reference past the stage that produced it. Non-contiguous sources (a crop
//! out of a wider sensor buffer, for instance) are copied into a contiguous
//! image up front with [`Image::from_strided`].
//!
//! ```text
//! logdev-core (this crate)
//!    ^
//!    +-- logdev-color    (boost, gamut, curve)
//!    +-- logdev-io       (decode, encode)
//!    +-- logdev-lens     (geometry, vignetting)
//!    +-- logdev-pipeline (metering, orchestration)
//! ```

#![warn(missing_docs)]

mod error;
mod image;
mod metadata;

pub use error::{Error, Result};
pub use image::Image;
pub use metadata::LensMetadata;
