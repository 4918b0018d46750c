//! # logdev-color
//!
//! The colour half of the development pipeline.
//!
//! Everything here is a stateless function over an owned [`Image`]:
//!
//! - [`boost`] - saturation and contrast look, in linear light
//! - [`gamut_transform`] - working space to target gamut, floored for the log curve
//! - [`encode_curve`] - scene-linear to log code values
//! - [`apply_lut`] - optional creative or technical LUT
//!
//! [`LogSpace`] is the static table that tells the last three which gamut
//! and curve a user-facing log name stands for.
//!
//! # Example
//!
//! ```rust
//! use logdev_color::{encode_curve, gamut_matrix, gamut_transform, LogSpace};
//! use logdev_core::Image;
//! use logdev_math::Adaptation;
//! use logdev_primaries::PROPHOTO_RGB;
//!
//! let target = LogSpace::lookup("S-Log3")?;
//! let m = gamut_matrix(&PROPHOTO_RGB, &target.gamut, Adaptation::Cat02)?;
//!
//! let mut img = Image::filled(8, 8, [0.18, 0.18, 0.18]);
//! gamut_transform(&mut img, &m);
//! encode_curve(&mut img, target.curve);
//! assert!((img.pixel(0, 0)[1] - 0.41).abs() < 0.01);
//! # Ok::<(), logdev_color::ColorError>(())
//! ```
//!
//! [`Image`]: logdev_core::Image

#![warn(missing_docs)]

mod boost;
mod error;
mod log_space;
mod look;
mod transform;

pub use boost::{boost, BoostParams};
pub use error::{ColorError, ColorResult};
pub use log_space::LogSpace;
pub use look::apply_lut;
pub use transform::{encode_curve, gamut_matrix, gamut_transform, LINEAR_FLOOR};

/// Parses a chromatic adaptation name for configuration surfaces.
pub fn parse_adaptation(name: &str) -> ColorResult<logdev_math::Adaptation> {
    logdev_math::Adaptation::from_name(name)
        .ok_or_else(|| ColorError::UnknownAdaptation(name.to_string()))
}
