//! # logdev-math
//!
//! Small linear algebra kit for color transforms.
//!
//! - [`Mat3`] - 3x3 matrices for RGB/XYZ conversions
//! - [`Vec3`] - RGB or XYZ triplets
//! - [`Adaptation`] - chromatic adaptation transforms (Bradford, CAT02, Von Kries)
//!
//! All matrices are **row-major** and act on **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Bulk pixel work goes through [`Mat3::apply_rgb_slice`], which hands the
//! per-pixel product to [`glam`] so it vectorizes.
//!
//! ```rust
//! use logdev_math::{Mat3, Vec3};
//!
//! let m = Mat3::diagonal(2.0, 1.0, 0.5);
//! assert_eq!(m * Vec3::ONE, Vec3::new(2.0, 1.0, 0.5));
//! ```

#![warn(missing_docs)]

mod adapt;
mod mat3;
mod vec3;

pub use adapt::*;
pub use mat3::*;
pub use vec3::*;
