//! # logdev-lut
//!
//! Lookup tables for the grading stage.
//!
//! - [`Lut1D`] - per-channel curves
//! - [`Lut3D`] - RGB cube with trilinear interpolation
//! - [`cube`] - Resolve/Adobe `.cube` reader and writer
//!
//! A loaded file becomes a [`Lut`]: a bare cube, a bare curve, or a
//! shaper curve followed by a cube. Pure cubes run through
//! [`Lut3D::apply_image`], the allocation-free image kernel; everything else
//! goes through the generic per-pixel [`Lut::apply_rgb`].
//!
//! ```rust
//! use logdev_lut::{Lut, Lut3D};
//!
//! let lut = Lut::ThreeD(Lut3D::identity(17));
//! let mut rgb = vec![0.25, 0.5, 0.75];
//! lut.apply_image(&mut rgb);
//! assert!((rgb[1] - 0.5).abs() < 1e-5);
//! ```

#![warn(missing_docs)]

pub mod cube;
mod error;
mod lut1d;
mod lut3d;

pub use error::{LutError, LutResult};
pub use lut1d::Lut1D;
pub use lut3d::Lut3D;

use rayon::prelude::*;

/// Pixels per parallel work item for the generic path.
const CHUNK_PIXELS: usize = 4096;

/// A loaded lookup table.
#[derive(Debug, Clone)]
pub enum Lut {
    /// Per-channel curves only.
    OneD(Lut1D),
    /// A 3D cube only.
    ThreeD(Lut3D),
    /// Transforms applied in order (e.g. a shaper curve then a cube).
    Sequence(Vec<Lut>),
}

impl Lut {
    /// Returns the cube when this is a bare 3D table.
    pub fn as_3d(&self) -> Option<&Lut3D> {
        match self {
            Self::ThreeD(lut) => Some(lut),
            _ => None,
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::OneD(lut) => format!("1D ({} entries)", lut.size()),
            Self::ThreeD(lut) => format!("3D ({0}x{0}x{0})", lut.size),
            Self::Sequence(items) => {
                let parts: Vec<_> = items.iter().map(Lut::describe).collect();
                parts.join(" -> ")
            }
        }
    }

    /// Applies the LUT to one RGB triplet.
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            Self::OneD(lut) => lut.apply_rgb(rgb),
            Self::ThreeD(lut) => lut.apply(rgb),
            Self::Sequence(items) => items.iter().fold(rgb, |acc, lut| lut.apply_rgb(acc)),
        }
    }

    /// Applies the LUT to an interleaved RGB buffer in place.
    ///
    /// Bare cubes take the dedicated trilinear kernel; any other shape
    /// runs the generic per-pixel path in parallel.
    pub fn apply_image(&self, rgb: &mut [f32]) {
        if let Self::ThreeD(lut) = self {
            lut.apply_image(rgb);
            return;
        }
        rgb.par_chunks_mut(CHUNK_PIXELS * 3).for_each(|chunk| {
            for px in chunk.chunks_exact_mut(3) {
                let out = self.apply_rgb([px[0], px[1], px[2]]);
                px.copy_from_slice(&out);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sequence_applies_in_order() {
        let double = Lut1D::from_rgb(vec![0.0, 2.0], vec![0.0, 2.0], vec![0.0, 2.0])
            .unwrap()
            .with_domain([0.0; 3], [1.0; 3])
            .unwrap();
        let seq = Lut::Sequence(vec![
            Lut::OneD(Lut1D::identity(2)),
            Lut::OneD(double),
        ]);
        let out = seq.apply_rgb([0.25, 0.5, 0.1]);
        assert_relative_eq!(out[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(out[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn generic_path_matches_per_pixel() {
        let lut = Lut::OneD(Lut1D::identity(5));
        let mut buf: Vec<f32> = (0..30).map(|i| i as f32 / 30.0).collect();
        let expected = buf.clone();
        lut.apply_image(&mut buf);
        for (a, b) in buf.iter().zip(&expected) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn describe_sequence() {
        let seq = Lut::Sequence(vec![
            Lut::OneD(Lut1D::identity(4)),
            Lut::ThreeD(Lut3D::identity(2)),
        ]);
        assert_eq!(seq.describe(), "1D (4 entries) -> 3D (2x2x2)");
        assert!(seq.as_3d().is_none());
    }
}
