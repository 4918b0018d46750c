//! Saturation and contrast boost.
//!
//! A fixed look applied in linear light ahead of the gamut transform:
//!
//! ```text
//! luma = dot(rgb, rec709_weights)
//! rgb  = luma + (rgb - luma) * saturation
//! rgb  = pivot + (rgb - pivot) * contrast
//! rgb  = max(rgb, 0)
//! ```

use logdev_core::Image;
use logdev_primaries::REC709;
use serde::{Deserialize, Serialize};

/// Boost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostParams {
    /// Distance-from-luma multiplier (1.0 = no change).
    pub saturation: f32,
    /// Distance-from-pivot multiplier (1.0 = no change).
    pub contrast: f32,
    /// Contrast pivot in linear light.
    pub pivot: f32,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            saturation: 1.25,
            contrast: 1.1,
            pivot: 0.18,
        }
    }
}

impl BoostParams {
    /// Parameters that leave the image untouched.
    pub fn identity() -> Self {
        Self {
            saturation: 1.0,
            contrast: 1.0,
            ..Self::default()
        }
    }

    /// True when applying would change nothing.
    pub fn is_identity(&self) -> bool {
        self.saturation == 1.0 && self.contrast == 1.0
    }

    /// Boosts one pixel.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3], weights: [f32; 3]) -> [f32; 3] {
        let luma = rgb[0] * weights[0] + rgb[1] * weights[1] + rgb[2] * weights[2];
        rgb.map(|c| {
            let s = luma + (c - luma) * self.saturation;
            (self.pivot + (s - self.pivot) * self.contrast).max(0.0)
        })
    }
}

/// Applies the boost to every pixel in place.
pub fn boost(image: &mut Image, params: &BoostParams) {
    let weights = REC709.luminance_weights().to_array();
    let params = *params;
    image.map_pixels(move |rgb| params.apply(rgb, weights));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let mut img = Image::filled(3, 2, [0.4, 0.1, 0.9]);
        img.set_pixel(1, 1, [2.5, 0.0, 0.18]);
        let before = img.clone();
        boost(&mut img, &BoostParams::identity());
        for (a, b) in img.data().iter().zip(before.data()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_pivot_gray_is_fixed() {
        let mut img = Image::filled(2, 2, [0.18; 3]);
        boost(&mut img, &BoostParams::default());
        for v in img.data() {
            assert_relative_eq!(*v, 0.18, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_saturation_spreads_channels() {
        let p = BoostParams { saturation: 2.0, contrast: 1.0, pivot: 0.18 };
        let w = REC709.luminance_weights().to_array();
        let out = p.apply([0.3, 0.2, 0.1], w);
        assert!(out[0] - out[2] > 0.2);
    }

    #[test]
    fn test_floor_at_zero() {
        let mut img = Image::filled(1, 1, [0.01, 0.0, 0.0]);
        boost(&mut img, &BoostParams { saturation: 1.0, contrast: 3.0, pivot: 0.18 });
        assert_eq!(img.pixel(0, 0), [0.0, 0.0, 0.0]);
    }
}
