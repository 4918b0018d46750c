//! Gamut transform and curve encoding stages.

use logdev_core::Image;
use logdev_math::{Adaptation, Mat3};
use logdev_primaries::{rgb_to_rgb_matrix, Primaries};
use logdev_transfer::LogCurve;
use rayon::prelude::*;

use crate::{ColorError, ColorResult};

/// Lowest value allowed to reach a log curve.
pub const LINEAR_FLOOR: f32 = 1e-6;

/// Pixels per parallel work item.
const CHUNK_PIXELS: usize = 8192;

/// Builds the 3x3 matrix taking `src` RGB to `dst` RGB.
///
/// Derived from the primaries and white points of both spaces, with `cat`
/// bridging differing whites. Errors only when the result is not finite.
pub fn gamut_matrix(src: &Primaries, dst: &Primaries, cat: Adaptation) -> ColorResult<Mat3> {
    let m = rgb_to_rgb_matrix(src, dst, cat);
    if !m.is_finite() {
        return Err(ColorError::MatrixError(format!(
            "{} -> {} produced a non-finite matrix",
            src.name, dst.name
        )));
    }
    Ok(m)
}

/// Applies `matrix` to every pixel and floors the result at [`LINEAR_FLOOR`].
pub fn gamut_transform(image: &mut Image, matrix: &Mat3) {
    image
        .data_mut()
        .par_chunks_mut(CHUNK_PIXELS * 3)
        .for_each(|chunk| {
            matrix.apply_rgb_slice(chunk);
            for v in chunk.iter_mut() {
                *v = v.max(LINEAR_FLOOR);
            }
        });
}

/// Encodes every sample with `curve`.
pub fn encode_curve(image: &mut Image, curve: LogCurve) {
    image.map_samples(|v| curve.encode(v));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use logdev_primaries::{PROPHOTO_RGB, S_GAMUT3, V_GAMUT};

    fn ramp() -> Image {
        let mut img = Image::new(5, 3);
        for y in 0..3 {
            for x in 0..5 {
                let t = (x + y * 5) as f32 / 15.0;
                img.set_pixel(x, y, [0.05 + t, 0.2 + 0.5 * t, 0.6 - 0.3 * t]);
            }
        }
        img
    }

    #[test]
    fn test_round_trip() {
        let forward = gamut_matrix(&PROPHOTO_RGB, &V_GAMUT, Adaptation::Cat02).unwrap();
        let back = gamut_matrix(&V_GAMUT, &PROPHOTO_RGB, Adaptation::Cat02).unwrap();

        // Saturated ProPhoto colours can leave V-Gamut, so stay near neutral
        // where the floor is never hit.
        let mut img = Image::filled(4, 4, [0.3, 0.25, 0.2]);
        let original = img.clone();
        gamut_transform(&mut img, &forward);
        gamut_transform(&mut img, &back);

        for (a, b) in img.data().iter().zip(original.data()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_neutral_stays_neutral() {
        let m = gamut_matrix(&PROPHOTO_RGB, &S_GAMUT3, Adaptation::Cat02).unwrap();
        let mut img = Image::filled(2, 2, [0.18; 3]);
        gamut_transform(&mut img, &m);
        for v in img.data() {
            assert_relative_eq!(*v, 0.18, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_floor() {
        let mut img = Image::filled(2, 1, [-1.0, 0.0, 0.5]);
        gamut_transform(&mut img, &Mat3::IDENTITY);
        assert_eq!(img.pixel(0, 0), [LINEAR_FLOOR, LINEAR_FLOOR, 0.5]);
    }

    #[test]
    fn test_encode_matches_curve() {
        let mut img = ramp();
        let linear = img.clone();
        encode_curve(&mut img, LogCurve::LogC3);
        for (enc, lin) in img.data().iter().zip(linear.data()) {
            assert_eq!(*enc, LogCurve::LogC3.encode(*lin));
        }
    }
}
