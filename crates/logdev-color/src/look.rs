//! LUT stage.

use logdev_core::Image;
use logdev_lut::Lut;

/// Applies `lut` to the image in place, then clamps to [0, 1].
///
/// A bare cube runs the trilinear kernel; other LUT shapes go through the
/// generic path. Either may map outside the unit range.
pub fn apply_lut(image: &mut Image, lut: &Lut) {
    lut.apply_image(image.data_mut());
    image.map_samples(|v| v.clamp(0.0, 1.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use logdev_lut::{Lut1D, Lut3D};

    #[test]
    fn test_identity_cube_is_passthrough() {
        let mut img = Image::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                img.set_pixel(x, y, [x as f32 / 3.0, y as f32 / 3.0, 0.37]);
            }
        }
        let before = img.clone();
        apply_lut(&mut img, &Lut::ThreeD(Lut3D::identity(17)));
        for (a, b) in img.data().iter().zip(before.data()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cube_output_is_clamped() {
        let mut lut = Lut3D::identity(2);
        for v in lut.data.iter_mut() {
            *v = [v[0] * 2.0 - 0.5, v[1], v[2]];
        }
        let mut img = Image::filled(1, 1, [1.0, 0.5, 0.0]);
        apply_lut(&mut img, &Lut::ThreeD(lut));
        assert_eq!(img.pixel(0, 0)[0], 1.0);
    }

    #[test]
    fn test_generic_path() {
        let curve = Lut1D::from_rgb(vec![0.0, 2.0], vec![0.0, 1.0], vec![1.0, 0.0]).unwrap();
        let mut img = Image::filled(1, 1, [0.25, 0.5, 0.25]);
        apply_lut(&mut img, &Lut::OneD(curve));
        let px = img.pixel(0, 0);
        assert_relative_eq!(px[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(px[1], 0.5, epsilon = 1e-6);
        assert_relative_eq!(px[2], 0.75, epsilon = 1e-6);

        let mut hot = Image::filled(1, 1, [1.0, 0.0, 0.0]);
        apply_lut(&mut hot, &Lut::OneD(Lut1D::from_rgb(vec![0.0, 2.0], vec![0.0, 1.0], vec![0.0, 1.0]).unwrap()));
        assert_eq!(hot.pixel(0, 0)[0], 1.0);
    }
}
