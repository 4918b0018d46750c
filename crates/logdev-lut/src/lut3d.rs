//! 3-dimensional lookup table.
//!
//! Entries are stored in cube-file order: red varies fastest, then green,
//! then blue. `index = r + g * size + b * size * size`.

use crate::{LutError, LutResult};
use rayon::prelude::*;

/// Pixels per parallel work item in [`Lut3D::apply_image`].
const CHUNK_PIXELS: usize = 4096;

/// An RGB cube LUT with trilinear interpolation.
#[derive(Debug, Clone)]
pub struct Lut3D {
    /// `size^3` output triplets, red fastest
    pub data: Vec<[f32; 3]>,
    /// Grid points per axis
    pub size: usize,
    /// Input mapped to grid index 0, per axis
    pub domain_min: [f32; 3],
    /// Input mapped to grid index `size - 1`, per axis
    pub domain_max: [f32; 3],
}

/// Precomputed per-axis mapping from input value to grid coordinate.
#[derive(Clone, Copy)]
struct GridMap {
    lo: [f32; 3],
    scale: [f32; 3],
    max_index: f32,
}

impl GridMap {
    #[inline(always)]
    fn coord(&self, axis: usize, v: f32) -> f32 {
        // max/min instead of clamp: NaN lands on 0
        ((v - self.lo[axis]) * self.scale[axis]).max(0.0).min(self.max_index)
    }
}

impl Lut3D {
    /// Identity cube over [0, 1].
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`.
    pub fn identity(size: usize) -> Self {
        assert!(size >= 2, "3D LUT needs at least 2 points per axis");
        let step = 1.0 / (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push([r as f32 * step, g as f32 * step, b as f32 * step]);
                }
            }
        }
        Self {
            data,
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        }
    }

    /// Builds a cube from red-fastest data.
    pub fn from_data(data: Vec<[f32; 3]>, size: usize) -> LutResult<Self> {
        if size < 2 {
            return Err(LutError::InvalidSize(format!(
                "3D LUT needs at least 2 points per axis, got {size}"
            )));
        }
        let expected = size * size * size;
        if data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {expected} entries for size {size}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            size,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        })
    }

    /// Sets the input domain.
    pub fn with_domain(mut self, min: [f32; 3], max: [f32; 3]) -> LutResult<Self> {
        if (0..3).any(|i| max[i] <= min[i]) {
            return Err(LutError::InvalidDomain { min, max });
        }
        self.domain_min = min;
        self.domain_max = max;
        Ok(self)
    }

    fn grid_map(&self) -> GridMap {
        let n = (self.size - 1) as f32;
        let mut scale = [0.0; 3];
        for (i, s) in scale.iter_mut().enumerate() {
            *s = n / (self.domain_max[i] - self.domain_min[i]);
        }
        GridMap {
            lo: self.domain_min,
            scale,
            max_index: n,
        }
    }

    /// Interpolates one RGB triplet.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        sample(&self.data, self.size, &self.grid_map(), rgb)
    }

    /// Applies the cube to an interleaved RGB buffer in place.
    ///
    /// The per-pixel loop does no allocation and no bounds-dependent
    /// branching beyond the grid clamp. Work is split over rayon in
    /// fixed-size pixel chunks.
    pub fn apply_image(&self, rgb: &mut [f32]) {
        let map = self.grid_map();
        let table = self.data.as_slice();
        let size = self.size;
        rgb.par_chunks_mut(CHUNK_PIXELS * 3).for_each(|chunk| {
            for px in chunk.chunks_exact_mut(3) {
                let out = sample(table, size, &map, [px[0], px[1], px[2]]);
                px[0] = out[0];
                px[1] = out[1];
                px[2] = out[2];
            }
        });
    }
}

#[inline(always)]
fn sample(table: &[[f32; 3]], size: usize, map: &GridMap, rgb: [f32; 3]) -> [f32; 3] {
    let x = map.coord(0, rgb[0]);
    let y = map.coord(1, rgb[1]);
    let z = map.coord(2, rgb[2]);

    let last = size - 2;
    let (ri, gi, bi) = (
        (x as usize).min(last),
        (y as usize).min(last),
        (z as usize).min(last),
    );
    let (fr, fg, fb) = (x - ri as f32, y - gi as f32, z - bi as f32);

    let s1 = size;
    let s2 = size * size;
    let base = ri + gi * s1 + bi * s2;

    let c000 = table[base];
    let c100 = table[base + 1];
    let c010 = table[base + s1];
    let c110 = table[base + s1 + 1];
    let c001 = table[base + s2];
    let c101 = table[base + s2 + 1];
    let c011 = table[base + s2 + s1];
    let c111 = table[base + s2 + s1 + 1];

    let mut out = [0.0f32; 3];
    for i in 0..3 {
        let c00 = c000[i] + (c100[i] - c000[i]) * fr;
        let c10 = c010[i] + (c110[i] - c010[i]) * fr;
        let c01 = c001[i] + (c101[i] - c001[i]) * fr;
        let c11 = c011[i] + (c111[i] - c011[i]) * fr;
        let c0 = c00 + (c10 - c00) * fg;
        let c1 = c01 + (c11 - c01) * fg;
        out[i] = c0 + (c1 - c0) * fb;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_is_identity() {
        let lut = Lut3D::identity(17);
        for rgb in [[0.0, 0.0, 0.0], [0.18, 0.18, 0.18], [0.3, 0.7, 0.95], [1.0, 1.0, 1.0]] {
            let out = lut.apply(rgb);
            for i in 0..3 {
                assert_relative_eq!(out[i], rgb[i], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn image_kernel_matches_single_pixel() {
        let mut data = Vec::new();
        for b in 0..3 {
            for g in 0..3 {
                for r in 0..3 {
                    let (r, g, b) = (r as f32 / 2.0, g as f32 / 2.0, b as f32 / 2.0);
                    data.push([r * r, (g + b) * 0.5, 1.0 - r]);
                }
            }
        }
        let lut = Lut3D::from_data(data, 3).unwrap();

        let mut buf: Vec<f32> = (0..3 * 5000).map(|i| (i % 97) as f32 / 96.0).collect();
        let input = buf.clone();
        lut.apply_image(&mut buf);

        for (px_in, px_out) in input.chunks_exact(3).zip(buf.chunks_exact(3)) {
            let expected = lut.apply([px_in[0], px_in[1], px_in[2]]);
            assert_eq!(px_out, &expected[..]);
        }
    }

    #[test]
    fn red_varies_fastest() {
        let lut = Lut3D::identity(2);
        assert_eq!(lut.data[1], [1.0, 0.0, 0.0]);
        assert_eq!(lut.data[2], [0.0, 1.0, 0.0]);
        assert_eq!(lut.data[4], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn domain_and_clamp() {
        let lut = Lut3D::identity(5).with_domain([-1.0; 3], [1.0; 3]).unwrap();
        // input 0.0 sits halfway through the domain
        let out = lut.apply([0.0, -5.0, 5.0]);
        assert_relative_eq!(out[0], 0.5, epsilon = 1e-6);
        assert_relative_eq!(out[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(out[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(Lut3D::from_data(vec![[0.0; 3]; 7], 2).is_err());
        assert!(Lut3D::from_data(vec![[0.0; 3]], 1).is_err());
        assert!(Lut3D::identity(2).with_domain([1.0; 3], [0.0; 3]).is_err());
    }
}
