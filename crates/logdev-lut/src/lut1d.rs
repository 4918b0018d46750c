//! 1-dimensional lookup table.
//!
//! Independent curve per channel, linearly interpolated. Inputs outside
//! the domain clamp to the end entries.

use crate::{LutError, LutResult};

/// A per-channel curve LUT.
#[derive(Debug, Clone)]
pub struct Lut1D {
    /// Red curve
    pub r: Vec<f32>,
    /// Green curve
    pub g: Vec<f32>,
    /// Blue curve
    pub b: Vec<f32>,
    /// Input value mapped to the first entry, per channel
    pub domain_min: [f32; 3],
    /// Input value mapped to the last entry, per channel
    pub domain_max: [f32; 3],
}

impl Lut1D {
    /// Identity curve with `size` entries over [0, 1].
    ///
    /// # Panics
    ///
    /// Panics if `size < 2`.
    pub fn identity(size: usize) -> Self {
        assert!(size >= 2, "1D LUT needs at least 2 entries");
        let entries: Vec<f32> = (0..size).map(|i| i as f32 / (size - 1) as f32).collect();
        Self {
            r: entries.clone(),
            g: entries.clone(),
            b: entries,
            domain_min: [0.0; 3],
            domain_max: [1.0; 3],
        }
    }

    /// Builds a LUT from three equally sized curves over [0, 1].
    pub fn from_rgb(r: Vec<f32>, g: Vec<f32>, b: Vec<f32>) -> LutResult<Self> {
        if r.len() < 2 {
            return Err(LutError::InvalidSize(format!(
                "1D LUT needs at least 2 entries, got {}",
                r.len()
            )));
        }
        if r.len() != g.len() || r.len() != b.len() {
            return Err(LutError::InvalidSize("RGB curves must have the same length".into()));
        }
        Ok(Self {
            r,
            g,
            b,
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

    /// Number of entries per curve.
    #[inline]
    pub fn size(&self) -> usize {
        self.r.len()
    }

    /// Applies the curves to one RGB triplet.
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        [
            self.interpolate(&self.r, 0, rgb[0]),
            self.interpolate(&self.g, 1, rgb[1]),
            self.interpolate(&self.b, 2, rgb[2]),
        ]
    }

    #[inline]
    fn interpolate(&self, data: &[f32], axis: usize, value: f32) -> f32 {
        let n = data.len();
        let lo = self.domain_min[axis];
        let t = ((value - lo) / (self.domain_max[axis] - lo)).clamp(0.0, 1.0);

        let idx_f = t * (n - 1) as f32;
        let i0 = (idx_f as usize).min(n - 2);
        let frac = idx_f - i0 as f32;
        data[i0] + (data[i0 + 1] - data[i0]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let lut = Lut1D::identity(256);
        let out = lut.apply_rgb([0.5, 0.3, 0.8]);
        assert_relative_eq!(out[0], 0.5, epsilon = 1e-5);
        assert_relative_eq!(out[1], 0.3, epsilon = 1e-5);
        assert_relative_eq!(out[2], 0.8, epsilon = 1e-5);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let lut = Lut1D::identity(16);
        let out = lut.apply_rgb([-1.0, 2.0, 1.0]);
        assert_eq!(out[0], 0.0);
        assert_relative_eq!(out[1], 1.0);
        assert_relative_eq!(out[2], 1.0);
    }

    #[test]
    fn test_domain_rescales_input() {
        let lut = Lut1D::identity(3).with_domain([0.0; 3], [2.0; 3]).unwrap();
        assert_relative_eq!(lut.apply_rgb([1.0, 1.0, 1.0])[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid() {
        assert!(Lut1D::from_rgb(vec![0.0], vec![0.0], vec![0.0]).is_err());
        assert!(Lut1D::from_rgb(vec![0.0, 1.0], vec![0.0], vec![0.0, 1.0]).is_err());
        assert!(Lut1D::identity(4).with_domain([0.0; 3], [0.0, 1.0, 1.0]).is_err());
    }
}
