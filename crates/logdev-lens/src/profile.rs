//! Lens profiles and calibration selection.
//!
//! Radii are normalised: distortion and TCA to half the shorter image side,
//! vignetting to half the diagonal.

/// Radial distortion polynomial, mapping undistorted radius `ru` to
/// distorted radius `rd`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistortionModel {
    /// `rd = ru * (a*ru^3 + b*ru^2 + c*ru + 1 - a - b - c)`
    PtLens {
        /// Cubic term.
        a: f32,
        /// Quadratic term.
        b: f32,
        /// Linear term.
        c: f32,
    },
    /// `rd = ru * (1 - k1 + k1*ru^2)`
    Poly3 {
        /// Cubic term.
        k1: f32,
    },
    /// `rd = ru * (1 + k1*ru^2 + k2*ru^4)`
    Poly5 {
        /// Quadratic term.
        k1: f32,
        /// Quartic term.
        k2: f32,
    },
}

impl DistortionModel {
    /// `rd / ru` at `ru`. Finite at the centre.
    #[inline]
    pub fn scale(&self, ru: f32) -> f32 {
        let r2 = ru * ru;
        match *self {
            Self::PtLens { a, b, c } => a * r2 * ru + b * r2 + c * ru + 1.0 - a - b - c,
            Self::Poly3 { k1 } => 1.0 - k1 + k1 * r2,
            Self::Poly5 { k1, k2 } => 1.0 + k1 * r2 + k2 * r2 * r2,
        }
    }

    /// True for the do-nothing polynomial.
    pub fn is_identity(&self) -> bool {
        match *self {
            Self::PtLens { a, b, c } => a == 0.0 && b == 0.0 && c == 0.0,
            Self::Poly3 { k1 } => k1 == 0.0,
            Self::Poly5 { k1, k2 } => k1 == 0.0 && k2 == 0.0,
        }
    }

    fn lerp(&self, other: &Self, t: f32) -> Option<Self> {
        let l = |x: f32, y: f32| x + (y - x) * t;
        match (*self, *other) {
            (Self::PtLens { a, b, c }, Self::PtLens { a: a2, b: b2, c: c2 }) => Some(Self::PtLens {
                a: l(a, a2),
                b: l(b, b2),
                c: l(c, c2),
            }),
            (Self::Poly3 { k1 }, Self::Poly3 { k1: k2 }) => Some(Self::Poly3 { k1: l(k1, k2) }),
            (Self::Poly5 { k1, k2 }, Self::Poly5 { k1: o1, k2: o2 }) => Some(Self::Poly5 {
                k1: l(k1, o1),
                k2: l(k2, o2),
            }),
            _ => None,
        }
    }
}

/// Lateral chromatic aberration, as per-channel radius scales applied on
/// top of distortion. Green is the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TcaModel {
    /// `rd = ru * k`
    Linear {
        /// Red scale.
        kr: f32,
        /// Blue scale.
        kb: f32,
    },
    /// `rd = ru * (b*ru^2 + c*ru + v)`
    Poly3 {
        /// Red constant term.
        vr: f32,
        /// Blue constant term.
        vb: f32,
        /// Red linear term.
        cr: f32,
        /// Blue linear term.
        cb: f32,
        /// Red quadratic term.
        br: f32,
        /// Blue quadratic term.
        bb: f32,
    },
}

impl TcaModel {
    /// `(red, blue)` radius scales at `r`.
    #[inline]
    pub fn scales(&self, r: f32) -> (f32, f32) {
        match *self {
            Self::Linear { kr, kb } => (kr, kb),
            Self::Poly3 { vr, vb, cr, cb, br, bb } => {
                let r2 = r * r;
                (br * r2 + cr * r + vr, bb * r2 + cb * r + vb)
            }
        }
    }

    fn lerp(&self, other: &Self, t: f32) -> Option<Self> {
        let l = |x: f32, y: f32| x + (y - x) * t;
        match (*self, *other) {
            (Self::Linear { kr, kb }, Self::Linear { kr: r2, kb: b2 }) => Some(Self::Linear {
                kr: l(kr, r2),
                kb: l(kb, b2),
            }),
            (
                Self::Poly3 { vr, vb, cr, cb, br, bb },
                Self::Poly3 { vr: vr2, vb: vb2, cr: cr2, cb: cb2, br: br2, bb: bb2 },
            ) => Some(Self::Poly3 {
                vr: l(vr, vr2),
                vb: l(vb, vb2),
                cr: l(cr, cr2),
                cb: l(cb, cb2),
                br: l(br, br2),
                bb: l(bb, bb2),
            }),
            _ => None,
        }
    }
}

/// Vignetting in the `pa` model: `Cd = Cs * (1 + k1*r^2 + k2*r^4 + k3*r^6)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vignetting {
    /// Focal length in mm.
    pub focal: f32,
    /// Aperture as f-number.
    pub aperture: f32,
    /// Focus distance in metres.
    pub distance: f32,
    /// r^2 term.
    pub k1: f32,
    /// r^4 term.
    pub k2: f32,
    /// r^6 term.
    pub k3: f32,
}

impl Vignetting {
    /// Brightness falloff factor at normalised radius `r`.
    #[inline]
    pub fn falloff(&self, r: f32) -> f32 {
        let r2 = r * r;
        1.0 + self.k1 * r2 + self.k2 * r2 * r2 + self.k3 * r2 * r2 * r2
    }
}

/// A calibration entry keyed by focal length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtFocal<T> {
    /// Focal length in mm.
    pub focal: f32,
    /// Calibrated model.
    pub model: T,
}

/// One lens from the database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensProfile {
    /// Manufacturer.
    pub maker: String,
    /// Model name.
    pub model: String,
    /// Mounts the lens fits.
    pub mounts: Vec<String>,
    /// Crop factor of the calibration body.
    pub crop_factor: f32,
    /// Distortion calibrations.
    pub distortion: Vec<AtFocal<DistortionModel>>,
    /// TCA calibrations.
    pub tca: Vec<AtFocal<TcaModel>>,
    /// Vignetting calibrations.
    pub vignetting: Vec<Vignetting>,
}

impl LensProfile {
    /// Distortion at `focal`, interpolated linearly between the bracketing
    /// calibrations and clamped to the calibrated range.
    pub fn distortion_at(&self, focal: f32) -> Option<DistortionModel> {
        interpolate(&self.distortion, focal, DistortionModel::lerp)
    }

    /// TCA at `focal`, selected the same way as distortion.
    pub fn tca_at(&self, focal: f32) -> Option<TcaModel> {
        interpolate(&self.tca, focal, TcaModel::lerp)
    }

    /// Vignetting calibration closest to `focal`, then to `aperture`.
    pub fn vignetting_at(&self, focal: f32, aperture: f32) -> Option<Vignetting> {
        let nearest_focal = self
            .vignetting
            .iter()
            .map(|v| v.focal)
            .min_by(|a, b| (a - focal).abs().total_cmp(&(b - focal).abs()))?;
        self.vignetting
            .iter()
            .filter(|v| v.focal == nearest_focal)
            .min_by(|a, b| (a.aperture - aperture).abs().total_cmp(&(b.aperture - aperture).abs()))
            .copied()
    }
}

fn interpolate<T: Copy>(
    entries: &[AtFocal<T>],
    focal: f32,
    lerp: impl Fn(&T, &T, f32) -> Option<T>,
) -> Option<T> {
    let below = entries
        .iter()
        .filter(|e| e.focal <= focal)
        .max_by(|a, b| a.focal.total_cmp(&b.focal));
    let above = entries
        .iter()
        .filter(|e| e.focal >= focal)
        .min_by(|a, b| a.focal.total_cmp(&b.focal));

    match (below, above) {
        (Some(lo), Some(hi)) if hi.focal > lo.focal => {
            let t = (focal - lo.focal) / (hi.focal - lo.focal);
            // Mixed models cannot be blended; take the closer one.
            lerp(&lo.model, &hi.model, t).or(Some(if t < 0.5 { lo.model } else { hi.model }))
        }
        (Some(e), _) | (None, Some(e)) => Some(e.model),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zoom() -> LensProfile {
        LensProfile {
            model: "Zoom 18-55".into(),
            distortion: vec![
                AtFocal { focal: 18.0, model: DistortionModel::Poly3 { k1: -0.04 } },
                AtFocal { focal: 55.0, model: DistortionModel::Poly3 { k1: 0.01 } },
            ],
            tca: vec![AtFocal { focal: 18.0, model: TcaModel::Linear { kr: 1.001, kb: 0.999 } }],
            vignetting: vec![
                Vignetting { focal: 18.0, aperture: 3.5, distance: 10.0, k1: -0.5, k2: 0.0, k3: 0.0 },
                Vignetting { focal: 18.0, aperture: 8.0, distance: 10.0, k1: -0.2, k2: 0.0, k3: 0.0 },
                Vignetting { focal: 55.0, aperture: 5.6, distance: 10.0, k1: -0.3, k2: 0.0, k3: 0.0 },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_scale_at_centre() {
        let m = DistortionModel::PtLens { a: 0.01, b: -0.02, c: 0.005 };
        assert_relative_eq!(m.scale(0.0), 1.0 - 0.01 + 0.02 - 0.005);
        assert_relative_eq!(DistortionModel::Poly5 { k1: 0.1, k2: 0.2 }.scale(1.0), 1.3);
        // Every model leaves the unit radius in place except poly5.
        assert_relative_eq!(m.scale(1.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(DistortionModel::Poly3 { k1: 0.3 }.scale(1.0), 1.0);
    }

    #[test]
    fn test_distortion_interpolates() {
        let p = zoom();
        let DistortionModel::Poly3 { k1 } = p.distortion_at(36.5).unwrap() else {
            panic!("wrong model");
        };
        assert_relative_eq!(k1, -0.015, epsilon = 1e-6);
        assert_eq!(p.distortion_at(10.0), Some(DistortionModel::Poly3 { k1: -0.04 }));
        assert_eq!(p.distortion_at(200.0), Some(DistortionModel::Poly3 { k1: 0.01 }));
    }

    #[test]
    fn test_single_entry_used_everywhere() {
        let p = zoom();
        assert_eq!(p.tca_at(50.0), Some(TcaModel::Linear { kr: 1.001, kb: 0.999 }));
    }

    #[test]
    fn test_vignetting_nearest() {
        let p = zoom();
        let v = p.vignetting_at(20.0, 7.1).unwrap();
        assert_eq!((v.focal, v.aperture), (18.0, 8.0));
        let v = p.vignetting_at(50.0, 2.0).unwrap();
        assert_eq!(v.focal, 55.0);
        assert!(LensProfile::default().vignetting_at(50.0, 2.0).is_none());
    }

    #[test]
    fn test_mixed_models_take_closer() {
        let p = LensProfile {
            distortion: vec![
                AtFocal { focal: 10.0, model: DistortionModel::Poly3 { k1: 0.1 } },
                AtFocal { focal: 20.0, model: DistortionModel::Poly5 { k1: 0.2, k2: 0.0 } },
            ],
            ..Default::default()
        };
        assert_eq!(p.distortion_at(12.0), Some(DistortionModel::Poly3 { k1: 0.1 }));
    }
}
