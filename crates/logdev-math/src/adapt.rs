//! Chromatic adaptation transforms (CAT).
//!
//! Every target gamut this workspace grades into is D65 while the decode
//! working space (ProPhoto) is D50, so each gamut matrix passes through
//! one of these.
//!
//! ```rust
//! use logdev_math::{adapt_matrix, Adaptation, D50, D65};
//!
//! let m = adapt_matrix(Adaptation::Bradford, D50, D65);
//! let white = m * D50;
//! assert!((white.z - D65.z).abs() < 1e-4);
//! ```

use crate::{Mat3, Vec3};

/// CIE D65 white, Y normalised to 1.
pub const D65: Vec3 = Vec3::new(0.95047, 1.0, 1.08883);

/// CIE D50 white, Y normalised to 1.
pub const D50: Vec3 = Vec3::new(0.96422, 1.0, 0.82521);

/// Bradford cone response matrix.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// CAT02 cone response matrix (CIECAM02).
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Von Kries (Hunt-Pointer-Estevez) cone response matrix.
pub const VON_KRIES: Mat3 = Mat3::from_rows([
    [0.40024, 0.70760, -0.08081],
    [-0.22630, 1.16532, 0.04570],
    [0.00000, 0.00000, 0.91822],
]);

/// Chromatic adaptation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Adaptation {
    /// Bradford.
    Bradford,
    /// CAT02, the default.
    #[default]
    Cat02,
    /// Von Kries.
    VonKries,
    /// Plain XYZ scaling.
    XyzScaling,
    /// No adaptation; white points are left as they are.
    None,
}

impl Adaptation {
    /// Cone response matrix for this method.
    pub fn cone_matrix(self) -> Mat3 {
        match self {
            Self::Bradford => BRADFORD,
            Self::Cat02 => CAT02,
            Self::VonKries => VON_KRIES,
            Self::XyzScaling | Self::None => Mat3::IDENTITY,
        }
    }

    /// Parses a method name (`bradford`, `cat02`, `von-kries`, `xyz`, `none`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "bradford" => Some(Self::Bradford),
            "cat02" => Some(Self::Cat02),
            "von-kries" | "vonkries" => Some(Self::VonKries),
            "xyz" | "xyz-scaling" => Some(Self::XyzScaling),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Computes the XYZ adaptation matrix taking `src_white` to `dst_white`.
///
/// `M^-1 * diag(dst_cone / src_cone) * M` for the method's cone matrix `M`.
/// [`Adaptation::None`] always yields the identity.
pub fn adapt_matrix(method: Adaptation, src_white: Vec3, dst_white: Vec3) -> Mat3 {
    if method == Adaptation::None {
        return Mat3::IDENTITY;
    }
    let cone = method.cone_matrix();
    let Some(cone_inv) = cone.inverse() else {
        return Mat3::IDENTITY;
    };

    let src = cone * src_white;
    let dst = cone * dst_white;
    let scale = Mat3::diagonal(dst.x / src.x, dst.y / src.y, dst.z / src.z);

    cone_inv * scale * cone
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_white_maps_to_white() {
        for method in [Adaptation::Bradford, Adaptation::Cat02, Adaptation::VonKries] {
            let out = adapt_matrix(method, D50, D65) * D50;
            assert_relative_eq!(out.x, D65.x, epsilon = 1e-4);
            assert_relative_eq!(out.y, D65.y, epsilon = 1e-4);
            assert_relative_eq!(out.z, D65.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_roundtrip_is_identity() {
        let fwd = adapt_matrix(Adaptation::Bradford, D65, D50);
        let back = adapt_matrix(Adaptation::Bradford, D50, D65);
        let id = back * fwd;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(id.m[i][j], expected, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_none_and_names() {
        assert_eq!(adapt_matrix(Adaptation::None, D50, D65), Mat3::IDENTITY);
        assert_eq!(Adaptation::from_name("Bradford"), Some(Adaptation::Bradford));
        assert_eq!(Adaptation::from_name("von_kries"), Some(Adaptation::VonKries));
        assert_eq!(Adaptation::from_name("lms"), None);
    }
}
