//! # logdev-primaries
//!
//! Color primaries, white points, and RGB-XYZ matrix generation.
//!
//! Every colorspace is defined by the CIE xy chromaticities of its three
//! primaries and its white point. Matrices are derived from those numbers,
//! never tabulated, so adding a gamut is a single constant.
//!
//! # Included Gamuts
//!
//! | Gamut | White | Role |
//! |-------|-------|------|
//! | ProPhoto RGB | D50 | RAW decode working space |
//! | F-Gamut / F-Gamut C | D65 | Fujifilm F-Log, F-Log2, F-Log2C |
//! | V-Gamut | D65 | Panasonic V-Log |
//! | N-Gamut | D65 | Nikon N-Log |
//! | Cinema Gamut | D65 | Canon Log 2/3 |
//! | S-Gamut3 / S-Gamut3.Cine | D65 | Sony S-Log3 |
//! | ARRI Wide Gamut 3 / 4 | D65 | ARRI LogC3 / LogC4 |
//! | REDWideGamutRGB | D65 | RED Log3G10 |
//! | Rec.709 | D65 | luma weights |
//!
//! # Usage
//!
//! ```rust
//! use logdev_primaries::{PROPHOTO_RGB, S_GAMUT3, rgb_to_rgb_matrix};
//! use logdev_math::{Adaptation, Vec3};
//!
//! let m = rgb_to_rgb_matrix(&PROPHOTO_RGB, &S_GAMUT3, Adaptation::Bradford);
//! let gray = m * Vec3::splat(0.18);
//! assert!((gray.x - 0.18).abs() < 1e-4);
//! ```

#![warn(missing_docs)]

use logdev_math::{adapt_matrix, Adaptation, Mat3, Vec3};

/// RGB colorspace primaries definition.
///
/// Three primaries and a white point, all as CIE xy chromaticities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red primary (x, y) chromaticity
    pub r: (f32, f32),
    /// Green primary (x, y) chromaticity
    pub g: (f32, f32),
    /// Blue primary (x, y) chromaticity
    pub b: (f32, f32),
    /// White point (x, y) chromaticity
    pub w: (f32, f32),
    /// Display name
    pub name: &'static str,
}

impl Primaries {
    /// White point as XYZ (Y=1).
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        xy_to_xyz(self.w.0, self.w.1)
    }

    /// Row of the RGB to XYZ matrix producing Y.
    ///
    /// Dotting an RGB triplet with this gives its exact relative luminance
    /// in this colorspace.
    pub fn luminance_weights(&self) -> Vec3 {
        rgb_to_xyz_matrix(self).row(1)
    }
}

// ============================================================================
// White Points
// ============================================================================

/// D65 white point chromaticity.
pub const D65_XY: (f32, f32) = (0.31270, 0.32900);

/// D50 white point chromaticity.
pub const D50_XY: (f32, f32) = (0.34570, 0.35850);

// ============================================================================
// Primaries
// ============================================================================

/// ProPhoto RGB (ROMM) primaries, D50 white.
pub const PROPHOTO_RGB: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.1596, 0.8404),
    b: (0.0366, 0.0001),
    w: D50_XY,
    name: "ProPhoto RGB",
};

/// Rec.709 / sRGB primaries.
pub const REC709: Primaries = Primaries {
    r: (0.6400, 0.3300),
    g: (0.3000, 0.6000),
    b: (0.1500, 0.0600),
    w: D65_XY,
    name: "Rec.709",
};

/// Rec.2020 primaries.
pub const REC2020: Primaries = Primaries {
    r: (0.7080, 0.2920),
    g: (0.1700, 0.7970),
    b: (0.1310, 0.0460),
    w: D65_XY,
    name: "Rec.2020",
};

/// Fujifilm F-Gamut (Rec.2020 primaries).
pub const F_GAMUT: Primaries = Primaries { name: "F-Gamut", ..REC2020 };

/// Fujifilm F-Gamut C, the wider gamut paired with F-Log2C.
pub const F_GAMUT_C: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.0263, 0.9737),
    b: (0.1173, -0.0224),
    w: D65_XY,
    name: "F-Gamut C",
};

/// Nikon N-Gamut (Rec.2020 primaries).
pub const N_GAMUT: Primaries = Primaries { name: "N-Gamut", ..REC2020 };

/// Panasonic V-Gamut.
pub const V_GAMUT: Primaries = Primaries {
    r: (0.7300, 0.2800),
    g: (0.1650, 0.8400),
    b: (0.1000, -0.0300),
    w: D65_XY,
    name: "V-Gamut",
};

/// Canon Cinema Gamut.
pub const CINEMA_GAMUT: Primaries = Primaries {
    r: (0.7400, 0.2700),
    g: (0.1700, 1.1400),
    b: (0.0800, -0.1000),
    w: D65_XY,
    name: "Cinema Gamut",
};

/// Sony S-Gamut3.
pub const S_GAMUT3: Primaries = Primaries {
    r: (0.7300, 0.2800),
    g: (0.1400, 0.8550),
    b: (0.1000, -0.0500),
    w: D65_XY,
    name: "S-Gamut3",
};

/// Sony S-Gamut3.Cine.
pub const S_GAMUT3_CINE: Primaries = Primaries {
    r: (0.7660, 0.2750),
    g: (0.2250, 0.8000),
    b: (0.0890, -0.0870),
    w: D65_XY,
    name: "S-Gamut3.Cine",
};

/// ARRI Wide Gamut 3 (ALEXA classic).
pub const ARRI_WIDE_GAMUT_3: Primaries = Primaries {
    r: (0.6840, 0.3130),
    g: (0.2210, 0.8480),
    b: (0.0861, -0.1020),
    w: D65_XY,
    name: "ARRI Wide Gamut 3",
};

/// ARRI Wide Gamut 4 (ALEXA 35).
pub const ARRI_WIDE_GAMUT_4: Primaries = Primaries {
    r: (0.7347, 0.2653),
    g: (0.1424, 0.8576),
    b: (0.0991, -0.0308),
    w: D65_XY,
    name: "ARRI Wide Gamut 4",
};

/// RED Wide Gamut RGB.
pub const RED_WIDE_GAMUT_RGB: Primaries = Primaries {
    r: (0.780308, 0.304253),
    g: (0.121595, 1.493994),
    b: (0.095612, -0.084589),
    w: D65_XY,
    name: "REDWideGamutRGB",
};

// ============================================================================
// Matrix Generation
// ============================================================================

/// Converts xy chromaticity to XYZ (with Y=1).
pub fn xy_to_xyz(x: f32, y: f32) -> Vec3 {
    if y.abs() < 1e-10 {
        Vec3::ZERO
    } else {
        Vec3::new(x / y, 1.0, (1.0 - x - y) / y)
    }
}

/// Computes the RGB to XYZ matrix for a set of primaries.
///
/// Primaries become the matrix columns, scaled so that RGB (1, 1, 1)
/// lands exactly on the white point. Solved in f64: ProPhoto's blue
/// primary sits at y = 0.0001 and loses too much in f32.
pub fn rgb_to_xyz_matrix(primaries: &Primaries) -> Mat3 {
    let xyz = |(x, y): (f32, f32)| -> [f64; 3] {
        let (x, y) = (x as f64, y as f64);
        if y.abs() < 1e-10 {
            [0.0; 3]
        } else {
            [x / y, 1.0, (1.0 - x - y) / y]
        }
    };
    let cols = [xyz(primaries.r), xyz(primaries.g), xyz(primaries.b)];
    let w = xyz(primaries.w);

    // M * S = W, with the primaries as the columns of M
    let s = solve3(&cols, &w).unwrap_or([1.0; 3]);

    let mut rows = [[0.0f32; 3]; 3];
    for (i, row) in rows.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = (cols[j][i] * s[j]) as f32;
        }
    }
    Mat3::from_rows(rows)
}

/// Solves `[c0 c1 c2] * s = w` by Cramer's rule.
fn solve3(cols: &[[f64; 3]; 3], w: &[f64; 3]) -> Option<[f64; 3]> {
    let det = |a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]| -> f64 {
        a[0] * (b[1] * c[2] - b[2] * c[1]) - b[0] * (a[1] * c[2] - a[2] * c[1])
            + c[0] * (a[1] * b[2] - a[2] * b[1])
    };
    let d = det(&cols[0], &cols[1], &cols[2]);
    if d.abs() < 1e-12 {
        return None;
    }
    Some([
        det(w, &cols[1], &cols[2]) / d,
        det(&cols[0], w, &cols[2]) / d,
        det(&cols[0], &cols[1], w) / d,
    ])
}

/// Computes the XYZ to RGB matrix, the inverse of [`rgb_to_xyz_matrix`].
pub fn xyz_to_rgb_matrix(primaries: &Primaries) -> Mat3 {
    rgb_to_xyz_matrix(primaries)
        .inverse()
        .unwrap_or(Mat3::IDENTITY)
}

/// Computes the matrix taking RGB in `src` to RGB in `dst`.
///
/// `RGB_src -> XYZ(src white) -> CAT -> XYZ(dst white) -> RGB_dst`.
/// The adaptation step is skipped when both white points agree.
pub fn rgb_to_rgb_matrix(src: &Primaries, dst: &Primaries, cat: Adaptation) -> Mat3 {
    let src_to_xyz = rgb_to_xyz_matrix(src);
    let xyz_to_dst = xyz_to_rgb_matrix(dst);
    if src.w == dst.w {
        return xyz_to_dst * src_to_xyz;
    }
    let adapt = adapt_matrix(cat, src.white_xyz(), dst.white_xyz());
    xyz_to_dst * adapt * src_to_xyz
}
