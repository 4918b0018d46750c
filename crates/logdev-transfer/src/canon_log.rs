//! Canon Log 2 and Canon Log 3 transfer functions.
//!
//! Both take scene reflectance scaled by 1/0.9 and return normalized
//! full-range code values. Canon Log 2 is anti-symmetric about black;
//! Canon Log 3 adds a linear segment around black.
//!
//! # Reference
//!
//! Canon Log Gamma Curves, Canon Inc. white paper

mod clog2 {
    pub const CUT: f64 = 0.092864125;
    pub const LOG_SLOPE: f64 = 0.24136077;
    pub const LIN_SCALE: f64 = 87.099375;
    pub const NORM: f64 = 0.9;
}

mod clog3 {
    pub const LIN_BREAK: f64 = 0.014;
    pub const CUT_LOW: f64 = 0.097465473;
    pub const LOG_OFFSET_NEG: f64 = 0.12783901;
    pub const LOG_OFFSET_POS: f64 = 0.12240537;
    pub const LOG_SLOPE: f64 = 0.36726845;
    pub const LIN_SCALE: f64 = 14.98325;
    pub const LIN_SLOPE: f64 = 1.9754798;
    pub const LIN_OFFSET: f64 = 0.12512219;
    pub const NORM: f64 = 0.9;

    #[inline]
    pub fn upper(x: f64) -> f64 {
        LOG_OFFSET_POS + LOG_SLOPE * (x * LIN_SCALE + 1.0).log10()
    }
}

/// Canon Log 2 encode.
///
/// ```rust
/// use logdev_transfer::canon_log::clog2_encode;
///
/// assert!((clog2_encode(0.18) - 0.398).abs() < 0.002);
/// ```
#[inline]
pub fn clog2_encode(linear: f32) -> f32 {
    use clog2::*;
    let x = linear as f64 / NORM;
    let y = if x < 0.0 {
        CUT - LOG_SLOPE * (-x * LIN_SCALE + 1.0).log10()
    } else {
        CUT + LOG_SLOPE * (x * LIN_SCALE + 1.0).log10()
    };
    y as f32
}

/// Canon Log 2 decode.
#[inline]
pub fn clog2_decode(code: f32) -> f32 {
    use clog2::*;
    let y = code as f64;
    let x = if y < CUT {
        -(10.0_f64.powf((CUT - y) / LOG_SLOPE) - 1.0) / LIN_SCALE
    } else {
        (10.0_f64.powf((y - CUT) / LOG_SLOPE) - 1.0) / LIN_SCALE
    };
    (x * NORM) as f32
}

/// Canon Log 3 encode.
///
/// ```rust
/// use logdev_transfer::canon_log::clog3_encode;
///
/// assert!((clog3_encode(0.18) - 0.343).abs() < 0.002);
/// ```
#[inline]
pub fn clog3_encode(linear: f32) -> f32 {
    use clog3::*;
    let x = linear as f64 / NORM;
    let y = if x < -LIN_BREAK {
        LOG_OFFSET_NEG - LOG_SLOPE * (-x * LIN_SCALE + 1.0).log10()
    } else if x <= LIN_BREAK {
        (x * LIN_SLOPE + LIN_OFFSET).min(upper(LIN_BREAK))
    } else {
        upper(x)
    };
    y as f32
}

/// Canon Log 3 decode.
#[inline]
pub fn clog3_decode(code: f32) -> f32 {
    use clog3::*;
    let y = code as f64;
    let x = if y < CUT_LOW {
        -(10.0_f64.powf((LOG_OFFSET_NEG - y) / LOG_SLOPE) - 1.0) / LIN_SCALE
    } else if y <= upper(LIN_BREAK) {
        (y - LIN_OFFSET) / LIN_SLOPE
    } else {
        (10.0_f64.powf((y - LOG_OFFSET_POS) / LOG_SLOPE) - 1.0) / LIN_SCALE
    };
    (x * NORM) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clog2_roundtrip() {
        for &lin in &[0.0f32, 0.18, 0.5, 1.0, 0.01, -0.01] {
            let decoded = clog2_decode(clog2_encode(lin));
            assert!((lin - decoded).abs() < 1e-5, "{lin} -> {decoded}");
        }
    }

    #[test]
    fn clog2_zero_is_cut() {
        assert!((clog2_encode(0.0) as f64 - clog2::CUT).abs() < 1e-7);
    }

    #[test]
    fn clog3_roundtrip() {
        for &lin in &[0.0f32, 0.005, 0.18, 0.5, 1.0, -0.05] {
            let decoded = clog3_decode(clog3_encode(lin));
            assert!((lin - decoded).abs() < 1e-5, "{lin} -> {decoded}");
        }
    }

    #[test]
    fn clog3_segments_join() {
        let x = (clog3::LIN_BREAK * clog3::NORM) as f32;
        let lin = clog3_encode(x * 0.999_99);
        let log = clog3_encode(x * 1.000_01);
        assert!((lin - log).abs() < 1e-4);
    }
}
