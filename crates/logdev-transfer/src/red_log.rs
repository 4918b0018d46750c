//! RED Log3G10 transfer function.
//!
//! Log region above `LIN_SIDE_BREAK`, tangent linear extension below it.
//! The 0.01 linear offset maps scene black to a small positive code.
//!
//! # Reference
//!
//! RED Digital Cinema, REDWideGamutRGB and Log3G10 white paper

const LIN_SIDE_SLOPE: f64 = 155.975327;
const LIN_SIDE_OFFSET: f64 = 0.01 * LIN_SIDE_SLOPE + 1.0;
const LOG_SIDE_SLOPE: f64 = 0.224282;
const LIN_SIDE_BREAK: f64 = -0.01;

/// (code at break, slope at break)
#[inline]
fn break_params() -> (f64, f64) {
    let at_break = LIN_SIDE_SLOPE * LIN_SIDE_BREAK + LIN_SIDE_OFFSET;
    let code = LOG_SIDE_SLOPE * at_break.log10();
    let slope = LOG_SIDE_SLOPE * LIN_SIDE_SLOPE / (at_break * std::f64::consts::LN_10);
    (code, slope)
}

/// Log3G10 encode: linear to Log3G10.
///
/// ```rust
/// use logdev_transfer::red_log::log3g10_encode;
///
/// assert!((log3g10_encode(0.18) - 1.0 / 3.0).abs() < 1e-3);
/// ```
#[inline]
pub fn log3g10_encode(linear: f32) -> f32 {
    let x = linear as f64;
    let y = if x >= LIN_SIDE_BREAK {
        LOG_SIDE_SLOPE * (LIN_SIDE_SLOPE * x + LIN_SIDE_OFFSET).log10()
    } else {
        let (code, slope) = break_params();
        code + slope * (x - LIN_SIDE_BREAK)
    };
    y as f32
}

/// Log3G10 decode: Log3G10 to linear.
#[inline]
pub fn log3g10_decode(code: f32) -> f32 {
    let y = code as f64;
    let (at_break, slope) = break_params();
    let x = if y >= at_break {
        (10.0_f64.powf(y / LOG_SIDE_SLOPE) - LIN_SIDE_OFFSET) / LIN_SIDE_SLOPE
    } else {
        LIN_SIDE_BREAK + (y - at_break) / slope
    };
    x as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for &l in &[-0.05f32, -0.01, 0.0, 0.01, 0.18, 1.0, 10.0] {
            let decoded = log3g10_decode(log3g10_encode(l));
            assert!((l - decoded).abs() < l.abs() * 1e-4 + 1e-6, "{l} -> {decoded}");
        }
    }

    #[test]
    fn test_black() {
        let black = log3g10_encode(0.0) as f64;
        let expected = LOG_SIDE_SLOPE * LIN_SIDE_OFFSET.log10();
        assert!((black - expected).abs() < 1e-6);
    }
}
