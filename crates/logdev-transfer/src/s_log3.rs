//! Sony S-Log3 transfer function.
//!
//! # Reference
//!
//! Sony S-Log3 / S-Gamut3 Technical Summary

const CUT: f64 = 0.01125;
const TOE_CODE: f64 = 171.2102946929;

#[inline]
fn log_segment(x: f64) -> f64 {
    // 0.19 = 0.18 + 0.01, so 18% gray maps to 420/1023
    (420.0 + 261.5 * ((x + 0.01) / 0.19).log10()) / 1023.0
}

/// S-Log3 encode: linear to S-Log3.
///
/// ```rust
/// use logdev_transfer::s_log3::encode;
///
/// assert!((encode(0.18) - 420.0 / 1023.0).abs() < 1e-5);
/// ```
#[inline]
pub fn encode(linear: f32) -> f32 {
    let x = linear as f64;
    let y = if x >= CUT {
        log_segment(x)
    } else {
        ((x * (TOE_CODE - 95.0) / CUT + 95.0) / 1023.0).min(log_segment(CUT))
    };
    y as f32
}

/// S-Log3 decode: S-Log3 to linear.
#[inline]
pub fn decode(code: f32) -> f32 {
    let x = code as f64 * 1023.0;
    let y = if x >= TOE_CODE {
        10.0_f64.powf((x - 420.0) / 261.5) * 0.19 - 0.01
    } else {
        (x - 95.0) * CUT / (TOE_CODE - 95.0)
    };
    y as f32
}
