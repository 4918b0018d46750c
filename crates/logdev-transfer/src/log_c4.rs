//! ARRI LogC4 transfer function.
//!
//! Base-2 log curve paired with ARRI Wide Gamut 4, with a linear
//! extension below `LIN_SIDE_BREAK` that is C1-continuous with the log part.
//!
//! ```text
//! if linear >= linSideBreak:
//!     code = logSideSlope * log2(linSideSlope * linear + linSideOffset) + logSideOffset
//! else:
//!     code = linearSlope * linear + linearOffset
//! ```
//!
//! # Reference
//!
//! ARRI LogC4 Specification

use std::sync::OnceLock;

const LIN_SIDE_SLOPE: f64 = 2231.82630906769;
const LIN_SIDE_OFFSET: f64 = 64.0;
const LOG_SIDE_SLOPE: f64 = 0.0647954196341293;
const LOG_SIDE_OFFSET: f64 = -0.295908392682586;
const LIN_SIDE_BREAK: f64 = -0.0180569961199113;

/// (linear slope, linear offset, code value at the break)
static LINEAR_SEGMENT: OnceLock<(f64, f64, f64)> = OnceLock::new();

fn linear_params() -> (f64, f64, f64) {
    *LINEAR_SEGMENT.get_or_init(|| {
        let lin_at_break = LIN_SIDE_SLOPE * LIN_SIDE_BREAK + LIN_SIDE_OFFSET;
        let log_break = LOG_SIDE_SLOPE * lin_at_break.log2() + LOG_SIDE_OFFSET;
        let slope = LOG_SIDE_SLOPE * LIN_SIDE_SLOPE / (lin_at_break * std::f64::consts::LN_2);
        (slope, log_break - slope * LIN_SIDE_BREAK, log_break)
    })
}

/// LogC4 encode with f64 precision.
pub fn encode_f64(linear: f64) -> f64 {
    if linear >= LIN_SIDE_BREAK {
        LOG_SIDE_SLOPE * (LIN_SIDE_SLOPE * linear + LIN_SIDE_OFFSET).log2() + LOG_SIDE_OFFSET
    } else {
        let (slope, offset, _) = linear_params();
        slope * linear + offset
    }
}

/// LogC4 decode with f64 precision.
pub fn decode_f64(code: f64) -> f64 {
    let (slope, offset, log_break) = linear_params();
    if code >= log_break {
        let exp = (code - LOG_SIDE_OFFSET) / LOG_SIDE_SLOPE;
        (exp.exp2() - LIN_SIDE_OFFSET) / LIN_SIDE_SLOPE
    } else {
        (code - offset) / slope
    }
}

/// LogC4 encode: linear to LogC4.
///
/// ```rust
/// use logdev_transfer::log_c4;
///
/// assert!((log_c4::encode(0.18) - 0.278).abs() < 0.001);
/// assert!((log_c4::encode(0.0) - 0.0929).abs() < 0.001);
/// ```
#[inline]
pub fn encode(linear: f32) -> f32 {
    encode_f64(linear as f64) as f32
}

/// LogC4 decode: LogC4 to linear.
#[inline]
pub fn decode(code: f32) -> f32 {
    decode_f64(code as f64) as f32
}
