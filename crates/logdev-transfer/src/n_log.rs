//! Nikon N-Log transfer function.
//!
//! A cube-root toe below `CUT1` and a natural-log shoulder above it,
//! expressed in 10-bit code values and normalized by 1023.
//!
//! # Reference
//!
//! Nikon N-Log Specification Document, v1.0.0

const CUT1: f64 = 0.328;
const A: f64 = 650.0;
const B: f64 = 0.0075;
const C: f64 = 150.0;
const D: f64 = 619.0;

#[inline]
fn log_segment(x: f64) -> f64 {
    (C * x.ln() + D) / 1023.0
}

/// N-Log encode: linear to N-Log.
///
/// ```rust
/// use logdev_transfer::n_log::encode;
///
/// assert!((encode(0.18) - 0.364).abs() < 0.002);
/// ```
#[inline]
pub fn encode(linear: f32) -> f32 {
    let x = linear as f64;
    let y = if x < CUT1 {
        (A * (x + B).max(0.0).cbrt() / 1023.0).min(log_segment(CUT1))
    } else {
        log_segment(x)
    };
    y as f32
}

/// N-Log decode: N-Log to linear.
#[inline]
pub fn decode(code: f32) -> f32 {
    let y = code as f64;
    let x = if y < log_segment(CUT1) {
        (y * 1023.0 / A).powi(3) - B
    } else {
        ((y * 1023.0 - D) / C).exp()
    };
    x as f32
}
