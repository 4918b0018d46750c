//! ARRI LogC3 transfer function, EI 800.
//!
//! # Reference
//!
//! ARRI ALEXA Log C Curve, Usage in VFX

const CUT: f64 = 0.010591;
const A: f64 = 5.555556;
const B: f64 = 0.052272;
const C: f64 = 0.247190;
const D: f64 = 0.385537;
const E: f64 = 5.367655;
const F: f64 = 0.092809;

#[inline]
fn log_segment(x: f64) -> f64 {
    C * (A * x + B).log10() + D
}

/// LogC3 encode: linear to LogC3.
///
/// ```rust
/// use logdev_transfer::log_c::encode;
///
/// assert!((encode(0.18) - 0.391).abs() < 0.002);
/// ```
#[inline]
pub fn encode(linear: f32) -> f32 {
    let x = linear as f64;
    let y = if x > CUT {
        log_segment(x)
    } else {
        (E * x + F).min(log_segment(CUT))
    };
    y as f32
}

/// LogC3 decode: LogC3 to linear.
#[inline]
pub fn decode(code: f32) -> f32 {
    let y = code as f64;
    let x = if y > E * CUT + F {
        (10.0_f64.powf((y - D) / C) - B) / A
    } else {
        (y - F) / E
    };
    x as f32
}
