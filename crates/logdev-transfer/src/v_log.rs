//! Panasonic V-Log transfer function.
//!
//! # Reference
//!
//! Panasonic V-Log/V-Gamut Reference Manual

const CUT1: f64 = 0.01;
const B: f64 = 0.00873;
const C: f64 = 0.241514;
const D: f64 = 0.598206;

#[inline]
fn log_segment(x: f64) -> f64 {
    C * (x + B).log10() + D
}

/// V-Log encode: linear to V-Log.
///
/// ```rust
/// use logdev_transfer::v_log::encode;
///
/// assert!((encode(0.18) - 0.423).abs() < 0.002);
/// ```
#[inline]
pub fn encode(linear: f32) -> f32 {
    let x = linear as f64;
    let y = if x < CUT1 {
        (5.6 * x + 0.125).min(log_segment(CUT1))
    } else {
        log_segment(x)
    };
    y as f32
}

/// V-Log decode: V-Log to linear.
#[inline]
pub fn decode(code: f32) -> f32 {
    let y = code as f64;
    let x = if y < log_segment(CUT1) {
        (y - 0.125) / 5.6
    } else {
        10.0_f64.powf((y - D) / C) - B
    };
    x as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for &l in &[0.005f32, 0.18, 0.5, 1.0, 2.0] {
            let decoded = decode(encode(l));
            assert!((l - decoded).abs() < l * 1e-3, "l={l}, decoded={decoded}");
        }
    }

    #[test]
    fn test_black() {
        assert!((encode(0.0) - 0.125).abs() < 1e-6);
    }
}
