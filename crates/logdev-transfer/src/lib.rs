//! # logdev-transfer
//!
//! Camera log transfer functions: scene-linear light in, log code value out.
//!
//! Each vendor curve lives in its own module with `encode`/`decode`
//! functions. [`LogCurve`] names them so the rest of the workspace can pick
//! one at runtime.
//!
//! # Supported Curves
//!
//! | Curve | Module | 18% gray |
//! |-------|--------|----------|
//! | F-Log | [`f_log`] | ~0.459 |
//! | F-Log2 | [`f_log`] | ~0.391 |
//! | V-Log | [`v_log`] | ~0.423 |
//! | N-Log | [`n_log`] | ~0.364 |
//! | Canon Log 2 | [`canon_log`] | ~0.398 |
//! | Canon Log 3 | [`canon_log`] | ~0.343 |
//! | S-Log3 | [`s_log3`] | ~0.411 |
//! | ARRI LogC3 (EI 800) | [`log_c`] | ~0.391 |
//! | ARRI LogC4 | [`log_c4`] | ~0.278 |
//! | RED Log3G10 | [`red_log`] | ~0.333 |
//!
//! All curves are monotonically non-decreasing over `[0, inf)`.
//! Piecewise curves clamp their toe segment at the log segment's value at
//! the break, since several published constant sets leave a tiny step there.
//!
//! ```rust
//! use logdev_transfer::LogCurve;
//!
//! let code = LogCurve::SLog3.encode(0.18);
//! assert!((code - 0.4105).abs() < 1e-3);
//! ```

#![warn(missing_docs)]

pub mod canon_log;
pub mod f_log;
pub mod log_c;
pub mod log_c4;
pub mod n_log;
pub mod red_log;
pub mod s_log3;
pub mod v_log;

/// A camera log encoding curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCurve {
    /// Fujifilm F-Log.
    FLog,
    /// Fujifilm F-Log2.
    FLog2,
    /// Panasonic V-Log.
    VLog,
    /// Nikon N-Log.
    NLog,
    /// Canon Log 2.
    CanonLog2,
    /// Canon Log 3.
    CanonLog3,
    /// Sony S-Log3.
    SLog3,
    /// ARRI LogC3 at EI 800.
    LogC3,
    /// ARRI LogC4.
    LogC4,
    /// RED Log3G10.
    Log3G10,
}

impl LogCurve {
    /// Every supported curve.
    pub const ALL: [LogCurve; 10] = [
        Self::FLog,
        Self::FLog2,
        Self::VLog,
        Self::NLog,
        Self::CanonLog2,
        Self::CanonLog3,
        Self::SLog3,
        Self::LogC3,
        Self::LogC4,
        Self::Log3G10,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::FLog => "F-Log",
            Self::FLog2 => "F-Log2",
            Self::VLog => "V-Log",
            Self::NLog => "N-Log",
            Self::CanonLog2 => "Canon Log 2",
            Self::CanonLog3 => "Canon Log 3",
            Self::SLog3 => "S-Log3",
            Self::LogC3 => "ARRI LogC3",
            Self::LogC4 => "ARRI LogC4",
            Self::Log3G10 => "RED Log3G10",
        }
    }

    /// Linear to log.
    #[inline]
    pub fn encode(self, linear: f32) -> f32 {
        match self {
            Self::FLog => f_log::flog_encode(linear),
            Self::FLog2 => f_log::flog2_encode(linear),
            Self::VLog => v_log::encode(linear),
            Self::NLog => n_log::encode(linear),
            Self::CanonLog2 => canon_log::clog2_encode(linear),
            Self::CanonLog3 => canon_log::clog3_encode(linear),
            Self::SLog3 => s_log3::encode(linear),
            Self::LogC3 => log_c::encode(linear),
            Self::LogC4 => log_c4::encode(linear),
            Self::Log3G10 => red_log::log3g10_encode(linear),
        }
    }

    /// Log to linear.
    #[inline]
    pub fn decode(self, code: f32) -> f32 {
        match self {
            Self::FLog => f_log::flog_decode(code),
            Self::FLog2 => f_log::flog2_decode(code),
            Self::VLog => v_log::decode(code),
            Self::NLog => n_log::decode(code),
            Self::CanonLog2 => canon_log::clog2_decode(code),
            Self::CanonLog3 => canon_log::clog3_decode(code),
            Self::SLog3 => s_log3::decode(code),
            Self::LogC3 => log_c::decode(code),
            Self::LogC4 => log_c4::decode(code),
            Self::Log3G10 => red_log::log3g10_decode(code),
        }
    }

    /// Code value of 18% gray.
    #[inline]
    pub fn middle_gray(self) -> f32 {
        self.encode(0.18)
    }
}

impl std::fmt::Display for LogCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
