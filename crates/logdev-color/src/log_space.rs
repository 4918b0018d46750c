//! Log-space descriptor table.
//!
//! A log space pairs the linear gamut an image is graded into with the
//! curve that encodes it. The two are not always named alike: `F-Log2C`
//! grades into F-Gamut C but encodes with the plain F-Log2 curve, and both
//! S-Log3 variants share one curve across two gamuts.

use std::fmt;

use logdev_primaries::{
    Primaries, ARRI_WIDE_GAMUT_3, ARRI_WIDE_GAMUT_4, CINEMA_GAMUT, F_GAMUT, F_GAMUT_C, N_GAMUT,
    RED_WIDE_GAMUT_RGB, S_GAMUT3, S_GAMUT3_CINE, V_GAMUT,
};
use logdev_transfer::LogCurve;

use crate::{ColorError, ColorResult};

/// A target log space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogSpace {
    /// User-facing name.
    pub name: &'static str,
    /// Linear gamut the image is converted into before encoding.
    pub gamut: Primaries,
    /// Encoding curve.
    pub curve: LogCurve,
}

const fn space(name: &'static str, gamut: Primaries, curve: LogCurve) -> LogSpace {
    LogSpace { name, gamut, curve }
}

static LOG_SPACES: [LogSpace; 12] = [
    space("F-Log", F_GAMUT, LogCurve::FLog),
    space("F-Log2", F_GAMUT, LogCurve::FLog2),
    space("F-Log2C", F_GAMUT_C, LogCurve::FLog2),
    space("V-Log", V_GAMUT, LogCurve::VLog),
    space("N-Log", N_GAMUT, LogCurve::NLog),
    space("Canon Log 2", CINEMA_GAMUT, LogCurve::CanonLog2),
    space("Canon Log 3", CINEMA_GAMUT, LogCurve::CanonLog3),
    space("S-Log3", S_GAMUT3, LogCurve::SLog3),
    space("S-Log3.Cine", S_GAMUT3_CINE, LogCurve::SLog3),
    space("Arri LogC3", ARRI_WIDE_GAMUT_3, LogCurve::LogC3),
    space("Arri LogC4", ARRI_WIDE_GAMUT_4, LogCurve::LogC4),
    space("Log3G10", RED_WIDE_GAMUT_RGB, LogCurve::Log3G10),
];

impl LogSpace {
    /// Finds a log space by name, ignoring ASCII case.
    pub fn lookup(name: &str) -> ColorResult<&'static LogSpace> {
        let wanted = name.trim();
        LOG_SPACES
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ColorError::UnknownLogSpace {
                name: name.to_string(),
                available: Self::names().collect::<Vec<_>>().join(", "),
            })
    }

    /// Every known log space, in table order.
    pub fn all() -> &'static [LogSpace] {
        &LOG_SPACES
    }

    /// Every known name, in table order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        LOG_SPACES.iter().map(|s| s.name)
    }
}

impl fmt::Display for LogSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.name, self.gamut.name, self.curve)
    }
}
