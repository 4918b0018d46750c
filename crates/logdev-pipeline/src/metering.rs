//! Exposure metering.
//!
//! Each mode reduces a linear image to one scalar gain. The whole image is
//! then scaled by that gain; there is no per-channel or per-region gain.
//!
//! | Mode | Statistic | Gain | Bounds |
//! |------|-----------|------|--------|
//! | average | geometric mean of Y | `target_gray / gm` | [1, 50] |
//! | center-weighted | Gaussian-weighted mean of Y | `target_gray / mean` | [0.1, 100] |
//! | highlight-safe | p99.5 of max(R, G, B) | `highlight_target / p` | none |
//! | hybrid | geometric mean, capped by p99 of max(R, G, B) | see [`meter`] | [0.1, 100] |
//!
//! Y is the exact luminance of the source colorspace, not a fixed-weight
//! approximation.

use std::fmt;
use std::str::FromStr;

use logdev_core::Image;
use logdev_primaries::Primaries;
use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Added to luminance before taking the log.
const LOG_EPSILON: f32 = 1e-6;
/// Geometric mean below which average mode leaves the image alone.
const AVERAGE_BLACK: f64 = 1e-4;
/// Weighted mean below which center-weighted mode leaves the image alone.
const CENTER_BLACK: f64 = 1e-6;
/// Percentile below which the highlight modes treat the image as black.
const PERCENTILE_BLACK: f32 = 1e-6;

/// Automatic metering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeteringMode {
    /// Geometric mean luminance to middle grey.
    Average,
    /// Centre-biased arithmetic mean to middle grey.
    CenterWeighted,
    /// Near-peak channel value to just below clipping.
    HighlightSafe,
    /// Average, unless that would push highlights too far.
    #[default]
    Hybrid,
}

impl MeteringMode {
    /// Every mode.
    pub const ALL: [MeteringMode; 4] = [
        Self::Average,
        Self::CenterWeighted,
        Self::HighlightSafe,
        Self::Hybrid,
    ];

    /// Configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::CenterWeighted => "center-weighted",
            Self::HighlightSafe => "highlight-safe",
            Self::Hybrid => "hybrid",
        }
    }

    /// `(min, max)` gain clamp, if any.
    pub fn bounds(self) -> Option<(f32, f32)> {
        match self {
            Self::Average => Some((1.0, 50.0)),
            Self::CenterWeighted | Self::Hybrid => Some((0.1, 100.0)),
            Self::HighlightSafe => None,
        }
    }
}

impl fmt::Display for MeteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeteringMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| {
                PipelineError::Config(format!(
                    "unknown metering mode '{s}' (expected average, center-weighted, highlight-safe or hybrid)"
                ))
            })
    }
}

/// How exposure is set. Manual always wins over metering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exposure {
    /// Fixed adjustment in stops; gain is `2^stops`.
    Manual(f32),
    /// Gain computed from image content.
    Metered(MeteringMode),
}

impl Default for Exposure {
    fn default() -> Self {
        Self::Metered(MeteringMode::default())
    }
}

/// Tunable metering constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteringParams {
    /// Luminance the average and center-weighted modes aim for.
    pub target_gray: f32,
    /// Level highlight-safe puts its percentile at.
    pub highlight_target: f32,
    /// Highest predicted p99 the hybrid mode accepts.
    pub hybrid_peak_limit: f32,
    /// Percentile used by highlight-safe.
    pub highlight_percentile: f32,
    /// Percentile used by hybrid.
    pub hybrid_percentile: f32,
}

impl Default for MeteringParams {
    fn default() -> Self {
        Self {
            target_gray: 0.18,
            highlight_target: 0.9,
            hybrid_peak_limit: 6.0,
            highlight_percentile: 99.5,
            hybrid_percentile: 99.0,
        }
    }
}

/// What a mode measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeteringDetail {
    /// Average mode.
    GeometricMean(f32),
    /// Center-weighted mode.
    WeightedMean(f32),
    /// Highlight-safe mode.
    Percentile {
        /// Rank used.
        rank: f32,
        /// Value at that rank.
        value: f32,
    },
    /// Hybrid mode.
    Hybrid {
        /// Geometric mean luminance.
        geometric_mean: f32,
        /// Percentile of max(R, G, B).
        percentile: f32,
        /// Gain the geometric mean asked for.
        desired_gain: f32,
        /// True when highlight protection replaced the desired gain.
        limited: bool,
    },
}

/// Metering result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metering {
    /// Mode used.
    pub mode: MeteringMode,
    /// Gain to apply; always finite and positive.
    pub gain: f32,
    /// Statistic behind the gain.
    pub detail: MeteringDetail,
}

impl fmt::Display for Metering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gain {:.4}", self.mode, self.gain)?;
        match self.detail {
            MeteringDetail::GeometricMean(gm) => write!(f, " (geometric mean {gm:.5})"),
            MeteringDetail::WeightedMean(m) => write!(f, " (weighted mean {m:.5})"),
            MeteringDetail::Percentile { rank, value } => write!(f, " (p{rank} {value:.4})"),
            MeteringDetail::Hybrid {
                desired_gain,
                limited: true,
                ..
            } => write!(f, " (highlight protection, desired {desired_gain:.2})"),
            MeteringDetail::Hybrid { geometric_mean, .. } => {
                write!(f, " (geometric mean {geometric_mean:.5})")
            }
        }
    }
}

/// Computes the exposure gain for `image` in `primaries`.
///
/// Never fails: near-black statistics fall back to a gain of 1 or to the
/// mode's bounds.
///
/// Hybrid mode starts from `target_gray / (gm + 1e-6)`. If that would put
/// the p99 of max(R, G, B) above `hybrid_peak_limit`, the gain becomes
/// `hybrid_peak_limit / p99` instead.
pub fn meter(image: &Image, mode: MeteringMode, primaries: &Primaries, params: &MeteringParams) -> Metering {
    let (gain, detail) = match mode {
        MeteringMode::Average => {
            let gm = geometric_mean(image, primaries);
            let gain = if f64::from(gm) < AVERAGE_BLACK {
                1.0
            } else {
                params.target_gray / gm
            };
            (gain, MeteringDetail::GeometricMean(gm))
        }
        MeteringMode::CenterWeighted => {
            let mean = center_weighted_mean(image, primaries);
            let gain = if f64::from(mean) < CENTER_BLACK {
                1.0
            } else {
                params.target_gray / mean
            };
            (gain, MeteringDetail::WeightedMean(mean))
        }
        MeteringMode::HighlightSafe => {
            let rank = params.highlight_percentile;
            let value = percentile(max_channel(image), rank);
            let gain = if value < PERCENTILE_BLACK {
                1.0
            } else {
                params.highlight_target / value
            };
            (gain, MeteringDetail::Percentile { rank, value })
        }
        MeteringMode::Hybrid => {
            let gm = geometric_mean(image, primaries);
            let desired = params.target_gray / (gm + LOG_EPSILON);
            let p = percentile(max_channel(image), params.hybrid_percentile);
            let limited = p * desired > params.hybrid_peak_limit;
            let gain = if limited {
                params.hybrid_peak_limit / p
            } else {
                desired
            };
            (
                gain,
                MeteringDetail::Hybrid {
                    geometric_mean: gm,
                    percentile: p,
                    desired_gain: desired,
                    limited,
                },
            )
        }
    };

    let gain = match mode.bounds() {
        Some((lo, hi)) => gain.clamp(lo, hi),
        None => gain,
    };
    let gain = if gain.is_finite() && gain > 0.0 { gain } else { 1.0 };
    Metering { mode, gain, detail }
}

/// Multiplies every sample by `gain`, in place.
pub fn apply_gain(image: &mut Image, gain: f32) {
    if gain != 1.0 {
        image.scale(gain);
    }
}

/// Signed luminance; out-of-gamut decodes can go below zero.
fn luminance<'a>(image: &'a Image, primaries: &'a Primaries) -> impl Iterator<Item = f32> + 'a {
    let w = primaries.luminance_weights();
    image.pixels().map(move |[r, g, b]| r * w.x + g * w.y + b * w.z)
}

fn geometric_mean(image: &Image, primaries: &Primaries) -> f32 {
    let n = image.pixel_count().max(1) as f64;
    let log_sum: f64 = luminance(image, primaries)
        .map(|y| f64::from(y.max(0.0) + LOG_EPSILON).ln())
        .sum();
    (log_sum / n).exp() as f32
}

/// Gaussian weights centred on `(w/2, h/2)` with sigma `min(w, h) / 2`.
fn center_weighted_mean(image: &Image, primaries: &Primaries) -> f32 {
    let (w, h) = image.dimensions();
    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let sigma = w.min(h) as f64 / 2.0;
    let denom = 2.0 * sigma * sigma;

    let (sum, weight_sum) = luminance(image, primaries)
        .enumerate()
        .fold((0.0f64, 0.0f64), |(s, ws), (i, y)| {
            let dx = (i % w) as f64 - cx;
            let dy = (i / w) as f64 - cy;
            let weight = (-(dx * dx + dy * dy) / denom).exp();
            (s + weight * f64::from(y), ws + weight)
        });
    if weight_sum > 0.0 {
        (sum / weight_sum) as f32
    } else {
        0.0
    }
}

fn max_channel(image: &Image) -> Vec<f32> {
    image.pixels().map(|[r, g, b]| r.max(g).max(b)).collect()
}

/// Linear-interpolated percentile at rank `q` (0..=100), matching the
/// usual `q/100 * (n - 1)` definition. Uses selection, not a full sort.
pub(crate) fn percentile(mut values: Vec<f32>, q: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let pos = (q.clamp(0.0, 100.0) / 100.0) as f64 * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = (pos - lo as f64) as f32;

    let (_, lo_val, above) = values.select_nth_unstable_by(lo, f32::total_cmp);
    let lo_val = *lo_val;
    if frac == 0.0 || above.is_empty() {
        return lo_val;
    }
    let hi_val = above.iter().copied().fold(f32::INFINITY, f32::min);
    lo_val + (hi_val - lo_val) * frac
}
