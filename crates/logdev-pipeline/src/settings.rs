//! Pipeline settings.
//!
//! Deserialisable so a YAML file can provide them; every field has a
//! default, so a partial file is fine.
//!
//! ```yaml
//! log_space: F-Log2
//! exposure: hybrid        # or a number of stops, e.g. 0.5
//! lut: /luts/look.cube
//! lens:
//!   enabled: true
//!   vignetting: false
//! boost:
//!   saturation: 1.2
//! jobs: 8
//! ```

use std::path::PathBuf;

use logdev_color::BoostParams;
use logdev_io::OutputFormat;
use logdev_lens::LensToggles;
use serde::{Deserialize, Serialize};

use crate::metering::{Exposure, MeteringParams};

/// Default worker count for batch runs.
pub const DEFAULT_JOBS: usize = 4;

/// Lens correction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensSettings {
    /// Master switch.
    pub enabled: bool,
    /// Individual corrections.
    #[serde(flatten)]
    pub toggles: LensToggles,
    /// Database file or directory used instead of the system one.
    pub database: Option<PathBuf>,
}

impl Default for LensSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            toggles: LensToggles::default(),
            database: None,
        }
    }
}

/// Everything that shapes one development run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Target log space name.
    pub log_space: String,
    /// Manual stops or a metering mode.
    pub exposure: Exposure,
    /// Metering constants.
    pub metering: MeteringParams,
    /// Lens correction.
    pub lens: LensSettings,
    /// Look applied before the gamut transform.
    pub boost: BoostParams,
    /// Chromatic adaptation between working and target white.
    pub adaptation: String,
    /// Optional LUT applied after encoding.
    pub lut: Option<PathBuf>,
    /// Output raster format.
    pub format: OutputFormat,
    /// Worker count for batch runs.
    pub jobs: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            log_space: String::from("F-Log2"),
            exposure: Exposure::default(),
            metering: MeteringParams::default(),
            lens: LensSettings::default(),
            boost: BoostParams::default(),
            adaptation: String::from("cat02"),
            lut: None,
            format: OutputFormat::default(),
            jobs: DEFAULT_JOBS,
        }
    }
}
