//! Output format selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use logdev_core::Image;
use serde::{Deserialize, Serialize};

use crate::{ImageEncoder, IoError, IoResult};

/// Output raster format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 16-bit RGB TIFF, LZW compressed.
    #[default]
    Tiff,
    /// 16-bit RGB PNG.
    Png,
}

impl OutputFormat {
    /// File extension used when synthesising output names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Tiff => "tif",
            Self::Png => "png",
        }
    }

    /// Format implied by a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "tif" | "tiff" => Some(Self::Tiff),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Format implied by a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Writes `image` to `path` in this format.
    pub fn write(self, path: &Path, image: &Image) -> IoResult<()> {
        match self {
            #[cfg(feature = "tiff")]
            Self::Tiff => crate::tiff::write(path, image),
            #[cfg(feature = "png")]
            Self::Png => crate::png::write(path, image),
            #[allow(unreachable_patterns)]
            other => {
                let _ = image;
                Err(IoError::UnsupportedFormat(format!(
                    "{other} support not compiled in"
                )))
            }
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = IoError;

    fn from_str(s: &str) -> IoResult<Self> {
        Self::from_extension(s.trim_start_matches('.'))
            .ok_or_else(|| IoError::UnsupportedFormat(s.to_string()))
    }
}

/// [`ImageEncoder`] that picks the format from the output path.
///
/// Paths without a recognised extension fall back to `fallback`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatWriter {
    /// Format used when the extension says nothing.
    pub fallback: OutputFormat,
}

impl ImageEncoder for FormatWriter {
    fn encode(&self, path: &Path, image: &Image) -> IoResult<()> {
        OutputFormat::from_path(path)
            .unwrap_or(self.fallback)
            .write(path, image)
    }
}
