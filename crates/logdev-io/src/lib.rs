//! # logdev-io
//!
//! The codecs around the development pipeline: camera RAW in, 16-bit RGB
//! raster out, plus the EXIF facts lens correction needs.
//!
//! # Collaborators
//!
//! | Trait | Default | Backend |
//! |-------|---------|---------|
//! | [`RawDecoder`] | [`RawLoaderDecoder`] | rawloader |
//! | [`MetadataReader`] | [`ExifReader`] | kamadak-exif |
//! | [`ImageEncoder`] | [`FormatWriter`] | tiff / png |
//!
//! # Output
//!
//! Samples are clamped to [0, 1] and rounded to 16 bits:
//! `round(clamp(v, 0, 1) * 65535)`.

#![warn(missing_docs)]

mod error;
mod format;
mod metadata;
mod raw;
mod traits;

#[cfg(feature = "png")]
pub mod png;
#[cfg(feature = "tiff")]
pub mod tiff;

pub use error::{IoError, IoResult};
pub use format::{FormatWriter, OutputFormat};
pub use metadata::ExifReader;
pub use raw::RawLoaderDecoder;
pub use traits::{DecodedRaw, ImageEncoder, MetadataReader, RawDecoder};

#[cfg(feature = "png")]
pub use self::png::PngWriter;
#[cfg(feature = "tiff")]
pub use self::tiff::TiffWriter;

/// Quantises linear [0, 1] samples to u16, clamping out-of-range values.
pub fn quantize_u16(samples: &[f32]) -> Vec<u16> {
    samples
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize() {
        assert_eq!(
            quantize_u16(&[-0.5, 0.0, 0.5, 1.0, 7.0, f32::NAN]),
            vec![0, 0, 32768, 65535, 65535, 0]
        );
    }
}
