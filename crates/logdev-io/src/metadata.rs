//! Capture metadata via kamadak-exif.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Exif, In, Tag, Value};
use logdev_core::LensMetadata;
use tracing::debug;

use crate::{IoError, IoResult, MetadataReader};

/// [`MetadataReader`] reading the primary IFD of TIFF-based containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read(&self, path: &Path) -> IoResult<LensMetadata> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(lens_metadata(&exif)),
            Err(exif::Error::Io(e)) => Err(IoError::Io(e)),
            Err(e) => {
                debug!(file = %path.display(), error = %e, "no readable EXIF");
                Ok(LensMetadata::default())
            }
        }
    }
}

fn lens_metadata(exif: &Exif) -> LensMetadata {
    LensMetadata {
        camera_maker: text(exif, Tag::Make),
        camera_model: text(exif, Tag::Model),
        lens_maker: text(exif, Tag::LensMake),
        lens_model: text(exif, Tag::LensModel),
        focal_length_mm: number(exif, Tag::FocalLength),
        f_number: number(exif, Tag::FNumber),
    }
}

/// First ASCII component, trimmed. Empty strings count as missing.
fn text(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Ascii(ref parts) = field.value else {
        return None;
    };
    let raw = parts.first()?;
    let s = String::from_utf8_lossy(raw)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string();
    (!s.is_empty()).then_some(s)
}

/// First rational component as f32. Zero means "unknown" in practice.
fn number(exif: &Exif, tag: Tag) -> Option<f32> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let v = match field.value {
        Value::Rational(ref r) => r.first()?.to_f64(),
        Value::SRational(ref r) => r.first()?.to_f64(),
        Value::Short(ref s) => f64::from(*s.first()?),
        _ => return None,
    };
    (v.is_finite() && v > 0.0).then_some(v as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_without_exif_is_empty() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"definitely not a raw file").unwrap();
        let meta = ExifReader.read(tmp.path()).unwrap();
        assert_eq!(meta, LensMetadata::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ExifReader.read(&dir.path().join("absent.nef")).is_err());
    }
}
