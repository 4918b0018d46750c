//! Collaborator traits for decoding, metadata and encoding.
//!
//! The pipeline only talks to these traits, so tests and alternative
//! backends can stand in for the real codecs. All of them are shared
//! across batch workers and must be `Send + Sync`.

use std::path::Path;

use logdev_core::{Image, LensMetadata};
use logdev_primaries::Primaries;

use crate::IoResult;

/// A decoded camera file.
#[derive(Debug, Clone)]
pub struct DecodedRaw {
    /// Linear RGB image, no auto-brightness applied.
    pub image: Image,
    /// Colorspace the image is expressed in.
    pub primaries: Primaries,
    /// Camera identification from the decoder, if any.
    pub camera: Option<String>,
}

/// Turns a camera file into linear RGB.
pub trait RawDecoder: Send + Sync {
    /// Decodes the file at `path`.
    fn decode(&self, path: &Path) -> IoResult<DecodedRaw>;
}

/// Reads capture facts from a file.
pub trait MetadataReader: Send + Sync {
    /// Reads metadata from `path`.
    ///
    /// A file without metadata is not an error: implementations return
    /// [`LensMetadata::default`].
    fn read(&self, path: &Path) -> IoResult<LensMetadata>;
}

/// Writes a finished image.
pub trait ImageEncoder: Send + Sync {
    /// Encodes `image` to `path`. Samples are expected in [0, 1].
    fn encode(&self, path: &Path, image: &Image) -> IoResult<()>;
}
