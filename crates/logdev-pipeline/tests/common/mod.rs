//! Stand-in collaborators shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use logdev_core::{Image, LensMetadata};
use logdev_io::{DecodedRaw, ImageEncoder, IoError, IoResult, MetadataReader, RawDecoder};
use logdev_lens::{LensCorrector, LensError, LensResult, LensToggles};
use logdev_pipeline::Collaborators;
use logdev_primaries::{Primaries, PROPHOTO_RGB};

pub const GRAY: [f32; 3] = [0.18, 0.18, 0.18];

pub const SLOW_DECODE: Duration = Duration::from_millis(400);

/// Decodes every file to a flat 4x4 image. Files starting with `corrupt`
/// fail to decode; files starting with `slow` take [`SLOW_DECODE`].
pub struct FlatDecoder {
    pub rgb: [f32; 3],
    pub primaries: Primaries,
}

impl Default for FlatDecoder {
    fn default() -> Self {
        Self {
            rgb: GRAY,
            primaries: PROPHOTO_RGB,
        }
    }
}

impl RawDecoder for FlatDecoder {
    fn decode(&self, path: &Path) -> IoResult<DecodedRaw> {
        let bytes = fs::read(path)?;
        if bytes.starts_with(b"corrupt") {
            return Err(IoError::DecodeError("bad header".into()));
        }
        if bytes.starts_with(b"slow") {
            thread::sleep(SLOW_DECODE);
        }
        Ok(DecodedRaw {
            image: Image::filled(4, 4, self.rgb),
            primaries: self.primaries,
            camera: Some("Test Body".into()),
        })
    }
}

/// Returns the same metadata for every file.
#[derive(Default)]
pub struct FixedMetadata(pub LensMetadata);

impl MetadataReader for FixedMetadata {
    fn read(&self, _path: &Path) -> IoResult<LensMetadata> {
        Ok(self.0.clone())
    }
}

/// Lens corrector behaviour.
#[derive(Clone, Copy)]
pub enum LensBehaviour {
    /// Halves every sample.
    Halve,
    /// Returns an error.
    Fail,
    /// Panics.
    Panic,
}

/// Lens corrector that counts its calls.
pub struct CountingLens {
    pub behaviour: LensBehaviour,
    pub calls: Arc<AtomicUsize>,
}

impl LensCorrector for CountingLens {
    fn correct(&self, image: &Image, _meta: &LensMetadata, _toggles: &LensToggles) -> LensResult<Image> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            LensBehaviour::Halve => {
                let mut out = image.clone();
                out.scale(0.5);
                Ok(out)
            }
            LensBehaviour::Fail => Err(LensError::ProfileNotFound("Mystery 50mm".into())),
            LensBehaviour::Panic => panic!("corrector exploded"),
        }
    }
}

/// Keeps every encoded image in memory.
#[derive(Clone, Default)]
pub struct MemoryEncoder {
    pub written: Arc<Mutex<Vec<(PathBuf, Image)>>>,
}

impl MemoryEncoder {
    pub fn only(&self) -> Image {
        let written = self.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        written[0].1.clone()
    }
}

impl ImageEncoder for MemoryEncoder {
    fn encode(&self, path: &Path, image: &Image) -> IoResult<()> {
        self.written
            .lock()
            .unwrap()
            .push((path.to_path_buf(), image.clone()));
        Ok(())
    }
}

/// Full lens metadata for a known lens.
pub fn full_metadata() -> LensMetadata {
    LensMetadata {
        camera_maker: Some("Fujifilm".into()),
        camera_model: Some("X-T5".into()),
        lens_maker: Some("Fujifilm".into()),
        lens_model: Some("XF23mmF1.4 R LM WR".into()),
        focal_length_mm: Some(23.0),
        f_number: Some(2.8),
    }
}

/// Mock bundle plus handles to inspect it afterwards.
pub struct Mocks {
    pub calls: Arc<AtomicUsize>,
    pub encoder: MemoryEncoder,
}

impl Mocks {
    pub fn collaborators(meta: LensMetadata, behaviour: LensBehaviour) -> (Collaborators, Mocks) {
        let calls = Arc::new(AtomicUsize::new(0));
        let encoder = MemoryEncoder::default();
        let collaborators = Collaborators {
            decoder: Box::new(FlatDecoder::default()),
            metadata: Box::new(FixedMetadata(meta)),
            lens: Box::new(CountingLens {
                behaviour,
                calls: calls.clone(),
            }),
            encoder: Box::new(encoder.clone()),
        };
        (collaborators, Mocks { calls, encoder })
    }

    pub fn lens_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Writes a stand-in camera file.
pub fn write_raw(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
