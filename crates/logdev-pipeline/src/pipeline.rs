//! Single-image development.
//!
//! ```text
//! Decode -> ExtractMetadata -> Expose -> LensCorrect? -> Boost
//!        -> GamutTransform -> CurveEncode -> LUT? -> Encode
//! ```
//!
//! Stages run strictly in this order. Lens correction and the LUT are
//! optional and degrade to a passthrough; any other failure ends this unit.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use logdev_color::{apply_lut, boost, encode_curve, gamut_matrix, gamut_transform, parse_adaptation, LogSpace};
use logdev_core::{Image, LensMetadata};
use logdev_io::{
    DecodedRaw, ExifReader, FormatWriter, ImageEncoder, MetadataReader, RawDecoder, RawLoaderDecoder,
};
use logdev_lens::{LensCorrector, LensDatabase, ProfileCorrector};
use logdev_lut::Lut;
use logdev_math::Adaptation;
use tracing::{info, warn};

use crate::batch::WorkUnit;
use crate::metering::{apply_gain, meter, Exposure};
use crate::sink::UnitLog;
use crate::stage::StageOutcome;
use crate::{panic_message, PipelineResult, PipelineSettings};

/// External collaborators the pipeline delegates to.
pub struct Collaborators {
    /// Camera file decoder.
    pub decoder: Box<dyn RawDecoder>,
    /// Capture metadata reader.
    pub metadata: Box<dyn MetadataReader>,
    /// Lens correction engine.
    pub lens: Box<dyn LensCorrector>,
    /// Output writer.
    pub encoder: Box<dyn ImageEncoder>,
}

impl Collaborators {
    /// rawloader, kamadak-exif, lensfun and the extension-dispatching writer.
    ///
    /// The lens database is only loaded when lens correction is enabled.
    pub fn standard(settings: &PipelineSettings) -> Self {
        let lens = if settings.lens.enabled {
            ProfileCorrector::open(settings.lens.database.as_deref())
        } else {
            ProfileCorrector::with_database(LensDatabase::default())
        };
        Self {
            decoder: Box::new(RawLoaderDecoder),
            metadata: Box::new(ExifReader),
            lens: Box::new(lens),
            encoder: Box::new(FormatWriter {
                fallback: settings.format,
            }),
        }
    }
}

/// LUT state for the whole run: loaded once, shared read-only.
#[derive(Debug, Clone)]
enum LutSource {
    None,
    Loaded { path: PathBuf, lut: Arc<Lut> },
    Failed { path: PathBuf, reason: String },
}

/// What one unit produced.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    /// Written file.
    pub output: PathBuf,
    /// Exposure gain applied.
    pub gain: f32,
    /// Lens correction result.
    pub lens: StageOutcome,
    /// LUT result.
    pub lut: StageOutcome,
}

/// A configured development pipeline, shared by every worker of a run.
pub struct Pipeline {
    settings: PipelineSettings,
    space: &'static LogSpace,
    adaptation: Adaptation,
    lut: LutSource,
    collaborators: Collaborators,
}

impl Pipeline {
    /// Validates `settings` and loads the LUT.
    ///
    /// An unknown log space or adaptation is an error here, before any
    /// image is touched. A LUT that fails to load is not: every unit will
    /// report it and carry on without it.
    pub fn new(settings: PipelineSettings, collaborators: Collaborators) -> PipelineResult<Self> {
        let space = LogSpace::lookup(&settings.log_space)?;
        let adaptation = parse_adaptation(&settings.adaptation)?;
        let lut = match &settings.lut {
            None => LutSource::None,
            Some(path) => match logdev_lut::cube::read(path) {
                Ok(lut) => {
                    info!(path = %path.display(), lut = %lut.describe(), "loaded LUT");
                    LutSource::Loaded {
                        path: path.clone(),
                        lut: Arc::new(lut),
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "LUT failed to load");
                    LutSource::Failed {
                        path: path.clone(),
                        reason: e.to_string(),
                    }
                }
            },
        };
        info!(log_space = %space, exposure = ?settings.exposure, "pipeline ready");
        Ok(Self {
            settings,
            space,
            adaptation,
            lut,
            collaborators,
        })
    }

    /// Pipeline with the standard collaborators.
    pub fn standard(settings: PipelineSettings) -> PipelineResult<Self> {
        let collaborators = Collaborators::standard(&settings);
        Self::new(settings, collaborators)
    }

    /// Settings in use.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Target log space.
    pub fn log_space(&self) -> &'static LogSpace {
        self.space
    }

    /// Runs every stage for one unit.
    pub fn process(&self, unit: &WorkUnit, log: &UnitLog<'_>) -> PipelineResult<UnitSummary> {
        log.info(&format!("processing {}", unit.input.display()));

        let DecodedRaw {
            mut image,
            primaries,
            camera,
        } = self.collaborators.decoder.decode(&unit.input)?;
        log.debug(&format!(
            "decoded {}x{} {} ({})",
            image.width(),
            image.height(),
            primaries.name,
            camera.as_deref().unwrap_or("unknown camera")
        ));

        let meta = self.read_metadata(&unit.input, log);

        let gain = match self.settings.exposure {
            Exposure::Manual(stops) => {
                let gain = 2f32.powf(stops);
                log.info(&format!("manual exposure {stops:+.2} stops (gain {gain:.4})"));
                gain
            }
            Exposure::Metered(mode) => {
                let m = meter(&image, mode, &primaries, &self.settings.metering);
                log.info(&format!("auto exposure: {m}"));
                m.gain
            }
        };
        apply_gain(&mut image, gain);

        let lens = self.lens_stage(&mut image, &meta, log);

        boost(&mut image, &self.settings.boost);

        let matrix = gamut_matrix(&primaries, &self.space.gamut, self.adaptation)?;
        log.debug(&format!(
            "colour transform {} -> {} -> {}",
            primaries.name, self.space.gamut.name, self.space.curve
        ));
        gamut_transform(&mut image, &matrix);
        encode_curve(&mut image, self.space.curve);

        let lut = self.lut_stage(&mut image, log);

        log.info(&format!("writing {}", unit.output.display()));
        self.collaborators.encoder.encode(&unit.output, &image)?;

        Ok(UnitSummary {
            output: unit.output.clone(),
            gain,
            lens,
            lut,
        })
    }

    fn read_metadata(&self, path: &Path, log: &UnitLog<'_>) -> LensMetadata {
        match self.collaborators.metadata.read(path) {
            Ok(meta) => meta,
            Err(e) => {
                log.warn(&format!("metadata unreadable: {e}"));
                LensMetadata::default()
            }
        }
    }

    fn lens_stage(&self, image: &mut Image, meta: &LensMetadata, log: &UnitLog<'_>) -> StageOutcome {
        let lens = &self.settings.lens;
        if !lens.enabled {
            return StageOutcome::Skipped("disabled".into());
        }
        if lens.toggles.none() {
            return StageOutcome::Skipped("all corrections disabled".into());
        }
        let missing = meta.missing_for_correction();
        if !missing.is_empty() {
            let reason = format!("missing {}", missing.join(", "));
            log.warn(&format!("lens correction skipped: {reason}"));
            return StageOutcome::Skipped(reason);
        }

        let corrector = &self.collaborators.lens;
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            corrector.correct(image, meta, &lens.toggles)
        }));
        match attempt {
            Ok(Ok(corrected)) => {
                *image = corrected;
                log.info(&format!(
                    "lens corrected: {} {}",
                    meta.lens_maker.as_deref().unwrap_or_default(),
                    meta.lens_model.as_deref().unwrap_or_default()
                ));
                StageOutcome::Applied
            }
            Ok(Err(e)) => {
                log.warn(&format!("lens correction failed: {e}"));
                StageOutcome::Failed(e.to_string())
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                log.warn(&format!("lens correction failed: {reason}"));
                StageOutcome::Failed(reason)
            }
        }
    }

    fn lut_stage(&self, image: &mut Image, log: &UnitLog<'_>) -> StageOutcome {
        match &self.lut {
            LutSource::None => StageOutcome::Skipped("no LUT".into()),
            LutSource::Failed { path, reason } => {
                log.warn(&format!("LUT {} not applied: {reason}", path.display()));
                StageOutcome::Failed(reason.clone())
            }
            LutSource::Loaded { path, lut } => {
                log.info(&format!("applying LUT {} ({})", path.display(), lut.describe()));
                apply_lut(image, lut);
                StageOutcome::Applied
            }
        }
    }
}
