//! Applying a profile to an image.
//!
//! Vignetting is divided out first, on source geometry. Distortion and TCA
//! then resample the image: for every output pixel the undistorted radius is
//! pushed through the distortion polynomial (and, for red and blue, the TCA
//! scale) to find where to read in the source, with bilinear filtering.

use std::path::Path;

use logdev_core::{Image, LensMetadata};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::{DistortionModel, TcaModel, Vignetting};
use crate::{LensDatabase, LensError, LensProfile, LensResult};

/// Smallest vignetting divisor.
const MIN_FALLOFF: f32 = 1e-3;

/// Which corrections to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensToggles {
    /// Geometric distortion.
    pub distortion: bool,
    /// Lateral chromatic aberration.
    pub tca: bool,
    /// Vignetting.
    pub vignetting: bool,
}

impl Default for LensToggles {
    fn default() -> Self {
        Self {
            distortion: true,
            tca: true,
            vignetting: true,
        }
    }
}

impl LensToggles {
    /// True when every correction is off.
    pub fn none(&self) -> bool {
        !(self.distortion || self.tca || self.vignetting)
    }
}

/// Corrects an image for its lens.
///
/// Errors mean "could not correct"; callers keep the input image.
pub trait LensCorrector: Send + Sync {
    /// Returns a corrected copy of `image`.
    fn correct(&self, image: &Image, meta: &LensMetadata, toggles: &LensToggles) -> LensResult<Image>;
}

/// [`LensCorrector`] backed by a lensfun database.
///
/// The database is loaded once; a failed load is remembered and reported by
/// every `correct` call.
#[derive(Debug)]
pub struct ProfileCorrector {
    db: Result<LensDatabase, String>,
}

impl ProfileCorrector {
    /// Loads the database from `custom`, or the system location.
    pub fn open(custom: Option<&Path>) -> Self {
        Self {
            db: LensDatabase::open(custom).map_err(|e| e.to_string()),
        }
    }

    /// Wraps an already loaded database.
    pub fn with_database(db: LensDatabase) -> Self {
        Self { db: Ok(db) }
    }

    /// The loaded database, if any.
    pub fn database(&self) -> Option<&LensDatabase> {
        self.db.as_ref().ok()
    }
}

impl LensCorrector for ProfileCorrector {
    fn correct(&self, image: &Image, meta: &LensMetadata, toggles: &LensToggles) -> LensResult<Image> {
        let db = self.db.as_ref().map_err(|e| LensError::NoDatabase(e.clone()))?;

        let (Some(model), Some(focal), Some(aperture)) =
            (meta.lens_model.as_deref(), meta.focal_length_mm, meta.f_number)
        else {
            return Err(LensError::MissingMetadata(
                meta.missing_for_correction().join(", "),
            ));
        };

        let profile = db
            .find_lens(meta.lens_maker.as_deref(), model)
            .ok_or_else(|| LensError::ProfileNotFound(model.to_string()))?;
        if let Some(cam) = meta.camera_model.as_deref() {
            let body = db.find_camera(meta.camera_maker.as_deref(), cam);
            debug!(camera = cam, known = body.is_some(), lens = %profile.model, "lens profile");
        }

        correct_with_profile(image, profile, focal, aperture, toggles)
    }
}

/// Applies the enabled corrections of `profile` at the given focal length
/// and aperture.
///
/// Fails only when no enabled correction has calibration data.
pub fn correct_with_profile(
    image: &Image,
    profile: &LensProfile,
    focal: f32,
    aperture: f32,
    toggles: &LensToggles,
) -> LensResult<Image> {
    let vignetting = toggles
        .vignetting
        .then(|| profile.vignetting_at(focal, aperture))
        .flatten();
    let distortion = toggles
        .distortion
        .then(|| profile.distortion_at(focal))
        .flatten();
    let tca = toggles.tca.then(|| profile.tca_at(focal)).flatten();

    if vignetting.is_none() && distortion.is_none() && tca.is_none() {
        return Err(LensError::NoCalibration {
            lens: profile.model.clone(),
            kind: "enabled",
        });
    }
    debug!(
        lens = %profile.model,
        focal,
        aperture,
        ?distortion,
        ?tca,
        vignetting = vignetting.is_some(),
        "correcting"
    );

    let mut out = image.clone();
    if let Some(v) = vignetting {
        devignette(&mut out, &v);
    }
    if distortion.is_some() || tca.is_some() {
        out = remap(&out, distortion, tca);
    }
    Ok(out)
}

/// Divides out the `pa` falloff. Radius is relative to half the diagonal.
pub fn devignette(image: &mut Image, v: &Vignetting) {
    let (w, h) = image.dimensions();
    let (cx, cy) = centre(w, h);
    let norm = ((w * w + h * h) as f32).sqrt() / 2.0;

    image.par_rows_mut().for_each(|(y, row)| {
        let dy = y as f32 - cy;
        for (x, px) in row.chunks_exact_mut(3).enumerate() {
            let dx = x as f32 - cx;
            let r = (dx * dx + dy * dy).sqrt() / norm;
            let gain = 1.0 / v.falloff(r).max(MIN_FALLOFF);
            px.iter_mut().for_each(|c| *c *= gain);
        }
    });
}

/// Resamples for distortion and TCA. Radius is relative to half the shorter
/// side. Coordinates falling outside the frame repeat the edge.
pub fn remap(src: &Image, distortion: Option<DistortionModel>, tca: Option<TcaModel>) -> Image {
    let (w, h) = src.dimensions();
    let (cx, cy) = centre(w, h);
    let norm = (w.min(h) as f32 / 2.0).max(1.0);
    let data = src.data();

    let mut out = Image::new(w, h);
    out.par_rows_mut().for_each(|(y, row)| {
        let dy = y as f32 - cy;
        for (x, px) in row.chunks_exact_mut(3).enumerate() {
            let dx = x as f32 - cx;
            let ru = (dx * dx + dy * dy).sqrt() / norm;
            let kd = distortion.map_or(1.0, |d| d.scale(ru));
            let (kr, kb) = tca.map_or((1.0, 1.0), |t| t.scales(ru * kd));
            for (c, k) in [kd * kr, kd, kd * kb].into_iter().enumerate() {
                px[c] = sample_bilinear(data, w, h, c, cx + dx * k, cy + dy * k);
            }
        }
    });
    out
}

#[inline]
fn centre(w: usize, h: usize) -> (f32, f32) {
    ((w as f32 - 1.0) / 2.0, (h as f32 - 1.0) / 2.0)
}

#[inline]
fn sample_bilinear(src: &[f32], w: usize, h: usize, c: usize, x: f32, y: f32) -> f32 {
    let x = x.clamp(0.0, (w - 1) as f32);
    let y = y.clamp(0.0, (h - 1) as f32);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src[(y0 * w + x0) * 3 + c];
    let p10 = src[(y0 * w + x1) * 3 + c];
    let p01 = src[(y1 * w + x0) * 3 + c];
    let p11 = src[(y1 * w + x1) * 3 + c];

    let top = p00 * (1.0 - fx) + p10 * fx;
    let bot = p01 * (1.0 - fx) + p11 * fx;
    top * (1.0 - fy) + bot * fy
}
