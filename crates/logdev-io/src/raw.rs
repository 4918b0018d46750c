//! Camera RAW decoding via rawloader.
//!
//! The decoder produces scene-linear ProPhoto RGB with the camera's as-shot
//! white balance and nothing else: no auto-brightness, no tone curve, no
//! highlight reconstruction. Exposure belongs to the pipeline.
//!
//! Steps:
//!
//! 1. Black/white level normalisation per CFA colour, camera white balance
//!    (green-normalised)
//! 2. Crop to the sensor's active area
//! 3. Demosaic by averaging same-colour samples in each 3x3 neighbourhood
//!    (works for Bayer and X-Trans alike)
//! 4. Camera RGB to ProPhoto via the camera's XYZ matrix
//!
//! The integer sensor buffer is dropped as soon as the normalised mosaic
//! exists.

use std::path::Path;

use logdev_core::Image;
use logdev_math::{adapt_matrix, Adaptation, Mat3, D50, D65};
use logdev_primaries::{rgb_to_xyz_matrix, PROPHOTO_RGB};
use rawloader::{RawImage, RawImageData};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{DecodedRaw, IoError, IoResult, RawDecoder};

/// Pixels per parallel work item when applying the colour matrix.
const CHUNK_PIXELS: usize = 8192;

/// [`RawDecoder`] backed by the rawloader crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLoaderDecoder;

impl RawDecoder for RawLoaderDecoder {
    fn decode(&self, path: &Path) -> IoResult<DecodedRaw> {
        let raw = rawloader::decode_file(path)
            .map_err(|e| IoError::DecodeError(format!("{}: {e}", path.display())))?;
        develop(raw)
    }
}

fn develop(raw: RawImage) -> IoResult<DecodedRaw> {
    let (width, height, cpp) = (raw.width, raw.height, raw.cpp);
    if cpp != 1 && cpp != 3 {
        return Err(IoError::DecodeError(format!(
            "unsupported layout: {cpp} components per pixel"
        )));
    }

    let camera = format!("{} {}", raw.clean_make, raw.clean_model).trim().to_string();
    let pattern = CfaPattern::from_rawloader(&raw);
    let levels = Levels {
        black: raw.blacklevels.map(f32::from),
        white: raw.whitelevels.map(f32::from),
        wb: white_balance(raw.wb_coeffs),
    };
    debug!(
        camera = %camera,
        width,
        height,
        cfa = %raw.cfa.name,
        wb = ?levels.wb,
        "decoded sensor data"
    );

    let expected = width * height * cpp;
    let mosaic = match &raw.data {
        RawImageData::Integer(samples) => {
            check_len(samples.len(), expected)?;
            levels.normalize_integer(samples, width, cpp, &pattern)
        }
        RawImageData::Float(samples) => {
            check_len(samples.len(), expected)?;
            levels.normalize_float(samples, width, cpp, &pattern)
        }
    };
    let crop = Crop::from_margins(raw.crops, width, height);
    let xyz_to_cam = raw.xyz_to_cam;
    drop(raw);

    let mut image = if cpp == 1 {
        let rgb = demosaic(&mosaic, width, height, crop, &pattern);
        drop(mosaic);
        Image::from_data(crop.width, crop.height, rgb)?
    } else {
        crop_interleaved(mosaic, width, crop)?
    };

    match camera_to_prophoto(xyz_to_cam) {
        Some(m) => image
            .data_mut()
            .par_chunks_mut(CHUNK_PIXELS * 3)
            .for_each(|chunk| m.apply_rgb_slice(chunk)),
        None => warn!(camera = %camera, "no usable colour matrix, keeping camera RGB"),
    }

    Ok(DecodedRaw {
        image,
        primaries: PROPHOTO_RGB,
        camera: (!camera.is_empty()).then_some(camera),
    })
}

fn check_len(actual: usize, expected: usize) -> IoResult<()> {
    if actual < expected {
        return Err(IoError::DecodeError(format!(
            "sensor buffer holds {actual} samples, expected {expected}"
        )));
    }
    Ok(())
}

/// As-shot multipliers scaled so green is 1. Unknown coefficients
/// (rawloader reports NaN) fall back to 1.
fn white_balance(coeffs: [f32; 4]) -> [f32; 3] {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(coeffs[1]) {
        return [1.0; 3];
    }
    let g = coeffs[1];
    [coeffs[0], coeffs[1], coeffs[2]].map(|c| if valid(c) { c / g } else { 1.0 })
}

/// Builds ProPhoto-from-camera.
///
/// The camera matrix maps D65 XYZ to camera RGB. Rows of camera-from-ProPhoto
/// are normalised so ProPhoto white lands on camera (1, 1, 1), which keeps
/// white-balanced neutrals neutral.
fn camera_to_prophoto(xyz_to_cam: [[f32; 3]; 4]) -> Option<Mat3> {
    let cam_from_xyz = Mat3::from_rows([xyz_to_cam[0], xyz_to_cam[1], xyz_to_cam[2]]);
    if cam_from_xyz == Mat3::ZERO || !cam_from_xyz.is_finite() {
        return None;
    }
    let prophoto_to_xyz =
        adapt_matrix(Adaptation::Bradford, D50, D65) * rgb_to_xyz_matrix(&PROPHOTO_RGB);
    let cam_from_prophoto = (cam_from_xyz * prophoto_to_xyz).normalize_rows();
    cam_from_prophoto.inverse().filter(Mat3::is_finite)
}

/// Repeating colour filter pattern, colours folded to 0 = R, 1 = G, 2 = B.
#[derive(Debug, Clone, PartialEq)]
struct CfaPattern {
    width: usize,
    height: usize,
    colors: Vec<usize>,
}

impl CfaPattern {
    fn from_rawloader(raw: &RawImage) -> Self {
        let (width, height) = (raw.cfa.width, raw.cfa.height);
        if width == 0 || height == 0 {
            return Self::uniform_green();
        }
        let colors = (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .map(|(row, col)| raw.cfa.color_at(row, col))
            .collect();
        Self::new(width, height, colors)
    }

    fn new(width: usize, height: usize, colors: Vec<usize>) -> Self {
        // rawloader reports the second green of RGBE/RGGB variants as 3.
        let colors = colors.into_iter().map(|c| if c >= 3 { 1 } else { c }).collect();
        Self {
            width,
            height,
            colors,
        }
    }

    fn uniform_green() -> Self {
        Self::new(1, 1, vec![1])
    }

    #[inline]
    fn color_at(&self, row: usize, col: usize) -> usize {
        self.colors[(row % self.height) * self.width + col % self.width]
    }
}

struct Levels {
    black: [f32; 4],
    white: [f32; 4],
    wb: [f32; 3],
}

impl Levels {
    /// Scales integer samples to [0, 1] per colour and applies white balance.
    fn normalize_integer(&self, samples: &[u16], width: usize, cpp: usize, cfa: &CfaPattern) -> Vec<f32> {
        let row_len = width * cpp;
        let mut out = vec![0.0f32; samples.len()];
        out.par_chunks_mut(row_len)
            .zip(samples.par_chunks(row_len))
            .enumerate()
            .for_each(|(row, (dst, src))| {
                for (i, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
                    let c = if cpp == 1 { cfa.color_at(row, i) } else { i % cpp };
                    let range = (self.white[c] - self.black[c]).max(1.0);
                    *d = ((f32::from(s) - self.black[c]) / range).max(0.0) * self.wb[c];
                }
            });
        out
    }

    /// Float sensor data is already normalised; only white balance applies.
    fn normalize_float(&self, samples: &[f32], width: usize, cpp: usize, cfa: &CfaPattern) -> Vec<f32> {
        let row_len = width * cpp;
        let mut out = vec![0.0f32; samples.len()];
        out.par_chunks_mut(row_len)
            .zip(samples.par_chunks(row_len))
            .enumerate()
            .for_each(|(row, (dst, src))| {
                for (i, (d, &s)) in dst.iter_mut().zip(src).enumerate() {
                    let c = if cpp == 1 { cfa.color_at(row, i) } else { i % cpp };
                    *d = s.max(0.0) * self.wb[c];
                }
            });
        out
    }
}

/// Active area inside the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Crop {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl Crop {
    /// `margins` is rawloader's `[top, right, bottom, left]`. Margins that
    /// would leave nothing are ignored.
    fn from_margins(margins: [usize; 4], width: usize, height: usize) -> Self {
        let [top, right, bottom, left] = margins;
        if left + right >= width || top + bottom >= height {
            return Self {
                x: 0,
                y: 0,
                width,
                height,
            };
        }
        Self {
            x: left,
            y: top,
            width: width - left - right,
            height: height - top - bottom,
        }
    }
}

/// Same-colour 3x3 neighbourhood average.
///
/// Reads from the full mosaic so pixels on the crop edge still see their
/// real neighbours.
/// Cuts the active area out of an already-RGB sensor buffer. Takes the
/// buffer by value so it is freed before the caller continues.
fn crop_interleaved(mosaic: Vec<f32>, width: usize, crop: Crop) -> IoResult<Image> {
    let start = (crop.y * width + crop.x) * 3;
    let image = Image::from_strided(crop.width, crop.height, width * 3, &mosaic[start..]);
    drop(mosaic);
    Ok(image?)
}

fn demosaic(mosaic: &[f32], width: usize, height: usize, crop: Crop, cfa: &CfaPattern) -> Vec<f32> {
    let mut rgb = vec![0.0f32; crop.width * crop.height * 3];
    rgb.par_chunks_mut(crop.width * 3)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = crop.y + y;
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                let sx = crop.x + x;
                let mut sum = [0.0f32; 3];
                let mut count = [0u32; 3];
                for ny in sy.saturating_sub(1)..=(sy + 1).min(height - 1) {
                    for nx in sx.saturating_sub(1)..=(sx + 1).min(width - 1) {
                        let c = cfa.color_at(ny, nx);
                        sum[c] += mosaic[ny * width + nx];
                        count[c] += 1;
                    }
                }
                for c in 0..3 {
                    if count[c] > 0 {
                        px[c] = sum[c] / count[c] as f32;
                    }
                }
            }
        });
    rgb
}
