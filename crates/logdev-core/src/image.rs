//! Dense linear RGB image.

use crate::{Error, Result};
use rayon::prelude::*;

/// Samples per pixel.
const CHANNELS: usize = 3;

/// Pixels per parallel work item for the element-wise helpers.
const CHUNK_PIXELS: usize = 8192;

/// A `height x width x 3` f32 raster in scene-linear light (until a curve
/// stage encodes it).
///
/// Samples are RGB interleaved, row-major, with no padding. Values may
/// exceed 1.0; clamping happens only at explicit checkpoints.
///
/// # Example
///
/// ```rust
/// use logdev_core::Image;
///
/// let mut img = Image::filled(4, 2, [0.18, 0.18, 0.18]);
/// img.scale(2.0);
/// assert_eq!(img.pixel(3, 1), [0.36, 0.36, 0.36]);
/// ```
#[derive(Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Image {
    /// Creates a black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, [0.0; 3])
    }

    /// Creates an image with every pixel set to `rgb`.
    pub fn filled(width: usize, height: usize, rgb: [f32; 3]) -> Self {
        Self {
            width,
            height,
            data: rgb.repeat(width * height),
        }
    }

    /// Wraps an existing interleaved RGB buffer.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        let expected = sample_count(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copies a strided RGB region into a new contiguous image.
    ///
    /// `row_stride` is the distance between row starts in samples and must be
    /// at least `width * 3`.
    pub fn from_strided(width: usize, height: usize, row_stride: usize, src: &[f32]) -> Result<Self> {
        let row_len = width * CHANNELS;
        let expected = sample_count(width, height)?;
        let needed = if height == 0 {
            0
        } else {
            (height - 1) * row_stride + row_len
        };
        if row_stride < row_len || src.len() < needed {
            return Err(Error::BufferSize {
                expected: needed.max(expected),
                actual: src.len(),
            });
        }

        let mut data = Vec::with_capacity(expected);
        for y in 0..height {
            let start = y * row_stride;
            data.extend_from_slice(&src[start..start + row_len]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Interleaved samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable interleaved samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the image, returning its buffer.
    #[inline]
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Sets the pixel at `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Iterates over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.data.chunks_exact(CHANNELS).map(|p| [p[0], p[1], p[2]])
    }

    /// Parallel iterator over `(y, row)` with each row mutable.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [f32])> {
        let row_len = (self.width * CHANNELS).max(1);
        self.data.par_chunks_mut(row_len).enumerate()
    }

    /// Multiplies every sample by `gain`, in place.
    pub fn scale(&mut self, gain: f32) {
        self.map_samples(|v| v * gain);
    }

    /// Applies `f` to every sample, in place and in parallel.
    pub fn map_samples<F>(&mut self, f: F)
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        self.data
            .par_chunks_mut(CHUNK_PIXELS * CHANNELS)
            .for_each(|chunk| chunk.iter_mut().for_each(|v| *v = f(*v)));
    }

    /// Applies `f` to every pixel, in place and in parallel.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn([f32; 3]) -> [f32; 3] + Sync + Send,
    {
        self.data
            .par_chunks_mut(CHUNK_PIXELS * CHANNELS)
            .for_each(|chunk| {
                for px in chunk.chunks_exact_mut(CHANNELS) {
                    let out = f([px[0], px[1], px[2]]);
                    px.copy_from_slice(&out);
                }
            });
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        (y * self.width + x) * CHANNELS
    }
}

fn sample_count(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(Error::InvalidDimensions { width, height })
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
