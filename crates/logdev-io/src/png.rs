//! 16-bit PNG output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use logdev_core::Image;

use crate::{quantize_u16, ImageEncoder, IoError, IoResult};

/// Writes `image` as a 16-bit RGB PNG.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width() as u32, image.height() as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Sixteen);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    // PNG stores 16-bit samples big-endian.
    let bytes: Vec<u8> = quantize_u16(image.data())
        .into_iter()
        .flat_map(u16::to_be_bytes)
        .collect();
    png_writer
        .write_image_data(&bytes)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

/// [`ImageEncoder`] producing PNG regardless of the path's extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngWriter;

impl ImageEncoder for PngWriter {
    fn encode(&self, path: &Path, image: &Image) -> IoResult<()> {
        write(path, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_reads_back_as_rgb16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write(&path, &Image::filled(2, 2, [1.0, 0.5, 0.0])).unwrap();

        let decoder = png::Decoder::new(std::io::BufReader::new(File::open(&path).unwrap()));
        let mut reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (2, 2));
        assert_eq!(info.bit_depth, png::BitDepth::Sixteen);
        assert_eq!(info.color_type, png::ColorType::Rgb);

        let mut buf = vec![0; reader.output_buffer_size().unwrap()];
        reader.next_frame(&mut buf).unwrap();
        assert_eq!(&buf[0..6], &[0xff, 0xff, 0x80, 0x00, 0x00, 0x00]);
    }
}
