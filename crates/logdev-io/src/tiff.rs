//! 16-bit TIFF output.
//!
//! RGB, 16 bits per sample, LZW compressed, photometric interpretation RGB.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use logdev_core::Image;
use tiff::encoder::{colortype, Compression, TiffEncoder};

use crate::{quantize_u16, ImageEncoder, IoError, IoResult};

/// Writes `image` as a 16-bit RGB TIFF.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))
        .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?
        .with_compression(Compression::Lzw);

    let samples = quantize_u16(image.data());
    encoder
        .write_image::<colortype::RGB16>(image.width() as u32, image.height() as u32, &samples)
        .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

/// [`ImageEncoder`] producing TIFF regardless of the path's extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffWriter;

impl ImageEncoder for TiffWriter {
    fn encode(&self, path: &Path, image: &Image) -> IoResult<()> {
        write(path, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;
    use tiff::decoder::{Decoder, DecodingResult};
    use tiff::tags::Tag;
    use tiff::ColorType;

    #[test]
    fn test_write_reads_back_as_rgb16() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tif");

        let mut img = Image::filled(3, 2, [0.0, 0.5, 1.0]);
        img.set_pixel(2, 1, [2.0, -1.0, 0.25]);
        write(&path, &img).unwrap();

        let mut decoder = Decoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        assert_eq!(decoder.dimensions().unwrap(), (3, 2));
        assert_eq!(decoder.colortype().unwrap(), ColorType::RGB(16));
        // 5 = LZW, 2 = RGB
        assert_eq!(decoder.get_tag_u32(Tag::Compression).unwrap(), 5);
        assert_eq!(decoder.get_tag_u32(Tag::PhotometricInterpretation).unwrap(), 2);
        let DecodingResult::U16(buf) = decoder.read_image().unwrap() else {
            panic!("expected 16-bit samples");
        };
        assert_eq!(&buf[0..3], &[0, 32768, 65535]);
        assert_eq!(&buf[15..18], &[65535, 0, 16384]);
    }
}
