use std::io::{self, BufRead, Cursor, Seek, Write};

use crate::decoder::ImageDecoder;
use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat};

impl Image {
    /// Reads an image from a PNG file.
    pub fn read_png<R: BufRead + Seek>(input: R) -> io::Result<Image> {
        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(
            png::Transformations::STRIP_16 | png::Transformations::EXPAND,
        );
        let mut reader = decoder.read_info()?;

        let (color_type, bit_depth) = reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            return Err(io::Error::new(io::ErrorKind::InvalidData,
                                      "unsupported PNG bit depth"));
        }
        let pixel_format = match color_type {
            png::ColorType::Rgba => PixelFormat::RGBA,
            png::ColorType::Rgb => PixelFormat::RGB,
            png::ColorType::GrayscaleAlpha => PixelFormat::GrayAlpha,
            png::ColorType::Grayscale => PixelFormat::Gray,
            png::ColorType::Indexed => {
                // EXPAND should never leave paletted output behind.
                return Err(io::Error::new(io::ErrorKind::InvalidData,
                                          "unexpanded paletted PNG"));
            }
        };

        let info = reader.info();
        let mut image = Image::new(pixel_format, info.width, info.height);
        if reader.output_buffer_size() != Some(image.data().len()) {
            return Err(io::Error::new(io::ErrorKind::InvalidData,
                                      "PNG frame size mismatch"));
        }
        reader.next_frame(image.data_mut())?;
        reader.finish()?;
        Ok(image)
    }

    /// Writes the image to a PNG file.
    pub fn write_png<W: Write>(&self, output: W) -> io::Result<()> {
        let color_type = match self.pixel_format() {
            PixelFormat::RGBA => png::ColorType::Rgba,
            PixelFormat::RGB => png::ColorType::Rgb,
            PixelFormat::GrayAlpha => png::ColorType::GrayscaleAlpha,
            PixelFormat::Gray => png::ColorType::Grayscale,
        };
        let mut encoder = png::Encoder::new(output, self.width(), self.height());
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.data())?;
        writer.finish()?;
        Ok(())
    }
}

/// Decodes source images with the `png` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngDecoder;

impl ImageDecoder for PngDecoder {
    fn decode(&self, data: &[u8]) -> Result<Image> {
        Image::read_png(Cursor::new(data))
            .map_err(|err| Error::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip() {
        let data: Vec<u8> = (0..64u8).collect();
        let image = Image::from_data(PixelFormat::RGBA, 4, 4, data).unwrap();
        let mut encoded = Vec::new();
        image.write_png(&mut encoded).expect("write failed");
        let decoded = PngDecoder.decode(&encoded).expect("decode failed");
        assert_eq!(decoded.pixel_format(), PixelFormat::RGBA);
        assert_eq!(decoded.width(), 4);
        assert_eq!(decoded.height(), 4);
        assert_eq!(decoded.data(), image.data());
    }

    #[test]
    fn decode_garbage() {
        let result = PngDecoder.decode(b"definitely not a png");
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
