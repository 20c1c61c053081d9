use crate::error::{Error, Result};

/// A decoded source image.
#[derive(Clone, Debug)]
pub struct Image {
    format: PixelFormat,
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl Image {
    /// Creates a new image with all pixel data set to zero.
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Image {
        let data_bytes = format.bytes_per_pixel() * (width as usize) *
                         (height as usize);
        Image {
            format,
            width,
            height,
            data: vec![0u8; data_bytes].into_boxed_slice(),
        }
    }

    /// Creates an image from existing pixel data.  Returns an error if the
    /// data length does not match the format and dimensions.
    pub fn from_data(format: PixelFormat,
                     width: u32,
                     height: u32,
                     data: Vec<u8>)
                     -> Result<Image> {
        let expected = format.bytes_per_pixel() * (width as usize) *
                       (height as usize);
        if data.len() != expected {
            let msg = format!("pixel data has wrong length ({} instead of \
                               {} for {}x{} {:?})",
                              data.len(),
                              expected,
                              width,
                              height,
                              format);
            return Err(Error::Format(msg));
        }
        Ok(Image {
            format,
            width,
            height,
            data: data.into_boxed_slice(),
        })
    }

    /// Creates a copy of this image using the RGBA pixel format (that is,
    /// `foo.to_rgba().pixel_format()` will always return `PixelFormat::RGBA`).
    /// If the source image is already in RGBA format, this is equivalant to
    /// simply calling `clone()`.
    pub fn to_rgba(&self) -> Image {
        let rgba_data = match self.format {
            PixelFormat::RGBA => self.data.clone(),
            PixelFormat::RGB => rgb_to_rgba(&self.data),
            PixelFormat::GrayAlpha => gray_alpha_to_rgba(&self.data),
            PixelFormat::Gray => gray_to_rgba(&self.data),
        };
        Image {
            format: PixelFormat::RGBA,
            width: self.width,
            height: self.height,
            data: rgba_data,
        }
    }

    /// Splits the image into its red, green, blue and alpha planes, each
    /// holding one byte per pixel in row-major order.  Images without an
    /// alpha channel get a fully opaque alpha plane.
    pub fn planes(&self) -> [Vec<u8>; 4] {
        let rgba = self.to_rgba();
        let num_pixels = rgba.data.len() / 4;
        let mut planes = [Vec::with_capacity(num_pixels),
                          Vec::with_capacity(num_pixels),
                          Vec::with_capacity(num_pixels),
                          Vec::with_capacity(num_pixels)];
        for pixel in rgba.data.chunks(4) {
            for (plane, &sample) in planes.iter_mut().zip(pixel) {
                plane.push(sample);
            }
        }
        planes
    }

    /// Returns the format in which this image's pixel data is stored.
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the image's pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the image's pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// A format for storing pixel data in an image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
    /// 32-bit color with alpha channel.
    RGBA,
    /// 24-bit color with no alpha.
    RGB,
    /// 16-bit grayscale-with-alpha.
    GrayAlpha,
    /// 8-bit grayscale with no alpha.
    Gray,
}

impl PixelFormat {
    /// Returns the number of bytes needed to store a single pixel in this
    /// format.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::RGBA => 4,
            PixelFormat::RGB => 3,
            PixelFormat::GrayAlpha => 2,
            PixelFormat::Gray => 1,
        }
    }
}

/// Converts RGB image data into RGBA.
fn rgb_to_rgba(rgb: &[u8]) -> Box<[u8]> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for pixel in rgb.chunks(3) {
        rgba.extend_from_slice(pixel);
        rgba.push(u8::MAX);
    }
    rgba.into_boxed_slice()
}

/// Converts grayscale-with-alpha image data into RGBA.
fn gray_alpha_to_rgba(gray_alpha: &[u8]) -> Box<[u8]> {
    let mut rgba = Vec::with_capacity(gray_alpha.len() * 2);
    for pixel in gray_alpha.chunks(2) {
        rgba.extend_from_slice(&[pixel[0], pixel[0], pixel[0], pixel[1]]);
    }
    rgba.into_boxed_slice()
}

/// Converts grayscale image data into RGBA.
fn gray_to_rgba(gray: &[u8]) -> Box<[u8]> {
    let mut rgba = Vec::with_capacity(gray.len() * 4);
    for &value in gray {
        rgba.extend_from_slice(&[value, value, value, u8::MAX]);
    }
    rgba.into_boxed_slice()
}
