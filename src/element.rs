use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat};
use crate::ostype::OSType;
use crate::rle;

/// The length of an icon element header, in bytes:
pub const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// One entry in an ICNS file.  Depending on the element type, the payload is
/// either a complete PNG file, RLE-compressed color planes, or an
/// RLE-compressed alpha mask.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconElement {
    /// The OSType identifying this element (e.g. `ic07` or `s8mk`).
    pub ostype: OSType,
    /// The encoded payload, not including the header.
    pub data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Creates an element whose payload is stored verbatim, as for the
    /// PNG-backed element types.
    pub fn plain(ostype: OSType, data: &[u8]) -> IconElement {
        IconElement::new(ostype, data.to_vec())
    }

    /// Encodes the image as a legacy color element and its mask element.
    ///
    /// The color payload is the red, green and blue planes, each
    /// RLE-compressed separately and stored in that order.  The mask payload
    /// is the RLE-compressed alpha plane.
    pub fn compressed_pair(color: OSType,
                           mask: OSType,
                           image: &Image)
                           -> (IconElement, IconElement) {
        let [red, green, blue, alpha] = image.planes();
        let mut color_data = rle::encode(&red);
        color_data.extend(rle::encode(&green));
        color_data.extend(rle::encode(&blue));
        (IconElement::new(color, color_data),
         IconElement::new(mask, rle::encode(&alpha)))
    }

    /// Decodes a legacy color element and its mask element back into an RGBA
    /// image with the given dimensions.
    pub fn decode_compressed_pair(color: &IconElement,
                                  mask: &IconElement,
                                  width: u32,
                                  height: u32)
                                  -> Result<Image> {
        let num_pixels = (width as usize) * (height as usize);
        let mut planes = vec![0u8; 3 * num_pixels];
        let mut remaining: &[u8] = &color.data;
        for plane in planes.chunks_mut(num_pixels.max(1)) {
            let consumed = rle::decode_into(remaining, plane)?;
            remaining = &remaining[consumed..];
        }
        if !remaining.is_empty() {
            let msg = format!("{} trailing bytes in '{}' element",
                              remaining.len(),
                              color.ostype);
            return Err(Error::Format(msg));
        }
        let alpha = rle::decode(&mask.data, num_pixels)?;
        let mut image = Image::new(PixelFormat::RGBA, width, height);
        for (pixel, rgba) in image.data_mut().chunks_mut(4).enumerate() {
            rgba[0] = planes[pixel];
            rgba[1] = planes[num_pixels + pixel];
            rgba[2] = planes[2 * num_pixels + pixel];
            rgba[3] = alpha[pixel];
        }
        Ok(image)
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        ICON_ELEMENT_HEADER_LENGTH + (self.data.len() as u32)
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> Result<IconElement> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype).map_err(truncated)?;
        let element_length =
            reader.read_u32::<BigEndian>().map_err(truncated)?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(Error::format("invalid element length"));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = vec![0u8; data_length as usize];
        reader.read_exact(&mut data).map_err(truncated)?;
        Ok(IconElement::new(OSType(raw_ostype), data))
    }

    /// Writes the icon element to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let OSType(ref raw_ostype) = self.ostype;
        writer.write_all(raw_ostype)?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}

/// Maps an unexpected end of input to a format error; other I/O errors pass
/// through.
pub(crate) fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::format("unexpected end of icns data")
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn gradient(width: u32, height: u32) -> Image {
        let mut image = Image::new(PixelFormat::RGBA, width, height);
        for (index, pixel) in image.data_mut().chunks_mut(4).enumerate() {
            pixel[0] = (index % 7) as u8;
            pixel[1] = 200;
            pixel[2] = (index / 5) as u8;
            pixel[3] = if index < 10 { 0 } else { 255 };
        }
        image
    }

    #[test]
    fn plain_element_header() {
        let element = IconElement::plain(OSType(*b"ic07"), b"\x89PNG");
        assert_eq!(element.total_length(), 12);
        let mut output = Vec::new();
        element.write(&mut output).expect("write failed");
        assert_eq!(b"ic07\0\0\0\x0c\x89PNG", &output as &[u8]);
    }

    #[test]
    fn compressed_pair_payloads() {
        let image = gradient(16, 16);
        let (color, mask) = IconElement::compressed_pair(OSType(*b"is32"),
                                                         OSType(*b"s8mk"),
                                                         &image);
        assert_eq!(color.ostype, OSType(*b"is32"));
        assert_eq!(mask.ostype, OSType(*b"s8mk"));
        let [red, green, blue, alpha] = image.planes();
        let mut expected = rle::encode(&red);
        expected.extend(rle::encode(&green));
        expected.extend(rle::encode(&blue));
        assert_eq!(color.data, expected);
        assert_eq!(mask.data, rle::encode(&alpha));
        // 10 transparent pixels, then 130 + 116 opaque ones.
        assert_eq!(mask.data, vec![135, 0, 255, 255, 241, 255]);
    }

    #[test]
    fn compressed_pair_decodes_to_original() {
        let image = gradient(32, 32);
        let (color, mask) = IconElement::compressed_pair(OSType(*b"il32"),
                                                         OSType(*b"l8mk"),
                                                         &image);
        let decoded =
            IconElement::decode_compressed_pair(&color, &mask, 32, 32)
                .expect("failed to decode");
        assert_eq!(decoded.data(), image.data());
    }

    #[test]
    fn decode_compressed_pair_with_wrong_size() {
        let image = gradient(16, 16);
        let (color, mask) = IconElement::compressed_pair(OSType(*b"is32"),
                                                         OSType(*b"s8mk"),
                                                         &image);
        let result = IconElement::decode_compressed_pair(&color, &mask, 32, 32);
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn read_element() {
        let input = Cursor::new(b"quux\0\0\0\x0efoobar".to_vec());
        let element = IconElement::read(input).expect("read failed");
        assert_eq!(element.ostype, OSType(*b"quux"));
        assert_eq!(element.data, b"foobar".to_vec());
    }

    #[test]
    fn read_truncated_element() {
        let input = Cursor::new(b"quux\0\0\0\x0efoo".to_vec());
        assert!(matches!(IconElement::read(input), Err(Error::Format(_))));
    }

    #[test]
    fn read_element_with_short_length() {
        let input = Cursor::new(b"quux\0\0\0\x04".to_vec());
        assert!(matches!(IconElement::read(input), Err(Error::Format(_))));
    }
}
