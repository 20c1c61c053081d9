use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::element::{self, IconElement};
use crate::error::{Error, Result};
use crate::image::Image;
use crate::ostype::OSType;
use crate::slot::{SlotKind, SlotSpec};

/// The first four bytes of an ICNS file:
pub const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
pub const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// A set of icon elements stored in a single ICNS file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconFamily {
    /// The icon elements stored in the ICNS file, in file order.
    pub elements: Vec<IconElement>,
}

impl IconFamily {
    /// Creates a new, empty icon family.
    pub fn new() -> IconFamily {
        IconFamily { elements: Vec::new() }
    }

    /// Returns true if the icon family contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the first element with the given OSType, if any.
    pub fn find_element(&self, ostype: OSType) -> Option<&IconElement> {
        self.elements.iter().find(|el| el.ostype == ostype)
    }

    /// Decodes the legacy RLE-compressed icon stored under the given color
    /// OSType (`is32` or `il32`) together with its mask.
    pub fn decode_legacy_icon(&self, ostype: OSType) -> Result<Image> {
        let slot = SlotSpec::from_ostype(ostype).ok_or_else(|| {
            Error::Format(format!("unsupported OSType: {}", ostype))
        })?;
        let mask_ostype = match slot.kind {
            SlotKind::CompressedPair { mask } => mask,
            SlotKind::Plain => {
                let msg = format!("'{}' elements are not RLE-compressed",
                                  ostype);
                return Err(Error::Format(msg));
            }
        };
        let color = self.require_element(ostype)?;
        let mask = self.require_element(mask_ostype)?;
        IconElement::decode_compressed_pair(color,
                                            mask,
                                            slot.pixel_size,
                                            slot.pixel_size)
    }

    /// Like `find_element`, but a missing element is a format error.
    fn require_element(&self, ostype: OSType) -> Result<&IconElement> {
        self.find_element(ostype).ok_or_else(|| {
            let msg = format!("the icon family does not contain a '{}' \
                               element",
                              ostype);
            Error::Format(msg)
        })
    }

    /// Reads an icon family from an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> Result<IconFamily> {
        let file_length = read_file_header(reader.by_ref())?;
        let mut file_position: u32 = ICON_FAMILY_HEADER_LENGTH;
        let mut family = IconFamily::new();
        while file_position < file_length {
            let element = IconElement::read(reader.by_ref())?;
            file_position = file_position
                .checked_add(element.total_length())
                .ok_or_else(|| Error::format("elements overflow file length"))?;
            family.elements.push(element);
        }
        if file_position != file_length {
            let msg = format!("elements span {} bytes but the header \
                               declares {}",
                              file_position,
                              file_length);
            return Err(Error::Format(msg));
        }
        Ok(family)
    }

    /// Writes the icon family to an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(ICNS_MAGIC_LITERAL)?;
        writer.write_u32::<BigEndian>(self.total_length())?;
        for element in &self.elements {
            element.write(writer.by_ref())?;
        }
        Ok(())
    }

    /// Serializes the whole icon family into memory.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.total_length() as usize);
        self.write(&mut output).expect("writing to a Vec cannot fail");
        output
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.
    pub fn total_length(&self) -> u32 {
        let mut length = ICON_FAMILY_HEADER_LENGTH;
        for element in &self.elements {
            length += element.total_length();
        }
        length
    }
}

/// Reads and checks the magic literal, returning the declared file length.
pub(crate) fn read_file_header<R: Read>(mut reader: R) -> Result<u32> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(element::truncated)?;
    if magic != *ICNS_MAGIC_LITERAL {
        return Err(Error::format("not an icns file (wrong magic literal)"));
    }
    let file_length =
        reader.read_u32::<BigEndian>().map_err(element::truncated)?;
    Ok(file_length)
}
