use crate::ostype::OSType;

/// How the image selected for a slot is stored in the container.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SlotKind {
    /// The source file bytes (a PNG) are stored unmodified.
    Plain,
    /// The image is decoded and stored as an RLE-compressed RGB element
    /// followed by an RLE-compressed alpha element with the given OSType.
    CompressedPair {
        /// OSType of the mask element.
        mask: OSType,
    },
}

/// Associates an element type with the pixel size of the image it needs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SlotSpec {
    /// OSType of the (color) element.
    pub ostype: OSType,
    /// Storage strategy for this slot.
    pub kind: SlotKind,
    /// Width and height, in pixels, of the image this slot is built from.
    pub pixel_size: u32,
}

impl SlotSpec {
    /// A slot whose element holds the source file verbatim.
    pub const fn plain(ostype: &[u8; 4], pixel_size: u32) -> SlotSpec {
        SlotSpec {
            ostype: OSType(*ostype),
            kind: SlotKind::Plain,
            pixel_size,
        }
    }

    /// A slot stored as a compressed color element plus a mask element.
    pub const fn compressed_pair(ostype: &[u8; 4],
                                 mask: &[u8; 4],
                                 pixel_size: u32)
                                 -> SlotSpec {
        SlotSpec {
            ostype: OSType(*ostype),
            kind: SlotKind::CompressedPair { mask: OSType(*mask) },
            pixel_size,
        }
    }

    /// Returns the OSType of the mask element, if this slot has one.
    pub fn mask_ostype(&self) -> Option<OSType> {
        match self.kind {
            SlotKind::Plain => None,
            SlotKind::CompressedPair { mask } => Some(mask),
        }
    }

    /// Finds the slot whose color element has the given OSType.
    pub fn from_ostype(ostype: OSType) -> Option<SlotSpec> {
        ICON_SLOTS.iter().find(|slot| slot.ostype == ostype).copied()
    }
}

/// The element types written to an ICNS file, in emission order.  Readers
/// may rely on this order, so it must not change.
///
/// The pre-OS X 8-bit and 1-bit types are not written, and neither are
/// `icp4`/`icp5`/`icp6`, since Finder refuses such icons for folders.
pub const ICON_SLOTS: [SlotSpec; 10] = [
    SlotSpec::plain(b"ic07", 128),
    SlotSpec::plain(b"ic08", 256),
    SlotSpec::plain(b"ic09", 512),
    SlotSpec::plain(b"ic10", 1024),
    // 2x "retina" density:
    SlotSpec::plain(b"ic11", 32),
    SlotSpec::plain(b"ic12", 64),
    SlotSpec::plain(b"ic13", 256),
    SlotSpec::plain(b"ic14", 512),
    // Mac OS 8.5:
    SlotSpec::compressed_pair(b"is32", b"s8mk", 16),
    SlotSpec::compressed_pair(b"il32", b"l8mk", 32),
];
