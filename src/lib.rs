//! Library for assembling Apple Icon Image (.icns) files from sets of PNG
//! images.
//!
//! Each image is stored in the element types whose pixel size it matches.
//! Modern element types (`ic07` through `ic14`) hold the PNG file verbatim;
//! the legacy `is32` and `il32` types hold RLE-compressed color planes, with
//! the alpha channel stored in a separate `s8mk`/`l8mk` mask element.
//!
//! See https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file format.
//!
//! ```no_run
//! use icnsgen::{generate_icns, ImageSource, Options};
//!
//! let images = ImageSource::scan_dir("icons")?;
//! let path = generate_icns(&images, "build", &Options::default())?;
//! println!("wrote {}", path.display());
//! # Ok::<(), icnsgen::Error>(())
//! ```

#![warn(missing_docs)]

mod assemble;
mod decoder;
mod element;
mod error;
mod family;
mod image;
mod options;
mod ostype;
#[cfg(feature = "pngio")]
mod pngio;
pub mod rle;
mod slot;
mod source;
mod split;

pub use self::assemble::{assemble, build_family};
#[cfg(feature = "pngio")]
pub use self::assemble::generate_icns;
pub use self::decoder::ImageDecoder;
pub use self::element::{IconElement, ICON_ELEMENT_HEADER_LENGTH};
pub use self::error::{Error, Result};
pub use self::family::{IconFamily, ICNS_MAGIC_LITERAL,
                       ICON_FAMILY_HEADER_LENGTH};
pub use self::image::{Image, PixelFormat};
pub use self::options::{Options, DEFAULT_FILE_NAME, FILE_EXTENSION,
                        REQUIRED_IMAGE_SIZES};
pub use self::ostype::OSType;
#[cfg(feature = "pngio")]
pub use self::pngio::PngDecoder;
pub use self::slot::{SlotKind, SlotSpec, ICON_SLOTS};
pub use self::source::{filter_by_sizes, ImageSource, SourceData};
pub use self::split::{split, unpack_blocks, BlockSplitter, SplitBlock};
