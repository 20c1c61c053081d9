use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::decoder::ImageDecoder;
use crate::element::{IconElement, ICON_ELEMENT_HEADER_LENGTH};
use crate::error::{Error, Result};
use crate::family::IconFamily;
use crate::slot::{SlotKind, SlotSpec};
use crate::source::ImageSource;

/// Builds the elements for every slot that has a matching source image, in
/// slot order.  Slots without a source of the required size are skipped.
/// Any read or decode failure aborts the whole build.
pub fn build_family<D: ImageDecoder>(images: &[ImageSource],
                                     slots: &[SlotSpec],
                                     decoder: &D)
                                     -> Result<IconFamily> {
    let mut family = IconFamily::new();
    for slot in slots {
        let source = match images.iter()
            .find(|image| image.pixel_size == slot.pixel_size) {
            Some(source) => source,
            None => {
                log::debug!("no {}px image for '{}', skipping",
                            slot.pixel_size,
                            slot.ostype);
                continue;
            }
        };
        let data = source.read()?;
        match slot.kind {
            SlotKind::Plain => {
                push_element(&mut family,
                             IconElement::plain(slot.ostype, &data))?;
            }
            SlotKind::CompressedPair { mask } => {
                let image = decoder.decode(&data)?;
                if image.width() != slot.pixel_size ||
                   image.height() != slot.pixel_size {
                    let msg = format!("image for '{}' is {}x{} instead of \
                                       {}x{}",
                                      slot.ostype,
                                      image.width(),
                                      image.height(),
                                      slot.pixel_size,
                                      slot.pixel_size);
                    return Err(Error::Format(msg));
                }
                let (color, mask) =
                    IconElement::compressed_pair(slot.ostype, mask, &image);
                push_element(&mut family, color)?;
                push_element(&mut family, mask)?;
            }
        }
        log::debug!("added '{}' from {}px image ({} bytes so far)",
                    slot.ostype,
                    slot.pixel_size,
                    family.total_length());
    }
    Ok(family)
}

/// Appends `element`, failing if the file would no longer fit the 32-bit
/// length field.
fn push_element(family: &mut IconFamily, element: IconElement) -> Result<()> {
    if !fits_length_field(family.total_length(), element.data.len()) {
        let msg = format!("'{}' element pushes the file past 4 GiB",
                          element.ostype);
        return Err(Error::Format(msg));
    }
    family.elements.push(element);
    Ok(())
}

fn fits_length_field(current_total: u32, payload_length: usize) -> bool {
    u32::try_from(payload_length)
        .ok()
        .and_then(|length| length.checked_add(ICON_ELEMENT_HEADER_LENGTH))
        .and_then(|length| length.checked_add(current_total))
        .is_some()
}

/// Assembles an ICNS file at `dest` from the given images and slot table,
/// returning the path written.
///
/// The whole file is built in memory and written once.  If building fails,
/// `dest` is left untouched; if writing fails, `dest` is removed.
pub fn assemble<P, D>(images: &[ImageSource],
                      dest: P,
                      slots: &[SlotSpec],
                      decoder: &D)
                      -> Result<PathBuf>
    where P: AsRef<Path>,
          D: ImageDecoder
{
    let dest = dest.as_ref();
    let family = build_family(images, slots, decoder)?;
    let bytes = family.to_bytes();
    if let Err(err) = write_file(dest, &bytes) {
        log::warn!("removing partially written {}", dest.display());
        let _ = fs::remove_file(dest);
        return Err(Error::Io(err));
    }
    Ok(dest.to_path_buf())
}

fn write_file(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(dest)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Writes `<dir>/<name>.icns` from the PNG images matching the sizes in
/// `options`, using the default slot table.
#[cfg(feature = "pngio")]
pub fn generate_icns<P: AsRef<Path>>(images: &[ImageSource],
                                     dir: P,
                                     options: &crate::Options)
                                     -> Result<PathBuf> {
    log::info!("ICNS:");
    let dest = dir.as_ref().join(options.file_name());
    let targets = crate::source::filter_by_sizes(images, &options.sizes);
    let path = assemble(&targets,
                        &dest,
                        &crate::slot::ICON_SLOTS,
                        &crate::pngio::PngDecoder)?;
    log::info!("  Create: {}", path.display());
    Ok(path)
}
