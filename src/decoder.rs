use crate::error::Result;
use crate::image::Image;

/// Turns encoded source image bytes into pixel samples.
///
/// The assembler only decodes images destined for the RLE-compressed legacy
/// elements; all other elements store the source bytes unmodified.
pub trait ImageDecoder {
    /// Decodes `data` into an image.  Failures should be reported as
    /// [`Error::Decode`](crate::Error::Decode).
    fn decode(&self, data: &[u8]) -> Result<Image>;
}
