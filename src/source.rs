use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the encoded bytes of a source image live.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceData {
    /// An image file on disk, read when the image is used.
    Path(PathBuf),
    /// Image bytes already in memory.
    Bytes(Vec<u8>),
}

/// An encoded (PNG) image available for a given nominal pixel size.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageSource {
    /// Width and height of the image, in pixels.
    pub pixel_size: u32,
    /// The encoded image.
    pub data: SourceData,
}

impl ImageSource {
    /// Creates a source backed by a file on disk.
    pub fn from_path<P: Into<PathBuf>>(pixel_size: u32, path: P) -> ImageSource {
        ImageSource {
            pixel_size,
            data: SourceData::Path(path.into()),
        }
    }

    /// Creates a source backed by bytes in memory.
    pub fn from_bytes(pixel_size: u32, bytes: Vec<u8>) -> ImageSource {
        ImageSource {
            pixel_size,
            data: SourceData::Bytes(bytes),
        }
    }

    /// Returns the encoded image bytes, reading them from disk if needed.
    pub fn read(&self) -> io::Result<Cow<'_, [u8]>> {
        match self.data {
            SourceData::Path(ref path) => Ok(Cow::Owned(fs::read(path)?)),
            SourceData::Bytes(ref bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }

    /// Finds the images in `dir` named after their pixel size (`16.png`,
    /// `32.png`, ...), sorted by size.  Other files are ignored.
    pub fn scan_dir<P: AsRef<Path>>(dir: P) -> io::Result<Vec<ImageSource>> {
        let mut sources = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_png = path.extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
            let size = path.file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u32>().ok());
            if let (true, Some(size)) = (is_png, size) {
                sources.push(ImageSource::from_path(size, path));
            }
        }
        sources.sort_by_key(|source| source.pixel_size);
        Ok(sources)
    }
}

/// Returns the first source for each of the given sizes, in the order the
/// sizes are listed.  Sizes with no source are left out.
pub fn filter_by_sizes(images: &[ImageSource], sizes: &[u32]) -> Vec<ImageSource> {
    sizes.iter()
        .filter_map(|&size| {
            images.iter().find(|image| image.pixel_size == size).cloned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_requested_sizes() {
        let images = vec![ImageSource::from_bytes(16, vec![1]),
                          ImageSource::from_bytes(32, vec![2]),
                          ImageSource::from_bytes(32, vec![3]),
                          ImageSource::from_bytes(48, vec![4])];
        let filtered = filter_by_sizes(&images, &[32, 16, 64]);
        assert_eq!(filtered,
                   vec![ImageSource::from_bytes(32, vec![2]),
                        ImageSource::from_bytes(16, vec![1])]);
    }

    #[test]
    fn read_from_bytes_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("16.png");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(&*ImageSource::from_path(16, &path).read().unwrap(), b"abc");
        assert_eq!(&*ImageSource::from_bytes(16, b"xyz".to_vec())
                        .read()
                        .unwrap(),
                   b"xyz");
        let missing = ImageSource::from_path(16, dir.path().join("nope.png"));
        assert!(missing.read().is_err());
    }

    #[test]
    fn scan_dir_finds_sized_pngs() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["512.png", "16.PNG", "32.png", "icon.png", "64.jpg"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("128.png")).unwrap();
        let sources = ImageSource::scan_dir(dir.path()).unwrap();
        let sizes: Vec<u32> =
            sources.iter().map(|source| source.pixel_size).collect();
        assert_eq!(sizes, vec![16, 32, 512]);
        assert_eq!(sources[0].data,
                   SourceData::Path(dir.path().join("16.PNG")));
    }
}
