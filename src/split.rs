use byteorder::{BigEndian, ByteOrder};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::element::{self, IconElement, ICON_ELEMENT_HEADER_LENGTH};
use crate::error::{Error, Result};
use crate::family;
use crate::ostype::OSType;

/// One element as found in an ICNS file: its raw header and its payload,
/// which is not decompressed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SplitBlock {
    /// The OSType from the element header.
    pub ostype: OSType,
    /// The eight header bytes exactly as stored.
    pub header: [u8; 8],
    /// The payload following the header.
    pub data: Vec<u8>,
}

impl SplitBlock {
    /// Returns the element length declared in the header.
    pub fn declared_length(&self) -> u32 {
        BigEndian::read_u32(&self.header[4..])
    }

    /// Converts the block into an icon element.
    pub fn into_element(self) -> IconElement {
        IconElement::new(self.ostype, self.data)
    }
}

/// Walks the elements of an ICNS file one at a time.
///
/// Element types are not checked, so unknown elements are returned like any
/// other.  After the first error the iterator yields nothing more.
pub struct BlockSplitter<R> {
    reader: R,
    started: bool,
    finished: bool,
}

impl<R: Read> BlockSplitter<R> {
    /// Creates a splitter reading an ICNS file from the start of `reader`.
    pub fn new(reader: R) -> BlockSplitter<R> {
        BlockSplitter {
            reader,
            started: false,
            finished: false,
        }
    }

    fn next_block(&mut self) -> Result<Option<SplitBlock>> {
        if !self.started {
            self.started = true;
            family::read_file_header(self.reader.by_ref())?;
        }
        let mut header = [0u8; 8];
        if !read_header(&mut self.reader, &mut header)? {
            return Ok(None);
        }
        let element_length = BigEndian::read_u32(&header[4..]);
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(Error::format("invalid element length"));
        }
        let mut data =
            vec![0u8; (element_length - ICON_ELEMENT_HEADER_LENGTH) as usize];
        self.reader.read_exact(&mut data).map_err(element::truncated)?;
        let mut raw_ostype = [0u8; 4];
        raw_ostype.copy_from_slice(&header[..4]);
        Ok(Some(SplitBlock {
            ostype: OSType(raw_ostype),
            header,
            data,
        }))
    }
}

impl<R: Read> Iterator for BlockSplitter<R> {
    type Item = Result<SplitBlock>;

    fn next(&mut self) -> Option<Result<SplitBlock>> {
        if self.finished {
            return None;
        }
        match self.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Fills `header`, returning false if the stream ended cleanly before it.
fn read_header<R: Read>(reader: &mut R, header: &mut [u8; 8]) -> Result<bool> {
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(count) => filled += count,
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(Error::Io(err)),
        }
    }
    match filled {
        0 => Ok(false),
        8 => Ok(true),
        _ => Err(Error::format("truncated element header")),
    }
}

/// Opens the ICNS file at `path` and returns a splitter over its elements.
/// Each call reads the file afresh.
pub fn split<P: AsRef<Path>>(path: P) -> Result<BlockSplitter<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(BlockSplitter::new(BufReader::new(file)))
}

/// Writes each element of the ICNS file at `src` into `dest_dir` as a
/// `<ostype>.header` and a `<ostype>.body` file, returning the paths written.
/// Elements sharing an OSType overwrite each other's files.
pub fn unpack_blocks<P, Q>(src: P, dest_dir: Q) -> Result<Vec<PathBuf>>
    where P: AsRef<Path>,
          Q: AsRef<Path>
{
    let dest_dir = dest_dir.as_ref();
    let mut written = Vec::new();
    for block in split(src)? {
        let block = block?;
        let stem = sidecar_stem(block.ostype)?;
        let header_path = dest_dir.join(format!("{}.header", stem));
        let body_path = dest_dir.join(format!("{}.body", stem));
        fs::write(&header_path, block.header)?;
        fs::write(&body_path, &block.data)?;
        log::debug!("unpacked '{}' ({} byte payload)",
                    block.ostype,
                    block.data.len());
        written.push(header_path);
        written.push(body_path);
    }
    Ok(written)
}

/// Returns the OSType as a file name stem, rejecting tags that could name a
/// path outside the output directory.
fn sidecar_stem(ostype: OSType) -> Result<String> {
    let OSType(raw) = ostype;
    let stem = ostype.to_string();
    let safe = raw.iter()
        .all(|&byte| (byte.is_ascii_graphic() || byte == b' ') &&
                     byte != b'/' && byte != b'\\');
    if !safe || stem.trim() == "." || stem.trim() == ".." {
        let msg = format!("element tag {:?} is not a safe file name", raw);
        return Err(Error::Format(msg));
    }
    Ok(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FAKE_ICNS: &[u8] =
        b"icns\0\0\0\x1fquux\0\0\0\x0efoobarbaz!\0\0\0\x09#";

    fn collect(input: &[u8]) -> Vec<Result<SplitBlock>> {
        BlockSplitter::new(Cursor::new(input)).collect()
    }

    #[test]
    fn split_fake_elements() {
        let blocks: Vec<SplitBlock> = collect(FAKE_ICNS)
            .into_iter()
            .map(|block| block.expect("split failed"))
            .collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].ostype, OSType(*b"quux"));
        assert_eq!(&blocks[0].header, b"quux\0\0\0\x0e");
        assert_eq!(blocks[0].declared_length(), 14);
        assert_eq!(blocks[0].data, b"foobar".to_vec());
        assert_eq!(blocks[1].ostype, OSType(*b"baz!"));
        assert_eq!(blocks[1].data, b"#".to_vec());
        assert_eq!(blocks[1].clone().into_element().total_length(), 9);
        let total: u32 =
            blocks.iter().map(|b| 8 + b.data.len() as u32).sum::<u32>() + 8;
        assert_eq!(total, 0x1f);
    }

    #[test]
    fn split_empty_family() {
        assert!(collect(b"icns\0\0\0\x08").is_empty());
    }

    #[test]
    fn split_wrong_magic() {
        let results = collect(b"RIFF\0\0\0\x08");
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::Format(_))));
    }

    #[test]
    fn split_payload_past_end() {
        let results = collect(b"icns\0\0\0\x14quux\0\0\0\x10foo");
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::Format(_))));
    }

    #[test]
    fn split_partial_header() {
        let results = collect(b"icns\0\0\0\x10quux\0\0\0\x08baz");
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::Format(_))));
    }

    #[test]
    fn split_short_element_length() {
        let results = collect(b"icns\0\0\0\x10quux\0\0\0\x02");
        assert!(matches!(results[0], Err(Error::Format(_))));
    }

    #[test]
    fn split_file_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.icns");
        fs::write(&path, FAKE_ICNS).unwrap();
        for _ in 0..2 {
            let ostypes: Vec<OSType> = split(&path)
                .unwrap()
                .map(|block| block.unwrap().ostype)
                .collect();
            assert_eq!(ostypes, vec![OSType(*b"quux"), OSType(*b"baz!")]);
        }
    }

    #[test]
    fn unpack_writes_sidecar_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.icns");
        fs::write(&path, FAKE_ICNS).unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let written = unpack_blocks(&path, &out).expect("unpack failed");
        assert_eq!(written.len(), 4);
        assert_eq!(fs::read(out.join("quux.header")).unwrap(),
                   b"quux\0\0\0\x0e".to_vec());
        assert_eq!(fs::read(out.join("quux.body")).unwrap(), b"foobar".to_vec());
        assert_eq!(fs::read(out.join("baz!.body")).unwrap(), b"#".to_vec());
    }

    #[test]
    fn unpack_rejects_path_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evil.icns");
        fs::write(&path, b"icns\0\0\0\x11../x\0\0\0\x09#").unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        let result = unpack_blocks(&path, &out);
        assert!(matches!(result, Err(Error::Format(_))));
        assert!(!dir.path().join("x.header").exists());
        assert!(!dir.path().join("x.body").exists());
    }

    #[test]
    fn sidecar_stems() {
        assert_eq!(sidecar_stem(OSType(*b"TOC ")).unwrap(), "TOC ");
        assert_eq!(sidecar_stem(OSType(*b"ic07")).unwrap(), "ic07");
        assert!(sidecar_stem(OSType(*b"a\\bc")).is_err());
        assert!(sidecar_stem(OSType(*b"ab\0c")).is_err());
        assert!(sidecar_stem(OSType(*b"..  ")).is_err());
        assert!(sidecar_stem(OSType(*b" .  ")).is_err());
    }
}
