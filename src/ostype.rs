use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = Error;

    fn from_str(input: &str) -> Result<OSType, Error> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(Error::Format(format!("OSType string must be 4 bytes (was \
                                       {})",
                                      bytes.len())))
        } else {
            let mut raw = [0u8; 4];
            raw.clone_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}
