use std::io;

/// Errors produced while assembling, splitting or decoding ICNS data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source image could not be decoded into pixel samples.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The data does not follow the ICNS or RLE layout, or an image does not
    /// fit the slot it was selected for.
    #[error("invalid icns data: {0}")]
    Format(String),

    /// An error from the underlying reader, writer or file system.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format<S: Into<String>>(msg: S) -> Error {
        Error::Format(msg.into())
    }
}
