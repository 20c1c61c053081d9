/// Image sizes, in pixels, used by the default slot table.
pub const REQUIRED_IMAGE_SIZES: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// File name (without extension) used when none is given.
pub const DEFAULT_FILE_NAME: &str = "app";

/// Extension of generated files.
pub const FILE_EXTENSION: &str = "icns";

/// Options for [`generate_icns`](crate::generate_icns).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// Output file name, without the `.icns` extension.
    pub name: String,
    /// Image sizes to take from the available sources.
    pub sizes: Vec<u32>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            name: DEFAULT_FILE_NAME.to_string(),
            sizes: REQUIRED_IMAGE_SIZES.to_vec(),
        }
    }
}

impl Options {
    /// Creates options, falling back to the defaults for an empty name or an
    /// empty list of sizes.
    pub fn new<S: Into<String>>(name: S, sizes: Vec<u32>) -> Options {
        let name = name.into();
        let defaults = Options::default();
        Options {
            name: if name.is_empty() { defaults.name } else { name },
            sizes: if sizes.is_empty() { defaults.sizes } else { sizes },
        }
    }

    /// Returns the output file name, including the extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, FILE_EXTENSION)
    }
}
