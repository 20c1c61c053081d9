//! Command-line front end for the `icnsgen` library.
//!
//! ```shell
//! icnsgen build <png-dir> <out-dir> [<name>]
//! # reads <png-dir>/16.png, 32.png, ... and writes <out-dir>/<name>.icns
//! icnsgen list <path/to/file.icns>
//! icnsgen unpack <path/to/file.icns> <out-dir>
//! # writes <out-dir>/<ostype>.header and <out-dir>/<ostype>.body
//! icnsgen extract <path/to/file.icns> <ostype>
//! # decodes an is32 or il32 icon to path/to/file.<ostype>.png
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

use icnsgen::{generate_icns, split, unpack_blocks, IconFamily, ImageSource,
              OSType, Options};
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::process;
use std::str::FromStr;

const USAGE: &str = "Usage: icnsgen build <png-dir> <out-dir> [<name>]
       icnsgen list <icns>
       icnsgen unpack <icns> <out-dir>
       icnsgen extract <icns> <ostype>";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default()
                                      .default_filter_or("info"))
        .init();
    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = match args.as_slice() {
        ["build", png_dir, out_dir] => build(png_dir, out_dir, ""),
        ["build", png_dir, out_dir, name] => build(png_dir, out_dir, name),
        ["list", icns_path] => list(icns_path),
        ["unpack", icns_path, out_dir] => unpack(icns_path, out_dir),
        ["extract", icns_path, ostype] => extract(icns_path, ostype),
        _ => {
            println!("{}", USAGE);
            return;
        }
    };
    if let Err(err) = result {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn build(png_dir: &str, out_dir: &str, name: &str) -> icnsgen::Result<()> {
    let images = ImageSource::scan_dir(png_dir)?;
    log::debug!("found {} image(s) in {}", images.len(), png_dir);
    let options = Options::new(name, Vec::new());
    generate_icns(&images, out_dir, &options)?;
    Ok(())
}

fn list(icns_path: &str) -> icnsgen::Result<()> {
    let mut count = 0;
    for block in split(icns_path)? {
        let block = block?;
        println!("Element {}: {} ({} byte payload)",
                 count,
                 block.ostype,
                 block.data.len());
        count += 1;
    }
    println!("ICNS file contains {} element(s).", count);
    Ok(())
}

fn unpack(icns_path: &str, out_dir: &str) -> icnsgen::Result<()> {
    std::fs::create_dir_all(out_dir)?;
    let written = unpack_blocks(icns_path, out_dir)?;
    log::info!("wrote {} file(s) to {}", written.len(), out_dir);
    Ok(())
}

fn extract(icns_path: &str, ostype: &str) -> icnsgen::Result<()> {
    let ostype = OSType::from_str(ostype)?;
    let icns_path = Path::new(icns_path);
    let family = IconFamily::read(BufReader::new(File::open(icns_path)?))?;
    let image = family.decode_legacy_icon(ostype)?;
    let png_path = icns_path.with_extension(format!("{}.png", ostype));
    image.write_png(BufWriter::new(File::create(&png_path)?))?;
    log::info!("wrote {}", png_path.display());
    Ok(())
}
