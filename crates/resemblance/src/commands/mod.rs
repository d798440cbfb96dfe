mod approve;
mod check;
mod compare;
mod init;

pub use self::approve::approve;
pub use self::check::check;
pub use self::compare::{Input, compare};
pub use self::init::init;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Encode an image as PNG bytes.
pub(crate) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .context("Failed to encode diagnostic image")?;
    Ok(png)
}

/// Compile an optional `--filter` glob.
pub(crate) fn compile_filter(filter: Option<&str>) -> Result<Option<glob::Pattern>> {
    filter
        .map(|f| glob::Pattern::new(f).with_context(|| format!("Invalid filter pattern '{f}'")))
        .transpose()
}
