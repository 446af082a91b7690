//! Grayscale PNG output for rendered grids.

use std::path::Path;

use anyhow::{Context, Result};
use fractbench_core::Image;
use image::GrayImage;

/// Zero-pad a 1-based job index to the width of the job count, so a run's
/// output files sort in render order.
pub fn padded_name(index: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("{index:0width$}")
}

/// Write one rendered grid as an 8-bit grayscale PNG into `directory`.
pub fn write_png(image: &Image, name: &str, directory: &Path) -> Result<()> {
    let path = directory.join(format!("{name}.png"));
    let gray = GrayImage::from_raw(image.width(), image.height(), image.as_bytes().to_vec())
        .context("image buffer does not match its dimensions")?;
    gray.save(&path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}
