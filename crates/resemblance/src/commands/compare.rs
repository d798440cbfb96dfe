use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use resemblance::{Bitmap, Comparator, Comparison, Pipeline};

use super::encode_png;
use crate::config::ResolvedRunConfig;
use crate::report::terminal;

pub struct Input<'a> {
    pub path: &'a Path,
    pub scale: f32,
}

/// `resemblance compare`: compare two image files.
/// Returns exit code: 0 = same, 1 = different.
pub fn compare(
    config: &ResolvedRunConfig,
    left: Input<'_>,
    right: Input<'_>,
    output: Option<&Path>,
) -> Result<i32> {
    let left_bmp = Bitmap::open(left.path, left.scale)
        .with_context(|| format!("Failed to load {}", left.path.display()))?;
    let right_bmp = Bitmap::open(right.path, right.scale)
        .with_context(|| format!("Failed to load {}", right.path.display()))?;

    let pipeline = Pipeline {
        comparator: Comparator::new(config.options),
        normalize_scale: config.normalize_scale,
        region: config.region,
    };
    let comparison = pipeline
        .run(left_bmp, right_bmp)
        .context("Failed to prepare images")?;
    debug!(
        equivalent = comparison.is_equivalent(),
        percentage = ?comparison.mismatch_percentage(),
        "compared"
    );

    terminal::print_comparison(&comparison);

    if let (Some(dir), Comparison::Analysed(analysis)) = (output, &comparison)
        && let Some(diagnostics) = &analysis.diagnostics
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for (name, image) in [("debug.png", &diagnostics.debug), ("mask.png", &diagnostics.mask)] {
            let path = dir.join(name);
            std::fs::write(&path, encode_png(image)?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("  saved {}", path.display());
        }
    }

    Ok(if comparison.is_equivalent() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use resemblance::{CompareOptions, Region};

    fn config() -> ResolvedRunConfig {
        ResolvedRunConfig {
            options: CompareOptions::default(),
            normalize_scale: false,
            region: Region::Full,
            parallel: 1,
        }
    }

    fn write(dir: &Path, name: &str, img: &RgbaImage) -> std::path::PathBuf {
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn writes_diagnostics_for_different_images() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write(tmp.path(), "a.png", &RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])));
        let b = write(tmp.path(), "b.png", &RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255])));
        let out = tmp.path().join("out");

        let code = compare(
            &config(),
            Input { path: &a, scale: 1.0 },
            Input { path: &b, scale: 1.0 },
            Some(&out),
        )
        .unwrap();
        assert_eq!(code, 1);

        let mask = image::open(out.join("mask.png")).unwrap().to_rgba8();
        assert!(mask.pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
        assert!(out.join("debug.png").exists());
    }

    #[test]
    fn same_images_write_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        let a = write(tmp.path(), "a.png", &img);
        let b = write(tmp.path(), "b.png", &img);
        let out = tmp.path().join("out");

        let code = compare(
            &config(),
            Input { path: &a, scale: 1.0 },
            Input { path: &b, scale: 1.0 },
            Some(&out),
        )
        .unwrap();
        assert_eq!(code, 0);
        assert!(!out.exists());
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.png");
        let result = compare(
            &config(),
            Input { path: &missing, scale: 1.0 },
            Input { path: &missing, scale: 1.0 },
            None,
        );
        assert!(result.is_err());
    }
}
