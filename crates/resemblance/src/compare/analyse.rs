use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bitmap::Bitmap;
use super::pixel::Pixel;
use super::tolerance::Tolerance;

/// Mismatch percentage at or above which two images are considered different.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.002;

/// Either dimension above this may be sampled with `large_image_sample_step`.
pub const LARGE_IMAGE_THRESHOLD: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Compare luma instead of individual colour channels.
    pub ignore_colors: bool,
    /// Sampling stride for large images. 1 visits every pixel.
    pub large_image_sample_step: u32,
    pub large_image_threshold: u32,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            ignore_colors: false,
            large_image_sample_step: 1,
            large_image_threshold: LARGE_IMAGE_THRESHOLD,
        }
    }
}

impl CompareOptions {
    /// Stride used for a `width x height` grid.
    pub fn step_for(&self, width: u32, height: u32) -> u32 {
        let step = self.large_image_sample_step.max(1);
        if width > self.large_image_threshold || height > self.large_image_threshold {
            step
        } else {
            1
        }
    }
}

/// Debug image (left input with mismatches in red) and mask (black field,
/// mismatches in red).
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub debug: RgbaImage,
    pub mask: RgbaImage,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub mismatch_count: u64,
    pub step: u32,
    pub width: u32,
    pub height: u32,
    /// 0.0–100.0.
    pub mismatch_percentage: f64,
    /// Present only when the percentage exceeds [`ACCEPTANCE_THRESHOLD`].
    pub diagnostics: Option<Diagnostics>,
}

impl Analysis {
    pub fn is_equivalent(&self) -> bool {
        self.mismatch_percentage < ACCEPTANCE_THRESHOLD
    }
}

/// Classify every sampled pixel pair of two equally sized bitmaps.
///
/// Callers must check dimensions first; see [`super::diff::Comparator`].
pub(crate) fn analyse(
    left: &Bitmap,
    right: &Bitmap,
    options: &CompareOptions,
    tolerance: &Tolerance,
) -> Analysis {
    debug_assert_eq!(left.effective_dimensions(), right.effective_dimensions());
    let (width, height) = left.effective_dimensions();
    let step = options.step_for(width, height);

    let scan = Scan {
        left,
        right,
        tolerance,
        similar: if options.ignore_colors {
            Tolerance::is_pixel_brightness_similar
        } else {
            Tolerance::is_rgb_similar
        },
        step: step as usize,
    };

    let mismatch_count = scan.mismatches().count() as u64;
    let total = width as f64 * height as f64;
    let mismatch_percentage = if total > 0.0 {
        ((mismatch_count * step as u64) as f64 * 100.0 / total).min(100.0)
    } else {
        0.0
    };

    debug!(
        mismatch_count,
        step,
        mismatch_percentage,
        ignore_colors = options.ignore_colors,
        "image difference"
    );

    let diagnostics = (mismatch_percentage > ACCEPTANCE_THRESHOLD).then(|| reconstruct(&scan));

    Analysis {
        mismatch_count,
        step,
        width,
        height,
        mismatch_percentage,
        diagnostics,
    }
}

/// One sampled walk over two equally sized bitmaps. Positions are recomputed
/// on every walk, so nothing proportional to the mismatch count is kept.
struct Scan<'a> {
    left: &'a Bitmap,
    right: &'a Bitmap,
    tolerance: &'a Tolerance,
    similar: fn(&Tolerance, &Pixel, &Pixel) -> bool,
    step: usize,
}

impl Scan<'_> {
    /// Grid positions of sampled pixel pairs that fail the predicate.
    fn mismatches(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let (width, height) = self.left.effective_dimensions();
        let (lp, rp) = (self.left.pixels(), self.right.pixels());
        let stride = width as usize;
        (0..height as usize).step_by(self.step).flat_map(move |y| {
            (0..width as usize).step_by(self.step).filter_map(move |x| {
                let offset = y * stride + x;
                let similar = (self.similar)(self.tolerance, &lp[offset], &rp[offset]);
                (!similar).then_some((x as u32, y as u32))
            })
        })
    }
}

/// Build the two diagnostic images from fresh buffers; inputs are not touched.
fn reconstruct(scan: &Scan<'_>) -> Diagnostics {
    let (width, height) = scan.left.effective_dimensions();
    let red = Pixel::RED.to_straight();
    let mut debug = scan.left.to_rgba_image();
    let mut mask = RgbaImage::from_pixel(width, height, Pixel::BLACK.to_straight());

    for (x, y) in scan.mismatches() {
        debug.put_pixel(x, y, red);
        mask.put_pixel(x, y, red);
    }

    Diagnostics { debug, mask }
}
