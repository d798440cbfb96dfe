//! Perceptual image comparison.
//!
//! Bitmaps are decoded to premultiplied 8-bit pixels, compared pair by pair
//! against fixed tolerance bands, and reduced to a mismatch percentage.
//! Images whose percentage stays below [`ACCEPTANCE_THRESHOLD`] are equal.

pub mod analyse;
pub mod bitmap;
pub mod diff;
pub mod pipeline;
pub mod pixel;
pub mod region;
pub mod tolerance;

pub use self::analyse::{ACCEPTANCE_THRESHOLD, Analysis, CompareOptions, Diagnostics};
pub use self::bitmap::Bitmap;
pub use self::diff::{Comparator, Comparison, compare};
pub use self::pipeline::Pipeline;
pub use self::pixel::Pixel;
pub use self::region::Region;
pub use self::tolerance::{TOLERANCE, Tolerance};
