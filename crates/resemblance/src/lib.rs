pub mod compare;
pub mod error;

pub use crate::compare::{
    ACCEPTANCE_THRESHOLD, Analysis, Bitmap, Comparator, CompareOptions, Comparison, Diagnostics,
    Pipeline, Pixel, Region, TOLERANCE, Tolerance, compare,
};
pub use crate::error::CompareError;
