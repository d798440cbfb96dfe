use tracing::debug;

use super::analyse::{Analysis, CompareOptions, analyse};
use super::bitmap::Bitmap;
use super::tolerance::{TOLERANCE, Tolerance};

/// Outcome of comparing two bitmaps.
#[derive(Debug, Clone)]
pub enum Comparison {
    /// Effective dimensions differ; no pixels were inspected.
    DimensionMismatch {
        left: (u32, u32),
        right: (u32, u32),
    },
    Analysed(Analysis),
}

impl Comparison {
    pub fn is_equivalent(&self) -> bool {
        match self {
            Self::DimensionMismatch { .. } => false,
            Self::Analysed(analysis) => analysis.is_equivalent(),
        }
    }

    pub fn mismatch_percentage(&self) -> Option<f64> {
        match self {
            Self::DimensionMismatch { .. } => None,
            Self::Analysed(analysis) => Some(analysis.mismatch_percentage),
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::DimensionMismatch { .. } => None,
            Self::Analysed(analysis) => Some(analysis),
        }
    }
}

/// Stateless perceptual comparator. Cheap to copy and safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    options: CompareOptions,
    tolerance: Tolerance,
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self {
            options,
            tolerance: TOLERANCE,
        }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// True when the images are perceptually the same.
    pub fn compare(&self, left: &Bitmap, right: &Bitmap) -> bool {
        self.evaluate(left, right).is_equivalent()
    }

    /// Full outcome, including the mismatch percentage and diagnostic images.
    pub fn evaluate(&self, left: &Bitmap, right: &Bitmap) -> Comparison {
        let (lw, lh) = left.effective_dimensions();
        let (rw, rh) = right.effective_dimensions();
        if (lw, lh) != (rw, rh) {
            debug!(lw, lh, rw, rh, "dimension mismatch");
            return Comparison::DimensionMismatch {
                left: (lw, lh),
                right: (rw, rh),
            };
        }
        Comparison::Analysed(analyse(left, right, &self.options, &self.tolerance))
    }
}

/// Compare with default options.
pub fn compare(left: &Bitmap, right: &Bitmap) -> bool {
    Comparator::default().compare(left, right)
}
