use super::bitmap::Bitmap;
use super::diff::{Comparator, Comparison};
use super::region::Region;
use crate::error::CompareError;

/// Decode, normalize, crop, compare.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    pub comparator: Comparator,
    /// Resample scaled captures to 1x before comparing.
    pub normalize_scale: bool,
    pub region: Region,
}

impl Pipeline {
    fn prepare(&self, bitmap: Bitmap) -> Result<Bitmap, CompareError> {
        let bitmap = if self.normalize_scale {
            bitmap.normalized()
        } else {
            bitmap
        };
        bitmap.region(self.region)
    }

    pub fn run(&self, left: Bitmap, right: Bitmap) -> Result<Comparison, CompareError> {
        let left = self.prepare(left)?;
        let right = self.prepare(right)?;
        Ok(self.comparator.evaluate(&left, &right))
    }

    /// Decode both images and compare them. Decode errors abort before any
    /// pixel is compared.
    pub fn run_encoded(
        &self,
        left: &[u8],
        left_scale: f32,
        right: &[u8],
        right_scale: f32,
    ) -> Result<Comparison, CompareError> {
        let left = Bitmap::decode(left, left_scale)?;
        let right = Bitmap::decode(right, right_scale)?;
        self.run(left, right)
    }
}
