use thiserror::Error;

use crate::compare::Region;

/// Conditions that abort a comparison. A visual difference is never one of these.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("invalid scale factor {0}: must be finite and greater than zero")]
    InvalidScale(f32),

    #[error("crop {x},{y} {width}x{height} falls outside a {image_width}x{image_height} image")]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("region {region:?} of a {width}x{height} image contains no pixels")]
    EmptyRegion {
        region: Region,
        width: u32,
        height: u32,
    },
}
