use serde::{Deserialize, Serialize};

use super::bitmap::Bitmap;
use crate::error::CompareError;

/// Part of an image to compare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    Full,
    /// Middle half: starts a quarter in on each axis, half the width and height.
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Region {
    /// `(x, y, width, height)` of this region on a `width x height` grid.
    pub fn rect(self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let (hw, hh) = (width / 2, height / 2);
        match self {
            Self::Full => (0, 0, width, height),
            Self::Center => (width / 4, height / 4, hw, hh),
            Self::TopLeft => (0, 0, hw, hh),
            Self::TopRight => (hw, 0, hw, hh),
            Self::BottomLeft => (0, hh, hw, hh),
            Self::BottomRight => (hw, hh, hw, hh),
        }
    }
}

impl Bitmap {
    /// Copy out a rectangle of the grid. The scale is kept.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Bitmap, CompareError> {
        let fits_x = x.checked_add(width).is_some_and(|r| r <= self.width());
        let fits_y = y.checked_add(height).is_some_and(|b| b <= self.height());
        if !fits_x || !fits_y {
            return Err(CompareError::CropOutOfBounds {
                x,
                y,
                width,
                height,
                image_width: self.width(),
                image_height: self.height(),
            });
        }

        let stride = self.width() as usize;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for row in y as usize..(y + height) as usize {
            let start = row * stride + x as usize;
            pixels.extend_from_slice(&self.pixels()[start..start + width as usize]);
        }
        Bitmap::from_pixels(width, height, self.scale(), pixels)
    }

    pub fn region(&self, region: Region) -> Result<Bitmap, CompareError> {
        if region == Region::Full {
            return Ok(self.clone());
        }
        let (x, y, w, h) = region.rect(self.width(), self.height());
        if w == 0 || h == 0 {
            return Err(CompareError::EmptyRegion {
                region,
                width: self.width(),
                height: self.height(),
            });
        }
        self.crop(x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::pixel::Pixel;

    /// 4x4 grid where each pixel's red channel is its index.
    fn indexed() -> Bitmap {
        let pixels = (0..16u8).map(|i| Pixel::new(255, i, 0, 0)).collect();
        Bitmap::from_pixels(4, 4, 2.0, pixels).unwrap()
    }

    fn reds(b: &Bitmap) -> Vec<u8> {
        b.pixels().iter().map(|p| p.r).collect()
    }

    #[test]
    fn quadrants() {
        let b = indexed();
        assert_eq!(reds(&b.region(Region::TopLeft).unwrap()), [0, 1, 4, 5]);
        assert_eq!(reds(&b.region(Region::TopRight).unwrap()), [2, 3, 6, 7]);
        assert_eq!(reds(&b.region(Region::BottomLeft).unwrap()), [8, 9, 12, 13]);
        assert_eq!(reds(&b.region(Region::BottomRight).unwrap()), [10, 11, 14, 15]);
    }

    #[test]
    fn center_is_middle_half() {
        let b = indexed();
        let c = b.region(Region::Center).unwrap();
        assert_eq!(c.effective_dimensions(), (2, 2));
        assert_eq!(reds(&c), [5, 6, 9, 10]);
        assert_eq!(c.scale(), 2.0);
    }

    #[test]
    fn full_is_unchanged() {
        let b = indexed();
        assert_eq!(b.region(Region::Full).unwrap(), b);
    }

    #[test]
    fn out_of_bounds_crop_is_an_error() {
        let b = indexed();
        assert!(matches!(
            b.crop(3, 0, 2, 1),
            Err(CompareError::CropOutOfBounds { .. })
        ));
        assert!(b.crop(u32::MAX, 0, 2, 1).is_err());
    }

    #[test]
    fn region_too_small_to_hold_a_pixel_is_an_error() {
        let one = Bitmap::from_pixels(1, 1, 1.0, vec![Pixel::new(255, 1, 2, 3)]).unwrap();
        for region in [Region::Center, Region::TopLeft, Region::BottomRight] {
            assert!(matches!(
                one.region(region),
                Err(CompareError::EmptyRegion { width: 1, height: 1, .. })
            ));
        }
        assert_eq!(one.region(Region::Full).unwrap(), one);

        let strip = Bitmap::from_pixels(4, 1, 1.0, vec![Pixel::BLACK; 4]).unwrap();
        assert!(strip.region(Region::TopLeft).is_err());
    }

    #[test]
    fn region_names_parse_from_toml() {
        #[derive(Deserialize)]
        struct Wrap {
            region: Region,
        }
        let w: Wrap = toml::from_str("region = \"bottom-right\"").unwrap();
        assert_eq!(w.region, Region::BottomRight);
    }
}
