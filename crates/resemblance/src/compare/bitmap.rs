use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader, Rgba, RgbaImage};
use tracing::debug;

use super::pixel::Pixel;
use crate::error::CompareError;

/// A decoded image: a row-major grid of premultiplied pixels at its backing
/// resolution, plus the device scale it was produced at.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    scale: f32,
    pixels: Vec<Pixel>,
}

fn check_scale(scale: f32) -> Result<(), CompareError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(CompareError::InvalidScale(scale))
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize).saturating_mul(height as usize)
}

impl Bitmap {
    /// Decode encoded image bytes (PNG, JPEG, ...). EXIF orientation is applied
    /// so the grid is always upright.
    pub fn decode(bytes: &[u8], scale: f32) -> Result<Self, CompareError> {
        check_scale(scale)?;
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);
        debug!(
            width = image.width(),
            height = image.height(),
            scale,
            "decoded image"
        );
        Self::from_image(&image, scale)
    }

    pub fn open(path: &Path, scale: f32) -> Result<Self, CompareError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes, scale)
    }

    /// Convert any decoded image to 8-bit premultiplied RGBA.
    pub fn from_image(image: &DynamicImage, scale: f32) -> Result<Self, CompareError> {
        check_scale(scale)?;
        let rgba = image.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            scale,
            pixels: rgba.pixels().map(|p| Pixel::from_straight(*p)).collect(),
        })
    }

    /// Wrap a raw straight-alpha RGBA buffer of exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, scale: f32, bytes: &[u8]) -> Result<Self, CompareError> {
        check_scale(scale)?;
        let expected = pixel_count(width, height).saturating_mul(4);
        if bytes.len() != expected {
            return Err(CompareError::BufferSize {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Pixel::from_straight(Rgba([c[0], c[1], c[2], c[3]])))
            .collect();
        Ok(Self {
            width,
            height,
            scale,
            pixels,
        })
    }

    /// Build from pixels that are already premultiplied.
    pub fn from_pixels(
        width: u32,
        height: u32,
        scale: f32,
        pixels: Vec<Pixel>,
    ) -> Result<Self, CompareError> {
        check_scale(scale)?;
        let expected = pixel_count(width, height);
        if pixels.len() != expected {
            return Err(CompareError::BufferSize {
                width,
                height,
                expected: expected.saturating_mul(4),
                actual: pixels.len().saturating_mul(4),
            });
        }
        Ok(Self {
            width,
            height,
            scale,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Size in points: the backing grid divided by the scale.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.width as f32 / self.scale,
            self.height as f32 / self.scale,
        )
    }

    /// Logical size times scale, i.e. the full backing grid. Two bitmaps are
    /// comparable only when these match.
    pub fn effective_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Straight-alpha copy for encoding or display.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width, self.height);
        for (dst, src) in out.pixels_mut().zip(&self.pixels) {
            *dst = src.to_straight();
        }
        out
    }

    /// Resample to the logical size at scale 1.0, so a 2x capture compares
    /// equal to a 1x capture of the same content.
    pub fn normalized(&self) -> Bitmap {
        if self.scale == 1.0 {
            return self.clone();
        }
        let (lw, lh) = self.logical_size();
        let w = (lw.round() as u32).max(1);
        let h = (lh.round() as u32).max(1);
        debug!(
            from_w = self.width,
            from_h = self.height,
            to_w = w,
            to_h = h,
            scale = self.scale,
            "normalizing scale"
        );
        let resized = image::imageops::resize(&self.to_rgba_image(), w, h, FilterType::Triangle);
        Bitmap {
            width: w,
            height: h,
            scale: 1.0,
            pixels: resized.pixels().map(|p| Pixel::from_straight(*p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_png(w: u32, h: u32, color: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, color);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn crc32(data: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &byte in data {
            crc ^= byte as u32;
            for _ in 0..8 {
                crc = if crc & 1 != 0 {
                    (crc >> 1) ^ 0xEDB8_8320
                } else {
                    crc >> 1
                };
            }
        }
        !crc
    }

    /// 2x1 PNG (red, then blue) with an eXIf chunk carrying `orientation`.
    fn oriented_png(orientation: u16) -> Vec<u8> {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        // Little-endian TIFF header, one IFD entry: tag 0x0112, SHORT, count 1.
        let mut exif = b"II*\0".to_vec();
        exif.extend_from_slice(&8u32.to_le_bytes());
        exif.extend_from_slice(&1u16.to_le_bytes());
        exif.extend_from_slice(&0x0112u16.to_le_bytes());
        exif.extend_from_slice(&3u16.to_le_bytes());
        exif.extend_from_slice(&1u32.to_le_bytes());
        exif.extend_from_slice(&orientation.to_le_bytes());
        exif.extend_from_slice(&[0, 0]);
        exif.extend_from_slice(&0u32.to_le_bytes());

        let mut chunk = (exif.len() as u32).to_be_bytes().to_vec();
        let mut body = b"eXIf".to_vec();
        body.extend_from_slice(&exif);
        chunk.extend_from_slice(&body);
        chunk.extend_from_slice(&crc32(&body).to_be_bytes());

        // Signature (8) + IHDR (25); the chunk must precede IDAT.
        let ihdr_end = 8 + 25;
        png.splice(ihdr_end..ihdr_end, chunk);
        png
    }

    #[test]
    fn exif_orientation_is_applied() {
        let red = Pixel::new(255, 255, 0, 0);
        let blue = Pixel::new(255, 0, 0, 255);

        let upright = Bitmap::decode(&oriented_png(1), 1.0).unwrap();
        assert_eq!(upright.effective_dimensions(), (2, 1));
        assert_eq!(upright.pixels(), [red, blue]);

        // 6: rotate 90 degrees clockwise.
        let cw = Bitmap::decode(&oriented_png(6), 1.0).unwrap();
        assert_eq!(cw.effective_dimensions(), (1, 2));
        assert_eq!(cw.pixels(), [red, blue]);

        // 8: rotate 90 degrees counter-clockwise.
        let ccw = Bitmap::decode(&oriented_png(8), 1.0).unwrap();
        assert_eq!(ccw.effective_dimensions(), (1, 2));
        assert_eq!(ccw.pixels(), [blue, red]);
    }

    #[test]
    fn decodes_png_into_premultiplied_grid() {
        let png = solid_png(4, 3, Rgba([255, 0, 0, 128]));
        let bmp = Bitmap::decode(&png, 1.0).unwrap();
        assert_eq!(bmp.effective_dimensions(), (4, 3));
        assert_eq!(bmp.pixels().len(), 12);
        assert_eq!(bmp.pixel(3, 2), Some(Pixel::new(128, 128, 0, 0)));
        assert_eq!(bmp.pixel(4, 0), None);
    }

    #[test]
    fn grayscale_source_is_expanded() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, image::Luma([90])));
        let bmp = Bitmap::from_image(&img, 1.0).unwrap();
        assert!(bmp.pixels().iter().all(|p| *p == Pixel::new(255, 90, 90, 90)));
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let mut png = solid_png(4, 4, Rgba([1, 2, 3, 255]));
        png.truncate(png.len() / 2);
        assert!(Bitmap::decode(&png, 1.0).is_err());
        assert!(Bitmap::decode(b"not an image", 1.0).is_err());
    }

    #[test]
    fn raw_buffer_length_is_checked() {
        let err = Bitmap::from_rgba(2, 2, 1.0, &[0u8; 15]).unwrap_err();
        assert!(matches!(
            err,
            CompareError::BufferSize {
                expected: 16,
                actual: 15,
                ..
            }
        ));
        assert!(Bitmap::from_rgba(2, 2, 1.0, &[0u8; 16]).is_ok());
    }

    #[test]
    fn pixel_vector_length_is_checked() {
        assert!(Bitmap::from_pixels(3, 1, 1.0, vec![Pixel::BLACK; 2]).is_err());
    }

    #[test]
    fn invalid_scale_rejected() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = Bitmap::from_rgba(1, 1, scale, &[0, 0, 0, 255]).unwrap_err();
            assert!(matches!(err, CompareError::InvalidScale(_)));
        }
    }

    #[test]
    fn retina_bitmap_keeps_backing_grid() {
        let bmp = Bitmap::from_rgba(20, 10, 2.0, &[255u8; 20 * 10 * 4]).unwrap();
        assert_eq!(bmp.logical_size(), (10.0, 5.0));
        assert_eq!(bmp.effective_dimensions(), (20, 10));
    }

    #[test]
    fn normalized_downsamples_to_logical_size() {
        let bmp = Bitmap::from_rgba(20, 10, 2.0, &[200u8; 20 * 10 * 4]).unwrap();
        let norm = bmp.normalized();
        assert_eq!(norm.effective_dimensions(), (10, 5));
        assert_eq!(norm.scale(), 1.0);
        let (before, after) = (bmp.pixel(0, 0).unwrap(), norm.pixel(9, 4).unwrap());
        for (a, b) in [(before.a, after.a), (before.r, after.r), (before.b, after.b)] {
            assert!(a.abs_diff(b) <= 1, "{a} vs {b}");
        }
    }

    #[test]
    fn normalized_is_identity_at_scale_one() {
        let bmp = Bitmap::from_rgba(3, 3, 1.0, &[7u8; 36]).unwrap();
        assert_eq!(bmp.normalized(), bmp);
    }

    #[test]
    fn rgba_image_round_trips_opaque_content() {
        let png = solid_png(2, 2, Rgba([10, 20, 30, 255]));
        let bmp = Bitmap::decode(&png, 1.0).unwrap();
        assert_eq!(bmp.to_rgba_image(), RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255])));
    }
}
