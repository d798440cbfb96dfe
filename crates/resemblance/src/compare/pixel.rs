use image::Rgba;

/// One premultiplied-alpha pixel, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    /// Sentinel for mismatched pixels in diagnostic images.
    pub const RED: Pixel = Pixel::new(255, 255, 0, 0);
    /// Sentinel for matched pixels in the mask image.
    pub const BLACK: Pixel = Pixel::new(255, 0, 0, 0);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Premultiply a straight-alpha RGBA pixel.
    pub fn from_straight(rgba: Rgba<u8>) -> Self {
        let Rgba([r, g, b, a]) = rgba;
        Self {
            a,
            r: premultiply(r, a),
            g: premultiply(g, a),
            b: premultiply(b, a),
        }
    }

    /// Undo premultiplication. Fully transparent pixels come back as transparent black.
    pub fn to_straight(self) -> Rgba<u8> {
        Rgba([
            unpremultiply(self.r, self.a),
            unpremultiply(self.g, self.a),
            unpremultiply(self.b, self.a),
            self.a,
        ])
    }

    /// Luma on normalized channels: 0.30 R + 0.59 G + 0.11 B, in 0.0–1.0.
    pub fn brightness(&self) -> f64 {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        0.3 * r + 0.59 * g + 0.11 * b
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u32 * a as u32 + 127) / 255) as u8
}

fn unpremultiply(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8
}
