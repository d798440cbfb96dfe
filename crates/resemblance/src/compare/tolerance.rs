use super::pixel::Pixel;

/// Maximum normalized (0.0–1.0) difference allowed per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
}

/// The tolerance bands every comparison uses.
pub const TOLERANCE: Tolerance = Tolerance {
    red: 0.0625,
    green: 0.0625,
    blue: 0.0625,
    alpha: 0.0625,
    min_brightness: 0.0625,
    max_brightness: 0.9375,
};

impl Default for Tolerance {
    fn default() -> Self {
        TOLERANCE
    }
}

/// Strictly less than: a difference equal to the tolerance is not similar.
fn is_value_similar(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

fn is_channel_similar(a: u8, b: u8, tolerance: f64) -> bool {
    is_value_similar(a as f64 / 255.0, b as f64 / 255.0, tolerance)
}

impl Tolerance {
    /// All of red, green, blue and alpha within their bands.
    pub fn is_rgb_similar(&self, p1: &Pixel, p2: &Pixel) -> bool {
        is_channel_similar(p1.r, p2.r, self.red)
            && is_channel_similar(p1.g, p2.g, self.green)
            && is_channel_similar(p1.b, p2.b, self.blue)
            && is_channel_similar(p1.a, p2.a, self.alpha)
    }

    /// Colour-blind check: alpha within its band and luma within `min_brightness`.
    pub fn is_pixel_brightness_similar(&self, p1: &Pixel, p2: &Pixel) -> bool {
        is_channel_similar(p1.a, p2.a, self.alpha)
            && is_value_similar(p1.brightness(), p2.brightness(), self.min_brightness)
    }

    /// Exact red/green/blue equality. Alpha is ignored.
    pub fn is_rgb_exact(&self, p1: &Pixel, p2: &Pixel) -> bool {
        p1.r == p2.r && p1.g == p2.g && p1.b == p2.b
    }

    /// Brightness difference above `max_brightness`. Not used by the comparator.
    pub fn is_contrasting(&self, p1: &Pixel, p2: &Pixel) -> bool {
        (p1.brightness() - p2.brightness()).abs() > self.max_brightness
    }
}
