use serde::{Deserialize, Serialize};

use resemblance::{CompareOptions, Region};

fn parse_sample_step(s: &str) -> Result<u32, String> {
    let v: u32 = s.parse().map_err(|e| format!("{e}"))?;
    super::validate_sample_step(v)
}

/// Comparison settings.
///
/// Every field is `Option`: `None` means "use default".
/// Serves both TOML deserialization (`[compare]`) and CLI argument parsing.
#[derive(Clone, Debug, Default, PartialEq, clap::Args, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Compare brightness only, ignoring hue
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_colors: Option<bool>,

    /// Sampling stride for images larger than the large-image threshold
    #[arg(long, value_parser = parse_sample_step)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image_sample_step: Option<u32>,

    /// Width or height above which the sample step applies
    #[arg(long)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_image_threshold: Option<u32>,

    /// Resample images captured at a device scale > 1 down to their logical size
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize_scale: Option<bool>,

    /// Only compare part of each image
    #[arg(long, value_enum)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

impl CompareConfig {
    /// Overlay non-None fields from `other` onto self.
    pub fn merge(&mut self, other: &CompareConfig) {
        if other.ignore_colors.is_some() {
            self.ignore_colors = other.ignore_colors;
        }
        if other.large_image_sample_step.is_some() {
            self.large_image_sample_step = other.large_image_sample_step;
        }
        if other.large_image_threshold.is_some() {
            self.large_image_threshold = other.large_image_threshold;
        }
        if other.normalize_scale.is_some() {
            self.normalize_scale = other.normalize_scale;
        }
        if other.region.is_some() {
            self.region = other.region;
        }
    }

    pub fn options(&self) -> CompareOptions {
        let defaults = CompareOptions::default();
        CompareOptions {
            ignore_colors: self.ignore_colors.unwrap_or(defaults.ignore_colors),
            large_image_sample_step: self
                .large_image_sample_step
                .unwrap_or(defaults.large_image_sample_step),
            large_image_threshold: self
                .large_image_threshold
                .unwrap_or(defaults.large_image_threshold),
        }
    }

    pub fn normalize_scale(&self) -> bool {
        self.normalize_scale.unwrap_or(false)
    }

    pub fn region(&self) -> Region {
        self.region.unwrap_or_default()
    }
}
