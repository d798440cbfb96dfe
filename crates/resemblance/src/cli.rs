use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config;
use crate::config::CompareConfig;

fn parse_scale(s: &str) -> Result<f32, String> {
    let v: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if !v.is_finite() || v <= 0.0 {
        return Err(format!("scale must be greater than 0, got {v}"));
    }
    Ok(v)
}

fn parse_parallel(s: &str) -> Result<usize, String> {
    let v: usize = s.parse().map_err(|e| format!("{e}"))?;
    config::validate_parallel(v)
}

#[derive(Parser)]
#[command(
    name = "resemblance",
    about = "Perceptual image comparison against approved reference images"
)]
pub struct Cli {
    /// Project directory holding config.toml and the image folders
    #[arg(long, global = true, default_value = config::CONFIG_DIR)]
    pub dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create config.toml with default settings
    Init {
        /// Overwrite existing config and gitignore
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Compare two image files (exit 0 = same, 1 = different)
    Compare {
        /// Left / reference image
        left: PathBuf,
        /// Right / current image
        right: PathBuf,
        /// Device scale of the left image (2 for @2x captures)
        #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
        left_scale: f32,
        /// Device scale of the right image
        #[arg(long, default_value_t = 1.0, value_parser = parse_scale)]
        right_scale: f32,
        /// Directory for debug.png and mask.png when the images differ
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        #[command(flatten)]
        compare: CompareConfig,
    },

    /// Compare every current image with its reference (exit 0/1)
    Check {
        /// Only check ids matching this glob pattern
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Number of comparisons to run at once
        #[arg(long, short = 'p', value_parser = parse_parallel)]
        parallel: Option<usize>,
        /// Print a JSON summary instead of the terminal report
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        compare: CompareConfig,
    },

    /// Promote current/ images to reference/
    Approve {
        /// Only approve ids matching this glob pattern
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use resemblance::Region;

    #[test]
    fn compare_flags_parse() {
        let cli = Cli::try_parse_from([
            "resemblance",
            "compare",
            "a.png",
            "b.png",
            "--left-scale",
            "2",
            "--ignore-colors",
            "--region",
            "top-right",
        ])
        .unwrap();
        match cli.command {
            Command::Compare {
                left_scale,
                right_scale,
                compare,
                ..
            } => {
                assert_eq!(left_scale, 2.0);
                assert_eq!(right_scale, 1.0);
                assert_eq!(compare.ignore_colors, Some(true));
                assert_eq!(compare.region, Some(Region::TopRight));
                assert_eq!(compare.normalize_scale, None);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Cli::try_parse_from(["resemblance", "compare", "a", "b", "--left-scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["resemblance", "check", "--parallel", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["resemblance", "check", "--large-image-sample-step", "0"]).is_err()
        );
    }

    #[test]
    fn dir_is_global() {
        let cli = Cli::try_parse_from(["resemblance", "approve", "--dir", "fixtures"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("fixtures"));
    }
}
