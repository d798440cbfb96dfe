pub mod compare;
pub mod resolve;
pub mod template;

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub use self::compare::CompareConfig;
pub use self::resolve::{CliOverrides, ResolvedRunConfig};
pub use self::template::{config_file_exists, write_gitignore, write_template};

pub(crate) const CONFIG_DIR: &str = ".resemblance";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_PARALLEL: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Number of comparisons run at once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<usize>,
}

impl CheckConfig {
    pub fn parallel(&self) -> usize {
        self.parallel.unwrap_or(DEFAULT_PARALLEL)
    }
}

pub fn validate_sample_step(v: u32) -> Result<u32, String> {
    if v == 0 {
        return Err("large_image_sample_step must be at least 1".to_string());
    }
    Ok(v)
}

pub fn validate_parallel(v: usize) -> Result<usize, String> {
    if v == 0 {
        return Err("parallel must be at least 1".to_string());
    }
    Ok(v)
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

impl Config {
    /// Validate semantic constraints that serde cannot express.
    fn validate(&self) -> Result<()> {
        if let Some(step) = self.compare.large_image_sample_step {
            validate_sample_step(step).map_err(|e| anyhow::anyhow!("compare.{e}"))?;
        }
        if let Some(parallel) = self.check.parallel {
            validate_parallel(parallel).map_err(|e| anyhow::anyhow!("check.{e}"))?;
        }
        Ok(())
    }
}

pub fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `<dir>/config.toml`. A missing file yields the defaults.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse a boolean environment value (`1/0`, `true/false`, `yes/no`).
pub(crate) fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{name} must be a boolean, got '{other}'"),
    }
}
