use std::path::Path;

use anyhow::{Context, Result};

use resemblance::{CompareOptions, Region};

use super::compare::CompareConfig;
use super::{Config, load, parse_bool, validate_parallel};

/// Values extracted from the CLI that participate in the merge.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub compare: CompareConfig,
    pub parallel: Option<usize>,
}

/// Values read from the environment.
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub ignore_colors: Option<bool>,
    pub parallel: Option<usize>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self> {
        let ignore_colors = std::env::var("RESEMBLANCE_IGNORE_COLORS")
            .ok()
            .map(|v| parse_bool("RESEMBLANCE_IGNORE_COLORS", &v))
            .transpose()?;
        let parallel: Option<usize> = std::env::var("RESEMBLANCE_PARALLEL")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("RESEMBLANCE_PARALLEL must be a positive integer")?;
        Ok(Self {
            ignore_colors,
            parallel,
        })
    }
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug)]
pub struct ResolvedRunConfig {
    pub options: CompareOptions,
    pub normalize_scale: bool,
    pub region: Region,
    pub parallel: usize,
}

impl ResolvedRunConfig {
    pub fn new(dir: &Path, cli: CliOverrides) -> Result<Self> {
        let file_config = load(dir)?;
        let env = EnvOverrides::from_env()?;
        Self::merge(file_config, env, cli)
    }

    pub fn merge(file: Config, env: EnvOverrides, cli: CliOverrides) -> Result<Self> {
        // File base, env on top, CLI last.
        let mut compare = file.compare;
        compare.merge(&CompareConfig {
            ignore_colors: env.ignore_colors,
            ..Default::default()
        });
        compare.merge(&cli.compare);

        let parallel = cli
            .parallel
            .or(env.parallel)
            .unwrap_or_else(|| file.check.parallel());
        validate_parallel(parallel).map_err(|e| anyhow::anyhow!("{e}"))?;

        Ok(Self {
            options: compare.options(),
            normalize_scale: compare.normalize_scale(),
            region: compare.region(),
            parallel,
        })
    }
}
