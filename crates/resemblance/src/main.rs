mod check;
mod cli;
mod commands;
mod config;
mod report;
mod store;

use clap::Parser;
use config::{CliOverrides, ResolvedRunConfig};
use tracing_subscriber::EnvFilter;

use crate::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resemblance=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let dir = cli.dir;

    match cli.command {
        cli::Command::Init { force } => {
            commands::init(&dir, force)?;
        }
        cli::Command::Compare {
            left,
            right,
            left_scale,
            right_scale,
            output,
            compare,
        } => {
            let overrides = CliOverrides {
                compare,
                parallel: None,
            };
            let config = ResolvedRunConfig::new(&dir, overrides)?;
            let code = commands::compare(
                &config,
                commands::Input {
                    path: &left,
                    scale: left_scale,
                },
                commands::Input {
                    path: &right,
                    scale: right_scale,
                },
                output.as_deref(),
            )?;
            std::process::exit(code);
        }
        cli::Command::Check {
            filter,
            parallel,
            json,
            compare,
        } => {
            let overrides = CliOverrides { compare, parallel };
            let config = ResolvedRunConfig::new(&dir, overrides)?;
            let code = commands::check(Store::new(&dir), config, filter.as_deref(), json).await?;
            std::process::exit(code);
        }
        cli::Command::Approve { filter } => {
            commands::approve(&Store::new(&dir), filter.as_deref())?;
        }
    }

    Ok(())
}
