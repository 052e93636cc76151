//! downtimer: a host that schedules its own restarts.

mod cli;
mod config;
mod host;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::HostConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Check) => check(&cli),
        None => {
            let code = host::run(&cli.config, Duration::from_millis(cli.tick_ms)).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}

/// Load the config, run one initialization against a throwaway sim host,
/// and print the plan that would be armed.
fn check(cli: &Cli) -> anyhow::Result<()> {
    let config = HostConfig::from_file(&cli.config)?;
    let mut sim = host::build_host(&config);
    let mut module = downtimer_autoshutdown::AutoShutdown::new();
    module.init(&config.autoshutdown, &mut sim);

    match module.plan() {
        Some(plan) => {
            println!("{}", serde_json::to_string_pretty(plan)?);
            Ok(())
        }
        None if config.autoshutdown.enabled => {
            anyhow::bail!("configuration rejected, module would stay disabled")
        }
        None => {
            println!("module disabled");
            Ok(())
        }
    }
}
