//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "downtimer", version, about = "Scheduled automatic world restarts")]
pub struct Cli {
    /// Path to the host configuration file.
    #[arg(long, env = "DOWNTIMER_CONFIG", default_value = "config/downtimer.toml")]
    pub config: PathBuf,

    /// Tick interval driving the module, in milliseconds.
    #[arg(long, env = "DOWNTIMER_TICK_MS", default_value_t = 200)]
    pub tick_ms: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate the configuration and print the plan it would arm.
    Check,
}
