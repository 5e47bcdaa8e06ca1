//! Bridge command line entry point.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use tracing::debug;

use crate::{cli::Cli, logging::LogConfig};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    LogConfig::from(cli.logging).init_tracing_subscriber()?;
    debug!(version = env!("CARGO_PKG_VERSION"), "Starting");

    commands::run(cli.command).await
}
