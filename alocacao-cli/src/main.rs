//! Consolidates portal staffing exports into a single published JSON report.

mod cli;
mod config;
mod consolidate;
mod publish;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    cli::handler::run(cli::Cli::parse())
}
