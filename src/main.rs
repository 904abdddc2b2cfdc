//! Seamweave CLI entry point.

use clap::Parser;
use seamweave::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
