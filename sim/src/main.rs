//! Command-line entry point
//!
//! Runs a simulation script against the paging engine. Diagnostic logging
//! is controlled through `RUST_LOG`; simulation events go to stdout and
//! error messages to stderr regardless.

use anyhow::Context;
use clap::Parser;

mod config;
mod error;
mod memory;
mod script;

#[derive(Debug, Parser)]
#[clap(name = "vmsim")]
#[clap(about = "Demand-paged virtual memory simulator", long_about = None)]
struct Cli {
    /// Path to the simulation script
    #[clap(required = true, value_parser)]
    script: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    script::run_file(&cli.script).with_context(|| format!("running script {}", cli.script))
}
