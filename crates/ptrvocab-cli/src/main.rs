//! # ptrvocab
//!
//! Build, inspect, and run pointer tokenizers from the command line.

mod commands;
mod disk_cache;
mod input_output;
mod logging;
mod tokenizer_source;

use clap::Parser;
use commands::Commands;

use crate::logging::LogArgs;

/// ptrvocab
#[derive(clap::Parser, Debug)]
pub struct Args {
    #[command(flatten)]
    logging: LogArgs,

    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.logging.setup_logging(3)?;

    args.command.run()
}
