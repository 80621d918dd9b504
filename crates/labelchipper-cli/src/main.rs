mod commands;
mod input_output;
mod label_config;
mod logging;

use clap::Parser;
use commands::Commands;

/// lchipper: resolve generative model output to closed-vocabulary labels.
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
