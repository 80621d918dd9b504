mod resolve;
mod score;

/// Subcommands for lchipper
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Resolve JSONL generation records to labels.
    Resolve(resolve::ResolveArgs),

    /// Score resolved labels against references.
    Score(score::ScoreArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Resolve(cmd) => cmd.run(),
            Commands::Score(cmd) => cmd.run(),
        }
    }
}
