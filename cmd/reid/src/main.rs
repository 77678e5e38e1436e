//! reid - Assign stable identity labels to appearance embeddings.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{IdentifyCommand, InspectCommand, ScoreCommand};

/// reid - Assign stable identity labels to appearance embeddings.
///
/// Embeddings are read as JSON, one vector per line, either a bare array
/// (`[0.1, 0.2, ...]`) or an object (`{"embedding": [0.1, 0.2, ...]}`).
///
/// The embedding store lives in a snapshot file (`--snapshot`), so labels
/// stay stable across runs.
#[derive(Parser)]
#[command(name = "reid")]
#[command(about = "Stable identity labels for appearance embeddings")]
#[command(version)]
pub struct Cli {
    /// Matcher config file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Snapshot file holding the embedding store
    #[arg(short = 's', long, global = true)]
    pub snapshot: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign identities to a stream of embeddings
    Identify(IdentifyCommand),
    /// Score one embedding against the stored embeddings
    Score(ScoreCommand),
    /// Summarize a snapshot
    Inspect(InspectCommand),
}

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = default_filter(cli.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Identify(cmd) => cmd.run(&cli),
        Commands::Score(cmd) => cmd.run(&cli),
        Commands::Inspect(cmd) => cmd.run(&cli),
    }
}
