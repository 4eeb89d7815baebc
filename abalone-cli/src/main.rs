//! Abalone CLI - Command-line interface
//!
//! Commands:
//! - play: Self-play episodes with a baseline agent
//! - moves: List the legal moves of a starting layout
//! - variants: List, export or validate variant catalogs

mod moves_cmd;
mod play_cmd;
mod render;
mod variants_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "abalone")]
#[command(version, about = "Abalone rules engine and self-play runner")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play episodes with a baseline agent on both sides
    Play(play_cmd::PlayArgs),
    /// Show a starting board and its legal moves by type
    Moves(moves_cmd::MovesArgs),
    /// List the available variants
    Variants(variants_cmd::VariantsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Moves(args) => moves_cmd::run(args),
        Commands::Variants(args) => variants_cmd::run(args),
    }
}

/// RUST_LOG wins over the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
