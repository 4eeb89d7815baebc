//! Moves command - show a starting board and its legal moves

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use abalone_core::{AbaloneGame, GroupedMoves, PlayerId, DEFAULT_VARIANT};

use crate::render::{render_position_ids, render_snapshot};
use crate::variants_cmd::load_catalog;

#[derive(Args)]
pub struct MovesArgs {
    /// Variant name
    #[arg(long, default_value = DEFAULT_VARIANT)]
    pub variant: String,

    /// Variants JSON file (name -> variant)
    #[arg(long, value_name = "FILE")]
    pub variants: Option<PathBuf>,

    /// Player whose moves are listed
    #[arg(long, default_value = "0")]
    pub player: PlayerId,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: MovesArgs) -> Result<()> {
    let catalog = load_catalog(args.variants.as_deref())?;
    let variant = catalog
        .get(&args.variant)
        .cloned()
        .with_context(|| format!("Unknown variant: {}", args.variant))?;

    let game = AbaloneGame::new(variant)?;
    let grouped = game.get_possible_moves_grouped(args.player)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grouped)?);
    } else {
        print_text(&game, args.player, &grouped);
    }
    Ok(())
}

fn print_text(game: &AbaloneGame, player: PlayerId, grouped: &GroupedMoves) {
    println!("Variant: {}", game.variant().name);
    println!();
    print!("{}", render_snapshot(&game.board_snapshot()));
    println!();
    print!("{}", render_position_ids(game.board()));
    println!();

    let total: usize = grouped.values().map(Vec::len).sum();
    println!("Player {}: {} legal moves", player, total);
    for (move_type, moves) in grouped {
        let pairs: Vec<String> = moves
            .iter()
            .map(|(a, b)| format!("{}->{}", a, b))
            .collect();
        println!("  {:<14} {:>3}  {}", move_type.as_str(), moves.len(), pairs.join(" "));
    }
}
