//! Play command - self-play episodes with a baseline agent
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_episodes(), report_results()
//! - Level 3: per-episode play (EpisodeRunner)
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use abalone_core::EngineError;
use abalone_env::{
    player_name, Agent, EnvConfig, EpisodeOutcome, EpisodeRunner, RunSummary, DEFAULT_BASE_SEED,
};

use crate::render::render_snapshot;
use crate::variants_cmd::load_catalog;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Number of episodes
    #[arg(long, default_value = "10")]
    pub episodes: usize,

    /// Agent used for every player (random or prioritized)
    #[arg(long, default_value = "random")]
    pub agent: Agent,

    /// Variant name (defaults to the config's, then classical)
    #[arg(long)]
    pub variant: Option<String>,

    /// Variants JSON file (name -> variant)
    #[arg(long, value_name = "FILE")]
    pub variants: Option<PathBuf>,

    /// Draw the variant at random each episode
    #[arg(long)]
    pub random_variant: bool,

    /// Turn limit per episode
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Play episodes in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Environment config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Print each episode's final board
    #[arg(long)]
    pub show: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the environment config
/// 2. Play the episodes
/// 3. Report results
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;
    let catalog = load_catalog(args.variants.as_deref())?;

    tracing::info!(
        "Playing {} episodes: agent={}, variant={}{}, max_turns={}",
        args.episodes,
        args.agent,
        config.variant,
        if config.random_pick { " (random)" } else { "" },
        config.max_turns
    );

    let runner = EpisodeRunner::new(config.clone(), args.agent)
        .with_catalog(catalog);
    let base_seed = config.seed.unwrap_or(DEFAULT_BASE_SEED);
    let outcomes = play_episodes(&runner, base_seed, &args)?;

    report_results(&outcomes, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file first, then command-line overrides
fn build_config(args: &PlayArgs, seed: Option<u64>) -> Result<EnvConfig> {
    let mut config = match &args.config {
        Some(path) => EnvConfig::load(path)?,
        None => EnvConfig::default(),
    };

    if let Some(variant) = &args.variant {
        config.variant = variant.clone();
    }
    if args.random_variant {
        config.random_pick = true;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    if let Some(seed) = seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

/// Play all episodes, seeded `base_seed + index`
fn play_episodes(
    runner: &EpisodeRunner,
    base_seed: u64,
    args: &PlayArgs,
) -> Result<Vec<EpisodeOutcome>> {
    let pb = create_progress_bar(args.episodes as u64, args.json);

    let play = |i: usize| -> Result<EpisodeOutcome, EngineError> {
        let outcome = runner.play_episode(base_seed.wrapping_add(i as u64));
        pb.inc(1);
        outcome
    };

    let outcomes: Result<Vec<_>, EngineError> = if args.parallel {
        (0..args.episodes).into_par_iter().map(play).collect()
    } else {
        (0..args.episodes).map(play).collect()
    };

    pb.finish_and_clear();
    outcomes.context("Episode failed")
}

fn report_results(outcomes: &[EpisodeOutcome], args: &PlayArgs) -> Result<()> {
    let summary = RunSummary::from_outcomes(outcomes);
    if args.json {
        print_json_results(outcomes, &summary)
    } else {
        print_text_results(outcomes, &summary, args.show);
        Ok(())
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

const PROGRESS_TEMPLATE: &str = "{bar:40.cyan/blue} {pos:>6}/{len:<6} {elapsed_precise}";

fn create_progress_bar(len: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}

fn print_json_results(outcomes: &[EpisodeOutcome], summary: &RunSummary) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        summary: &'a RunSummary,
        episodes: &'a [EpisodeOutcome],
    }

    let output = JsonOutput {
        summary,
        episodes: outcomes,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(outcomes: &[EpisodeOutcome], summary: &RunSummary, show: bool) {
    println!("\n=== Play Results ===");
    println!("Episodes:    {}", summary.episodes);
    for (player, wins) in summary.wins.iter().enumerate() {
        println!(
            "{:<12} {} ({:.1}%)",
            format!("{} wins:", player_name(player as u8)),
            wins,
            summary.win_rate(player as u8) * 100.0
        );
    }
    println!("Unfinished:  {}", summary.unfinished);
    println!("Avg turns:   {:.1}", summary.avg_turns);

    println!("\nMoves by type:");
    for (move_type, count) in &summary.move_counts {
        println!("  {:<14} {}", move_type.as_str(), count);
    }

    println!("\nEpisode details:");
    for (i, outcome) in outcomes.iter().enumerate() {
        let result = match outcome.winner {
            Some(player) => format!("{} wins", player_name(player)),
            None => "unfinished".to_string(),
        };
        println!(
            "  Episode {} [{} seed={}]: {} in {} turns, damages {:?}",
            i + 1,
            outcome.variant,
            outcome.seed,
            result,
            outcome.turns,
            outcome.damages
        );
        if show {
            print!("{}", render_snapshot(&outcome.final_board));
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> PlayArgs {
        PlayArgs {
            episodes: 2,
            agent: Agent::Random,
            variant: None,
            variants: None,
            random_variant: false,
            max_turns: Some(20),
            parallel: false,
            config: None,
            json: true,
            show: false,
        }
    }

    #[test]
    fn test_build_config_overrides() {
        let mut a = args();
        a.variant = Some("german_daisy".to_string());
        a.random_variant = true;

        let config = build_config(&a, Some(5)).unwrap();
        assert_eq!(config.variant, "german_daisy");
        assert!(config.random_pick);
        assert_eq!(config.max_turns, 20);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_build_config_defaults() {
        let mut a = args();
        a.max_turns = None;
        let config = build_config(&a, None).unwrap();
        assert_eq!(config, EnvConfig::default());
    }

    #[test]
    fn test_play_episodes_seeds() {
        let a = args();
        let config = build_config(&a, Some(100)).unwrap();
        let runner = EpisodeRunner::new(config, a.agent);
        let outcomes = play_episodes(&runner, 100, &a).unwrap();

        let seeds: Vec<u64> = outcomes.iter().map(|o| o.seed).collect();
        assert_eq!(seeds, vec![100, 101]);
        assert!(outcomes.iter().all(|o| o.turns <= 20));
    }
}
