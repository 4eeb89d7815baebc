//! Episode runner - plays whole episodes with a baseline agent
//!
//! Level 2 - Phase-level implementation

use std::collections::BTreeMap;

use abalone_core::{EngineError, MoveType, PlayerId, Snapshot, VariantCatalog};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::agents::Agent;
use crate::config::EnvConfig;
use crate::env::AbaloneEnv;

/// Base seed when the config leaves it unset
pub const DEFAULT_BASE_SEED: u64 = 42;

/// Outcome of a single episode
#[derive(Clone, Debug, Serialize)]
pub struct EpisodeOutcome {
    pub seed: u64,
    pub variant: String,
    /// `None` when the episode was truncated or stalled
    pub winner: Option<PlayerId>,
    /// Committed moves
    pub turns: u32,
    pub damages: Vec<u8>,
    pub move_counts: BTreeMap<MoveType, u32>,
    /// Reward collected by each player
    pub total_rewards: Vec<f32>,
    #[serde(skip)]
    pub final_board: Snapshot,
}

/// Totals over a batch of episodes
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    pub episodes: usize,
    pub wins: Vec<u32>,
    pub unfinished: u32,
    pub avg_turns: f32,
    pub move_counts: BTreeMap<MoveType, u32>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[EpisodeOutcome]) -> Self {
        let mut summary = Self {
            episodes: outcomes.len(),
            ..Self::default()
        };

        let mut total_turns = 0u64;
        for outcome in outcomes {
            total_turns += outcome.turns as u64;
            match outcome.winner {
                Some(player) => {
                    let idx = player as usize;
                    if summary.wins.len() <= idx {
                        summary.wins.resize(idx + 1, 0);
                    }
                    summary.wins[idx] += 1;
                }
                None => summary.unfinished += 1,
            }
            for (&move_type, &count) in &outcome.move_counts {
                *summary.move_counts.entry(move_type).or_insert(0) += count;
            }
        }

        if !outcomes.is_empty() {
            summary.avg_turns = total_turns as f32 / outcomes.len() as f32;
        }
        summary
    }

    pub fn win_rate(&self, player: PlayerId) -> f32 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins.get(player as usize).copied().unwrap_or(0) as f32 / self.episodes as f32
        }
    }
}

/// Plays episodes of an environment with one agent for every player
#[derive(Clone, Debug)]
pub struct EpisodeRunner {
    config: EnvConfig,
    agent: Agent,
    catalog: VariantCatalog,
}

impl EpisodeRunner {
    pub fn new(config: EnvConfig, agent: Agent) -> Self {
        Self {
            config,
            agent,
            catalog: VariantCatalog::builtin(),
        }
    }

    pub fn with_catalog(mut self, catalog: VariantCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Play one episode to game over, turn limit, or a stall
    pub fn play_episode(&self, seed: u64) -> Result<EpisodeOutcome, EngineError> {
        let config = self.config.clone().with_seed(seed);
        let mut env = AbaloneEnv::with_catalog(config, self.catalog.clone())?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

        let players = env.game().players() as usize;
        let mut total_rewards = vec![0.0f32; players];
        let mut move_counts = BTreeMap::new();
        let mut turns = 0u32;

        while !env.done() {
            let Some(action) = self.agent.choose(env.game(), &mut rng)? else {
                tracing::debug!(seed, player = env.current_player(), "No legal move, stopping");
                break;
            };

            let step = env.step(action)?;
            if let Some(slot) = total_rewards.get_mut(step.info.player as usize) {
                *slot += step.reward;
            }
            if let Some(move_type) = step.info.move_type {
                *move_counts.entry(move_type).or_insert(0) += 1;
                turns += 1;
            }
        }

        let game = env.game();
        tracing::debug!(
            seed,
            turns,
            winner = ?game.winner(),
            "Episode finished"
        );

        Ok(EpisodeOutcome {
            seed,
            variant: game.variant().name.clone(),
            winner: game.winner(),
            turns,
            damages: game.players_damages().to_vec(),
            move_counts,
            total_rewards,
            final_board: env.observation(),
        })
    }

    /// Play `count` episodes seeded `base + i`
    pub fn run_episodes(
        &self,
        count: usize,
        parallel: bool,
    ) -> Result<Vec<EpisodeOutcome>, EngineError> {
        let base_seed = self.config.seed.unwrap_or(DEFAULT_BASE_SEED);
        let seed_for = |i: usize| base_seed.wrapping_add(i as u64);

        if parallel {
            (0..count)
                .into_par_iter()
                .map(|i| self.play_episode(seed_for(i)))
                .collect()
        } else {
            (0..count).map(|i| self.play_episode(seed_for(i))).collect()
        }
    }
}

/// Play `count` episodes of `config` with `agent`
pub fn run_episodes(
    config: EnvConfig,
    agent: Agent,
    count: usize,
    parallel: bool,
) -> Result<Vec<EpisodeOutcome>, EngineError> {
    EpisodeRunner::new(config, agent)
        .run_episodes(count, parallel)
}
