//! Configuration types for the environment
//!
//! Level 4 - Utilities and configuration

use std::path::Path;

use abalone_core::{MoveType, PlayerId, DEFAULT_VARIANT};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Reward per move type, from the mover's point of view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub winner: f32,
    pub ejected: f32,
    pub inline_push: f32,
    pub sidestep_move: f32,
    pub inline_move: f32,
    /// Reward for an illegal action (state is left unchanged)
    pub rejected: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            winner: 12.0,
            ejected: 2.0,
            inline_push: 0.5,
            sidestep_move: -0.1,
            inline_move: -0.1,
            rejected: 0.0,
        }
    }
}

impl RewardConfig {
    pub fn reward(&self, move_type: Option<MoveType>) -> f32 {
        match move_type {
            Some(MoveType::Winner) => self.winner,
            Some(MoveType::Ejected) => self.ejected,
            Some(MoveType::InlinePush) => self.inline_push,
            Some(MoveType::SidestepMove) => self.sidestep_move,
            Some(MoveType::InlineMove) => self.inline_move,
            None => self.rejected,
        }
    }
}

/// Environment configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Episode is truncated once the turn counter exceeds this
    pub max_turns: u32,
    /// Variant name looked up in the catalog
    pub variant: String,
    /// Starting player when `random_player` is off
    pub player: PlayerId,
    /// Draw the starting player uniformly
    pub random_player: bool,
    /// Draw the variant uniformly from the catalog
    pub random_pick: bool,
    pub reward: RewardConfig,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_turns: 200,
            variant: DEFAULT_VARIANT.to_string(),
            player: 0,
            random_player: true,
            random_pick: false,
            reward: RewardConfig::default(),
            seed: None,
        }
    }
}

impl EnvConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_variant(mut self, variant: &str) -> Self {
        self.variant = variant.to_string();
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Fixed starting player
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.player = player;
        self.random_player = false;
        self
    }

    /// Load from a JSON file; missing keys take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read env config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse env config: {}", path.display()))?;
        Ok(config)
    }
}
