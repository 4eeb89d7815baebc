//! Abalone Env - Step-based environment and baseline agents
//!
//! Architecture follows a 4-level structure:
//! - Level 1: Orchestration (CLI, batch runs)
//! - Level 2: Episodes (`env`, `runner`)
//! - Level 3: Steps (`agents`)
//! - Level 4: Utilities (`config`)

pub mod agents;
pub mod config;
pub mod env;
pub mod runner;

// Re-exports
pub use agents::{Agent, PRIORITY};
pub use config::{EnvConfig, RewardConfig};
pub use env::{
    action_id, decode_action, player_name, AbaloneEnv, StepInfo, StepOutcome, ACTION_DIM,
    PLAYER_NAMES,
};
pub use runner::{run_episodes, EpisodeOutcome, EpisodeRunner, RunSummary, DEFAULT_BASE_SEED};
