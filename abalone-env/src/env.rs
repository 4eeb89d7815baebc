//! Step-based environment around the engine
//!
//! Level 2 - Episode-level implementation
//!
//! An action is a (source, destination) pair of position ids. Stepping an
//! illegal pair is not an error: the state is left unchanged, the rejected
//! reward is paid and `info.move_type` is `None`.

use abalone_core::{
    AbaloneGame, EngineError, Modification, MovePair, MoveType, PlayerId, Position, Snapshot,
    VariantCatalog, NUM_POSITIONS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::EnvConfig;

/// Size of the flat action space
pub const ACTION_DIM: usize = NUM_POSITIONS * NUM_POSITIONS;

/// Display names by player index
pub const PLAYER_NAMES: [&str; 4] = ["white", "black", "red", "blue"];

pub fn player_name(player: PlayerId) -> &'static str {
    PLAYER_NAMES.get(player as usize).copied().unwrap_or("unknown")
}

/// Flat action id of a move pair
pub fn action_id((pos0, pos1): MovePair) -> usize {
    pos0 as usize * NUM_POSITIONS + pos1 as usize
}

/// Inverse of `action_id`
pub fn decode_action(id: usize) -> Option<MovePair> {
    if id >= ACTION_DIM {
        return None;
    }
    Some(((id / NUM_POSITIONS) as Position, (id % NUM_POSITIONS) as Position))
}

/// Side information for one step
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepInfo {
    /// Turn counter before the step
    pub turn: u32,
    /// `None` when the action was rejected
    pub move_type: Option<MoveType>,
    /// Player who acted
    pub player: PlayerId,
    pub player_name: &'static str,
}

/// Result of `AbaloneEnv::step`
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub observation: Snapshot,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

/// Abalone environment
pub struct AbaloneEnv {
    game: AbaloneGame,
    catalog: VariantCatalog,
    config: EnvConfig,
    rng: ChaCha8Rng,
    last_modifications: Vec<Modification>,
}

impl AbaloneEnv {
    /// Environment over the built-in variants
    pub fn new(config: EnvConfig) -> Result<Self, EngineError> {
        Self::with_catalog(config, VariantCatalog::builtin())
    }

    pub fn with_catalog(config: EnvConfig, catalog: VariantCatalog) -> Result<Self, EngineError> {
        let mut rng = create_rng(config.seed);
        let variant = catalog.pick(&config.variant, config.random_pick, &mut rng)?;
        let game = AbaloneGame::start(config.player, config.random_player, variant, &mut rng)?;

        Ok(Self {
            game,
            catalog,
            config,
            rng,
            last_modifications: Vec::new(),
        })
    }

    /// Start a new episode, re-picking the variant and first player
    pub fn reset(&mut self) -> Result<Snapshot, EngineError> {
        let variant = self
            .catalog
            .pick(&self.config.variant, self.config.random_pick, &mut self.rng)?;
        self.game.reset(
            self.config.player,
            self.config.random_player,
            variant,
            &mut self.rng,
        )?;
        self.last_modifications.clear();
        Ok(self.observation())
    }

    /// Play one action for the current player
    pub fn step(&mut self, (pos0, pos1): MovePair) -> Result<StepOutcome, EngineError> {
        self.game.check_pair(pos0, pos1)?;
        let player = self.game.current_player();
        let mut info = StepInfo {
            turn: self.game.turns_count(),
            move_type: None,
            player,
            player_name: player_name(player),
        };

        let reward = if self.done() {
            tracing::warn!("step() called on a finished episode; call reset() first");
            0.0
        } else {
            let outcome = self.game.action_handler(pos0, pos1)?;
            info.move_type = outcome.as_ref().map(|o| o.move_type);
            if let Some(outcome) = outcome {
                self.last_modifications = outcome.modifications;
            }
            self.config.reward.reward(info.move_type)
        };

        Ok(StepOutcome {
            observation: self.observation(),
            reward,
            done: self.done(),
            info,
        })
    }

    pub fn observation(&self) -> Snapshot {
        self.game.board_snapshot()
    }

    /// Game over or turn limit exceeded
    pub fn done(&self) -> bool {
        self.game.game_over() || self.game.turns_count() > self.config.max_turns
    }

    /// The episode hit the turn limit without a winner
    pub fn truncated(&self) -> bool {
        !self.game.game_over() && self.game.turns_count() > self.config.max_turns
    }

    pub fn turns(&self) -> u32 {
        self.game.turns_count()
    }

    pub fn current_player(&self) -> PlayerId {
        self.game.current_player()
    }

    /// Legal pairs for the current player
    pub fn valid_actions(&self) -> Result<Vec<MovePair>, EngineError> {
        self.game.get_possible_moves(self.game.current_player())
    }

    /// `ACTION_DIM` flags, set for the legal pairs of the current player
    pub fn action_mask(&self) -> Result<Vec<bool>, EngineError> {
        let mut mask = vec![false; ACTION_DIM];
        for pair in self.valid_actions()? {
            mask[action_id(pair)] = true;
        }
        Ok(mask)
    }

    /// Edits applied by the last committed move of this episode
    pub fn last_modifications(&self) -> &[Modification] {
        &self.last_modifications
    }

    pub fn game(&self) -> &AbaloneGame {
        &self.game
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::{Cell, DEFAULT_VARIANT, TOKEN_EMPTY};

    fn classical_env() -> AbaloneEnv {
        let config = EnvConfig::default().with_seed(1).with_first_player(0);
        AbaloneEnv::new(config).unwrap()
    }

    #[test]
    fn test_action_id_roundtrip() {
        assert_eq!(action_id((0, 0)), 0);
        assert_eq!(action_id((1, 2)), 63);
        assert_eq!(decode_action(63), Some((1, 2)));
        assert_eq!(decode_action(ACTION_DIM - 1), Some((60, 60)));
        assert_eq!(decode_action(ACTION_DIM), None);
    }

    #[test]
    fn test_new_env_starts_classical() {
        let env = classical_env();
        assert_eq!(env.game().variant().name, DEFAULT_VARIANT);
        assert_eq!(env.current_player(), 0);
        assert_eq!(env.turns(), 1);
        assert!(!env.done());
        assert!(env.last_modifications().is_empty());
    }

    #[test]
    fn test_step_legal_move() {
        let mut env = classical_env();
        let step = env.step((13, 21)).unwrap();

        assert_eq!(step.info.move_type, Some(MoveType::InlineMove));
        assert_eq!(step.info.player, 0);
        assert_eq!(step.info.player_name, "white");
        assert_eq!(step.info.turn, 1);
        assert_eq!(step.reward, -0.1);
        assert!(!step.done);
        assert_eq!(env.current_player(), 1);
        assert!(!env.last_modifications().is_empty());

        let c = env.game().board().coords_from_pos(13).unwrap();
        assert_eq!(step.observation[c.row as usize][c.col as usize], TOKEN_EMPTY);
    }

    #[test]
    fn test_step_rejected_move_keeps_state() {
        let mut env = classical_env();
        let before = env.observation();
        let step = env.step((0, 1)).unwrap();

        assert_eq!(step.info.move_type, None);
        assert_eq!(step.reward, 0.0);
        assert_eq!(step.observation, before);
        assert_eq!(env.turns(), 1);
        assert_eq!(env.current_player(), 0);
    }

    #[test]
    fn test_step_malformed_action_errors() {
        let mut env = classical_env();
        assert!(env.step((61, 0)).is_err());
        assert!(env.step((5, 5)).is_err());
    }

    #[test]
    fn test_turn_limit_ends_episode() {
        let config = EnvConfig::default()
            .with_seed(2)
            .with_first_player(0)
            .with_max_turns(2);
        let mut env = AbaloneEnv::new(config).unwrap();

        assert!(!env.step((13, 21)).unwrap().done);
        let step = env.step((45, 37)).unwrap();
        assert!(step.done);
        assert!(env.truncated());

        let after = env.step((21, 29)).unwrap();
        assert_eq!(after.info.move_type, None);
        assert_eq!(after.reward, 0.0);
        assert_eq!(env.turns(), 3);
    }

    #[test]
    fn test_finished_episode_still_rejects_malformed_action() {
        let config = EnvConfig::default()
            .with_seed(3)
            .with_first_player(0)
            .with_max_turns(1);
        let mut env = AbaloneEnv::new(config).unwrap();
        env.step((13, 21)).unwrap();
        assert!(env.done());

        assert_eq!(env.step((61, 0)).unwrap_err(), EngineError::InvalidPosition(61));
        assert_eq!(env.step((5, 5)).unwrap_err(), EngineError::SamePosition(5));
        assert_eq!(env.step((0, 1)).unwrap().reward, 0.0);
    }

    #[test]
    fn test_action_mask_matches_valid_actions() {
        let env = classical_env();
        let mask = env.action_mask().unwrap();
        let actions = env.valid_actions().unwrap();

        assert_eq!(mask.len(), ACTION_DIM);
        assert_eq!(mask.iter().filter(|&&m| m).count(), actions.len());
        assert!(mask[action_id((13, 21))]);
        assert!(!mask[action_id((0, 1))]);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut env = classical_env();
        let start = env.observation();
        env.step((13, 21)).unwrap();
        let obs = env.reset().unwrap();

        assert_eq!(obs, start);
        assert_eq!(env.turns(), 1);
        assert_eq!(env.game().episode(), 2);
        assert!(env.last_modifications().is_empty());
        assert_eq!(env.game().token_at(13).unwrap(), Cell::Marble(0));
    }

    #[test]
    fn test_seeded_envs_agree() {
        let config = EnvConfig {
            random_pick: true,
            ..EnvConfig::default().with_seed(99)
        };
        let a = AbaloneEnv::new(config.clone()).unwrap();
        let b = AbaloneEnv::new(config).unwrap();
        assert_eq!(a.game().variant().name, b.game().variant().name);
        assert_eq!(a.current_player(), b.current_player());
    }
}
