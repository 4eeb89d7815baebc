//! Baseline agents
//!
//! Level 3 - Step-level implementation

use std::fmt;
use std::str::FromStr;

use abalone_core::{AbaloneGame, EngineError, MovePair, MoveType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Move groups in the order the prioritized agent tries them
pub const PRIORITY: [MoveType; 5] = [
    MoveType::Winner,
    MoveType::Ejected,
    MoveType::InlinePush,
    MoveType::InlineMove,
    MoveType::SidestepMove,
];

/// Move selection policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agent {
    /// Uniform over all legal pairs
    #[default]
    Random,
    /// Uniform within the first non-empty group of `PRIORITY`
    Prioritized,
}

impl Agent {
    /// Pick a move for the current player, `None` if it has no legal move
    pub fn choose<R: Rng + ?Sized>(
        self,
        game: &AbaloneGame,
        rng: &mut R,
    ) -> Result<Option<MovePair>, EngineError> {
        let player = game.current_player();
        match self {
            Agent::Random => {
                let moves = game.get_possible_moves(player)?;
                Ok(moves.choose(rng).copied())
            }
            Agent::Prioritized => {
                let grouped = game.get_possible_moves_grouped(player)?;
                let pick = PRIORITY
                    .iter()
                    .filter_map(|t| grouped.get(t))
                    .find(|moves| !moves.is_empty())
                    .and_then(|moves| moves.choose(rng).copied());
                Ok(pick)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Agent::Random => "random",
            Agent::Prioritized => "prioritized",
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Agent::Random),
            "prioritized" => Ok(Agent::Prioritized),
            other => Err(format!("Unknown agent: {} (expected random or prioritized)", other)),
        }
    }
}
