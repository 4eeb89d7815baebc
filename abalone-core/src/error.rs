//! Engine error types
//!
//! Illegal moves are not errors (the façade returns `Ok(None)`); these cover
//! caller contract violations and broken variant descriptors.

use crate::board::{PlayerId, Position};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("position {0} is outside the board (0..61)")]
    InvalidPosition(Position),

    #[error("source and destination are both position {0}")]
    SamePosition(Position),

    #[error("player {player} out of range for a {players}-player game")]
    InvalidPlayer { player: PlayerId, players: u8 },

    #[error("invalid variant '{name}': {reason}")]
    InvalidVariant { name: String, reason: String },

    #[error("unknown variant: {0}")]
    UnknownVariant(String),
}
