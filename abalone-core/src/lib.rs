//! Abalone Core - Game engine
//!
//! This crate provides the rules engine for Abalone:
//! - Board geometry (hexagon embedded in an 11x11 grid with a VOID guard ring)
//! - Stable position ids for the 61 playable cells
//! - Move validation (in-line move, side-step, sumito push) producing
//!   ordered modification sets
//! - Turn sequencing, ejection scoring and win detection
//! - Starting layouts (variants) and JSON catalogs

pub mod board;
pub mod error;
pub mod game;
pub mod geometry;
pub mod moves;
pub mod variant;

// Re-exports for convenient access
pub use board::{
    Board, Cell, PlayerId, Position, Snapshot, BOARD_SIZE, NUM_POSITIONS, TOKEN_EMPTY, TOKEN_VOID,
};
pub use error::EngineError;
pub use game::{AbaloneGame, LIVES};
pub use geometry::{decompose_directions, decompose_inline, Coord, Direction, DIRECTIONS};
pub use moves::{
    GroupedMoves, Modification, MoveOutcome, MovePair, MoveType, MoveValidator, MAX_MARBLES_MOVED,
};
pub use variant::{Variant, VariantCatalog, DEFAULT_VARIANT};
