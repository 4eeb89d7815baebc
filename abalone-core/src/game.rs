//! Game state, turn sequencing and the action handler

use rand::Rng;

use crate::board::{Board, Cell, PlayerId, Position, Snapshot, NUM_POSITIONS};
use crate::error::EngineError;
use crate::geometry::Coord;
use crate::moves::{GroupedMoves, Modification, MoveOutcome, MovePair, MoveType, MoveValidator};
use crate::variant::Variant;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ejected marbles a player can lose before the game ends
pub const LIVES: u8 = 6;

// ============================================================================
// GAME STATE
// ============================================================================

/// One Abalone board and its counters.
///
/// The only mutating entry points are `init_game`/`reset` and
/// `action_handler`; everything else is a read-only query.
#[derive(Clone, Debug)]
pub struct AbaloneGame {
    board: Board,
    variant: Variant,

    /// Current
    current_player: PlayerId,
    turns_count: u32,
    players_damages: Vec<u8>,
    game_over: bool,
    winner: Option<PlayerId>,

    /// Across episodes
    episode: u32,
    players_victories: Vec<u32>,
}

impl AbaloneGame {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    fn blank(variant: Variant) -> Result<Self, EngineError> {
        variant.validate()?;
        let players = variant.players as usize;
        Ok(Self {
            board: Board::new(),
            variant,
            current_player: 0,
            turns_count: 1,
            players_damages: vec![0; players],
            game_over: false,
            winner: None,
            episode: 0,
            players_victories: vec![0; players],
        })
    }

    /// New game on `variant`, player 0 to move
    pub fn new(variant: Variant) -> Result<Self, EngineError> {
        let mut game = Self::blank(variant)?;
        game.setup(0);
        Ok(game)
    }

    /// New game whose first player is chosen as in `init_game`
    pub fn start<R: Rng + ?Sized>(
        player: PlayerId,
        random_player: bool,
        variant: Variant,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let mut game = Self::blank(variant.clone())?;
        game.init_game(player, random_player, variant, rng)?;
        Ok(game)
    }

    /// (Re)initialize board and counters for a new episode.
    ///
    /// `random_player` overrides `player` with a uniform draw over the
    /// variant's players. Victory counters survive across episodes unless
    /// the player count changes.
    pub fn init_game<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        random_player: bool,
        variant: Variant,
        rng: &mut R,
    ) -> Result<(), EngineError> {
        variant.validate()?;
        let players = variant.players;

        let first = if random_player {
            rng.gen_range(0..players)
        } else if player < players {
            player
        } else {
            return Err(EngineError::InvalidPlayer { player, players });
        };

        if self.players_victories.len() != players as usize {
            self.players_victories = vec![0; players as usize];
        }
        self.variant = variant;
        self.setup(first);
        Ok(())
    }

    /// Alias of `init_game`
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        random_player: bool,
        variant: Variant,
        rng: &mut R,
    ) -> Result<(), EngineError> {
        self.init_game(player, random_player, variant, rng)
    }

    fn setup(&mut self, first_player: PlayerId) {
        self.board.clear();
        for (player, set) in self.variant.players_sets.iter().enumerate() {
            for &pos in set {
                if let Some(coord) = self.board.coords_from_pos(pos) {
                    self.board.set(coord, Cell::Marble(player as PlayerId));
                }
            }
        }

        self.players_damages = vec![0; self.variant.players as usize];
        self.turns_count = 1;
        self.current_player = first_player;
        self.game_over = false;
        self.winner = None;
        self.episode += 1;
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Copy of the grid as integer tokens
    pub fn board_snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn players(&self) -> u8 {
        self.variant.players
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn turns_count(&self) -> u32 {
        self.turns_count
    }

    pub fn players_damages(&self) -> &[u8] {
        &self.players_damages
    }

    pub fn players_victories(&self) -> &[u32] {
        &self.players_victories
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Player who inflicted the final ejection
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn marble_count(&self, player: PlayerId) -> usize {
        self.board.marble_count(player)
    }

    /// Occupant of a position
    pub fn token_at(&self, pos: Position) -> Result<Cell, EngineError> {
        self.board
            .cell_at(pos)
            .ok_or(EngineError::InvalidPosition(pos))
    }

    // ========================================================================
    // MOVE QUERIES
    // ========================================================================

    /// Validate a move for `player` without applying it
    pub fn validate_move(
        &self,
        pos0: Position,
        pos1: Position,
        player: PlayerId,
        with_modifications: bool,
    ) -> Result<Option<MoveOutcome>, EngineError> {
        self.check_pair(pos0, pos1)?;
        self.check_player(player)?;
        Ok(self
            .validator()
            .validate_move(pos0, pos1, player, with_modifications))
    }

    /// Every legal (source, destination) pair for `player`
    pub fn get_possible_moves(&self, player: PlayerId) -> Result<Vec<MovePair>, EngineError> {
        self.check_player(player)?;
        Ok(self.validator().possible_moves(player))
    }

    /// Legal moves for `player` grouped by move type
    pub fn get_possible_moves_grouped(
        &self,
        player: PlayerId,
    ) -> Result<GroupedMoves, EngineError> {
        self.check_player(player)?;
        Ok(self.validator().possible_moves_grouped(player))
    }

    fn validator(&self) -> MoveValidator<'_> {
        MoveValidator::new(&self.board, &self.players_damages)
    }

    /// Ids in range and distinct; says nothing about legality
    pub fn check_pair(&self, pos0: Position, pos1: Position) -> Result<(), EngineError> {
        for pos in [pos0, pos1] {
            if pos as usize >= NUM_POSITIONS {
                return Err(EngineError::InvalidPosition(pos));
            }
        }
        if pos0 == pos1 {
            return Err(EngineError::SamePosition(pos0));
        }
        Ok(())
    }

    fn check_player(&self, player: PlayerId) -> Result<(), EngineError> {
        if player < self.players() {
            Ok(())
        } else {
            Err(EngineError::InvalidPlayer {
                player,
                players: self.players(),
            })
        }
    }

    // ========================================================================
    // ACTION HANDLER
    // ========================================================================

    /// Validate, apply and advance the turn for the current player.
    ///
    /// Returns `Ok(None)` for an illegal move or once the game is over; the
    /// board and counters are left untouched in both cases. A move that ends
    /// the game is reported as `MoveType::Winner`.
    pub fn action_handler(
        &mut self,
        pos0: Position,
        pos1: Position,
    ) -> Result<Option<MoveOutcome>, EngineError> {
        self.check_pair(pos0, pos1)?;

        if self.game_over {
            tracing::warn!("Game over: ignoring move {} -> {}", pos0, pos1);
            return Ok(None);
        }

        let player = self.current_player;
        let Some(mut outcome) = self.validator().validate_move(pos0, pos1, player, true) else {
            tracing::trace!("Rejected move {} -> {} for player {}", pos0, pos1, player);
            return Ok(None);
        };

        self.apply_modifications(&outcome.modifications);
        if self.game_over {
            outcome.move_type = MoveType::Winner;
        }

        Ok(Some(outcome))
    }

    // ========================================================================
    // STATE MODIFIERS
    // ========================================================================

    /// Apply entries in order, then advance the turn once
    fn apply_modifications(&mut self, modifications: &[Modification]) {
        if modifications.is_empty() {
            return;
        }

        for modification in modifications {
            match *modification {
                Modification::Eject { position, .. } => {
                    if let Some(coord) = self.board.coords_from_pos(position) {
                        self.eject(coord);
                    }
                }
                Modification::Swap { from, to, .. } => {
                    if let (Some(a), Some(b)) =
                        (self.board.coords_from_pos(from), self.board.coords_from_pos(to))
                    {
                        self.board.swap(a, b);
                    }
                }
            }
        }

        self.next_turn();
    }

    fn eject(&mut self, coord: Coord) {
        let Some(owner) = self.board.cell(coord).owner() else {
            return;
        };

        if let Some(damage) = self.players_damages.get_mut(owner as usize) {
            *damage = (*damage + 1).min(LIVES);
        }
        self.board.set(coord, Cell::Empty);

        tracing::debug!(
            "Player {} ejected a marble of player {} at {}",
            self.current_player,
            owner,
            coord
        );

        let was_over = self.game_over;
        self.game_over = self.players_damages.contains(&LIVES);
        if self.game_over && !was_over {
            if let Some(victories) = self.players_victories.get_mut(self.current_player as usize) {
                *victories += 1;
            }
            self.winner = Some(self.current_player);
            tracing::debug!(
                "Game over after {} turns: player {} wins",
                self.turns_count,
                self.current_player
            );
        }
    }

    fn next_turn(&mut self) {
        self.current_player = (self.current_player + 1) % self.players();
        self.turns_count += 1;
    }
}

// ============================================================================
// TESTS
// ============================================================================
