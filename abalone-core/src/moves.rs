//! Move validation and modification sets
//!
//! Three move families are recognised:
//! - in-line move: a column of 1-3 own marbles advances into an empty cell
//! - side-step move: a line of 1-3 own marbles shifts sideways into empty cells
//! - in-line push (sumito): a column outnumbering an opposing column shoves it
//!   one cell, possibly ejecting the front marble off the board
//!
//! A successful validation produces the ordered list of atomic board edits
//! (a modification set) that applies the move.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, PlayerId, Position, NUM_POSITIONS};
use crate::game::LIVES;
use crate::geometry::{decompose_directions, decompose_inline, Coord, Direction};

// ============================================================================
// CONSTANTS
// ============================================================================

/// No more than 3 own marbles can move in a single turn
pub const MAX_MARBLES_MOVED: usize = 3;

/// 3 vs 2 is the longest push, so a push never reaches further than 3 + 2 - 1
const MAX_PUSH_DISTANCE: u8 = 4;

/// Side-step candidates per axis when the axis delta is +1
const SIDESTEP_POSITIVE: [(Direction, Direction); 3] = [
    (Direction::DownRight, Direction::DownLeft),
    (Direction::Right, Direction::UpRight),
    (Direction::Right, Direction::DownRight),
];

/// Side-step candidates per axis when the axis delta is -1
const SIDESTEP_NEGATIVE: [(Direction, Direction); 3] = [
    (Direction::UpLeft, Direction::UpRight),
    (Direction::Left, Direction::DownLeft),
    (Direction::Left, Direction::UpLeft),
];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Classification of a committed (or candidate) move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    InlineMove,
    SidestepMove,
    InlinePush,
    Ejected,
    Winner,
}

impl MoveType {
    pub const ALL: [MoveType; 5] = [
        MoveType::InlineMove,
        MoveType::SidestepMove,
        MoveType::InlinePush,
        MoveType::Ejected,
        MoveType::Winner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MoveType::InlineMove => "inline_move",
            MoveType::SidestepMove => "sidestep_move",
            MoveType::InlinePush => "inline_push",
            MoveType::Ejected => "ejected",
            MoveType::Winner => "winner",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic board edit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modification {
    /// The marble at `from` travels to `to` (cell contents are exchanged)
    Swap {
        from: Position,
        to: Position,
        direction: Direction,
    },
    /// The marble at `position` leaves the board; `damage` is its owner's
    /// damage count before the ejection
    Eject {
        position: Position,
        owner: PlayerId,
        damage: u8,
    },
}

/// A validated move: its type and the edits that apply it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub move_type: MoveType,
    pub modifications: Vec<Modification>,
}

impl MoveOutcome {
    fn new(move_type: MoveType) -> Self {
        Self {
            move_type,
            modifications: Vec::new(),
        }
    }
}

/// (source position, destination position)
pub type MovePair = (Position, Position);

/// Legal moves keyed by type
pub type GroupedMoves = BTreeMap<MoveType, Vec<MovePair>>;

// ============================================================================
// VALIDATOR
// ============================================================================

/// Read-only move validator over a board
pub struct MoveValidator<'a> {
    board: &'a Board,
    damages: &'a [u8],
}

impl<'a> MoveValidator<'a> {
    pub fn new(board: &'a Board, damages: &'a [u8]) -> Self {
        Self { board, damages }
    }

    /// Validate `pos0 -> pos1` for `player`.
    ///
    /// The destination's occupancy picks the family: EMPTY tries the in-line
    /// move then the side-step, an opponent's marble tries the push. With
    /// `with_modifications == false` only the move type is computed.
    pub fn validate_move(
        &self,
        pos0: Position,
        pos1: Position,
        player: PlayerId,
        with_modifications: bool,
    ) -> Option<MoveOutcome> {
        let from = self.board.coords_from_pos(pos0)?;
        let to = self.board.coords_from_pos(pos1)?;

        if from == to || self.board.cell(from) != Cell::Marble(player) {
            return None;
        }

        match self.board.cell(to) {
            Cell::Empty => self
                .check_inline_move(from, to, player, with_modifications)
                .or_else(|| self.check_sidestep_move(from, to, player, with_modifications)),
            Cell::Marble(owner) if owner != player => {
                self.check_inline_push(from, to, player, with_modifications)
            }
            _ => None,
        }
    }

    /// A column of `step` own marbles, source being the rear one, advances
    /// one cell so that its front marble lands on `to`.
    pub fn check_inline_move(
        &self,
        from: Coord,
        to: Coord,
        player: PlayerId,
        with_modifications: bool,
    ) -> Option<MoveOutcome> {
        if self.board.cell(to) != Cell::Empty {
            return None;
        }

        let (dr, dc) = from.delta_to(to);
        let (step, direction) = decompose_inline(dr, dc)?;
        if step == 0 || step as usize > MAX_MARBLES_MOVED {
            return None;
        }

        // Front of the column first
        let column: Vec<Coord> = (0..step as i8)
            .rev()
            .map(|n| from.offset(direction, n))
            .collect();
        if !column
            .iter()
            .all(|&c| self.board.cell(c) == Cell::Marble(player))
        {
            return None;
        }

        let mut outcome = MoveOutcome::new(MoveType::InlineMove);
        if with_modifications {
            let mut target = to;
            for &coord in &column {
                outcome.modifications.push(self.swap_entry(coord, target, direction)?);
                target = coord;
            }
        }
        Some(outcome)
    }

    /// A line of own marbles starting at `from` shifts one cell sideways; the
    /// far end of the shifted line lands on `to`.
    pub fn check_sidestep_move(
        &self,
        from: Coord,
        to: Coord,
        player: PlayerId,
        with_modifications: bool,
    ) -> Option<MoveOutcome> {
        if self.board.cell(to) != Cell::Empty {
            return None;
        }

        let (dr, dc) = from.delta_to(to);
        let (a0, b0, c0) = decompose_directions(from);
        let (a1, b1, c1) = decompose_directions(to);
        let axis_deltas = [a1 - a0, b1 - b0, c1 - c0];

        for (axis, &delta) in axis_deltas.iter().enumerate() {
            if delta.abs() != 1 {
                continue;
            }

            let candidates = if delta > 0 {
                SIDESTEP_POSITIVE[axis]
            } else {
                SIDESTEP_NEGATIVE[axis]
            };
            let Some((side, inline_step, inline_direction)) =
                shorter_sidestep(dr, dc, candidates)
            else {
                continue;
            };

            if inline_step as usize >= MAX_MARBLES_MOVED {
                continue;
            }

            let line: Vec<Coord> = (0..=inline_step as i8)
                .map(|s| from.offset(inline_direction, s))
                .collect();
            let connected = line
                .iter()
                .all(|&c| self.board.cell(c) == Cell::Marble(player));
            let free = line
                .iter()
                .all(|&c| self.board.cell(c.neighbor(side)) == Cell::Empty);

            if connected && free {
                let mut outcome = MoveOutcome::new(MoveType::SidestepMove);
                if with_modifications {
                    for &coord in &line {
                        outcome
                            .modifications
                            .push(self.swap_entry(coord, coord.neighbor(side), side)?);
                    }
                }
                return Some(outcome);
            }
        }

        None
    }

    /// Sumito: own column (starting at `from`) pushes an opposing column that
    /// contains `to`. Legal only for 2v1, 3v1 and 3v2.
    pub fn check_inline_push(
        &self,
        from: Coord,
        to: Coord,
        player: PlayerId,
        with_modifications: bool,
    ) -> Option<MoveOutcome> {
        match self.board.cell(to) {
            Cell::Marble(owner) if owner != player => {}
            _ => return None,
        }

        let (dr, dc) = from.delta_to(to);
        let (step, direction) = decompose_inline(dr, dc)?;
        if step > MAX_PUSH_DISTANCE {
            return None;
        }

        // Walk the combined run, grouping consecutive same-owner marbles
        let mut groups: Vec<Vec<Coord>> = vec![vec![from]];
        let mut current_owner = player;
        let mut cursor = from.neighbor(direction);
        let mut reached = false;

        while let Cell::Marble(owner) = self.board.cell(cursor) {
            if owner == current_owner {
                if let Some(group) = groups.last_mut() {
                    group.push(cursor);
                }
            } else {
                groups.push(vec![cursor]);
                current_owner = owner;
            }
            if groups.len() > 2 {
                return None;
            }
            if cursor == to {
                reached = true;
            }
            cursor = cursor.neighbor(direction);
        }

        if groups.len() != 2 || !reached {
            return None;
        }

        let (own, opposing) = (&groups[0], &groups[1]);
        if own.len() <= opposing.len() || own.len() > MAX_MARBLES_MOVED {
            return None;
        }

        let ejected = self.board.cell(cursor) == Cell::Void;
        let move_type = if ejected {
            MoveType::Ejected
        } else {
            MoveType::InlinePush
        };

        let mut outcome = MoveOutcome::new(move_type);
        if !with_modifications {
            return Some(outcome);
        }

        // Everybody is pushed the same way; process the front marble first
        let mut chain: Vec<Coord> = groups.concat();
        chain.reverse();

        let mut target = cursor;
        if ejected {
            let front = chain.remove(0);
            let owner = self.board.cell(front).owner()?;
            outcome.modifications.push(Modification::Eject {
                position: self.board.pos_from_coords(front)?,
                owner,
                damage: self.damages.get(owner as usize).copied().unwrap_or(0),
            });
            target = front;
        }

        for coord in chain {
            outcome.modifications.push(self.swap_entry(coord, target, direction)?);
            target = coord;
        }

        Some(outcome)
    }

    /// Every legal (own, other) pair for `player`, in position order
    pub fn possible_moves(&self, player: PlayerId) -> Vec<MovePair> {
        self.candidate_pairs(player)
            .filter(|&(pos0, pos1)| self.validate_move(pos0, pos1, player, false).is_some())
            .collect()
    }

    /// Legal moves grouped by type.
    ///
    /// The `ejected`, `inline_move`, `sidestep_move` and `inline_push` groups
    /// are always present. Ejections that would inflict the opponent's last
    /// lost life are reported under `winner` instead of `ejected`.
    pub fn possible_moves_grouped(&self, player: PlayerId) -> GroupedMoves {
        let mut grouped: GroupedMoves = [
            MoveType::Ejected,
            MoveType::InlineMove,
            MoveType::SidestepMove,
            MoveType::InlinePush,
        ]
        .into_iter()
        .map(|t| (t, Vec::new()))
        .collect();

        for (pos0, pos1) in self.candidate_pairs(player) {
            let Some(outcome) = self.validate_move(pos0, pos1, player, false) else {
                continue;
            };
            let move_type = if outcome.move_type == MoveType::Ejected
                && self.is_winning_ejection(pos0, pos1, player)
            {
                MoveType::Winner
            } else {
                outcome.move_type
            };
            grouped.entry(move_type).or_default().push((pos0, pos1));
        }

        grouped
    }

    fn is_winning_ejection(&self, pos0: Position, pos1: Position, player: PlayerId) -> bool {
        self.validate_move(pos0, pos1, player, true)
            .map(|outcome| {
                outcome.modifications.iter().any(|m| {
                    matches!(m, Modification::Eject { damage, .. } if damage + 1 >= LIVES)
                })
            })
            .unwrap_or(false)
    }

    /// Split positions into the player's marbles and everything else
    fn candidate_pairs(&self, player: PlayerId) -> impl Iterator<Item = MovePair> + '_ {
        let (own, other): (Vec<Position>, Vec<Position>) = (0..NUM_POSITIONS as Position)
            .partition(|&pos| self.board.cell_at(pos) == Some(Cell::Marble(player)));

        own.into_iter()
            .flat_map(move |pos0| other.clone().into_iter().map(move |pos1| (pos0, pos1)))
    }

    fn swap_entry(&self, from: Coord, to: Coord, direction: Direction) -> Option<Modification> {
        Some(Modification::Swap {
            from: self.board.pos_from_coords(from)?,
            to: self.board.pos_from_coords(to)?,
            direction,
        })
    }
}

// ============================================================================
// SIDE-STEP HELPERS
// ============================================================================

/// Residual in-line run once the side-step vector is removed from `(dr, dc)`
fn residual_inline(dr: i8, dc: i8, side: Direction) -> Option<(u8, Direction)> {
    let (sr, sc) = side.vector();
    decompose_inline(dr - sr, dc - sc)
}

/// Of the two side-step candidates, keep the one leaving the shorter line.
/// Ties go to the second candidate.
fn shorter_sidestep(
    dr: i8,
    dc: i8,
    (first, second): (Direction, Direction),
) -> Option<(Direction, u8, Direction)> {
    match (residual_inline(dr, dc, first), residual_inline(dr, dc, second)) {
        (Some((s0, d0)), Some((s1, d1))) => {
            if s0 < s1 {
                Some((first, s0, d0))
            } else {
                Some((second, s1, d1))
            }
        }
        (Some((s0, d0)), None) => Some((first, s0, d0)),
        (None, Some((s1, d1))) => Some((second, s1, d1)),
        (None, None) => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================
