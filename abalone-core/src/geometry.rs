//! Hex geometry embedded in a rectangular (row, col) grid
//!
//! The hexagon is stored in a square grid where the three hex axes are:
//! - rows (RIGHT / LEFT)
//! - columns (DOWN_RIGHT / UP_LEFT)
//! - anti-diagonals (DOWN_LEFT / UP_RIGHT)
//!
//! ```text
//!   UP_LEFT : 4     5 : UP_RIGHT
//!              \   /
//!   LEFT : 3 -- * -- 0 : RIGHT
//!              /   \
//! DOWN_LEFT : 2     1 : DOWN_RIGHT
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset applied to `row + col` for the third axis coordinate
const DIAGONAL_OFFSET: i8 = 4;

/// Grid coordinates (row, col)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i8,
    pub col: i8,
}

impl Coord {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Move `steps` cells in `direction`
    pub fn offset(&self, direction: Direction, steps: i8) -> Coord {
        let (dr, dc) = direction.vector();
        Coord::new(self.row + dr * steps, self.col + dc * steps)
    }

    /// Adjacent cell in `direction`
    pub fn neighbor(&self, direction: Direction) -> Coord {
        self.offset(direction, 1)
    }

    /// All 6 adjacent cells in canonical direction order (no bounds check)
    pub fn neighbors(&self) -> [Coord; 6] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    /// Displacement (dr, dc) from `self` to `other`
    pub fn delta_to(&self, other: Coord) -> (i8, i8) {
        (other.row - self.row, other.col - self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the six hex directions, in canonical order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right = 0,
    DownRight = 1,
    DownLeft = 2,
    Left = 3,
    UpLeft = 4,
    UpRight = 5,
}

/// Direction vectors (dr, dc), indexed by `Direction as usize`
pub const DIRECTIONS: [(i8, i8); 6] = [
    (0, 1),   // RIGHT
    (1, 0),   // DOWN_RIGHT
    (1, -1),  // DOWN_LEFT
    (0, -1),  // LEFT
    (-1, 0),  // UP_LEFT
    (-1, 1),  // UP_RIGHT
];

const GLYPHS: [&str; 6] = ["→", "↘", "↙", "←", "↖", "↗"];

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Right,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
        Direction::UpRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn vector(self) -> (i8, i8) {
        DIRECTIONS[self.index()]
    }

    /// Opposite direction (3 apart modulo 6)
    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 3) % 6]
    }

    pub fn glyph(self) -> &'static str {
        GLYPHS[self.index()]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Classify a displacement as a run along a single hex axis.
///
/// Returns `(step, direction)` when `(dr, dc)` is collinear with one of the
/// three axes, `None` otherwise (e.g. a knight-like jump). A zero
/// displacement decomposes as `(0, Left)`; callers rely on that to treat a
/// lone marble as a run of length zero.
pub fn decompose_inline(dr: i8, dc: i8) -> Option<(u8, Direction)> {
    if dr == 0 {
        let direction = if dc > 0 { Direction::Right } else { Direction::Left };
        Some((dc.unsigned_abs(), direction))
    } else if dc == 0 {
        let direction = if dr > 0 { Direction::DownRight } else { Direction::UpLeft };
        Some((dr.unsigned_abs(), direction))
    } else if dr.abs() == dc.abs() && dr.signum() != dc.signum() {
        let direction = if dr > 0 { Direction::DownLeft } else { Direction::UpRight };
        Some((dr.unsigned_abs(), direction))
    } else {
        None
    }
}

/// Coordinates of a cell along the three hex axes: (row, col, row + col - 4)
pub fn decompose_directions(coord: Coord) -> (i8, i8, i8) {
    (coord.row, coord.col, coord.row + coord.col - DIAGONAL_OFFSET)
}
