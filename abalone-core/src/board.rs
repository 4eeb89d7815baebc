//! Board grid and position table
//!
//! The 61 playable cells live inside an 11x11 grid. Everything outside the
//! hexagon is VOID, which gives every playable cell a VOID guard ring so that
//! neighbor reads never leave the grid.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::geometry::Coord;

/// Side of the square grid holding the hexagon
pub const BOARD_SIZE: usize = 11;

/// Number of playable cells
pub const NUM_POSITIONS: usize = 61;

/// Observation token for a cell outside the hexagon
pub const TOKEN_VOID: i8 = -2;

/// Observation token for an empty playable cell
pub const TOKEN_EMPTY: i8 = -1;

/// Player index (0-based)
pub type PlayerId = u8;

/// Stable id of a playable cell (0..61)
pub type Position = u8;

/// Raw grid storage
pub type Grid = [[Cell; BOARD_SIZE]; BOARD_SIZE];

/// Grid as integer tokens (VOID = -2, EMPTY = -1, player = id)
pub type Snapshot = [[i8; BOARD_SIZE]; BOARD_SIZE];

/// Content of one grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Void,
    Empty,
    Marble(PlayerId),
}

impl Cell {
    pub fn token(self) -> i8 {
        match self {
            Cell::Void => TOKEN_VOID,
            Cell::Empty => TOKEN_EMPTY,
            Cell::Marble(p) => p as i8,
        }
    }

    pub fn owner(self) -> Option<PlayerId> {
        match self {
            Cell::Marble(p) => Some(p),
            _ => None,
        }
    }

    /// True for EMPTY and VOID, the cells that end a run of marbles
    pub fn is_vacant(self) -> bool {
        matches!(self, Cell::Void | Cell::Empty)
    }
}

/// Fresh grid: 61 EMPTY cells forming the hexagon, VOID elsewhere.
///
/// ```text
/// row 1:         . . . . .        cols 5..=9
/// row 2:        . . . . . .       cols 4..=9
/// row 3:       . . . . . . .      cols 3..=9
/// row 4:      . . . . . . . .     cols 2..=9
/// row 5:     . . . . . . . . .    cols 1..=9
/// row 6:      . . . . . . . .     cols 1..=8
/// row 7:       . . . . . . .      cols 1..=7
/// row 8:        . . . . . .       cols 1..=6
/// row 9:         . . . . .        cols 1..=5
/// ```
pub fn new_grid() -> Grid {
    let n = BOARD_SIZE;
    let mut grid = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];

    grid[0] = [Cell::Void; BOARD_SIZE];
    grid[n - 1] = [Cell::Void; BOARD_SIZE];
    for row in grid.iter_mut() {
        row[0] = Cell::Void;
        row[n - 1] = Cell::Void;
    }

    // Cut the two opposite corners of the inner square
    for i in 0..4 {
        grid[1 + i][1..=(4 - i)].fill(Cell::Void);
        grid[n - 2 - i][(6 + i)..(n - 1)].fill(Cell::Void);
    }

    grid
}

/// Row-major scan collecting the coordinates of every cell equal to `cell`
pub fn find_positions(grid: &Grid, cell: Cell) -> Vec<Coord> {
    let mut found = Vec::new();
    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            if value == cell {
                found.push(Coord::new(r as i8, c as i8));
            }
        }
    }
    found
}

fn grid_index(coord: Coord) -> Option<(usize, usize)> {
    let r = usize::try_from(coord.row).ok()?;
    let c = usize::try_from(coord.col).ok()?;
    (r < BOARD_SIZE && c < BOARD_SIZE).then_some((r, c))
}

/// Hexagonal board with a fixed position <-> coordinate bijection
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    /// Position id -> coordinates
    positions: Vec<Coord>,
    /// Coordinates -> position id
    lookup: FxHashMap<Coord, Position>,
}

impl Board {
    /// Empty board; position ids are assigned row-major over the hexagon
    pub fn new() -> Self {
        let grid = new_grid();
        let positions = find_positions(&grid, Cell::Empty);
        let lookup = positions
            .iter()
            .enumerate()
            .map(|(pos, &coord)| (coord, pos as Position))
            .collect();

        Self {
            grid,
            positions,
            lookup,
        }
    }

    /// Remove every marble, keeping the position table
    pub fn clear(&mut self) {
        self.grid = new_grid();
    }

    /// Cell at `coord`; anything outside the grid reads as VOID
    pub fn cell(&self, coord: Coord) -> Cell {
        match grid_index(coord) {
            Some((r, c)) => self.grid[r][c],
            None => Cell::Void,
        }
    }

    /// Cell at a position id
    pub fn cell_at(&self, pos: Position) -> Option<Cell> {
        self.coords_from_pos(pos).map(|coord| self.cell(coord))
    }

    pub fn coords_from_pos(&self, pos: Position) -> Option<Coord> {
        self.positions.get(pos as usize).copied()
    }

    pub fn pos_from_coords(&self, coord: Coord) -> Option<Position> {
        self.lookup.get(&coord).copied()
    }

    /// Position table (index = position id)
    pub fn positions(&self) -> &[Coord] {
        &self.positions
    }

    /// Write a playable cell. VOID cells are fixed and never written.
    pub(crate) fn set(&mut self, coord: Coord, cell: Cell) {
        if let Some((r, c)) = grid_index(coord) {
            if self.grid[r][c] != Cell::Void && cell != Cell::Void {
                self.grid[r][c] = cell;
            }
        }
    }

    /// Exchange the contents of two playable cells
    pub(crate) fn swap(&mut self, a: Coord, b: Coord) {
        let (ca, cb) = (self.cell(a), self.cell(b));
        if ca == Cell::Void || cb == Cell::Void {
            return;
        }
        self.set(a, cb);
        self.set(b, ca);
    }

    /// Number of marbles `player` has on the board
    pub fn marble_count(&self, player: PlayerId) -> usize {
        self.positions
            .iter()
            .filter(|&&coord| self.cell(coord) == Cell::Marble(player))
            .count()
    }

    /// Copy of the grid as integer tokens
    pub fn snapshot(&self) -> Snapshot {
        let mut out = [[TOKEN_VOID; BOARD_SIZE]; BOARD_SIZE];
        for (r, row) in self.grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                out[r][c] = cell.token();
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;

    #[test]
    fn test_hexagon_cell_counts() {
        let grid = new_grid();
        let empty = find_positions(&grid, Cell::Empty).len();
        let void = find_positions(&grid, Cell::Void).len();
        assert_eq!(empty, NUM_POSITIONS);
        assert_eq!(void, BOARD_SIZE * BOARD_SIZE - NUM_POSITIONS);
    }

    #[test]
    fn test_row_lengths() {
        let grid = new_grid();
        let lengths: Vec<usize> = grid
            .iter()
            .map(|row| row.iter().filter(|&&c| c == Cell::Empty).count())
            .collect();
        assert_eq!(lengths, vec![0, 5, 6, 7, 8, 9, 8, 7, 6, 5, 0]);
    }

    #[test]
    fn test_grid_point_symmetry() {
        let grid = new_grid();
        let n = BOARD_SIZE;
        for r in 0..n {
            for c in 0..n {
                assert_eq!(grid[r][c], grid[n - 1 - r][n - 1 - c]);
            }
        }
    }

    #[test]
    fn test_position_bijection() {
        let board = Board::new();
        assert_eq!(board.positions().len(), NUM_POSITIONS);
        for pos in 0..NUM_POSITIONS as Position {
            let coord = board.coords_from_pos(pos).unwrap();
            assert_eq!(board.pos_from_coords(coord), Some(pos));
        }
        assert_eq!(board.coords_from_pos(0), Some(Coord::new(1, 5)));
        assert_eq!(board.coords_from_pos(60), Some(Coord::new(9, 5)));
        assert_eq!(board.coords_from_pos(61), None);
    }

    #[test]
    fn test_guard_ring() {
        let board = Board::new();
        for &coord in board.positions() {
            for n in coord.neighbors() {
                // Every neighbor read stays inside the grid
                assert!(grid_index(n).is_some());
            }
        }
        assert_eq!(board.cell(Coord::new(-1, 3)), Cell::Void);
        assert_eq!(board.cell(Coord::new(5, 11)), Cell::Void);
    }

    #[test]
    fn test_void_cells_are_never_written() {
        let mut board = Board::new();
        let void = Coord::new(1, 1);
        board.set(void, Cell::Marble(0));
        assert_eq!(board.cell(void), Cell::Void);

        let edge = Coord::new(1, 5);
        board.set(edge, Cell::Marble(0));
        board.swap(edge, edge.neighbor(Direction::UpLeft));
        assert_eq!(board.cell(edge), Cell::Marble(0));
    }

    #[test]
    fn test_snapshot_tokens() {
        let mut board = Board::new();
        board.set(Coord::new(5, 5), Cell::Marble(1));
        let snap = board.snapshot();
        assert_eq!(snap[0][0], TOKEN_VOID);
        assert_eq!(snap[1][5], TOKEN_EMPTY);
        assert_eq!(snap[5][5], 1);
        assert_eq!(board.marble_count(1), 1);

        board.clear();
        assert_eq!(board.marble_count(1), 0);
    }
}
