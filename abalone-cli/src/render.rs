//! Terminal rendering of the hexagonal board

use abalone_core::{Board, Coord, Snapshot, BOARD_SIZE, TOKEN_EMPTY, TOKEN_VOID};

/// Marble glyph per player index
pub const PLAYER_GLYPHS: [char; 4] = ['o', 'x', '+', '*'];

const EMPTY_GLYPH: char = '.';

pub fn token_glyph(token: i8) -> char {
    if token == TOKEN_EMPTY {
        return EMPTY_GLYPH;
    }
    usize::try_from(token)
        .ok()
        .and_then(|i| PLAYER_GLYPHS.get(i))
        .copied()
        .unwrap_or('?')
}

/// Render a snapshot as the 5-6-7-8-9-8-7-6-5 hexagon
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for row in snapshot {
        let cells: Vec<char> = row
            .iter()
            .filter(|&&t| t != TOKEN_VOID)
            .map(|&t| token_glyph(t))
            .collect();
        if cells.is_empty() {
            continue;
        }

        out.push_str(&" ".repeat(9 - cells.len()));
        let line: Vec<String> = cells.iter().map(char::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Same hexagon with position ids in place of marbles
pub fn render_position_ids(board: &Board) -> String {
    let mut out = String::new();
    for row in 0..BOARD_SIZE as i8 {
        let ids: Vec<String> = (0..BOARD_SIZE as i8)
            .filter_map(|col| board.pos_from_coords(Coord::new(row, col)))
            .map(|pos| format!("{:>2}", pos))
            .collect();
        if ids.is_empty() {
            continue;
        }

        out.push_str(&"  ".repeat(9 - ids.len()));
        out.push_str(&ids.join("  "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::{AbaloneGame, Variant};

    #[test]
    fn test_render_classical_start() {
        let game = AbaloneGame::new(Variant::classical()).unwrap();
        let text = render_snapshot(&game.board_snapshot());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "    o o o o o");
        assert_eq!(lines[2], "  . . o o o . .");
        assert_eq!(lines[4], ". . . . . . . . .");
        assert_eq!(lines[8], "    x x x x x");
    }

    #[test]
    fn test_render_position_ids() {
        let board = Board::new();
        let text = render_position_ids(&board);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].trim_start().starts_with("0   1"));
        assert!(lines[8].trim_end().ends_with("60"));
    }

    #[test]
    fn test_token_glyphs() {
        assert_eq!(token_glyph(TOKEN_EMPTY), '.');
        assert_eq!(token_glyph(0), 'o');
        assert_eq!(token_glyph(3), '*');
        assert_eq!(token_glyph(9), '?');
    }
}
