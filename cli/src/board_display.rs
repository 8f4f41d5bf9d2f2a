/*
  Thera, a UCI-compatible chess engine.
  Copyright (C) 2022 The Thera Authors (see AUTHORS.md file)

  Thera is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Thera is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Colored terminal rendering of a [`Board`], for the interactive play loop.
//! `Board` already implements a plain-text `Display`; this lays a
//! checkerboard background and piece glyphs on top of it, written directly
//! with raw ANSI escape codes rather than a terminal-color crate, since
//! nothing else in this workspace pulls one in.

use thera_core::{Board, Color, Piece, Square};

const RESET: &str = "\x1b[0m";
const LIGHT_SQUARE_BG: &str = "\x1b[48;5;222m";
const DARK_SQUARE_BG: &str = "\x1b[48;5;94m";
const WHITE_PIECE_FG: &str = "\x1b[38;5;15m";
const BLACK_PIECE_FG: &str = "\x1b[38;5;0m";

fn glyph(piece: Piece) -> char {
    match piece {
        Piece::Pawn => '♟',
        Piece::Knight => '♞',
        Piece::Bishop => '♝',
        Piece::Rook => '♜',
        Piece::Queen => '♛',
        Piece::King => '♚',
    }
}

/// Render `board` as an 8x8 checkerboard with colored squares, rank/file
/// labels, and piece glyphs. Always shows White at the bottom (rank 1).
pub fn render(board: &Board) -> String {
    let mut out = String::new();
    out.push_str("  a b c d e f g h\n");
    for rank in (0..8).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8 {
            let sq = Square::new(rank, file).expect("rank/file in 0..8 is always a valid square");
            let bg = if (rank + file) % 2 == 0 {
                DARK_SQUARE_BG
            } else {
                LIGHT_SQUARE_BG
            };
            out.push_str(bg);
            match (board.type_at_square(sq), board.color_at_square(sq)) {
                (Some(p), Some(Color::White)) => {
                    out.push_str(WHITE_PIECE_FG);
                    out.push(glyph(p));
                }
                (Some(p), Some(Color::Black)) => {
                    out.push_str(BLACK_PIECE_FG);
                    out.push(glyph(p));
                }
                _ => out.push(' '),
            }
            out.push_str(RESET);
            out.push(' ');
        }
        out.push_str(&format!("{}\n", rank + 1));
    }
    out.push_str("  a b c d e f g h\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_rank_and_file_label() {
        let board = Board::new();
        let rendered = render(&board);
        assert_eq!(rendered.lines().count(), 10);
        assert!(rendered.contains("a b c d e f g h"));
    }

    #[test]
    fn empty_square_has_no_glyph() {
        let board = Board::from_fen("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        let rendered = render(&board);
        assert!(!rendered.contains('♟'));
    }
}
