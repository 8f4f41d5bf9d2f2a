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

//! Conversion between moves and standard algebraic notation (SAN).

use crate::movegen::{get_moves, square_attackers};
use crate::{Board, Move, Piece};

/// Given a `Move` and the `Board` it was played on, construct the
/// algebraic-notation string for the move. Assumes the move is legal.
///
/// # Panics
///
/// If `m` is not actually legal in `board`.
#[must_use]
pub fn algebraic_from_move(m: Move, board: &Board) -> String {
    // longest realistic algebraic string: "Qe4xd4#" or "exd8=Q#"
    let mut s = String::with_capacity(7);

    if m.is_castle() {
        if m.to_square().file() > m.from_square().file() {
            s += "O-O";
        } else {
            s += "O-O-O";
        }
    } else {
        let mover_type = board
            .type_at_square(m.from_square())
            .expect("move's origin square must hold a piece");
        let is_capture = board.is_move_capture(m);
        let from_sq = m.from_square();

        let mut is_unclear = false;
        let mut is_unclear_rank = false;
        let mut is_unclear_file = false;

        if mover_type != Piece::Pawn {
            s += mover_type.code();
        } else if is_capture {
            is_unclear = true;
            is_unclear_file = true;
        }

        for other_move in get_moves(board) {
            if other_move != m
                && other_move.to_square() == m.to_square()
                && other_move.from_square() != m.from_square()
                && board.type_at_square(other_move.from_square()) == Some(mover_type)
            {
                is_unclear = true;
                if other_move.from_square().rank() == from_sq.rank() {
                    is_unclear_file = true;
                }
                if other_move.from_square().file() == from_sq.file() {
                    is_unclear_rank = true;
                }
            }
        }

        if is_unclear {
            if !is_unclear_rank {
                s += from_sq.file_name();
            } else if !is_unclear_file {
                s = format!("{s}{}", from_sq.rank() + 1);
            } else {
                s += &from_sq.to_string();
            }
        }

        if is_capture {
            s += "x";
        }

        s += &m.to_square().to_string();

        if let Some(p) = m.promote_type() {
            s += "=";
            s += p.code();
        }
    }

    let mut after = board.clone();
    let mover = board.player;
    let enemy_king_sq = {
        after.apply_move(m);
        after.king_sqs[!mover as usize]
    };
    if !square_attackers(&after, enemy_king_sq, mover).is_empty() {
        if get_moves(&after).is_empty() {
            s += "#";
        } else {
            s += "+";
        }
    }

    s
}

/// Given a SAN move string and the board it is to be played on, find the
/// legal `Move` it describes.
///
/// # Errors
///
/// Returns `Err` if no legal move in `board` renders to exactly `s`.
pub fn move_from_algebraic(s: &str, board: &Board) -> Result<Move, &'static str> {
    get_moves(board)
        .into_iter()
        .find(|&m| algebraic_from_move(m, board) == s)
        .ok_or("not a legal algebraic move")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    #[test]
    fn e4_to_algebraic() {
        let board = Board::new();
        let m = Move::normal(Square::E2, Square::E4);
        assert_eq!(algebraic_from_move(m, &board), "e4");
    }

    #[test]
    fn mating_move_gets_hash() {
        let board = Board::from_fen("3k4/R7/1R6/5K2/8/8/8/8 w - - 0 1").unwrap();
        let m = Move::normal(Square::B6, Square::B8);
        assert_eq!(algebraic_from_move(m, &board), "Rb8#");
    }

    #[test]
    fn pawn_capture_includes_origin_file() {
        let board = Board::from_fen(
            "rnbqkbnr/ppppp1pp/8/5p2/4P3/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 2",
        )
        .unwrap();
        let m = Move::normal(Square::E4, Square::F5);
        assert_eq!(algebraic_from_move(m, &board), "exf5");
    }

    #[test]
    fn e4_from_algebraic_round_trips() {
        let board = Board::new();
        let m = Move::normal(Square::E2, Square::E4);
        assert_eq!(move_from_algebraic("e4", &board), Ok(m));
    }

    #[test]
    fn promotion_renders_with_equals_sign() {
        let board = Board::from_fen("8/5P2/2k5/4K3/8/8/8/8 w - - 0 1").unwrap();
        let m = Move::promoting(Square::F7, Square::F8, Piece::Queen);
        assert_eq!(algebraic_from_move(m, &board), "f8=Q");
    }

    #[test]
    fn garbage_string_is_rejected() {
        let board = Board::new();
        assert!(move_from_algebraic("garbage", &board).is_err());
    }

    #[test]
    fn rank_disambiguates_two_knights() {
        let board = Board::from_fen(
            "rnbqkbnr/pppppppp/8/8/3P4/1N6/PPP1PPPP/RNBQKB1R w KQkq - 1 5",
        )
        .unwrap();
        let m = Move::normal(Square::B3, Square::D2);
        let s = "N3d2";
        assert_eq!(algebraic_from_move(m, &board), s);
        assert_eq!(move_from_algebraic(s, &board).unwrap(), m);
    }
}
