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

//! The legality filter: is a pseudo-legal move actually legal?
//!
//! A castle is checked against all three of the king's start, transit,
//! and destination squares, not just the square strictly between start
//! and destination - castling through an attacked square is illegal even
//! though the king never stops there.
//!
//! Every other move is checked by actually playing it out on a scratch
//! copy of the board and asking whether the mover's own king is left in
//! check. This is slower than maintaining pin bitboards by hand, but it
//! is trivially correct for every edge case (discovered check, en
//! passant discovered check, pinned-piece captures) without needing a
//! parallel, error-prone special case for each.

use super::square_attackers;
use crate::{Board, Move, MoveKind, Square};

#[must_use]
/// Is `m` (assumed pseudo-legal) actually legal to play in `board`?
pub fn is_legal(board: &Board, m: Move) -> bool {
    if let MoveKind::Castle { .. } = m.kind() {
        return castle_is_legal(board, m);
    }

    let mut after = board.clone();
    after.apply_move(m);
    let mover = !after.player;
    let king_sq = after.king_sqs[mover as usize];
    square_attackers(&after, king_sq, after.player).is_empty()
}

fn castle_is_legal(board: &Board, m: Move) -> bool {
    if !board.checkers.is_empty() {
        return false;
    }
    let opponent = !board.player;
    let start = m.from_square();
    let dest = m.to_square();
    let transit = Square::new(start.rank(), (start.file() + dest.file()) / 2)
        .expect("castle transit square is always on the board");

    [start, transit, dest]
        .into_iter()
        .all(|sq| square_attackers(board, sq, opponent).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::get_moves;

    #[test]
    fn pinned_piece_cannot_expose_check() {
        // White king on E1, White bishop on E2 pinned by Black rook on E8.
        let board = Board::from_fen("4r3/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let moves = get_moves(&board);
        assert!(!moves.iter().any(|m| m.from_square() == Square::E2 && m.to_square() == Square::D3));
        assert!(moves.iter().any(|m| m.from_square() == Square::E2 && m.to_square() == Square::D1));
    }

    #[test]
    fn cannot_castle_through_check() {
        // Black rook on F8 attacks F1, the transit square for White's
        // kingside castle; the king never stops there, but it's still
        // illegal to pass through.
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let attacked = Board::from_fen("4k3/5r2/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let clear_moves = get_moves(&board);
        let attacked_moves = get_moves(&attacked);
        assert!(clear_moves.iter().any(|m| m.is_castle()));
        assert!(!attacked_moves.iter().any(|m| m.is_castle()));
    }

    #[test]
    fn cannot_castle_out_of_check() {
        let board = Board::from_fen("4k3/4r3/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(!get_moves(&board).iter().any(|m| m.is_castle()));
    }
}
