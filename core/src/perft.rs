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

//! Perft: the leaf-node counter used as a correctness oracle for the
//! move generator. A perft count that disagrees with a known-good value
//! means move generation (or legality filtering) has a bug somewhere.

use crate::{movegen, Board};
use std::collections::HashMap;

/// Count the number of leaf nodes reachable from `board` in exactly
/// `depth` plies, playing every legal move at every level.
#[must_use]
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = movegen::get_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for m in moves {
        board.apply_move(m);
        nodes += perft(board, depth - 1);
        board.rewind_move();
    }
    nodes
}

/// Like `perft`, but returns the leaf-node count broken down by the
/// first move played, for diffing against a reference engine's `divide`
/// output when a perft count disagrees.
#[must_use]
pub fn divide(board: &mut Board, depth: u32) -> HashMap<String, u64> {
    let mut result = HashMap::new();
    if depth == 0 {
        return result;
    }
    for m in movegen::get_moves(board) {
        board.apply_move(m);
        let nodes = perft(board, depth - 1);
        board.rewind_move();
        result.insert(m.to_uci(), nodes);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The standard perft regression suite: (name, FEN, [(depth,
    /// expected node count), ...]). Reproduces the well-known "Kiwipete"
    /// family of positions used to catch move generator bugs that the
    /// starting position alone won't surface (en passant, castling
    /// rights, pins, promotions).
    fn positions() -> Vec<(&'static str, &'static str, Vec<(u32, u64)>)> {
        vec![
            (
                "start",
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                vec![(1, 20), (2, 400), (3, 8_902), (4, 197_281)],
            ),
            (
                "kiwipete",
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                vec![(1, 48), (2, 2_039), (3, 97_862)],
            ),
            (
                "endgame",
                "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                vec![(1, 14), (2, 191), (3, 2_812), (4, 43_238)],
            ),
            (
                "promoted_rook",
                "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
                vec![(1, 6), (2, 264), (3, 9_467), (4, 422_333)],
            ),
            (
                "discovered_check",
                "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
                vec![(1, 44), (2, 1_486), (3, 62_379)],
            ),
        ]
    }

    #[test]
    fn perft_matches_known_node_counts() {
        for (name, fen, depths) in positions() {
            let mut board = Board::from_fen(fen).unwrap_or_else(|e| panic!("{name}: {e}"));
            for (depth, expected) in depths {
                let got = perft(&mut board, depth);
                assert_eq!(got, expected, "{name} at depth {depth}");
            }
        }
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut board = Board::new();
        let total: u64 = divide(&mut board, 3).values().sum();
        assert_eq!(total, perft(&mut board, 3));
    }
}
