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

//! Move generation: attack queries over ray/jump tables (no magic
//! bitboards), pseudo-legal move generation, and the legality filter.
//!
//! Sliding-piece attacks are computed by walking each ray one step at a
//! time via `tables::step_on_board`'s 0x88 arithmetic, rather than with
//! precomputed magic-bitboard attack sets; this trades some raw perft
//! throughput for a representation that needs no magic-number search at
//! startup.

mod legality;
pub use legality::is_legal;

use crate::tables::{step_on_board, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use crate::{Bitboard, Board, Color, Direction, Move, Piece, Square};

use once_cell::sync::Lazy;
use std::convert::TryFrom;

/// Walk every ray in `dirs` from `sq`, stopping (inclusively) at the first
/// occupied square in `occupancy`. Used both for move generation and for
/// `square_attackers`/pin detection.
#[must_use]
pub fn slider_attacks(occupancy: Bitboard, sq: Square, dirs: &[Direction]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &dir in dirs {
        let mut current = sq;
        while let Some(next) = step_on_board(current, dir) {
            attacks.insert(next);
            if occupancy.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

/// The squares strictly between `a` and `b` if they share a rank, file,
/// or diagonal; otherwise the empty set. Used for pin detection and for
/// checking that a king's castling path is unobstructed.
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a as usize][b as usize]
}

static BETWEEN: Lazy<[[Bitboard; 64]; 64]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    for i in 0..64u8 {
        let a = Square::try_from(i).unwrap();
        for &dir in &Direction::QUEEN_DIRECTIONS {
            let mut bb = Bitboard::EMPTY;
            let mut current = a;
            while let Some(next) = step_on_board(current, dir) {
                table[a as usize][next as usize] = bb;
                bb.insert(next);
                current = next;
            }
        }
    }
    table
});

/// Every square in `by_color`'s pieces that attacks `sq`, regardless of
/// whose turn it is to move.
#[must_use]
pub fn square_attackers(board: &Board, sq: Square, by_color: Color) -> Bitboard {
    let occupancy = board.occupancy();
    let mut attackers = Bitboard::EMPTY;

    attackers |= KNIGHT_ATTACKS[sq as usize] & board[Piece::Knight] & board[by_color];
    attackers |= KING_ATTACKS[sq as usize] & board[Piece::King] & board[by_color];
    attackers |= PAWN_ATTACKS[!by_color as usize][sq as usize] & board[Piece::Pawn] & board[by_color];

    let rook_rays = slider_attacks(occupancy, sq, &Direction::ROOK_DIRECTIONS);
    attackers |= rook_rays & (board[Piece::Rook] | board[Piece::Queen]) & board[by_color];

    let bishop_rays = slider_attacks(occupancy, sq, &Direction::BISHOP_DIRECTIONS);
    attackers |= bishop_rays & (board[Piece::Bishop] | board[Piece::Queen]) & board[by_color];

    attackers
}

/// Is any square in `squares` attacked by `by_color`?
#[must_use]
pub fn any_square_attacked(board: &Board, squares: Bitboard, by_color: Color) -> bool {
    squares.into_iter().any(|sq| !square_attackers(board, sq, by_color).is_empty())
}

/// Generate every pseudo-legal move available to the player to move:
/// legal except that it may leave (or fail to resolve) a check on its
/// own king. Filtered down to legal moves by `is_legal` / `get_moves`.
#[must_use]
pub fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let player = board.player;
    let own = board[player];
    let occupancy = board.occupancy();

    for sq in board[Piece::Knight] & own {
        for target in KNIGHT_ATTACKS[sq as usize] & !own {
            moves.push(Move::normal(sq, target));
        }
    }
    for sq in board[Piece::King] & own {
        for target in KING_ATTACKS[sq as usize] & !own {
            moves.push(Move::normal(sq, target));
        }
    }
    for sq in board[Piece::Bishop] & own {
        for target in slider_attacks(occupancy, sq, &Direction::BISHOP_DIRECTIONS) & !own {
            moves.push(Move::normal(sq, target));
        }
    }
    for sq in board[Piece::Rook] & own {
        for target in slider_attacks(occupancy, sq, &Direction::ROOK_DIRECTIONS) & !own {
            moves.push(Move::normal(sq, target));
        }
    }
    for sq in board[Piece::Queen] & own {
        for target in slider_attacks(occupancy, sq, &Direction::QUEEN_DIRECTIONS) & !own {
            moves.push(Move::normal(sq, target));
        }
    }

    generate_pawn_moves(board, &mut moves);
    generate_castles(board, &mut moves);

    moves
}

fn push_pawn_move(moves: &mut Vec<Move>, from: Square, to: Square, promote_rank: Bitboard) {
    if promote_rank.contains(to) {
        for &pt in &Piece::PROMOTE_TYPES {
            moves.push(Move::promoting(from, to, pt));
        }
    } else {
        moves.push(Move::normal(from, to));
    }
}

fn generate_pawn_moves(board: &Board, moves: &mut Vec<Move>) {
    let player = board.player;
    let own = board[player];
    let opponent = board[!player];
    let occupancy = board.occupancy();
    let forward = player.pawn_direction();
    let promote_rank = player.pawn_promote_rank();
    let start_rank = player.pawn_start_rank();

    for sq in board[Piece::Pawn] & own {
        if let Some(one_step) = crate::tables::step_on_board(sq, forward) {
            if !occupancy.contains(one_step) {
                push_pawn_move(moves, sq, one_step, promote_rank);
                if start_rank.contains(sq) {
                    if let Some(two_steps) = crate::tables::step_on_board(one_step, forward) {
                        if !occupancy.contains(two_steps) {
                            moves.push(Move::normal(sq, two_steps));
                        }
                    }
                }
            }
        }
        for side in [Direction::EAST, Direction::WEST] {
            if let Some(capture_sq) = crate::tables::step_on_board(sq, forward + side) {
                if opponent.contains(capture_sq) {
                    push_pawn_move(moves, sq, capture_sq, promote_rank);
                } else if board.en_passant_square == Some(capture_sq) {
                    moves.push(Move::en_passant(sq, capture_sq));
                }
            }
        }
    }
}

fn generate_castles(board: &Board, moves: &mut Vec<Move>) {
    let player = board.player;
    let occupancy = board.occupancy();
    let own_rooks = board[Piece::Rook] & board[player];
    let king_sq = board.king_sqs[player as usize];

    let (king_side_empty, king_to, rook_from, rook_to) = match player {
        Color::White => (
            [Square::F1, Square::G1],
            Square::G1,
            Square::H1,
            Square::F1,
        ),
        Color::Black => (
            [Square::F8, Square::G8],
            Square::G8,
            Square::H8,
            Square::F8,
        ),
    };
    if board.castle_rights.is_kingside_castle_legal(player)
        && king_side_empty.iter().all(|&sq| !occupancy.contains(sq))
        && own_rooks.contains(rook_from)
    {
        moves.push(Move::castling(king_sq, king_to, rook_from, rook_to));
    }

    let (queen_side_empty, king_to, rook_from, rook_to) = match player {
        Color::White => (
            [Square::B1, Square::C1, Square::D1],
            Square::C1,
            Square::A1,
            Square::D1,
        ),
        Color::Black => (
            [Square::B8, Square::C8, Square::D8],
            Square::C8,
            Square::A8,
            Square::D8,
        ),
    };
    if board.castle_rights.is_queenside_castle_legal(player)
        && queen_side_empty.iter().all(|&sq| !occupancy.contains(sq))
        && own_rooks.contains(rook_from)
    {
        moves.push(Move::castling(king_sq, king_to, rook_from, rook_to));
    }
}

/// Every legal move available to the player to move.
#[must_use]
pub fn get_moves(board: &Board) -> Vec<Move> {
    pseudo_legal_moves(board)
        .into_iter()
        .filter(|&m| is_legal(board, m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_twenty_moves() {
        let board = Board::new();
        assert_eq!(get_moves(&board).len(), 20);
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert!(get_moves(&board)
            .iter()
            .any(|m| m.is_en_passant() && m.from_square() == Square::E5 && m.to_square() == Square::D6));
    }

    #[test]
    fn promotion_expands_to_four_pieces() {
        let board = Board::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let promotions: Vec<_> = get_moves(&board)
            .into_iter()
            .filter(|m| m.from_square() == Square::A7)
            .collect();
        assert_eq!(promotions.len(), 4);
    }

    #[test]
    fn king_in_check_must_resolve_it() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        for m in get_moves(&board) {
            let mut after = board.clone();
            after.apply_move(m);
            assert!(square_attackers(&after, after.king_sqs[Color::White as usize], Color::Black).is_empty());
        }
    }
}
