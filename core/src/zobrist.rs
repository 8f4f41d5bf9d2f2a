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

//! Zobrist hashing, used to give each board position a (very likely) unique
//! 64-bit key for the transposition table and the repetition counter.
//!
//! The random table is seeded deterministically from seed 0 rather than
//! from system entropy. Tests (and perft/search regression baselines) rely
//! on the same position always hashing to the same key across runs.

use super::{Color, Piece, Square};

use once_cell::sync::Lazy;

/// One random key per `(Square, Piece, Color)` triple, indexed as
/// `[square as usize][piece as usize + 6 * color as usize]`.
static PIECE_KEYS: Lazy<[[u64; 12]; 64]> = Lazy::new(|| {
    let rng = fastrand::Rng::with_seed(0);
    let mut table = [[0u64; 12]; 64];
    for row in &mut table {
        for key in row.iter_mut() {
            *key = rng.u64(..);
        }
    }
    table
});

/// One random key per possible en passant file (A through H), plus an extra
/// slot for "no en passant square".
static EP_KEYS: Lazy<[u64; 9]> = Lazy::new(|| {
    let rng = fastrand::Rng::with_seed(1);
    let mut table = [0u64; 9];
    for key in &mut table {
        *key = rng.u64(..);
    }
    table
});

/// One random key per bit of `CastleRights`.
static CASTLE_KEYS: Lazy<[u64; 4]> = Lazy::new(|| {
    let rng = fastrand::Rng::with_seed(2);
    let mut table = [0u64; 4];
    for key in &mut table {
        *key = rng.u64(..);
    }
    table
});

/// The key XORed in whenever it is Black's turn to move.
static BLACK_TO_MOVE_KEY: Lazy<u64> = Lazy::new(|| fastrand::Rng::with_seed(3).u64(..));

/// A namespace for the Zobrist key-lookup functions. Exists only so the
/// hashing scheme can be referred to as a single name (`Zobrist::square_key`
/// etc.) from the rest of the crate.
pub struct Zobrist;

impl Zobrist {
    #[must_use]
    /// Get the Zobrist key contribution of a single piece of type `piece`
    /// and color `color` sitting on `sq`.
    pub fn square_key(sq: Square, piece: Piece, color: Color) -> u64 {
        let column = piece as usize + 6 * color as usize;
        PIECE_KEYS[sq as usize][column]
    }

    #[must_use]
    /// Get the Zobrist key contribution of the current en passant target,
    /// if any.
    pub fn ep_key(ep_square: Option<Square>) -> u64 {
        match ep_square {
            Some(sq) => EP_KEYS[sq.file()],
            None => EP_KEYS[8],
        }
    }

    #[must_use]
    /// Get the Zobrist key contribution of one bit of castling rights,
    /// indexed 0..4 matching `CastleRights`'s bit layout.
    pub fn castle_key(bit_index: usize) -> u64 {
        CASTLE_KEYS[bit_index]
    }

    #[must_use]
    /// Get the Zobrist key contribution for whose turn it is to move.
    pub fn player_key(color: Color) -> u64 {
        match color {
            Color::White => 0,
            Color::Black => *BLACK_TO_MOVE_KEY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_always_hash_the_same() {
        let a = Zobrist::square_key(Square::E4, Piece::Knight, Color::White);
        let b = Zobrist::square_key(Square::E4, Piece::Knight, Color::White);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_squares_almost_certainly_differ() {
        let a = Zobrist::square_key(Square::E4, Piece::Knight, Color::White);
        let b = Zobrist::square_key(Square::E5, Piece::Knight, Color::White);
        assert_ne!(a, b);
    }

    #[test]
    fn no_ep_square_has_its_own_key() {
        assert_ne!(Zobrist::ep_key(None), Zobrist::ep_key(Some(Square::E3)));
    }

    #[test]
    fn side_to_move_keys_differ() {
        assert_ne!(Zobrist::player_key(Color::White), Zobrist::player_key(Color::Black));
    }
}
