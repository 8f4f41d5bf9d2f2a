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

//! Precomputed jump tables for knights, kings, and pawn captures, plus the
//! per-direction ray offsets sliding pieces walk during move generation.
//!
//! Built once, lazily, on first use via `once_cell`, rather than recomputed
//! on every move-generation call.

use super::{Color, Direction, Square};
use once_cell::sync::Lazy;
use std::convert::TryFrom;

/// `KNIGHT_ATTACKS[sq as usize]` is the set of squares a knight on `sq` could
/// jump to, ignoring occupancy.
pub static KNIGHT_ATTACKS: Lazy<[super::Bitboard; 64]> = Lazy::new(|| {
    let mut table = [super::Bitboard::EMPTY; 64];
    for i in 0..64u8 {
        let sq = Square::try_from(i).unwrap();
        let mut bb = super::Bitboard::EMPTY;
        for step in Direction::KNIGHT_STEPS {
            if let Some(target) = step_on_board(sq, step) {
                bb.insert(target);
            }
        }
        table[i as usize] = bb;
    }
    table
});

/// `KING_ATTACKS[sq as usize]` is the set of squares a king on `sq` could
/// step to, ignoring occupancy and castling.
pub static KING_ATTACKS: Lazy<[super::Bitboard; 64]> = Lazy::new(|| {
    let mut table = [super::Bitboard::EMPTY; 64];
    for i in 0..64u8 {
        let sq = Square::try_from(i).unwrap();
        let mut bb = super::Bitboard::EMPTY;
        for step in Direction::KING_STEPS {
            if let Some(target) = step_on_board(sq, step) {
                bb.insert(target);
            }
        }
        table[i as usize] = bb;
    }
    table
});

/// `PAWN_ATTACKS[color as usize][sq as usize]` is the set of squares a pawn
/// of `color` standing on `sq` attacks (diagonally forward).
pub static PAWN_ATTACKS: Lazy<[[super::Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[super::Bitboard::EMPTY; 64]; 2];
    for (color_idx, color) in [Color::White, Color::Black].into_iter().enumerate() {
        for i in 0..64u8 {
            let sq = Square::try_from(i).unwrap();
            let forward = color.pawn_direction();
            let mut bb = super::Bitboard::EMPTY;
            for side in [Direction::EAST, Direction::WEST] {
                if let Some(target) = step_on_board(sq, forward + side) {
                    bb.insert(target);
                }
            }
            table[color_idx][i as usize] = bb;
        }
    }
    table
});

/// Step one square in `dir` from `sq` using 0x88 arithmetic to detect
/// wraparound off the edge of the board, returning `None` if the step would
/// leave the board.
#[must_use]
pub fn step_on_board(sq: Square, dir: Direction) -> Option<Square> {
    let raw = sq.to_0x88() as i16 + direction_0x88_offset(dir);
    if !(0..=0xFF).contains(&raw) {
        return None;
    }
    Square::from_0x88(raw as u8)
}

/// Convert an 8x8-index `Direction` into its equivalent 0x88 offset, so that
/// stepping can be validated against the `0x88` board edge rather than
/// wrapping around mod 64.
///
/// An 8x8 direction packs as `rank_step * 8 + file_step` with `file_step` in
/// two's-complement low 3 bits; a 0x88 direction instead packs as
/// `rank_step * 16 + file_step`. Recovering `file_step` by sign-extending
/// the low 3 bits and solving for `rank_step = (total - file_step) / 8`
/// gives `offset = rank_step * 16 + file_step = 2 * total - file_step`.
fn direction_0x88_offset(dir: Direction) -> i16 {
    let total = i16::from(dir.0);
    let low3 = i16::from(dir.0 & 7);
    let file_step = if low3 >= 4 { low3 - 8 } else { low3 };
    2 * total - file_step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_in_corner_has_two_targets() {
        assert_eq!(KNIGHT_ATTACKS[Square::A1 as usize].len(), 2);
    }

    #[test]
    fn knight_in_center_has_eight_targets() {
        assert_eq!(KNIGHT_ATTACKS[Square::D4 as usize].len(), 8);
    }

    #[test]
    fn king_in_corner_has_three_targets() {
        assert_eq!(KING_ATTACKS[Square::A1 as usize].len(), 3);
    }

    #[test]
    fn pawn_attacks_do_not_wrap_around_the_board() {
        // A white pawn on A2 can only capture on B3, never "wrapping" to H3.
        let attacks = PAWN_ATTACKS[Color::White as usize][Square::A2 as usize];
        assert_eq!(attacks.len(), 1);
        assert!(attacks.contains(Square::B3));
    }

    #[test]
    fn step_on_board_rejects_wraparound() {
        // Stepping east from H-file must fail, not wrap to the A-file.
        assert_eq!(step_on_board(Square::H4, Direction::EAST), None);
    }

    #[test]
    fn knight_step_geometry_is_l_shaped_not_adjacent() {
        // D4 + NNW should land two ranks up and one file left: C6.
        assert_eq!(step_on_board(Square::D4, Direction::NNW), Some(Square::C6));
        // D4 + SSW should land two ranks down and one file left: C2.
        assert_eq!(step_on_board(Square::D4, Direction::SSW), Some(Square::C2));
    }
}
