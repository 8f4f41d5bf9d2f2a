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

//! Position evaluation: material, piece-square tables, and an endgame
//! king-activity term, blended by how far the game has progressed toward
//! an endgame.

use std::{
    fmt::{Display, Formatter},
    ops::{Add, Neg, Sub},
};

use thera_core::{Board, Color, Piece, Square};

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
/// The evaluation of a position, in centipawns from White's perspective.
/// Positive means White is better, negative means Black is better.
///
/// Values with magnitude greater than [`Eval::MATE_CUTOFF`] are reserved for
/// mate scores: [`Eval::MATE_0_VAL`] is "mate in 0" (the side to move has
/// just been mated), and every ply further from the mate subtracts one from
/// that value. Mate scores are stored relative to the node they were
/// computed at; [`Eval::step_forward`]/[`Eval::step_back`] adjust a score by
/// one ply as it's carried across a recursive search call, so a mate score
/// read out of the transposition table always means the same thing
/// regardless of how deep in the tree it was stored.
pub struct Eval(i16);

impl Eval {
    /// An evaluation smaller than every normal (non-mate) evaluation.
    pub const MIN: Eval = Eval(-Eval::MATE_0_VAL - 1000);

    /// An evaluation larger than every normal (non-mate) evaluation.
    pub const MAX: Eval = Eval(Eval::MATE_0_VAL + 1000);

    /// Black has mated White.
    pub const BLACK_MATE: Eval = Eval(-Eval::MATE_0_VAL);

    /// White has mated Black.
    pub const WHITE_MATE: Eval = Eval(Eval::MATE_0_VAL);

    /// A drawn position.
    pub const DRAW: Eval = Eval(0);

    const MATE_0_VAL: i16 = 30_000;
    const MATE_CUTOFF: i16 = 29_000;
    const PAWN_VALUE: i16 = 100;

    #[inline(always)]
    #[must_use]
    /// Construct an `Eval` directly from a centipawn value.
    pub const fn centipawns(x: i16) -> Eval {
        Eval(x)
    }

    #[inline(always)]
    #[must_use]
    /// An evaluation representing the side to move being mated in
    /// `nplies` more plies. `-Eval::mate_in(n)` is "the side to move will
    /// deliver mate in `n` plies".
    pub const fn mate_in(nplies: u16) -> Eval {
        Eval(Eval::MATE_0_VAL - (nplies as i16))
    }

    #[inline(always)]
    #[must_use]
    /// Carry this evaluation one ply closer to the root: normal scores are
    /// unaffected, mate scores shrink in magnitude by one.
    pub const fn step_back(self) -> Eval {
        Eval(self.0 - self.0 / (Eval::MATE_CUTOFF + 1))
    }

    #[inline(always)]
    #[must_use]
    /// Carry this evaluation one ply away from the root: normal scores are
    /// unaffected, mate scores grow in magnitude by one.
    pub const fn step_forward(self) -> Eval {
        Eval(self.0 + self.0 / (Eval::MATE_CUTOFF + 1))
    }

    #[inline(always)]
    #[must_use]
    /// Is this a mate score, rather than a normal material/positional one?
    pub const fn is_mate(self) -> bool {
        self.0 > Eval::MATE_CUTOFF || self.0 < -Eval::MATE_CUTOFF
    }

    #[must_use]
    /// The number of full moves until mate, assuming perfect play, or
    /// `None` if this isn't a mate score.
    pub const fn moves_to_mate(self) -> Option<u8> {
        if !self.is_mate() {
            return None;
        }
        if self.0 > 0 {
            Some(((Eval::MATE_0_VAL - self.0 + 1) / 2) as u8)
        } else {
            Some(((Eval::MATE_0_VAL + self.0 + 1) / 2) as u8)
        }
    }

    #[inline(always)]
    #[must_use]
    /// The raw centipawn value, with magnitude above 29,000 meaning mate.
    pub const fn centipawn_val(self) -> i16 {
        self.0
    }

    #[inline(always)]
    #[must_use]
    /// Put this evaluation into `player`'s perspective: unchanged for
    /// White, negated for Black. An involution.
    pub const fn in_perspective(self, player: Color) -> Eval {
        match player {
            Color::White => self,
            Color::Black => Eval(-self.0),
        }
    }
}

impl Display for Eval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 > Eval::MATE_CUTOFF {
            write!(f, "+M{}", (Eval::MATE_0_VAL - self.0 + 1) / 2)
        } else if self.0 < -Eval::MATE_CUTOFF {
            write!(f, "-M{}", (Eval::MATE_0_VAL + self.0 + 1) / 2)
        } else {
            write!(f, "{:+.2}", self.0 as f32 / Eval::PAWN_VALUE as f32)
        }
    }
}

impl Neg for Eval {
    type Output = Eval;
    #[inline(always)]
    fn neg(self) -> Eval {
        Eval(-self.0)
    }
}

impl Add<Eval> for Eval {
    type Output = Eval;
    #[inline(always)]
    fn add(self, rhs: Eval) -> Eval {
        Eval(self.0 + rhs.0)
    }
}

impl Sub<Eval> for Eval {
    type Output = Eval;
    #[inline(always)]
    fn sub(self, rhs: Eval) -> Eval {
        Eval(self.0 - rhs.0)
    }
}

/// Material value of one piece, in centipawns. A king is given a large
/// nominal value so "material left" accounting (which always includes both
/// kings) can subtract it back out.
#[must_use]
pub const fn piece_value(piece: Piece) -> i16 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight | Piece::Bishop => 300,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 20_000,
    }
}

/// `2 * Rook + Knight + Bishop`: the material (beyond the two kings) present
/// at the start of an endgame-free middlegame, used as the denominator when
/// estimating how far a position has progressed toward an endgame.
const MAX_MATERIAL: i32 = 2 * 500 + 300 + 300;

/// Piece-square tables from the "simplified evaluation function", indexed
/// `[rank * 8 + file]` with rank and file counted from 0 as in [`Square`] -
/// i.e. White reads a table directly by square index, and Black reads the
/// same table via [`Square::opposite`] to get its mirror image.
#[rustfmt::skip]
const PAWN_PST: [i16; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-30,-30, 10, 10,  5,
     5, -5,-10,  0,  0,-10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i16; 64] = [
    -50,-35,-30,-30,-30,-30,-35,-50,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_PST: [i16; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_PST: [i16; 64] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_PST: [i16; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -10,  5,  5,  5,  5,  5,  0,-10,
      0,  0,  5,  5,  5,  5,  0, -5,
     -5,  0,  5,  5,  5,  5,  0, -5,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_PST: [i16; 64] = [
     20, 30, 10,  0,  0, 10, 30, 20,
     20, 20,  0,  0,  0,  0, 20, 20,
    -10,-20,-20,-20,-20,-20,-20,-10,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
];

fn pst(piece: Piece) -> &'static [i16; 64] {
    match piece {
        Piece::Pawn => &PAWN_PST,
        Piece::Knight => &KNIGHT_PST,
        Piece::Bishop => &BISHOP_PST,
        Piece::Rook => &ROOK_PST,
        Piece::Queen => &QUEEN_PST,
        Piece::King => &KING_PST,
    }
}

/// The piece-square value of a single piece of `color` standing on `sq`.
#[must_use]
pub fn pst_value(piece: Piece, color: Color, sq: Square) -> i16 {
    let table = pst(piece);
    match color {
        Color::White => table[sq as usize],
        Color::Black => table[sq.opposite() as usize],
    }
}

/// Total material value of `color`'s pieces on `board`, including the king.
#[must_use]
fn material_of(board: &Board, color: Color) -> i32 {
    Piece::ALL_TYPES
        .iter()
        .map(|&p| i32::from(piece_value(p)) * i32::from((board[p] & board[color]).len()))
        .sum()
}

/// Total piece-square value of `color`'s pieces on `board`.
#[must_use]
fn pst_of(board: &Board, color: Color) -> i32 {
    Piece::NON_KING_TYPES
        .iter()
        .map(|&p| {
            (board[p] & board[color])
                .into_iter()
                .map(|sq| i32::from(pst_value(p, color, sq)))
                .sum::<i32>()
        })
        .sum::<i32>()
        + i32::from(pst_value(Piece::King, color, board.king_sqs[color as usize]))
}

/// Distance of `sq` from the center of the board, per the four central
/// squares: 0 on d4/d5/e4/e5, growing toward the edges.
fn distance_from_center(sq: Square) -> i32 {
    let rank = sq.rank() as i32;
    let file = sq.file() as i32;
    (3 - file).max(file - 4) + (3 - rank).max(rank - 4)
}

/// The endgame king-activity bonus: driving the opponent's king to the edge
/// and one's own king toward it, scaled by how far the game has progressed
/// toward an endgame. Only contributes when `ahead` is true, matching the
/// directional gating in the formula this is taken from.
fn endgame_king_term(board: &Board, endgame_progress: f32, king_color: Color, ahead: bool) -> f32 {
    if !ahead {
        return 0.0;
    }
    let king_sq = board.king_sqs[king_color as usize];
    let other_king_sq = board.king_sqs[!king_color as usize];
    let value = distance_from_center(king_sq) + (14 - i32::from(king_sq.manhattan_to(other_king_sq)));
    10.0 * endgame_progress * value as f32
}

/// Evaluate `board` from the perspective of the side to move: positive
/// means the mover is better off, negative means the mover is worse off.
///
/// This is a pure, stateless evaluation of material, piece placement, and
/// king activity in the endgame; it never reads or writes a transposition
/// table and never looks at remaining search depth. A threefold repetition
/// is scored as an immediate draw, taking priority over everything else.
#[must_use]
pub fn evaluate(board: &Board) -> Eval {
    if board.is_threefold_repetition() {
        return Eval::DRAW;
    }

    let mover = board.player;
    let opponent = !mover;

    let mover_material = material_of(board, mover);
    let opponent_material = material_of(board, opponent);
    let mut eval = (mover_material - opponent_material) as f32;

    // `gameDirection` is computed from the material-only evaluation, before
    // piece placement is added in, so a material-down side doesn't get
    // flipped into "ahead" by a lucky PST score.
    let ahead = eval >= 0.0;

    let material_left = mover_material + opponent_material - 2 * i32::from(piece_value(Piece::King));
    let endgame_progress = 1.0 - (material_left as f32 / MAX_MATERIAL as f32).min(1.0);

    let mover_pst = pst_of(board, mover) as f32;
    let opponent_pst = pst_of(board, opponent) as f32;
    eval += (mover_pst - opponent_pst) * (1.0 - endgame_progress);

    eval += endgame_king_term(board, endgame_progress, opponent, ahead);
    eval -= endgame_king_term(board, endgame_progress, mover, !ahead);

    Eval(eval.round() as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_forward_and_back_are_inverses_for_normal_scores() {
        let e = Eval::centipawns(37);
        assert_eq!(e.step_forward().step_back(), e);
    }

    #[test]
    fn step_forward_widens_mate_distance() {
        let e = Eval::mate_in(0);
        assert_eq!(e.step_forward(), Eval::mate_in(0) + Eval::centipawns(1));
    }

    #[test]
    fn mate_in_zero_is_the_mate_constant() {
        assert_eq!(Eval::mate_in(0), Eval::WHITE_MATE);
        assert_eq!(-Eval::mate_in(0), Eval::BLACK_MATE);
    }

    #[test]
    fn moves_to_mate_counts_full_moves() {
        assert_eq!(Eval::mate_in(4).moves_to_mate(), Some(2));
        assert_eq!(Eval::centipawns(120).moves_to_mate(), None);
    }

    #[test]
    fn starting_position_is_symmetric() {
        let board = Board::new();
        assert_eq!(evaluate(&board), Eval::DRAW);
    }

    #[test]
    fn extra_queen_is_winning() {
        let board =
            Board::from_fen("rnb1kbnr/pppppppp/8/8/4Q3/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1").unwrap();
        assert!(evaluate(&board).centipawn_val() > 800);
    }

    #[test]
    fn pst_mirrors_between_colors() {
        assert_eq!(
            pst_value(Piece::Knight, Color::White, Square::D4),
            pst_value(Piece::Knight, Color::Black, Square::D5)
        );
    }

    #[test]
    fn threefold_repetition_is_a_draw_regardless_of_material() {
        let mut board =
            Board::from_fen("rnb1kbnr/pppppppp/8/8/4Q3/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1").unwrap();
        for _ in 0..2 {
            for mv in [
                thera_core::Move::normal(Square::E4, Square::E5),
                thera_core::Move::normal(Square::E8, Square::E7),
                thera_core::Move::normal(Square::E5, Square::E4),
                thera_core::Move::normal(Square::E7, Square::E8),
            ] {
                board.apply_move(mv);
            }
        }
        assert!(board.is_threefold_repetition());
        assert_eq!(evaluate(&board), Eval::DRAW);
    }
}
