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

//! Definitions of moves, which can describe any legal playable move.

use crate::{ParseError, Piece, Square};

use std::fmt::{Debug, Display, Formatter};

/// What makes a move special, beyond simply relocating a piece from one
/// square to another.
///
/// The castling rook move is carried inline as a pair of squares rather
/// than through a second heap-allocated `Move`, so that making a move never
/// allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// An ordinary move: no capture-by-en-passant, no promotion, no castle.
    /// (This also covers ordinary captures - those are detected by
    /// inspecting the board, not by a flag on the move itself.)
    Normal,
    /// A pawn promoting upon arrival at the back rank.
    Promotion(Piece),
    /// A pawn capturing en passant.
    EnPassant,
    /// A castling move. `rook_from`/`rook_to` are the squares the rook
    /// travels between, alongside the king's own `from`/`to` on the
    /// [`Move`] that owns this `MoveKind`.
    Castle {
        rook_from: Square,
        rook_to: Square,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
/// One move: a piece traveling from one square to another, plus whatever
/// makes it special.
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
}

impl Move {
    #[inline(always)]
    #[must_use]
    /// Create an ordinary move with no special behavior.
    pub const fn normal(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            kind: MoveKind::Normal,
        }
    }

    #[inline(always)]
    #[must_use]
    /// Create a move in which a pawn promotes to `promote_type` upon
    /// arrival. `promote_type` must not be a pawn or a king.
    pub const fn promoting(from: Square, to: Square, promote_type: Piece) -> Move {
        Move {
            from,
            to,
            kind: MoveKind::Promotion(promote_type),
        }
    }

    #[inline(always)]
    #[must_use]
    /// Create a move in which a pawn captures another pawn en passant.
    pub const fn en_passant(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            kind: MoveKind::EnPassant,
        }
    }

    #[inline(always)]
    #[must_use]
    /// Create a castling move. `from`/`to` are the king's travel squares;
    /// `rook_from`/`rook_to` are the rook's.
    pub const fn castling(from: Square, to: Square, rook_from: Square, rook_to: Square) -> Move {
        Move {
            from,
            to,
            kind: MoveKind::Castle { rook_from, rook_to },
        }
    }

    #[inline(always)]
    #[must_use]
    /// Get the square this move's piece starts on.
    pub const fn from_square(self) -> Square {
        self.from
    }

    #[inline(always)]
    #[must_use]
    /// Get the square this move's piece ends on.
    pub const fn to_square(self) -> Square {
        self.to
    }

    #[inline(always)]
    #[must_use]
    /// Get what kind of special move this is.
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    #[inline(always)]
    #[must_use]
    /// Determine whether this move is marked as a promotion.
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind, MoveKind::Promotion(_))
    }

    #[inline(always)]
    #[must_use]
    /// Determine whether this move is marked as a castle.
    pub const fn is_castle(self) -> bool {
        matches!(self.kind, MoveKind::Castle { .. })
    }

    #[inline(always)]
    #[must_use]
    /// Determine whether this move is marked as an en passant capture.
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    #[inline(always)]
    #[must_use]
    /// Get the promotion type of this move, if any. Never a pawn or a king.
    pub const fn promote_type(self) -> Option<Piece> {
        match self.kind {
            MoveKind::Promotion(p) => Some(p),
            _ => None,
        }
    }

    /// Convert a move from its UCI long-algebraic representation (`e2e4`,
    /// `e7e8q`). Does not know whether the move is legal, or a castle or en
    /// passant capture; use [`Move::classify`] against a `Board` for that.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if `s` is not shaped like a UCI move string.
    pub fn from_uci_squares(s: &str) -> Result<(Square, Square, Option<Piece>), ParseError> {
        let bad = || ParseError::BadMoveText { text: s.to_string() };
        if !(s.len() == 4 || s.len() == 5) {
            return Err(bad());
        }
        let from_sq = Square::from_algebraic(&s[0..2])?;
        let to_sq = Square::from_algebraic(&s[2..4])?;
        let promote_type = if s.len() == 5 {
            let charcode = s.chars().nth(4).unwrap();
            Piece::from_code(charcode.to_ascii_uppercase()).ok_or_else(bad)?
        } else {
            return Ok((from_sq, to_sq, None));
        };
        Ok((from_sq, to_sq, Some(promote_type)))
    }

    #[must_use]
    /// Construct a UCI long-algebraic string version of this move.
    pub fn to_uci(self) -> String {
        match self.promote_type() {
            None => format!("{}{}", self.from, self.to),
            Some(p) => format!("{}{}{}", self.from, self.to, p.code().to_lowercase()),
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(pt) = self.promote_type() {
            write!(f, "{}", pt.code())?;
        }
        if self.is_en_passant() {
            write!(f, " [e.p.]")?;
        }
        if self.is_castle() {
            write!(f, " [castle]")?;
        }
        Ok(())
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uci_squares_normal() {
        let (from, to, promo) = Move::from_uci_squares("e2e4").unwrap();
        assert_eq!((from, to, promo), (Square::E2, Square::E4, None));
    }

    #[test]
    fn uci_squares_promotion() {
        let (from, to, promo) = Move::from_uci_squares("b7b8q").unwrap();
        assert_eq!((from, to, promo), (Square::B7, Square::B8, Some(Piece::Queen)));
    }

    #[test]
    fn uci_roundtrip() {
        let m = Move::promoting(Square::B7, Square::B8, Piece::Queen);
        assert_eq!(m.to_uci(), "b7b8q");
    }

    #[test]
    fn rejects_garbage() {
        assert!(Move::from_uci_squares("garbage").is_err());
        assert!(Move::from_uci_squares("e2e4x").is_err());
    }

    #[test]
    fn castle_carries_rook_move_inline() {
        let m = Move::castling(Square::E1, Square::G1, Square::H1, Square::F1);
        assert!(m.is_castle());
        assert_eq!(
            m.kind(),
            MoveKind::Castle {
                rook_from: Square::H1,
                rook_to: Square::F1
            }
        );
    }
}
