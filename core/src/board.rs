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

//! The board: piece placement, game-state metadata, and the reversible
//! move stack used to make and unmake moves during search.

use crate::{movegen, CastleRights, Color, Move, MoveKind, ParseError, Piece, Square, Zobrist};
use crate::Bitboard;

use std::{
    fmt::{Display, Formatter},
    ops::Index,
};

use nohash_hasher::IntMap;

#[derive(Clone, Debug)]
/// A representation of a position, including enough history (the rewind
/// stack and repetition counter) to make and unmake moves during search
/// and to detect threefold repetition.
pub struct Board {
    /// The squares occupied by White and Black, respectively.
    sides: [Bitboard; 2],
    /// The squares occupied by (in order) knights, bishops, rooks, queens,
    /// pawns, and kings.
    pieces: [Bitboard; Piece::NUM_TYPES],
    /// The color of the player to move.
    pub player: Color,
    /// The square a pawn could move to by capturing en passant. `None`
    /// unless a pawn moved two squares on the previous move.
    pub en_passant_square: Option<Square>,
    /// The rights each side has remaining for castling.
    pub castle_rights: CastleRights,
    /// A saved Zobrist hash. If the board is valid this must always equal
    /// the output of `get_fresh_hash`.
    pub hash: u64,
    /// The squares occupied by pieces currently checking `player`'s king.
    pub checkers: Bitboard,
    /// The squares the kings live on: `king_sqs[Color::White as usize]` is
    /// White's king, and likewise for Black.
    pub king_sqs: [Square; 2],
    /// The squares containing pieces pinned against `player`'s king.
    pub pinned: Bitboard,
    /// Snapshots taken before each move was applied, most recent last.
    rewind_stack: Vec<Undo>,
    /// How many times each Zobrist hash has occurred along the game so
    /// far (including the current position), for threefold-repetition
    /// detection.
    repetitions: IntMap<u64, u32>,
}

#[derive(Clone, Copy, Debug)]
/// Everything about a `Board` that `apply_move` changes, saved so
/// `rewind_move` can restore it exactly.
struct Undo {
    sides: [Bitboard; 2],
    pieces: [Bitboard; Piece::NUM_TYPES],
    player: Color,
    en_passant_square: Option<Square>,
    castle_rights: CastleRights,
    hash: u64,
    checkers: Bitboard,
    king_sqs: [Square; 2],
    pinned: Bitboard,
}

impl Undo {
    fn snapshot(board: &Board) -> Undo {
        Undo {
            sides: board.sides,
            pieces: board.pieces,
            player: board.player,
            en_passant_square: board.en_passant_square,
            castle_rights: board.castle_rights,
            hash: board.hash,
            checkers: board.checkers,
            king_sqs: board.king_sqs,
            pinned: board.pinned,
        }
    }
}

impl Board {
    /// Construct a `Board` from the standard chess starting position.
    #[must_use]
    pub fn new() -> Board {
        let mut board = Board {
            sides: [
                Bitboard::EMPTY, // white
                Bitboard::EMPTY, // black
            ],
            pieces: [Bitboard::EMPTY; Piece::NUM_TYPES],
            en_passant_square: None,
            player: Color::White,
            castle_rights: CastleRights::ALL_RIGHTS,
            hash: 0,
            king_sqs: [Square::E1, Square::E8],
            checkers: Bitboard::EMPTY,
            pinned: Bitboard::EMPTY,
            rewind_stack: Vec::new(),
            repetitions: IntMap::default(),
        };
        for &(sq, pt) in &[
            (Square::B1, Piece::Knight),
            (Square::G1, Piece::Knight),
            (Square::C1, Piece::Bishop),
            (Square::F1, Piece::Bishop),
            (Square::A1, Piece::Rook),
            (Square::H1, Piece::Rook),
            (Square::D1, Piece::Queen),
            (Square::E1, Piece::King),
        ] {
            board.add_piece(sq, pt, Color::White);
        }
        for file in 0..8 {
            board.add_piece(Square::new(1, file).unwrap(), Piece::Pawn, Color::White);
            board.add_piece(Square::new(6, file).unwrap(), Piece::Pawn, Color::Black);
        }
        for &(sq, pt) in &[
            (Square::B8, Piece::Knight),
            (Square::G8, Piece::Knight),
            (Square::C8, Piece::Bishop),
            (Square::F8, Piece::Bishop),
            (Square::A8, Piece::Rook),
            (Square::H8, Piece::Rook),
            (Square::D8, Piece::Queen),
            (Square::E8, Piece::King),
        ] {
            board.add_piece(sq, pt, Color::Black);
        }
        board.recompute_hash();
        *board.repetitions.entry(board.hash).or_insert(0) += 1;
        board
    }

    /// Construct an empty board with no history, ready to be populated by
    /// a FEN parser. Not a legal position on its own.
    #[must_use]
    pub(crate) fn empty() -> Board {
        Board {
            sides: [Bitboard::EMPTY; 2],
            pieces: [Bitboard::EMPTY; Piece::NUM_TYPES],
            en_passant_square: None,
            player: Color::White,
            castle_rights: CastleRights::NO_RIGHTS,
            hash: 0,
            checkers: Bitboard::EMPTY,
            king_sqs: [Square::A1; 2],
            pinned: Bitboard::EMPTY,
            rewind_stack: Vec::new(),
            repetitions: IntMap::default(),
        }
    }

    /// Create a `Board` from a FEN string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the FEN is malformed or describes an illegal
    /// position.
    pub fn from_fen(fen: &str) -> Result<Board, ParseError> {
        let mut board = crate::fen::parse(fen)?;
        board.finish_loading()?;
        Ok(board)
    }

    /// Render this board back to a FEN string. Halfmove clock and fullmove
    /// number are not tracked, so they are always emitted as `0 1`.
    #[must_use]
    pub fn to_fen(&self) -> String {
        crate::fen::emit(self)
    }

    /// After piece placement, side to move, castle rights, and en passant
    /// square have been staged (by `from_fen` or by test fixtures), fill
    /// in the derived metadata and validate the result.
    pub(crate) fn finish_loading(&mut self) -> Result<(), ParseError> {
        self.recompute_hash();
        self.king_sqs = [
            self.single_piece_square(Piece::King, Color::White)?,
            self.single_piece_square(Piece::King, Color::Black)?,
        ];
        self.checkers = movegen::square_attackers(self, self.king_sqs[self.player as usize], !self.player);
        self.recompute_pinned();
        if !self.is_valid() {
            return Err(ParseError::MalformedFen { found: 0 });
        }
        self.repetitions.clear();
        *self.repetitions.entry(self.hash).or_insert(0) += 1;
        Ok(())
    }

    fn single_piece_square(&self, pt: Piece, color: Color) -> Result<Square, ParseError> {
        let bb = self[pt] & self[color];
        if bb.len() != 1 {
            return Err(ParseError::MalformedFen { found: bb.len() as usize });
        }
        Ok(bb.into_iter().next().unwrap())
    }

    #[inline(always)]
    #[must_use]
    /// Get the squares occupied by any piece of either color.
    pub fn occupancy(&self) -> Bitboard {
        self[Color::White] | self[Color::Black]
    }

    #[inline(always)]
    #[must_use]
    /// Get the type of the piece occupying a given square, if any.
    pub fn type_at_square(&self, sq: Square) -> Option<Piece> {
        for pt in Piece::ALL_TYPES {
            if self[pt].contains(sq) {
                return Some(pt);
            }
        }
        None
    }

    #[inline(always)]
    #[must_use]
    /// Get the color of the piece occupying a given square, if any.
    pub fn color_at_square(&self, sq: Square) -> Option<Color> {
        if self[Color::White].contains(sq) {
            return Some(Color::White);
        }
        if self[Color::Black].contains(sq) {
            return Some(Color::Black);
        }
        None
    }

    #[inline(always)]
    #[must_use]
    /// Is `m` a capture in the current position? Requires that `m` is
    /// legal. En passant counts as a capture even though the destination
    /// square is empty.
    pub fn is_move_capture(&self, m: Move) -> bool {
        self.occupancy().contains(m.to_square()) || m.is_en_passant()
    }

    #[must_use]
    /// Has this exact position (by Zobrist hash) occurred three or more
    /// times so far in the game? Used by search to score a line as a
    /// draw rather than searching it further.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions.get(&self.hash).copied().unwrap_or(0) >= 3
    }

    #[must_use]
    /// Is this board in a state that could plausibly arise from a legal
    /// game? Checks bitboard consistency, the saved hash, and that the
    /// king squares and checkers are accurate.
    fn is_valid(&self) -> bool {
        let mut sides_checksum = Bitboard::EMPTY;
        let mut sides_checkor = Bitboard::EMPTY;
        let mut pieces_checksum = Bitboard::EMPTY;
        let mut pieces_checkor = Bitboard::EMPTY;
        for bb in self.sides {
            if !(sides_checksum & bb).is_empty() {
                return false;
            }
            sides_checksum |= bb;
            sides_checkor |= bb;
        }
        for bb in self.pieces {
            if !(pieces_checksum & bb).is_empty() {
                return false;
            }
            pieces_checksum |= bb;
            pieces_checkor |= bb;
        }
        if sides_checksum != sides_checkor || pieces_checksum != pieces_checkor {
            return false;
        }
        if sides_checksum != pieces_checksum {
            return false;
        }
        if self.hash != self.get_fresh_hash() {
            return false;
        }
        let w_king_bb = self[Piece::King] & self[Color::White];
        let b_king_bb = self[Piece::King] & self[Color::Black];
        if w_king_bb != Bitboard::from(self.king_sqs[Color::White as usize]) {
            return false;
        }
        if b_king_bb != Bitboard::from(self.king_sqs[Color::Black as usize]) {
            return false;
        }
        self.checkers == movegen::square_attackers(self, self.king_sqs[self.player as usize], !self.player)
    }

    /// Apply `m` to the board, assuming it is legal. Pushes a snapshot
    /// onto the rewind stack so the move can later be undone with
    /// `rewind_move`.
    pub fn apply_move(&mut self, m: Move) {
        self.rewind_stack.push(Undo::snapshot(self));

        let from_sq = m.from_square();
        let to_sq = m.to_square();
        let player = self.player;
        let opponent = !player;
        let is_long_move = from_sq.chebyshev_to(to_sq) > 1;
        let mover_type = self
            .type_at_square(from_sq)
            .expect("apply_move: no piece on the move's from-square");
        let is_pawn_move = mover_type == Piece::Pawn;
        let is_king_move = mover_type == Piece::King;

        if let MoveKind::Castle { rook_from, rook_to } = m.kind() {
            self.remove_known_piece(rook_from, Piece::Rook, player);
            self.add_piece(rook_to, Piece::Rook, player);
        }

        if let Some(captured) = self.type_at_square(to_sq) {
            self.remove_known_piece(to_sq, captured, opponent);
        }

        match m.promote_type() {
            Some(promote_to) => self.add_piece(to_sq, promote_to, player),
            None => self.add_piece(to_sq, mover_type, player),
        }
        self.remove_known_piece(from_sq, mover_type, player);

        if m.is_en_passant() {
            let captured_sq = Square::new(from_sq.rank(), to_sq.file())
                .expect("en passant capture square must be on the board");
            self.remove_known_piece(captured_sq, Piece::Pawn, opponent);
        }

        self.hash ^= Zobrist::ep_key(self.en_passant_square);
        self.en_passant_square = if is_pawn_move && is_long_move {
            Square::new((from_sq.rank() + to_sq.rank()) / 2, from_sq.file())
        } else {
            None
        };
        self.hash ^= Zobrist::ep_key(self.en_passant_square);

        let mut rights_to_remove =
            CastleRights::rights_lost_by_touching(from_sq) | CastleRights::rights_lost_by_touching(to_sq);
        if is_king_move {
            rights_to_remove |= CastleRights::color_rights(player);
        }
        self.remove_castle_rights(rights_to_remove);

        self.player = !self.player;
        // A fixed key, XORed every ply: since it toggles exactly once per
        // move, the hash always reflects whether it is Black's turn.
        self.hash ^= Zobrist::player_key(Color::Black);

        if is_king_move {
            self.king_sqs[player as usize] = to_sq;
        }

        self.checkers = movegen::square_attackers(self, self.king_sqs[self.player as usize], !self.player);
        self.recompute_pinned();

        *self.repetitions.entry(self.hash).or_insert(0) += 1;
    }

    /// Undo the most recently applied move.
    ///
    /// # Panics
    ///
    /// Panics if the rewind stack is empty, i.e. if this is called more
    /// times than `apply_move` - a caller bug, not a user-facing error.
    pub fn rewind_move(&mut self) {
        if let Some(count) = self.repetitions.get_mut(&self.hash) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&self.hash);
            }
        }
        let undo = self
            .rewind_stack
            .pop()
            .expect("rewind_move called with an empty rewind stack");
        self.sides = undo.sides;
        self.pieces = undo.pieces;
        self.player = undo.player;
        self.en_passant_square = undo.en_passant_square;
        self.castle_rights = undo.castle_rights;
        self.hash = undo.hash;
        self.checkers = undo.checkers;
        self.king_sqs = undo.king_sqs;
        self.pinned = undo.pinned;
    }

    #[inline(always)]
    fn remove_known_piece(&mut self, sq: Square, pt: Piece, color: Color) {
        self.hash ^= Zobrist::square_key(sq, pt, color);
        self.pieces[pt as usize].remove(sq);
        self.sides[color as usize].remove(sq);
    }

    #[inline(always)]
    pub(crate) fn add_piece(&mut self, sq: Square, pt: Piece, color: Color) {
        self.pieces[pt as usize].insert(sq);
        self.sides[color as usize].insert(sq);
        self.hash ^= Zobrist::square_key(sq, pt, color);
    }

    /// Remove `rights_to_remove` from this board's castling rights,
    /// keeping the Zobrist hash in sync.
    fn remove_castle_rights(&mut self, rights_to_remove: CastleRights) {
        let rights_actually_removed = rights_to_remove & self.castle_rights;
        for i in 0..4 {
            if 1 << i & rights_actually_removed.0 != 0 {
                self.hash ^= Zobrist::castle_key(i);
            }
        }
        self.castle_rights &= !rights_actually_removed;
    }

    #[inline(always)]
    fn recompute_hash(&mut self) {
        self.hash = self.get_fresh_hash();
    }

    /// Recompute which pieces are pinned against `player`'s king.
    fn recompute_pinned(&mut self) {
        self.pinned = Bitboard::EMPTY;
        let king_sq = self.king_sqs[self.player as usize];
        let occupancy = self.occupancy();
        let snipers = self[!self.player]
            & (movegen::slider_attacks(Bitboard::EMPTY, king_sq, &crate::Direction::ROOK_DIRECTIONS)
                & (self[Piece::Queen] | self[Piece::Rook])
                | movegen::slider_attacks(Bitboard::EMPTY, king_sq, &crate::Direction::BISHOP_DIRECTIONS)
                    & (self[Piece::Queen] | self[Piece::Bishop]));

        for sniper_sq in snipers {
            let between_bb = movegen::between(king_sq, sniper_sq);
            if (between_bb & occupancy).has_single_bit() {
                self.pinned |= between_bb;
            }
        }
    }

    #[must_use]
    /// Is this position a draw by insufficient material (FIDE rules,
    /// the common subset: bare kings, KNK/KBK, or same-colored-bishop
    /// endgames)?
    pub fn insufficient_material(&self) -> bool {
        const DARK_SQUARES: Bitboard = Bitboard::new(0xAA55_AA55_AA55_AA55);
        match self.occupancy().len() {
            0 | 1 => unreachable!("a king is always on the board"),
            2 => true,
            3 => !(self[Piece::Knight] | self[Piece::Bishop]).is_empty(),
            4 => {
                self[Piece::Bishop].more_than_one()
                    && !(self[Piece::Bishop] & DARK_SQUARES).has_single_bit()
            }
            _ => false,
        }
    }

    /// Recompute the Zobrist hash from scratch. Used for validation; the
    /// hash is otherwise maintained incrementally by `apply_move`.
    fn get_fresh_hash(&self) -> u64 {
        let mut hash = 0;
        for pt in Piece::ALL_TYPES {
            for color in [Color::White, Color::Black] {
                for sq in self[pt] & self[color] {
                    hash ^= Zobrist::square_key(sq, pt, color);
                }
            }
        }
        for i in 0..4 {
            if 1 << i & self.castle_rights.0 != 0 {
                hash ^= Zobrist::castle_key(i);
            }
        }
        hash ^= Zobrist::ep_key(self.en_passant_square);
        hash ^= Zobrist::player_key(self.player);
        hash
    }
}

impl Display for Board {
    /// Render the board as 8 lines, 8th rank first, White pieces
    /// uppercase and Black lowercase.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for r in (0..8).rev() {
            for c in 0..8 {
                let sq = Square::new(r, c).unwrap();
                match self.type_at_square(sq) {
                    Some(p) => match self.color_at_square(sq).unwrap() {
                        Color::White => write!(f, "{p}")?,
                        Color::Black => write!(f, "{}", p.code().to_lowercase())?,
                    },
                    None => write!(f, ".")?,
                }
                write!(f, " ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl PartialEq for Board {
    /// Two boards compare equal if they describe the same position, not
    /// if they have taken the same path to get there (rewind stack and
    /// repetition counts are excluded).
    fn eq(&self, other: &Board) -> bool {
        self.sides == other.sides
            && self.pieces == other.pieces
            && self.en_passant_square == other.en_passant_square
            && self.player == other.player
            && self.castle_rights == other.castle_rights
    }
}

impl Index<Piece> for Board {
    type Output = Bitboard;
    #[inline(always)]
    fn index(&self, index: Piece) -> &Self::Output {
        &self.pieces[index as usize]
    }
}

impl Index<Color> for Board {
    type Output = Bitboard;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self.sides[index as usize]
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_32_pieces() {
        let board = Board::new();
        assert_eq!(board.occupancy().len(), 32);
        assert_eq!(board.king_sqs, [Square::E1, Square::E8]);
    }

    #[test]
    fn apply_and_rewind_restores_position() {
        let mut board = Board::new();
        let before = board.clone();
        board.apply_move(Move::normal(Square::E2, Square::E4));
        assert_ne!(board, before);
        assert_eq!(board.en_passant_square, Some(Square::E3));
        board.rewind_move();
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_square_only_set_after_double_push() {
        let mut board = Board::new();
        board.apply_move(Move::normal(Square::G1, Square::F3));
        assert_eq!(board.en_passant_square, None);
    }

    #[test]
    fn fen_roundtrip_through_starting_position() {
        let board = Board::new();
        let fen_board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(board, fen_board);
    }

    #[test]
    fn repetition_counter_detects_threefold() {
        let mut board = Board::new();
        assert!(!board.is_threefold_repetition());
        for _ in 0..2 {
            board.apply_move(Move::normal(Square::G1, Square::F3));
            board.apply_move(Move::normal(Square::G8, Square::F6));
            board.apply_move(Move::normal(Square::F3, Square::G1));
            board.apply_move(Move::normal(Square::F6, Square::G8));
        }
        assert!(board.is_threefold_repetition());
    }

    #[test]
    fn insufficient_material_detects_bare_kings() {
        let board = Board::from_fen("8/8/3k4/8/8/2K5/8/8 w - - 0 1").unwrap();
        assert!(board.insufficient_material());
    }
}
