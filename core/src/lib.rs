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

//! Shared board representation and move generation for the Thera engine.
//!
//! This crate has no notion of search or evaluation; it only knows how to
//! represent a position, generate legal moves from it, and count leaf nodes
//! (`perft`) for correctness testing.

pub mod algebraic;

mod bitboard;
pub use bitboard::Bitboard;

mod board;
pub use board::Board;

mod castling;
pub use castling::CastleRights;

mod color;
pub use color::Color;

mod direction;
pub use direction::Direction;

pub mod error;
pub use error::ParseError;

pub mod fen;

mod r#move;
pub use r#move::{Move, MoveKind};

pub mod movegen;

pub mod perft;

mod piece;
pub use piece::Piece;

mod square;
pub use square::Square;

mod tables;

mod zobrist;
pub use zobrist::Zobrist;
