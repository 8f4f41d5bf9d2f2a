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

//! Parse errors shared across FEN, algebraic, and move-notation parsing.

use std::fmt;

/// An error produced while parsing user- or GUI-supplied text into a
/// board type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A FEN string did not have the expected number of fields.
    MalformedFen {
        /// The fields found, for diagnostic display.
        found: usize,
    },
    /// A FEN board field described a rank with the wrong number of squares.
    BadRank {
        /// 0-indexed rank, counted from the FEN's first (8th) rank.
        rank: usize,
    },
    /// A character could not be interpreted as a piece code.
    BadPieceCode {
        /// The offending character.
        ch: char,
    },
    /// A square name was not two characters in `[a-h][1-8]`.
    BadSquareName {
        /// The offending text.
        text: String,
    },
    /// A castling-rights field contained an unrecognized character.
    BadCastleRights {
        /// The offending character.
        ch: char,
    },
    /// A move string was not a valid long algebraic move (e.g. `e2e4`, `e7e8q`).
    BadMoveText {
        /// The offending text.
        text: String,
    },
    /// A UCI command line was not recognized.
    UnknownUciCommand {
        /// The offending line.
        line: String,
    },
    /// A numeric field (depth, time, etc.) failed to parse.
    BadNumber {
        /// The offending text.
        text: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MalformedFen { found } => {
                write!(f, "FEN must have 6 fields, found {found}")
            }
            ParseError::BadRank { rank } => write!(f, "rank {rank} does not sum to 8 squares"),
            ParseError::BadPieceCode { ch } => write!(f, "'{ch}' is not a valid piece code"),
            ParseError::BadSquareName { text } => write!(f, "'{text}' is not a square name"),
            ParseError::BadCastleRights { ch } => {
                write!(f, "'{ch}' is not a valid castling-rights character")
            }
            ParseError::BadMoveText { text } => write!(f, "'{text}' is not a legal move string"),
            ParseError::UnknownUciCommand { line } => {
                write!(f, "unrecognized UCI command: '{line}'")
            }
            ParseError::BadNumber { text } => write!(f, "'{text}' is not a valid number"),
        }
    }
}

impl std::error::Error for ParseError {}
