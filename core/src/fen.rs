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

//! Forsyth-Edwards Notation import and export.
//!
//! `parse` stages every field into a scratch `Board` before committing
//! anything to the caller, so a malformed FEN never leaves behind a
//! partially-mutated board; `Board::from_fen` then asks the staged board
//! to fill in its derived metadata and validate itself.

use crate::{Board, CastleRights, Color, Piece, Square};

use crate::ParseError;

/// Parse a FEN's piece-placement, side-to-move, castling-rights, and en
/// passant fields into a fresh `Board`. Halfmove clock and fullmove
/// number are accepted but ignored, per `spec.md` - this board is not
/// yet ready for play; `Board::from_fen` calls `finish_loading` on it.
pub fn parse(fen: &str) -> Result<Board, ParseError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ParseError::MalformedFen { found: fields.len() });
    }

    let mut board = Board::empty();
    parse_placement(&mut board, fields[0])?;

    board.player = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(ParseError::MalformedFen { found: fields.len() }),
    };

    board.castle_rights = parse_castle_rights(fields[2])?;

    board.en_passant_square = match fields[3] {
        "-" => None,
        text => Some(Square::from_algebraic(text)?),
    };

    // fields[4] (halfmove clock) and fields[5] (fullmove number) are
    // parsed elsewhere only when needed for display; the board itself
    // does not track them.

    Ok(board)
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), ParseError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseError::BadRank { rank: ranks.len() });
    }
    // FEN lists ranks from 8 down to 1; `Square::new`'s rank is 0-indexed
    // from 1.
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top;
        let mut file = 0usize;
        for ch in rank_str.chars() {
            if let Some(blanks) = ch.to_digit(10) {
                file += blanks as usize;
                continue;
            }
            let color = if ch.is_uppercase() { Color::White } else { Color::Black };
            let pt = Piece::from_code(ch.to_ascii_uppercase())
                .ok_or(ParseError::BadPieceCode { ch })?;
            let sq = Square::new(rank, file).ok_or(ParseError::BadRank { rank })?;
            board.add_piece(sq, pt, color);
            file += 1;
        }
        if file != 8 {
            return Err(ParseError::BadRank { rank });
        }
    }
    Ok(())
}

fn parse_castle_rights(field: &str) -> Result<CastleRights, ParseError> {
    if field == "-" {
        return Ok(CastleRights::NO_RIGHTS);
    }
    let mut rights = CastleRights::NO_RIGHTS;
    for ch in field.chars() {
        rights |= match ch {
            'K' => CastleRights::king_castle(Color::White),
            'Q' => CastleRights::queen_castle(Color::White),
            'k' => CastleRights::king_castle(Color::Black),
            'q' => CastleRights::queen_castle(Color::Black),
            _ => return Err(ParseError::BadCastleRights { ch }),
        };
    }
    Ok(rights)
}

/// Render `board` as a FEN string. Halfmove clock and fullmove number are
/// not tracked by `Board`, so they are always emitted as `0 1`.
#[must_use]
pub fn emit(board: &Board) -> String {
    let mut placement = String::new();
    for rank in (0..8).rev() {
        let mut blanks = 0u32;
        for file in 0..8 {
            let sq = Square::new(rank, file).unwrap();
            match board.type_at_square(sq) {
                None => blanks += 1,
                Some(pt) => {
                    if blanks > 0 {
                        placement.push_str(&blanks.to_string());
                        blanks = 0;
                    }
                    let code = pt.code();
                    match board.color_at_square(sq).unwrap() {
                        Color::White => placement.push_str(code),
                        Color::Black => placement.push_str(&code.to_lowercase()),
                    }
                }
            }
        }
        if blanks > 0 {
            placement.push_str(&blanks.to_string());
        }
        if rank != 0 {
            placement.push('/');
        }
    }

    let player = match board.player {
        Color::White => "w",
        Color::Black => "b",
    };

    let mut castling = String::new();
    if board.castle_rights.is_kingside_castle_legal(Color::White) {
        castling.push('K');
    }
    if board.castle_rights.is_queenside_castle_legal(Color::White) {
        castling.push('Q');
    }
    if board.castle_rights.is_kingside_castle_legal(Color::Black) {
        castling.push('k');
    }
    if board.castle_rights.is_queenside_castle_legal(Color::Black) {
        castling.push('q');
    }
    if castling.is_empty() {
        castling.push('-');
    }

    let ep = match board.en_passant_square {
        Some(sq) => sq.to_string(),
        None => "-".to_string(),
    };

    format!("{placement} {player} {castling} {ep} 0 1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_round_trips() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn rejects_too_few_fields() {
        assert!(Board::from_fen("8/8/8/8/8/8/8/8 w").is_err());
    }

    #[test]
    fn rejects_bad_rank_total() {
        assert!(Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
    }

    #[test]
    fn rejects_unrecognized_piece_code() {
        assert!(Board::from_fen("xnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
    }

    #[test]
    fn en_passant_field_parses_a_square() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.en_passant_square, Some(Square::E3));
    }
}
