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

use thera_core::{movegen, Board, Move};

use super::{GoOption, UciCommand};

/// The result type for processing a line from a UCI command. Per the UCI
/// protocol, these errors should generally just be logged and the line
/// otherwise ignored.
pub type UciParseResult = Result<UciCommand, String>;

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Classify a raw UCI move string (`e2e4`, `e7e8q`) against the legal moves
/// available in `board`. `Move::from_uci_squares` alone can't tell a plain
/// king step from a castle or an ordinary pawn push from an en passant
/// capture, so the only reliable way to recover the full `Move` - with its
/// `MoveKind` - is to find the legal move it names.
fn classify_uci_move(tok: &str, board: &Board) -> Result<Move, String> {
    let (from, to, promote_type) =
        Move::from_uci_squares(tok).map_err(|e| format!("could not parse UCI move: {e}"))?;
    movegen::get_moves(board)
        .into_iter()
        .find(|m| m.from_square() == from && m.to_square() == to && m.promote_type() == promote_type)
        .ok_or_else(|| format!("move {tok} is not legal in this position"))
}

/// Perform a read of a single UCI instruction. A board state is given so
/// that `go searchmoves` and `position ... moves` can be resolved into fully
/// classified moves.
pub fn parse_line(line: &str, board: &Board) -> UciParseResult {
    let mut tokens = line.split_ascii_whitespace();
    let first_tok = tokens.next().ok_or("line contains no tokens")?;
    match first_tok {
        "uci" => Ok(UciCommand::Uci),
        "debug" => match tokens.next() {
            Some("on") | None => Ok(UciCommand::Debug(true)),
            Some("off") => Ok(UciCommand::Debug(false)),
            _ => Err("unrecognized option".into()),
        },
        "isready" => Ok(UciCommand::IsReady),
        "setoption" => parse_set_option(&mut tokens),
        "ucinewgame" => Ok(UciCommand::NewGame),
        "position" => parse_position(&mut tokens),
        "go" => parse_go(&mut tokens, board),
        "stop" => Ok(UciCommand::Stop),
        "ponderhit" => Ok(UciCommand::PonderHit),
        "quit" => Ok(UciCommand::Quit),
        _ => Err("unrecognized UCI command".into()),
    }
}

/// Parse a `setoption` line. Assumes the `setoption` token has already been
/// consumed, so the next token will be `name`.
fn parse_set_option(tokens: &mut dyn Iterator<Item = &str>) -> UciParseResult {
    let name_tok = tokens
        .next()
        .ok_or("reached end of line while searching for `name` field in `setoption`")?;
    if name_tok != "name" {
        return Err(format!(
            "expected token `name` for `setoption`, got `{name_tok}`"
        ));
    }

    let mut key = String::new();
    loop {
        let key_tok = match tokens.next() {
            Some(tok) => tok,
            None => {
                return Ok(UciCommand::SetOption {
                    name: key,
                    value: None,
                })
            }
        };
        if key_tok == "value" {
            break;
        }
        if !key.is_empty() {
            key += " ";
        }
        key += key_tok;
    }

    let mut value = String::new();
    loop {
        let val_tok = match tokens.next() {
            Some(val) => val,
            None => {
                return Ok(UciCommand::SetOption {
                    name: key,
                    value: Some(value),
                })
            }
        };
        if !value.is_empty() {
            value += " ";
        }
        value += val_tok;
    }
}

/// Parse a `position` command. Assumes the `position` token has already
/// been consumed, so the next token is either `fen` or `startpos`.
fn parse_position(tokens: &mut dyn Iterator<Item = &str>) -> UciParseResult {
    let start_fen = match tokens
        .next()
        .ok_or_else(|| "reached EOL while parsing position".to_string())?
    {
        "fen" => {
            let mut fen = String::new();
            let mut next_tok = tokens.next().ok_or("reached EOL while parsing FEN")?;
            loop {
                if next_tok == "moves" {
                    break;
                }
                if !fen.is_empty() {
                    fen += " ";
                }
                fen += next_tok;
                next_tok = tokens.next().ok_or("reached EOL while parsing FEN")?;
            }
            Some(fen)
        }
        "startpos" => {
            let moves_tok = tokens.next().ok_or("reached EOL while parsing position")?;
            if moves_tok != "moves" {
                return Err(format!(
                    "expected token `moves` after `startpos`, got {moves_tok}"
                ));
            }
            None
        }
        _ => return Err("illegal starting position token".to_string()),
    };

    let mut board = Board::from_fen(start_fen.as_deref().unwrap_or(STARTPOS_FEN))
        .map_err(|e| e.to_string())?;

    let mut moves = Vec::new();
    for tok in tokens {
        let m = classify_uci_move(tok, &board)?;
        board.apply_move(m);
        moves.push(m);
    }

    Ok(UciCommand::Position {
        fen: start_fen,
        moves,
    })
}

/// Parse a `go` command. Assumes the `go` token has already been consumed.
/// The current board is needed to resolve `searchmoves` into legal moves.
fn parse_go(tokens: &mut dyn Iterator<Item = &str>, board: &Board) -> UciParseResult {
    let mut opts = Vec::new();
    let mut peeks = tokens.peekable();
    while let Some(opt_tok) = peeks.next() {
        opts.push(match opt_tok {
            "searchmoves" => {
                let mut moves = Vec::new();
                loop {
                    match peeks.peek() {
                        Some(m_tok) => {
                            if let Ok(m) = classify_uci_move(m_tok, board) {
                                moves.push(m);
                                peeks.next()
                            } else {
                                break;
                            }
                        }
                        None => break,
                    };
                }
                GoOption::SearchMoves(moves)
            }
            "ponder" => GoOption::Ponder,
            "wtime" => GoOption::WhiteTime(parse_int(peeks.next())? as u32),
            "btime" => GoOption::BlackTime(parse_int(peeks.next())? as u32),
            "winc" => GoOption::WhiteInc(parse_int(peeks.next())? as u32),
            "binc" => GoOption::BlackInc(parse_int(peeks.next())? as u32),
            "movestogo" => GoOption::MovesToGo(parse_int(peeks.next())? as u8),
            "depth" => GoOption::Depth(parse_int(peeks.next())? as u8),
            "nodes" => GoOption::Nodes(parse_int(peeks.next())?),
            "mate" => GoOption::Mate(parse_int(peeks.next())? as u8),
            "movetime" => GoOption::MoveTime(parse_int(peeks.next())? as u32),
            "infinite" => GoOption::Infinite,
            _ => return Err(format!("unrecognized option {opt_tok} for `go`")),
        });
    }

    Ok(UciCommand::Go(opts))
}

/// Parse an integer token for `go`, failing if it's missing or malformed.
fn parse_int(x: Option<&str>) -> Result<u64, String> {
    match x {
        None => Err("reached EOF while parsing int".into()),
        Some(s) => s
            .parse()
            .map_err(|e| format!("could not parse int due to error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thera_core::Square;

    #[test]
    fn position_starting() {
        assert_eq!(
            parse_line("position startpos moves\n", &Board::new()),
            Ok(UciCommand::Position {
                fen: None,
                moves: Vec::new()
            })
        );
    }

    #[test]
    fn position_fen() {
        assert_eq!(
            parse_line(
                "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1 moves\n",
                &Board::new()
            ),
            Ok(UciCommand::Position {
                fen: Some("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".into()),
                moves: Vec::new()
            })
        );
    }

    #[test]
    fn position_fen_then_moves() {
        assert_eq!(
            parse_line(
                "position fen rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1 moves c7c5 g1f3\n",
                &Board::new()
            ),
            Ok(UciCommand::Position {
                fen: Some("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".into()),
                moves: vec![
                    Move::normal(Square::C7, Square::C5),
                    Move::normal(Square::G1, Square::F3)
                ]
            })
        );
    }

    #[test]
    fn position_moves_classifies_castle() {
        let result = parse_line(
            "position fen r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1 moves e1g1\n",
            &Board::new(),
        )
        .unwrap();
        match result {
            UciCommand::Position { moves, .. } => {
                assert_eq!(moves.len(), 1);
                assert!(moves[0].is_castle());
            }
            _ => panic!("expected a Position command"),
        }
    }

    #[test]
    fn setoption_key_only() {
        assert_eq!(
            parse_line("setoption name MyOption\n", &Board::new()),
            Ok(UciCommand::SetOption {
                name: "MyOption".into(),
                value: None
            })
        );
    }

    #[test]
    fn setoption_key_value() {
        assert_eq!(
            parse_line("setoption name my option value 4 or 5\n", &Board::new()),
            Ok(UciCommand::SetOption {
                name: "my option".into(),
                value: Some("4 or 5".into())
            })
        );
    }

    #[test]
    fn go_simple() {
        assert_eq!(
            parse_line("go depth 7 nodes 25\n", &Board::new()),
            Ok(UciCommand::Go(vec![GoOption::Depth(7), GoOption::Nodes(25),]))
        );
    }

    #[test]
    fn go_all() {
        assert_eq!(
            parse_line(
                "go depth 7 nodes 250 infinite searchmoves e2e4 wtime 1 btime 2 winc 3 binc 4 movestogo 5 mate 6 movetime 7 ponder\n",
                &Board::new()
            ),
            Ok(UciCommand::Go(vec![
                GoOption::Depth(7),
                GoOption::Nodes(250),
                GoOption::Infinite,
                GoOption::SearchMoves(vec![Move::normal(Square::E2, Square::E4)]),
                GoOption::WhiteTime(1),
                GoOption::BlackTime(2),
                GoOption::WhiteInc(3),
                GoOption::BlackInc(4),
                GoOption::MovesToGo(5),
                GoOption::Mate(6),
                GoOption::MoveTime(7),
                GoOption::Ponder,
            ]))
        );
    }

    #[test]
    fn go_searchmoves_does_not_eat_following_options() {
        assert_eq!(
            parse_line("go searchmoves e2e4 infinite\n", &Board::new()),
            Ok(UciCommand::Go(vec![
                GoOption::SearchMoves(vec![Move::normal(Square::E2, Square::E4)]),
                GoOption::Infinite,
            ]))
        );
    }

    #[test]
    fn uci_command() {
        assert_eq!(parse_line("uci\n", &Board::new()), Ok(UciCommand::Uci));
    }

    #[test]
    fn debug_on_off() {
        assert_eq!(
            parse_line("debug on\n", &Board::new()),
            Ok(UciCommand::Debug(true))
        );
        assert_eq!(
            parse_line("debug off\n", &Board::new()),
            Ok(UciCommand::Debug(false))
        );
    }
}
