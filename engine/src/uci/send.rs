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

use std::{fmt, time::Duration};

use thera_core::Move;

use crate::eval::Eval;

#[derive(Clone, PartialEq)]
/// Every message the engine can send back to the GUI, over stdout.
pub enum UciMessage<'a> {
    /// Identify the engine. Sent in reply to `UciCommand::Uci`.
    Id { name: Option<&'a str>, author: Option<&'a str> },
    /// Sent after `Id` and every `Option`, to end the handshake.
    UciOk,
    /// Sent in reply to `UciCommand::IsReady` once the engine is idle.
    ReadyOk,
    /// Tell the GUI about one configurable option.
    Option { name: &'a str, opt: OptionType<'a> },
    /// The search concluded (or was stopped) with this best move, and
    /// optionally a move to ponder on.
    BestMove { m: Move, ponder: Option<Move> },
    /// Progress information about an in-flight search.
    Info(&'a [EngineInfo<'a>]),
}

#[derive(Clone, Debug, PartialEq)]
/// One piece of search-progress information, combined into an `info` line.
pub enum EngineInfo<'a> {
    Depth(u8),
    SelDepth(u8),
    Time(Duration),
    Nodes(u64),
    Pv(&'a [Move]),
    MultiPv(u8),
    /// The position's evaluation, and whether it's only a bound (because
    /// the search failed high or low against its aspiration window).
    Score {
        eval: Eval,
        is_lower_bound: bool,
        is_upper_bound: bool,
    },
    CurrMove(Move),
    CurrMoveNumber(u8),
    /// Transposition table fill rate, out of 1000.
    HashFull(u16),
    NodeSpeed(u64),
    /// A free-text string for the GUI to display. Must not contain `\n`.
    String(&'a str),
}

#[derive(Clone, Debug, PartialEq)]
/// The kind of widget the GUI should show the user for one `Option`.
pub enum OptionType<'a> {
    Spin { default: i64, min: i64, max: i64 },
    String(Option<&'a str>),
    Check(Option<bool>),
    Combo { default: Option<&'a str>, vars: &'a [&'a str] },
    Button,
}

impl<'a> fmt::Display for UciMessage<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciMessage::Id { name, author } => {
                write!(f, "id")?;
                if let Some(n) = name {
                    write!(f, " name {n}")?;
                }
                if let Some(a) = author {
                    if name.is_some() {
                        write!(f, "\nid")?;
                    }
                    write!(f, " author {a}")?;
                }
            }
            UciMessage::UciOk => write!(f, "uciok")?,
            UciMessage::ReadyOk => write!(f, "readyok")?,
            UciMessage::Option { name, ref opt } => write_option(f, name, opt)?,
            UciMessage::BestMove { m, ponder } => {
                write!(f, "bestmove {}", m.to_uci())?;
                if let Some(pondermove) = ponder {
                    write!(f, " ponder {}", pondermove.to_uci())?;
                }
            }
            UciMessage::Info(info) => write_info(f, info)?,
        };
        Ok(())
    }
}

fn write_option(f: &mut fmt::Formatter, name: &str, opt: &OptionType) -> fmt::Result {
    write!(f, "option name {name} ")?;
    match opt {
        OptionType::Spin { default, min, max } => {
            write!(f, "type spin default {default} min {min} max {max}")?;
        }
        OptionType::String(s) => {
            write!(f, "type string")?;
            if let Some(st) = s {
                write!(f, " default {st}")?;
            }
        }
        OptionType::Check(opt_default) => {
            write!(f, "type check")?;
            if let Some(default) = opt_default {
                write!(f, " default {default}")?;
            }
        }
        OptionType::Combo { default, vars } => {
            write!(f, "type combo")?;
            if let Some(def_opt) = default {
                write!(f, " default {def_opt}")?;
            }
            for var in vars.iter() {
                write!(f, " var {var}")?;
            }
        }
        OptionType::Button => write!(f, "type button")?,
    }
    Ok(())
}

fn write_info(f: &mut fmt::Formatter, infos: &[EngineInfo]) -> fmt::Result {
    let mut new_line = false;
    write!(f, "info")?;
    for info in infos {
        if new_line {
            write!(f, "\ninfo")?;
            new_line = false;
        }
        match info {
            EngineInfo::Depth(depth) => write!(f, " depth {depth}")?,
            EngineInfo::SelDepth(sd) => write!(f, " seldepth {sd}")?,
            EngineInfo::Time(t) => write!(f, " time {}", t.as_millis())?,
            EngineInfo::Nodes(n) => write!(f, " nodes {n}")?,
            EngineInfo::Pv(pv) => {
                write!(f, " pv")?;
                for m in pv.iter() {
                    write!(f, " {}", m.to_uci())?;
                }
            }
            EngineInfo::MultiPv(id) => write!(f, " multipv {id}")?,
            EngineInfo::Score {
                eval,
                is_lower_bound,
                is_upper_bound,
            } => {
                write!(f, " score ")?;
                match eval.moves_to_mate() {
                    Some(pl) => match *eval > Eval::DRAW {
                        true => write!(f, "mate {pl}")?,
                        false => write!(f, "mate -{pl}")?,
                    },
                    None => write!(f, "cp {}", eval.centipawn_val())?,
                };
                if *is_lower_bound && !is_upper_bound {
                    write!(f, " lowerbound")?;
                } else if *is_upper_bound {
                    write!(f, " upperbound")?;
                }
            }
            EngineInfo::CurrMove(m) => write!(f, " currmove {}", m.to_uci())?,
            EngineInfo::CurrMoveNumber(num) => write!(f, " currmovenumber {num}")?,
            EngineInfo::HashFull(load) => write!(f, " hashfull {load}")?,
            EngineInfo::NodeSpeed(speed) => write!(f, " nps {speed}")?,
            EngineInfo::String(s) => {
                write!(f, " string {s}")?;
                new_line = true;
            }
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use thera_core::{Piece, Square};

    #[test]
    fn info_currmove() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Info(&[
                    EngineInfo::CurrMove(Move::normal(Square::E2, Square::E4)),
                    EngineInfo::CurrMoveNumber(1),
                ])
            ),
            "info currmove e2e4 currmovenumber 1"
        );
    }

    #[test]
    fn info_currmove_promotion() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Info(&[
                    EngineInfo::CurrMove(Move::promoting(Square::E7, Square::E8, Piece::Queen)),
                    EngineInfo::CurrMoveNumber(7),
                ])
            ),
            "info currmove e7e8q currmovenumber 7"
        );
    }

    #[test]
    fn info_composed() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Info(&[
                    EngineInfo::Depth(2),
                    EngineInfo::Score {
                        eval: Eval::centipawns(214),
                        is_lower_bound: false,
                        is_upper_bound: false,
                    },
                    EngineInfo::Time(Duration::from_millis(1242)),
                    EngineInfo::Nodes(2124),
                    EngineInfo::NodeSpeed(34928),
                    EngineInfo::Pv(&[
                        Move::normal(Square::E2, Square::E4),
                        Move::normal(Square::E7, Square::E5),
                        Move::normal(Square::G1, Square::F3),
                    ]),
                ])
            ),
            "info depth 2 score cp 214 time 1242 nodes 2124 nps 34928 pv e2e4 e7e5 g1f3"
        );
    }

    #[test]
    fn id_message() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Id {
                    name: Some("Thera"),
                    author: Some("The Thera Authors"),
                }
            ),
            "id name Thera\nid author The Thera Authors"
        );
    }

    #[test]
    fn option_check() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Option {
                    name: "Nullmove",
                    opt: OptionType::Check(Some(true)),
                }
            ),
            "option name Nullmove type check default true"
        );
    }

    #[test]
    fn option_spin() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Option {
                    name: "Hash",
                    opt: OptionType::Spin { default: 16, min: 1, max: 1024 },
                }
            ),
            "option name Hash type spin default 16 min 1 max 1024"
        );
    }

    #[test]
    fn bestmove() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::BestMove {
                    m: Move::normal(Square::E2, Square::E4),
                    ponder: None,
                }
            ),
            "bestmove e2e4"
        );
    }

    #[test]
    fn mate_score_reports_plies_to_mate() {
        assert_eq!(
            format!(
                "{}",
                UciMessage::Info(&[EngineInfo::Score {
                    eval: Eval::mate_in(3),
                    is_lower_bound: false,
                    is_upper_bound: false,
                }])
            ),
            "info score mate 2"
        );
    }
}
