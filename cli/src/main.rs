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

//! The `thera` binary: a UCI engine by default, with `perft` and `play`
//! subcommands for correctness checking and manual use from a terminal.

mod board_display;
mod perft_cli;

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use lazy_static::lazy_static;
use log::{info, warn};

use thera_core::{Board, Color};
use thera_engine::config::SearchConfig;
use thera_engine::thread::{Engine, SearchRequest};
use thera_engine::time::search_time;
use thera_engine::uci::{parse_line, EngineInfo, GoOption, OptionType, UciCommand, UciMessage};
use thera_engine::SearchResult;

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The `option` lines advertised during the `uci` handshake. Built once:
/// there's only ever one instance of this table for the process's lifetime,
/// and it needs `'static` names to hand to [`UciMessage::Option`].
struct DeclaredOption {
    name: &'static str,
    opt: OptionType<'static>,
}

lazy_static! {
    static ref DECLARED_OPTIONS: Vec<DeclaredOption> = vec![DeclaredOption {
        name: "Hash",
        opt: OptionType::Spin {
            default: 16,
            min: 1,
            max: 1024,
        },
    }];
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let code = match args.get(1).map(String::as_str) {
        Some("perft") => perft_cli::run(&args[2..]),
        Some("play") => {
            run_play();
            0
        }
        Some("uci") | None => run_uci(&args[2..]),
        Some(other) => {
            eprintln!("unrecognized mode {other:?}; expected one of: uci, perft, play");
            1
        }
    };
    process::exit(code);
}

/// Find a `--log-file <path>` pair among the UCI mode's arguments, tee-ing
/// raw UCI traffic (both directions) to it in addition to normal handling -
/// the same role the original engine's multi-stream output played, minus
/// its use as the only output (UCI replies always also go to stdout here).
fn log_file_from_args(args: &[String]) -> Option<std::fs::File> {
    let idx = args.iter().position(|a| a == "--log-file")?;
    let path = args.get(idx + 1)?;
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => Some(f),
        Err(e) => {
            warn!("could not open log file {path}: {e}");
            None
        }
    }
}

fn run_uci(args: &[String]) -> i32 {
    let mut log_file = log_file_from_args(args);

    let stdin = io::stdin();
    let mut board = Board::from_fen(STARTPOS_FEN).expect("the starting FEN always parses");
    let mut moves_played: u32 = 0;

    let (tx, rx) = mpsc::channel::<SearchResult>();
    let engine = Engine::spawn(move |result| {
        let _ = tx.send(result);
    });

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("error reading stdin: {e}");
                break;
            }
        };
        if let Some(f) = log_file.as_mut() {
            let _ = writeln!(f, "> {line}");
        }

        let command = match parse_line(&line, &board) {
            Ok(c) => c,
            Err(e) => {
                info!("ignoring unparseable UCI line {line:?}: {e}");
                continue;
            }
        };

        match command {
            UciCommand::Uci => {
                send(
                    &mut log_file,
                    &UciMessage::Id {
                        name: Some("Thera"),
                        author: Some("The Thera Authors"),
                    },
                );
                for declared in DECLARED_OPTIONS.iter() {
                    send(
                        &mut log_file,
                        &UciMessage::Option {
                            name: declared.name,
                            opt: declared.opt.clone(),
                        },
                    );
                }
                send(&mut log_file, &UciMessage::UciOk);
            }
            UciCommand::Debug(_) => {}
            UciCommand::IsReady => send(&mut log_file, &UciMessage::ReadyOk),
            UciCommand::SetOption { name, value } => {
                info!("setoption {name} = {value:?} (no configurable options beyond Hash)");
            }
            UciCommand::NewGame => {
                board = Board::from_fen(STARTPOS_FEN).expect("the starting FEN always parses");
                moves_played = 0;
            }
            UciCommand::Position { fen, moves } => {
                let base = fen.as_deref().unwrap_or(STARTPOS_FEN);
                match Board::from_fen(base) {
                    Ok(mut b) => {
                        for m in &moves {
                            b.apply_move(*m);
                        }
                        moves_played = moves.len() as u32;
                        board = b;
                    }
                    Err(e) => warn!("invalid FEN in position command: {e}"),
                }
            }
            UciCommand::Go(opts) => {
                let (config, budget) = go_options_to_request(&opts, &board, moves_played);
                engine.go(SearchRequest {
                    board: board.clone(),
                    config,
                    budget,
                });
            }
            UciCommand::Stop => engine.stop(),
            UciCommand::PonderHit => {}
            UciCommand::Quit => {
                engine.quit();
                return 0;
            }
        }

        while let Ok(result) = rx.try_recv() {
            report_search_result(&mut log_file, result);
        }
    }

    engine.quit();
    0
}

fn go_options_to_request(
    opts: &[GoOption],
    board: &Board,
    moves_played: u32,
) -> (SearchConfig, Option<Duration>) {
    let mut config = SearchConfig::new();
    let mut movetime = None;
    let mut infinite = false;
    let (mut time_left, mut increment) = (None, None);

    for opt in opts {
        match opt {
            GoOption::Depth(d) => config.depth = *d,
            GoOption::MoveTime(ms) => movetime = Some(Duration::from_millis(u64::from(*ms))),
            GoOption::Infinite => infinite = true,
            GoOption::WhiteTime(ms) if board.player == Color::White => {
                time_left = Some(Duration::from_millis(u64::from(*ms)));
            }
            GoOption::BlackTime(ms) if board.player == Color::Black => {
                time_left = Some(Duration::from_millis(u64::from(*ms)));
            }
            GoOption::WhiteInc(ms) if board.player == Color::White => {
                increment = Some(Duration::from_millis(u64::from(*ms)));
            }
            GoOption::BlackInc(ms) if board.player == Color::Black => {
                increment = Some(Duration::from_millis(u64::from(*ms)));
            }
            _ => {}
        }
    }

    let budget = if infinite {
        None
    } else if let Some(mt) = movetime {
        Some(mt)
    } else {
        time_left.map(|t| search_time(t, increment.unwrap_or(Duration::ZERO), moves_played))
    };

    (config, budget)
}

fn report_search_result(log_file: &mut Option<std::fs::File>, result: SearchResult) {
    send(
        log_file,
        &UciMessage::Info(&[
            EngineInfo::Depth(result.depth),
            EngineInfo::Score {
                eval: result.eval,
                is_lower_bound: false,
                is_upper_bound: false,
            },
        ]),
    );
    send(
        log_file,
        &UciMessage::BestMove {
            m: result.best_move,
            ponder: None,
        },
    );
}

fn send(log_file: &mut Option<std::fs::File>, msg: &UciMessage<'_>) {
    println!("{msg}");
    if let Some(f) = log_file.as_mut() {
        let _ = writeln!(f, "< {msg}");
    }
}

/// An interactive terminal play loop: render the board, read a move from
/// the user in UCI long-algebraic form, apply it, and repeat. Typing
/// "quit" exits; any other unparseable input is reported and re-prompted.
fn run_play() {
    let mut board = Board::from_fen(STARTPOS_FEN).expect("the starting FEN always parses");
    let stdin = io::stdin();

    loop {
        println!("{}", board_display::render(&board));
        println!("Enter a move (e.g. e2e4), or \"quit\":");

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let tok = line.trim();
        if tok == "quit" {
            break;
        }

        let legal = thera_core::movegen::get_moves(&board);
        match thera_core::Move::from_uci_squares(tok) {
            Ok((from, to, promo)) => {
                match legal
                    .into_iter()
                    .find(|m| m.from_square() == from && m.to_square() == to && m.promote_type() == promo)
                {
                    Some(m) => board.apply_move(m),
                    None => println!("illegal move: {tok}"),
                }
            }
            Err(e) => println!("could not parse move {tok:?}: {e}"),
        }
    }
}
