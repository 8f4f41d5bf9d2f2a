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

//! The `perft` subcommand: `thera perft <depth> <fen|start> <bulk 0|1>
//! <expected>`. Exits 0 if the node count matches `expected`, 1 otherwise,
//! printing a per-root-move breakdown along the way so a mismatch can be
//! diffed against a reference engine's `divide` output.

use thera_core::{movegen, Board};

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Count leaf nodes reachable from `board` in exactly `depth` plies. When
/// `bulk` is set, the node count at the last ply is read off the size of
/// the legal move list rather than recursed into one ply further - the two
/// must agree, but bulk counting is substantially faster since it skips
/// applying/rewinding the final ply's moves.
fn perft(board: &mut Board, depth: u32, bulk: bool) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = movegen::get_moves(board);
    if bulk && depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for m in moves {
        board.apply_move(m);
        nodes += perft(board, depth - 1, bulk);
        board.rewind_move();
    }
    nodes
}

/// Run the `perft` subcommand. Returns the process exit code.
pub fn run(args: &[String]) -> i32 {
    if args.len() < 4 {
        eprintln!("usage: perft <depth> <fen|start> <bulk 0|1> <expected>");
        return 1;
    }

    let depth: u32 = match args[0].parse() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("invalid depth {:?}: {e}", args[0]);
            return 1;
        }
    };
    let fen = if args[1] == "start" {
        STARTPOS_FEN
    } else {
        args[1].as_str()
    };
    let bulk = args[2] != "0";
    let expected: u64 = match args[3].parse() {
        Ok(n) => n,
        Err(e) => {
            eprintln!("invalid expected node count {:?}: {e}", args[3]);
            return 1;
        }
    };

    let mut board = match Board::from_fen(fen) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("invalid FEN {fen:?}: {e}");
            return 1;
        }
    };

    let mut total = 0;
    for m in movegen::get_moves(&board) {
        board.apply_move(m);
        let nodes = perft(&mut board, depth.saturating_sub(1), bulk);
        board.rewind_move();
        println!("{}: {nodes}", m.to_uci());
        total += nodes;
    }

    println!("perft({depth}) = {total}");
    if total == expected {
        0
    } else {
        eprintln!("mismatch: expected {expected}, got {total}");
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_and_non_bulk_agree() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 4, true), perft(&mut board, 4, false));
    }

    #[test]
    fn depth_zero_is_one_node() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 0, true), 1);
    }

    #[test]
    fn run_reports_success_on_matching_count() {
        let args: Vec<String> = vec!["1".into(), "start".into(), "1".into(), "20".into()];
        assert_eq!(run(&args), 0);
    }

    #[test]
    fn run_reports_failure_on_mismatched_count() {
        let args: Vec<String> = vec!["1".into(), "start".into(), "1".into(), "21".into()];
        assert_eq!(run(&args), 1);
    }
}
