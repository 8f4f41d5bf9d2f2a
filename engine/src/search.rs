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

//! Iterative-deepening negamax search with quiescence, move ordering, and a
//! transposition table.
//!
//! Cancellation is plumbed as an explicit `Result` rather than an
//! exception: every recursive call threads a [`SearchLimit`] through and
//! bails out with [`SearchError::Cancelled`] as soon as it notices the
//! limit is over, which unwinds cleanly back to the iterative-deepening
//! loop without ever leaving the board in a half-applied state (every
//! `apply_move` on the way down is matched by a `rewind_move` on the way
//! back up, cancelled or not).

use log::info;
use rand::seq::SliceRandom;

use thera_core::{movegen, Board, Move, Piece};

use crate::eval::{self, evaluate, Eval};
use crate::limit::SearchLimit;
use crate::tt::{Bound, TTEntry, TTable};

/// Why a search stopped before reaching its target depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchError {
    /// The search was asked to stop, or ran out of time.
    Cancelled,
}

pub type SearchOutcome<T> = Result<T, SearchError>;

/// The result of searching a position to some depth: the best move found
/// and its evaluation, from the mover's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    pub eval: Eval,
    pub depth: u8,
}

const MILLION: i32 = 1_000_000;
const PROMOTION_SCORE: i32 = 6 * MILLION;
const WINNING_CAPTURE_SCORE: i32 = 8 * MILLION;
const LOSING_CAPTURE_SCORE: i32 = 2 * MILLION;

/// Every ply of search extension granted (one for giving check, one for a
/// promotion) eats into this budget; once it's spent, no more extensions
/// are granted for the rest of that line. The original engine this is
/// ported from grants extensions with no such cap, which on a line with
/// repeated checking promotions can blow the search up to an unbounded
/// depth; this budget is the fix.
const MAX_EXTENSIONS_PER_LINE: u8 = 16;

fn move_score(board: &Board, m: Move) -> i32 {
    let mut score = 0;

    if let Some(promote_type) = m.promote_type() {
        score += PROMOTION_SCORE + i32::from(eval::piece_value(promote_type));
    }

    if board.is_move_capture(m) {
        let attacker = board
            .type_at_square(m.from_square())
            .expect("mover's origin square must hold a piece");
        let victim = if m.is_en_passant() {
            Piece::Pawn
        } else {
            board
                .type_at_square(m.to_square())
                .expect("capture destination must hold a piece")
        };
        let diff = i32::from(eval::piece_value(victim)) - i32::from(eval::piece_value(attacker));
        let defended =
            !movegen::square_attackers(board, m.to_square(), !board.player).is_empty();
        score += if defended {
            diff + if diff >= 0 { WINNING_CAPTURE_SCORE } else { LOSING_CAPTURE_SCORE }
        } else {
            diff + WINNING_CAPTURE_SCORE
        };
    }

    score
}

/// Sort `moves` so that winning captures, then promotions, then quiet
/// moves are searched first - maximizing the chance of an early
/// alpha-beta cutoff.
fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_key(|&m| std::cmp::Reverse(move_score(board, m)));
}

/// How many plies to extend the search by after playing `m`, which results
/// in `after`. A checking move and a promotion each add one ply; a
/// checking promotion adds two.
fn extension_for(m: Move, after: &Board) -> u8 {
    u8::from(!after.checkers.is_empty()) + u8::from(m.is_promotion())
}

/// Captures-only search from a quiet leaf, to avoid the horizon effect: a
/// position that looks quiet at the search's nominal depth limit may still
/// have a hanging piece one capture away. Stands pat on the static
/// evaluation as a lower bound (the side to move is never forced to
/// capture), then only expands captures and promotions.
fn quiescence(board: &mut Board, mut alpha: Eval, beta: Eval, limit: &SearchLimit) -> SearchOutcome<Eval> {
    if limit.is_over() {
        return Err(SearchError::Cancelled);
    }
    if board.is_threefold_repetition() {
        return Ok(Eval::DRAW);
    }

    let stand_pat = evaluate(board);
    if stand_pat >= beta {
        return Ok(stand_pat);
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let mut noisy: Vec<Move> = movegen::get_moves(board)
        .into_iter()
        .filter(|&m| board.is_move_capture(m) || m.is_promotion())
        .collect();
    order_moves(board, &mut noisy);

    let mut best = stand_pat;
    for m in noisy {
        board.apply_move(m);
        let score = -quiescence(board, -beta, -alpha, limit)?;
        board.rewind_move();

        if score > best {
            best = score;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    Ok(best)
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    board: &mut Board,
    depth_to_go: u8,
    extensions_left: u8,
    mut alpha: Eval,
    beta: Eval,
    tt: &mut TTable,
    limit: &SearchLimit,
) -> SearchOutcome<Eval> {
    if limit.is_over() {
        return Err(SearchError::Cancelled);
    }
    if board.is_threefold_repetition() {
        return Ok(Eval::DRAW);
    }
    if depth_to_go == 0 {
        return quiescence(board, alpha, beta, limit);
    }

    let original_alpha = alpha;
    let mut beta = beta;

    if let Some(entry) = tt.get(board.hash) {
        if entry.depth >= depth_to_go {
            match entry.bound {
                Bound::Exact => return Ok(entry.eval),
                Bound::LowerBound => alpha = alpha.max(entry.eval),
                Bound::UpperBound => beta = beta.min(entry.eval),
            }
            if alpha >= beta {
                return Ok(entry.eval);
            }
        }
    }

    let mut moves = movegen::get_moves(board);
    if moves.is_empty() {
        let score = if board.checkers.is_empty() {
            Eval::DRAW
        } else {
            -Eval::mate_in(0)
        };
        return Ok(score);
    }
    order_moves(board, &mut moves);

    let mut best_eval = Eval::MIN;

    for m in moves {
        board.apply_move(m);
        let extension = extension_for(m, board).min(extensions_left);
        let child = -negamax(
            board,
            depth_to_go - 1 + extension,
            extensions_left - extension,
            -beta.step_forward(),
            -alpha.step_forward(),
            tt,
            limit,
        )?
        .step_back();
        board.rewind_move();

        if child > best_eval {
            best_eval = child;
        }
        if best_eval > alpha {
            alpha = best_eval;
        }
        if alpha >= beta {
            break;
        }
    }

    let bound = if best_eval <= original_alpha {
        Bound::UpperBound
    } else if best_eval >= beta {
        Bound::LowerBound
    } else {
        Bound::Exact
    };
    tt.store(
        board.hash,
        TTEntry {
            depth: depth_to_go,
            eval: best_eval,
            bound,
        },
    );

    Ok(best_eval)
}

/// Search `board` to each depth from 1 up to `max_depth` in turn, stopping
/// early if `limit` expires or a mate is found. Returns the result of the
/// deepest iteration that completed; if not even depth 1 completed before
/// being cancelled, returns `None`.
#[must_use]
pub fn iterative_deepening(board: &mut Board, max_depth: u8, limit: &SearchLimit) -> Option<SearchResult> {
    let root_moves = movegen::get_moves(board);
    if root_moves.is_empty() {
        return None;
    }

    let mut tt = TTable::new();
    let mut best: Option<SearchResult> = None;

    'depths: for depth in 1..=max_depth {
        let mut scored: Vec<(Move, Eval)> = Vec::with_capacity(root_moves.len());
        let mut alpha = Eval::MIN;
        let beta = Eval::MAX;

        let mut ordered = root_moves.clone();
        order_moves(board, &mut ordered);

        for m in &ordered {
            board.apply_move(*m);
            let extension = extension_for(*m, board).min(MAX_EXTENSIONS_PER_LINE);
            let child = negamax(
                board,
                depth - 1 + extension,
                MAX_EXTENSIONS_PER_LINE - extension,
                -beta.step_forward(),
                -alpha.step_forward(),
                &mut tt,
                limit,
            );
            board.rewind_move();

            let score = match child {
                Ok(s) => s.step_back(),
                Err(SearchError::Cancelled) => break 'depths,
            };
            scored.push((*m, score));
            if score > alpha {
                alpha = score;
            }
        }

        if scored.is_empty() {
            break;
        }

        let best_score = scored.iter().map(|&(_, e)| e).max().unwrap();
        let ties: Vec<Move> = scored
            .iter()
            .filter(|&&(_, e)| e == best_score)
            .map(|&(m, _)| m)
            .collect();
        let chosen = *ties
            .choose(&mut rand::thread_rng())
            .expect("at least one move tied for best");

        best = Some(SearchResult {
            best_move: chosen,
            eval: best_score,
            depth,
        });

        info!(
            "depth {depth} best {} eval {}",
            chosen.to_uci(),
            best_score
        );

        if best_score.is_mate() {
            break;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use thera_core::Square;

    fn find_mate(fen: &str, depth: u8) -> SearchResult {
        let mut board = Board::from_fen(fen).unwrap();
        let limit = SearchLimit::with_duration(Duration::from_secs(30));
        iterative_deepening(&mut board, depth, &limit).expect("a legal move exists")
    }

    #[test]
    fn finds_mate_in_one() {
        // White rook to b8 is mate.
        let result = find_mate("3k4/R7/1R6/5K2/8/8/8/8 w - - 0 1", 3);
        assert_eq!(result.eval, Eval::mate_in(1));
        assert_eq!(result.best_move, Move::normal(Square::B6, Square::B8));
    }

    #[test]
    fn avoids_stalemate_when_winning() {
        let result = find_mate("7k/8/8/8/8/8/6Q1/6K1 w - - 0 1", 3);
        assert_ne!(result.best_move, Move::normal(Square::G2, Square::G7));
    }

    #[test]
    fn quiescence_resolves_a_hanging_queen() {
        let mut board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/4P2q/8/PPPP1PPP/RNBQKBNR w KQkq - 2 3")
                .unwrap();
        let limit = SearchLimit::with_duration(Duration::from_secs(5));
        let eval = quiescence(&mut board, Eval::MIN, Eval::MAX, &limit).unwrap();
        assert!(eval.centipawn_val() > 0);
    }

    #[test]
    fn cancelled_limit_returns_err() {
        let mut board = Board::new();
        let limit = SearchLimit::infinite();
        limit.stop();
        assert_eq!(
            negamax(&mut board, 4, MAX_EXTENSIONS_PER_LINE, Eval::MIN, Eval::MAX, &mut TTable::new(), &limit),
            Err(SearchError::Cancelled)
        );
    }
}
