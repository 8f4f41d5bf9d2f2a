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

//! The Universal Chess Interface: the command/response protocol a GUI uses
//! to drive this engine as a subprocess.

use thera_core::Move;

mod parse;
mod send;
pub use parse::*;
pub use send::{EngineInfo, OptionType, UciMessage};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Every command the GUI can send the engine over UCI.
pub enum UciCommand {
    /// Sent at the start of a UCI session. The engine must reply with
    /// `Id`, its `Option`s, then `UciOk`.
    Uci,
    /// Turn debug info strings on or off. Off by default.
    Debug(bool),
    /// Ask whether the engine is ready to proceed; reply `ReadyOk` once any
    /// queued work (including a running search) is done.
    IsReady,
    /// Set an engine parameter, or send a custom command.
    SetOption { name: String, value: Option<String> },
    /// The next position the engine is asked about starts a new game, so
    /// any game-specific state (the transposition table, repetition
    /// history) should be reset.
    NewGame,
    /// Set the current position: start from `fen` (or the normal starting
    /// position if `None`), then play `moves` in order.
    Position { fen: Option<String>, moves: Vec<Move> },
    /// Start a search with the given options. Always follows a `Position`.
    Go(Vec<GoOption>),
    /// Stop searching immediately and report the best move found so far.
    Stop,
    /// The opponent played the suggested ponder-move; keep searching.
    PonderHit,
    /// Exit as soon as possible.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// One option attached to a `UciCommand::Go`.
pub enum GoOption {
    /// Restrict the search to only these moves from the root.
    SearchMoves(Vec<Move>),
    /// Ponder on the move suggested by the previous `Position` command.
    Ponder,
    /// Milliseconds remaining on White's clock.
    WhiteTime(u32),
    /// Milliseconds remaining on Black's clock.
    BlackTime(u32),
    /// White's increment, in milliseconds, per move.
    WhiteInc(u32),
    /// Black's increment, in milliseconds, per move.
    BlackInc(u32),
    /// Moves remaining until the next time control.
    MovesToGo(u8),
    /// Search to exactly this many plies.
    Depth(u8),
    /// Search exactly this many nodes.
    Nodes(u64),
    /// Look for a mate in this many moves.
    Mate(u8),
    /// Search for exactly this many milliseconds.
    MoveTime(u32),
    /// Search until `Stop`, ignoring every other limit.
    Infinite,
}
