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

//! Code which defines the engine's behavior: position evaluation, the
//! negamax search that drives it, the transposition table and time
//! management backing that search, the two-thread model that runs it
//! alongside a UCI session, and the UCI protocol itself.

pub mod config;
pub mod eval;
pub mod limit;
pub mod search;
pub mod thread;
pub mod time;
pub mod tt;
pub mod uci;

pub use config::SearchConfig;
pub use eval::{evaluate, Eval};
pub use search::{iterative_deepening, SearchError, SearchResult};
pub use thread::{Engine, SearchRequest};
pub use tt::TTable;
