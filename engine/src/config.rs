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

//! Search configuration: parameters that shape a search but aren't tied to
//! any one position.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Settings controlling how a search runs. Mutated only between searches -
/// never while the search thread is running one.
pub struct SearchConfig {
    /// Maximum depth, in plies, that iterative deepening will reach if it
    /// isn't stopped first by the time budget.
    pub depth: u8,
    /// If `true`, suppress `info`/`bestmove` output. Used while the engine
    /// is pondering or pre-computing and hasn't been told to report yet.
    pub silent: bool,
}

impl SearchConfig {
    #[must_use]
    pub const fn new() -> SearchConfig {
        SearchConfig {
            depth: 64,
            silent: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_silent() {
        assert!(!SearchConfig::default().silent);
    }
}
