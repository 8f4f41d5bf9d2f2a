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

//! The transposition table: a cache from position hash to the result of a
//! previous search of that position, so that transpositions (the same
//! position reached by different move orders) are only searched once.

use nohash_hasher::IntMap;

use crate::eval::Eval;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What kind of bound `eval` is, relative to the window it was searched
/// with.
pub enum Bound {
    /// `eval` is the position's exact value.
    Exact,
    /// The position's value is at most `eval` (search failed low).
    UpperBound,
    /// The position's value is at least `eval` (search failed high).
    LowerBound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One cached search result.
pub struct TTEntry {
    /// How many plies deep this entry's subtree was searched.
    pub depth: u8,
    pub eval: Eval,
    pub bound: Bound,
}

#[derive(Default)]
/// A hash map from Zobrist hash to the most recent search of that position.
/// A later `store` for the same hash always replaces the earlier one: there
/// is no separate aging or replacement scheme, since a single search run
/// only ever needs the freshest entry for a key.
pub struct TTable {
    entries: IntMap<u64, TTEntry>,
}

impl TTable {
    #[must_use]
    pub fn new() -> TTable {
        TTable {
            entries: IntMap::default(),
        }
    }

    #[must_use]
    pub fn get(&self, hash: u64) -> Option<TTEntry> {
        self.entries.get(&hash).copied()
    }

    pub fn store(&mut self, hash: u64, entry: TTEntry) {
        self.entries.insert(hash, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_get_round_trips() {
        let mut tt = TTable::new();
        let entry = TTEntry {
            depth: 4,
            eval: Eval::centipawns(37),
            bound: Bound::Exact,
        };
        tt.store(0xDEAD_BEEF, entry);
        assert_eq!(tt.get(0xDEAD_BEEF), Some(entry));
    }

    #[test]
    fn later_store_replaces_earlier_one() {
        let mut tt = TTable::new();
        tt.store(
            1,
            TTEntry {
                depth: 2,
                eval: Eval::centipawns(10),
                bound: Bound::Exact,
            },
        );
        tt.store(
            1,
            TTEntry {
                depth: 6,
                eval: Eval::centipawns(-5),
                bound: Bound::UpperBound,
            },
        );
        assert_eq!(tt.get(1).unwrap().depth, 6);
    }

    #[test]
    fn missing_key_returns_none() {
        let tt = TTable::new();
        assert_eq!(tt.get(12345), None);
    }
}
