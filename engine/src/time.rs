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

//! Converting a UCI `go` command's clock information into a time budget for
//! one move.

use std::time::Duration;

/// The minimum slice of the remaining clock a search is ever given, even
/// deep into a long game.
const MIN_TIME_PER_MOVE: Duration = Duration::from_millis(10);

/// Assumed total length of the game in moves, for the purpose of deciding
/// how much of the remaining clock to spend on this move. Chosen so that a
/// 60-to-80-move game divides the clock roughly evenly across both sides.
const ASSUMED_GAME_LENGTH: u32 = 160;

/// Compute how long to spend searching this move, given the time left on
/// the mover's clock, their increment, and how many half-moves have been
/// played so far.
///
/// `time/(assumed_moves_left) + increment`, floored at
/// [`MIN_TIME_PER_MOVE`] before the increment is added, so a low-increment
/// time scramble never gets less than ten milliseconds of actual thought.
#[must_use]
pub fn search_time(time_left: Duration, increment: Duration, moves_played: u32) -> Duration {
    let moves_left = ASSUMED_GAME_LENGTH.saturating_sub(moves_played).max(1);
    let share = (time_left / moves_left).max(MIN_TIME_PER_MOVE);
    share + increment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_remaining_time_across_assumed_moves_left() {
        let t = search_time(Duration::from_secs(160), Duration::ZERO, 0);
        assert_eq!(t, Duration::from_secs(1));
    }

    #[test]
    fn increment_is_added_on_top() {
        let t = search_time(Duration::from_secs(160), Duration::from_millis(500), 0);
        assert_eq!(t, Duration::from_millis(1500));
    }

    #[test]
    fn never_drops_below_the_floor() {
        let t = search_time(Duration::from_millis(1), Duration::ZERO, 0);
        assert_eq!(t, MIN_TIME_PER_MOVE);
    }

    #[test]
    fn late_game_gets_a_larger_share() {
        let early = search_time(Duration::from_secs(160), Duration::ZERO, 0);
        let late = search_time(Duration::from_secs(160), Duration::ZERO, 150);
        assert!(late > early);
    }
}
