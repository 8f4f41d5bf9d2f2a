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

//! The one-shot deadline a running search checks against.
//!
//! Unlike a multithreaded lazy-SMP search, where many worker threads all
//! poll a shared stop flag, this engine runs one search at a time on one
//! thread. `SearchLimit` is still shared with the reader thread, which is
//! the only other party that can ask a search to stop early (`stop`, or a
//! fresh `go` superseding it).

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Tracks whether a running search has been asked to stop, and when its
/// time budget runs out.
///
/// The stop flag is an `Arc` rather than a plain `AtomicBool` so that the
/// reader thread, which owns no `SearchLimit` of its own, can still reach
/// in and cancel the search thread's current one by holding a clone of the
/// same flag.
pub struct SearchLimit {
    /// Set by the reader thread on `stop`, or by a fresh `go` superseding
    /// this one.
    stop: Arc<AtomicBool>,
    /// When the search must give up and return its best result so far.
    /// `None` means no time limit (search until `stop` or max depth).
    deadline: Option<Instant>,
}

impl SearchLimit {
    #[must_use]
    /// Build a limit from an externally-held stop flag and an optional
    /// time budget starting now.
    pub fn new(stop: Arc<AtomicBool>, budget: Option<Duration>) -> SearchLimit {
        SearchLimit {
            stop,
            deadline: budget.map(|b| Instant::now() + b),
        }
    }

    #[must_use]
    /// A self-contained limit with no time budget: only `stop()` can end
    /// the search early. Useful for tests and for searches not run through
    /// [`crate::thread::Engine`].
    pub fn infinite() -> SearchLimit {
        SearchLimit::new(Arc::new(AtomicBool::new(false)), None)
    }

    #[must_use]
    /// A self-contained limit that expires after `budget` has elapsed.
    pub fn with_duration(budget: Duration) -> SearchLimit {
        SearchLimit::new(Arc::new(AtomicBool::new(false)), Some(budget))
    }

    /// Ask the running search to stop as soon as it next checks.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    #[must_use]
    /// Has the search been told to stop, or run out of time?
    pub fn is_over(&self) -> bool {
        self.stop.load(Ordering::SeqCst) || self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_limit_is_not_over_until_stopped() {
        let limit = SearchLimit::infinite();
        assert!(!limit.is_over());
        limit.stop();
        assert!(limit.is_over());
    }

    #[test]
    fn expired_deadline_is_over() {
        let limit = SearchLimit::with_duration(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(limit.is_over());
    }

    #[test]
    fn generous_deadline_is_not_over_yet() {
        let limit = SearchLimit::with_duration(Duration::from_secs(60));
        assert!(!limit.is_over());
    }
}
