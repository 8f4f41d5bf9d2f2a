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

//! The engine's threading model: exactly two threads.
//!
//! The thread that owns an [`Engine`] - normally the one reading UCI
//! commands from stdin - is the "reader" thread. It hands off a
//! [`SearchRequest`] to a single dedicated search thread, which waits on a
//! condition variable for work, runs one search to completion or
//! cancellation, and reports its result through a callback. Unlike a
//! lazy-SMP search spread across many worker threads, at most one search
//! ever runs at a time; the shared state is limited to a start-signal
//! condvar, a stop flag, and an exit flag, with `SearchRequest`s only ever
//! written while no search is in flight.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Condvar, Mutex,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::info;
use thera_core::Board;

use crate::config::SearchConfig;
use crate::limit::SearchLimit;
use crate::search::{iterative_deepening, SearchResult};

/// One search to run: the position, how deep/long to look, and whether to
/// report progress.
pub struct SearchRequest {
    pub board: Board,
    pub config: SearchConfig,
    /// `None` means search until `stop` is called or `config.depth` is
    /// reached; `Some` adds a wall-clock deadline on top of that.
    pub budget: Option<Duration>,
}

struct Shared {
    cond: Condvar,
    pending: Mutex<Option<SearchRequest>>,
    stop: Arc<AtomicBool>,
    should_exit: AtomicBool,
}

/// A running engine: the reader-thread handle onto the dedicated search
/// thread. Dropping this without calling [`Engine::quit`] leaks the search
/// thread; `quit` is the only way to join it.
pub struct Engine {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl Engine {
    #[must_use]
    /// Spawn the search thread and return a handle to it. The search
    /// thread sits idle, waiting on the condvar, until the first `go`.
    pub fn spawn<F>(on_result: F) -> Engine
    where
        F: Fn(SearchResult) + Send + 'static,
    {
        let shared = Arc::new(Shared {
            cond: Condvar::new(),
            pending: Mutex::new(None),
            stop: Arc::new(AtomicBool::new(false)),
            should_exit: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || search_thread_main(&worker_shared, &on_result));

        Engine {
            shared,
            handle: Some(handle),
        }
    }

    /// Hand a new search to the search thread, waking it up. Only
    /// meaningful to call when the search thread is idle - the reader
    /// thread is responsible for having already `stop`ped and waited out
    /// any previous search before starting another, per the UCI protocol's
    /// own sequencing guarantees.
    pub fn go(&self, request: SearchRequest) {
        self.shared.stop.store(false, Ordering::SeqCst);
        let mut pending = self.shared.pending.lock().unwrap();
        *pending = Some(request);
        self.shared.cond.notify_one();
    }

    /// Ask whatever search is currently running to stop and report its
    /// best result so far.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        self.shared.cond.notify_one();
    }

    /// Stop any running search, tell the search thread to exit its loop,
    /// and join it. Consumes the engine: there is nothing left to search
    /// on afterward.
    pub fn quit(mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        self.shared.should_exit.store(true, Ordering::SeqCst);
        self.shared.cond.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn search_thread_main<F>(shared: &Arc<Shared>, on_result: &F)
where
    F: Fn(SearchResult) + Send + 'static,
{
    loop {
        let request = {
            let mut pending = shared.pending.lock().unwrap();
            while pending.is_none() && !shared.should_exit.load(Ordering::SeqCst) {
                pending = shared.cond.wait(pending).unwrap();
            }
            if shared.should_exit.load(Ordering::SeqCst) {
                return;
            }
            pending.take().expect("woke with no exit and no request")
        };

        let SearchRequest {
            mut board,
            config,
            budget,
        } = request;

        let limit = SearchLimit::new(Arc::clone(&shared.stop), budget);
        if let Some(result) = iterative_deepening(&mut board, config.depth, &limit) {
            if !config.silent {
                on_result(result);
            } else {
                info!("search finished silently: {} {}", result.best_move, result.eval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn go_then_stop_reports_a_result() {
        let (tx, rx) = mpsc::channel();
        let engine = Engine::spawn(move |result| {
            let _ = tx.send(result);
        });

        engine.go(SearchRequest {
            board: Board::new(),
            config: SearchConfig {
                depth: 40,
                silent: false,
            },
            budget: Some(Duration::from_millis(50)),
        });

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(result.depth >= 1);
        engine.quit();
    }

    #[test]
    fn quit_joins_the_search_thread_cleanly() {
        let engine = Engine::spawn(|_| {});
        engine.quit();
    }
}
