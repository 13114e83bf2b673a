//! Lockless progress tracking and a background progress reporter.
//!
//! Workers only bump an atomic counter in [`ProgressState`].
//! A separate thread started by [`ProgressReporter::start`] periodically reads the counter
//! and redraws the progress bar, so writers are never blocked by the terminal.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use console::Term;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// Progress shared between the workers and the reporter.
#[derive(Debug)]
pub struct ProgressState {
    completed: AtomicU64, // number of files created so far, never decreases
    running: AtomicBool,  // cleared after all workers finished
}

impl ProgressState {
    pub fn new() -> ProgressState {
        ProgressState {
            completed: AtomicU64::new(0),
            running: AtomicBool::new(true),
        }
    }

    pub fn inc(&self, delta: u64) {
        self.completed.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        ProgressState::new()
    }
}

const MAX_BAR_LEN: usize = 50;

/// A single frame of the progress display: the counts line and the bar below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Progress {
    value: u64,
    max: u64,
}

impl Progress {
    /// Draws the progress bar alone, without the brackets.
    /// The arrow head takes the last column at 100%.
    fn bar(&self) -> String {
        let filled = if self.max == 0 {
            MAX_BAR_LEN - 1
        } else {
            let value = self.value.min(self.max) as u128;
            (value * (MAX_BAR_LEN as u128 - 1) / self.max as u128) as usize
        };
        "=".repeat(filled) + ">"
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let bar = self.bar();
        write!(f, "{}/{}\n[{bar:MAX_BAR_LEN$}]", self.value, self.max)
    }
}

/// Where the progress frames go.
pub enum DrawTarget {
    /// Redraws the frame in place on the given terminal.
    Term(Term),
    /// Draws nothing. Used when progress reporting is disabled.
    Hidden,
}

impl DrawTarget {
    pub fn stdout() -> DrawTarget {
        DrawTarget::Term(Term::stdout())
    }

    // Terminal errors are ignored, the display is best-effort.
    fn draw(&self, frame: &Progress, first: bool) {
        if let DrawTarget::Term(term) = self {
            if !first {
                term.clear_last_lines(2).ok();
            }
            term.write_line(&frame.to_string()).ok();
        }
    }

    fn finish(&self) {
        if let DrawTarget::Term(term) = self {
            term.write_line("").ok();
        }
    }
}

/// Observes [`ProgressState`] from a background thread and renders it.
pub struct ProgressReporter {
    state: Arc<ProgressState>,
    done: Sender<()>,
    handle: JoinHandle<u64>,
}

impl ProgressReporter {
    /// How much time to wait between refreshes
    const REFRESH_PERIOD: Duration = Duration::from_millis(50);

    /// Starts the reporter thread that displays progress towards `total` files.
    pub fn start(state: Arc<ProgressState>, total: u64, target: DrawTarget) -> ProgressReporter {
        let (done, done_rx) = crossbeam_channel::bounded(1);
        let state2 = state.clone();
        let handle = thread::spawn(move || Self::run(&state2, total, &target, done_rx));
        ProgressReporter {
            state,
            done,
            handle,
        }
    }

    /// Redraws until the workers are done and all files were counted,
    /// or until signalled through `done`. In both cases draws one final frame.
    /// Returns the count shown in the final frame.
    fn run(state: &ProgressState, total: u64, target: &DrawTarget, done: Receiver<()>) -> u64 {
        let mut last_drawn: Option<u64> = None;
        let mut stopping = false;
        loop {
            // Read the flag first; once it's cleared, the counter is final.
            let running = state.is_running();
            let completed = state.completed();
            if last_drawn != Some(completed) {
                let frame = Progress {
                    value: completed,
                    max: total,
                };
                target.draw(&frame, last_drawn.is_none());
                last_drawn = Some(completed);
            }
            if stopping || (!running && completed == total) {
                break;
            }
            match done.recv_timeout(Self::REFRESH_PERIOD) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => stopping = true,
            }
        }
        target.finish();
        last_drawn.unwrap_or(0)
    }

    /// Marks the work as finished, waits for the final frame to be drawn
    /// and returns the count it showed.
    /// Must be called after all workers stopped updating the state.
    pub fn finish(self) -> u64 {
        self.state.stop();
        self.done.send(()).ok();
        self.handle.join().unwrap_or_else(|_| self.state.completed())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn frame(value: u64, max: u64) -> String {
        Progress { value, max }.to_string()
    }

    #[test]
    fn draw_progress_bar() {
        assert_eq!(
            frame(0, 100),
            "0/100\n[>                                                 ]"
        );
        assert_eq!(
            frame(2, 100),
            "2/100\n[>                                                 ]"
        );
        assert_eq!(
            frame(52, 100),
            "52/100\n[=========================>                        ]"
        );
        assert_eq!(
            frame(100, 100),
            "100/100\n[=================================================>]"
        );
    }

    #[test]
    fn draw_progress_bar_without_files() {
        assert_eq!(
            frame(0, 0),
            "0/0\n[=================================================>]"
        );
    }

    #[test]
    fn counter_is_shared() {
        let state = Arc::new(ProgressState::new());
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| (0..1000).for_each(|_| state.inc(1)));
            }
        });
        assert_eq!(state.completed(), 4000);
        assert!(state.is_running());
        state.stop();
        assert!(!state.is_running());
    }

    #[test]
    fn reporter_shows_final_count() {
        let state = Arc::new(ProgressState::new());
        let reporter = ProgressReporter::start(state.clone(), 10, DrawTarget::Hidden);
        for _ in 0..10 {
            state.inc(1);
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(reporter.finish(), 10);
    }

    #[test]
    fn reporter_stops_when_work_is_incomplete() {
        let state = Arc::new(ProgressState::new());
        let reporter = ProgressReporter::start(state.clone(), 10, DrawTarget::Hidden);
        state.inc(3);
        assert_eq!(reporter.finish(), 3);
    }
}
