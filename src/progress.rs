//! Scan progress tracking and display.
//!
//! Workers publish into a [`ProgressTracker`]: a snapshot behind a mutex
//! plus a condvar signaled on every completed extraction. The lock is held
//! only for the counter update, never during I/O, so a slow render can
//! never stall a worker. [`ProgressMonitor`] runs on its own thread,
//! redrawing on each signal or after a bounded interval, and clears its
//! status line when the scan ends. Callers that want programmatic polling
//! read [`ProgressTracker::snapshot`] instead.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Upper bound between monitor redraws when no extraction completes.
const MAX_RENDER_INTERVAL: Duration = Duration::from_millis(200);

/// Point-in-time view of a running scan.
///
/// `current` is best-effort: with several workers it names one of the
/// files recently in flight and may be momentarily stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Files that have produced an outcome (success or failure).
    pub processed: u64,
    /// Eligible files discovered so far. Grows while the walk runs.
    pub total: u64,
    /// Path currently being hashed, if any.
    pub current: Option<PathBuf>,
    /// Set once the dispatcher has drained all work.
    pub done: bool,
}

/// Shared progress state, updated by workers and read by the monitor.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    state: Mutex<ProgressSnapshot>,
    completed: Condvar,
}

impl ProgressTracker {
    /// Create a tracker with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more eligible file found by the walker.
    pub fn discovered(&self) {
        self.state.lock().unwrap().total += 1;
    }

    /// Record that a worker started hashing `path`.
    pub fn start_file(&self, path: &Path) {
        self.state.lock().unwrap().current = Some(path.to_path_buf());
    }

    /// Record a finished extraction and wake the monitor.
    pub fn finish_file(&self, path: &Path) {
        let mut state = self.state.lock().unwrap();
        state.processed += 1;
        // Another worker may have set its own path in the meantime.
        if state.current.as_deref() == Some(path) {
            state.current = None;
        }
        drop(state);
        self.completed.notify_all();
    }

    /// Signal that no further updates will arrive.
    pub fn mark_done(&self) {
        self.state.lock().unwrap().done = true;
        self.completed.notify_all();
    }

    /// Current snapshot, for programmatic polling.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.state.lock().unwrap().clone()
    }

    /// Block until the next completed extraction or `timeout`, whichever
    /// comes first, and return the snapshot as of that moment.
    #[must_use]
    pub fn wait_update(&self, timeout: Duration) -> ProgressSnapshot {
        let guard = self.state.lock().unwrap();
        if guard.done {
            return guard.clone();
        }
        let (guard, _timed_out) = self.completed.wait_timeout(guard, timeout).unwrap();
        guard.clone()
    }
}

/// Terminal progress display for a running scan.
///
/// Spawned before the finder runs and joined after it returns; the status
/// line is erased on completion so nothing lingers above the summary.
pub struct ProgressMonitor {
    handle: thread::JoinHandle<()>,
}

impl ProgressMonitor {
    /// Start the monitor thread against the given tracker.
    #[must_use]
    pub fn spawn(tracker: Arc<ProgressTracker>) -> Self {
        let handle = thread::spawn(move || render_loop(&tracker));
        Self { handle }
    }

    /// Wait for the monitor to finish. Call after the tracker is marked
    /// done.
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

fn render_loop(tracker: &ProgressTracker) {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    loop {
        let snapshot = tracker.wait_update(MAX_RENDER_INTERVAL);
        bar.set_length(snapshot.total);
        bar.set_position(snapshot.processed);
        match snapshot.current {
            Some(path) => bar.set_message(truncate_path(&path.to_string_lossy(), 48)),
            None => bar.set_message(""),
        }
        if snapshot.done {
            break;
        }
    }

    bar.finish_and_clear();
}

/// Shorten a path for the status line.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        return format!("...{}", &file_name[file_name.len() - max_len + 3..]);
    }

    format!(".../{file_name}")
}
