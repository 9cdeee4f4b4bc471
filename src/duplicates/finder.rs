//! Duplicate finder: bounded worker pool over the walker's output.
//!
//! # Overview
//!
//! [`DuplicateFinder::run`] wires the pipeline together:
//!
//! 1. A feeder thread walks the tree and sends eligible paths into a
//!    bounded channel whose capacity equals the worker count, so discovery
//!    can never run unboundedly ahead of hashing.
//! 2. Exactly `workers` threads pull paths on demand, extract one identity
//!    each at a time, and push the outcome into a results channel.
//! 3. The calling thread drains the results channel into the identity
//!    index. Aggregation is serialized here, so the index needs no lock;
//!    the progress counters are the only state workers share.
//!
//! Every path the walker yields produces exactly one outcome, success or
//! failure, and a failure never stops the other workers. A stop signal
//! halts the feeder and keeps workers from pulling further paths; whatever
//! was already extracted still lands in the report, which is then marked
//! interrupted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded};

use crate::config::{ConfigError, ScanConfig};
use crate::progress::ProgressTracker;
use crate::scanner::{hash_file, ExtractError, Walker};

use super::{group_identities, ExtractionFailure, FileIdentity, Report, ScanStats};

/// Extract the identity triple for one file.
///
/// Size comes from `fs::metadata`, which resolves symlinks; by the time a
/// symlink reaches this point the caller has already decided to follow it.
/// The base name is taken verbatim, with no case folding or normalization.
///
/// # Errors
///
/// Any I/O failure is returned as an [`ExtractError`] carrying the path
/// and a failure category; this function never panics on a bad file.
pub fn extract_identity(path: &Path) -> Result<FileIdentity, ExtractError> {
    let metadata = fs::metadata(path).map_err(|e| ExtractError::from_io(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digest = hash_file(path)?;

    Ok(FileIdentity {
        size: metadata.len(),
        digest,
        name,
    })
}

/// Orchestrates a duplicate scan from configuration to report.
///
/// # Example
///
/// ```no_run
/// use dupescan::config::ScanConfig;
/// use dupescan::duplicates::DuplicateFinder;
///
/// let finder = DuplicateFinder::new(ScanConfig::new("/some/path"));
/// let report = finder.run().unwrap();
/// println!("{} duplicate groups", report.groups.len());
/// ```
pub struct DuplicateFinder {
    config: ScanConfig,
    shutdown_flag: Arc<AtomicBool>,
    tracker: Arc<ProgressTracker>,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            tracker: Arc::new(ProgressTracker::new()),
        }
    }

    /// Set the shutdown flag checked by the feeder and the workers.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = flag;
        self
    }

    /// Share a progress tracker with the caller, typically one a
    /// [`ProgressMonitor`](crate::progress::ProgressMonitor) is rendering.
    #[must_use]
    pub fn with_progress(mut self, tracker: Arc<ProgressTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Run the scan to completion (or to the stop signal).
    ///
    /// # Errors
    ///
    /// Only [`ConfigError`] is surfaced, and only before any scanning
    /// starts. Per-file failures are contained and reported in the
    /// returned [`Report`].
    pub fn run(&self) -> Result<Report, ConfigError> {
        if let Err(e) = self.config.validate() {
            self.tracker.mark_done();
            return Err(e);
        }

        let start = Instant::now();
        let workers = self.config.workers;
        log::info!(
            "Scanning {} with {} workers",
            self.config.root.display(),
            workers
        );

        let walker =
            Walker::new(self.config.clone()).with_shutdown_flag(Arc::clone(&self.shutdown_flag));

        let (work_tx, work_rx) = bounded::<PathBuf>(workers);
        let (result_tx, result_rx) =
            unbounded::<(PathBuf, Result<FileIdentity, ExtractError>)>();

        let mut index: HashMap<FileIdentity, Vec<PathBuf>> = HashMap::new();
        let mut failures: Vec<ExtractionFailure> = Vec::new();
        let mut hashed: u64 = 0;

        let cancel = &self.shutdown_flag;
        let tracker = &self.tracker;
        let walker_ref = &walker;

        thread::scope(|scope| {
            // Feeder: one producer, pulled from by all workers. When the
            // workers disappear (cancellation), the send fails and the
            // feeder stops instead of parking on a full queue forever.
            scope.spawn(move || {
                for path in walker_ref.files() {
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    tracker.discovered();
                    if work_tx.send(path).is_err() {
                        break;
                    }
                }
            });

            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    // Check the flag between files, not mid-extraction: an
                    // in-flight hash always finishes or fails normally.
                    while !cancel.load(Ordering::SeqCst) {
                        let Ok(path) = work_rx.recv() else { break };
                        tracker.start_file(&path);
                        let outcome = extract_identity(&path);
                        tracker.finish_file(&path);
                        if result_tx.send((path, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(work_rx);
            drop(result_tx);

            for (path, outcome) in result_rx {
                match outcome {
                    Ok(identity) => {
                        hashed += 1;
                        index.entry(identity).or_default().push(path);
                    }
                    Err(e) => {
                        log::warn!("Failed to hash {}: {}", path.display(), e);
                        failures.push(ExtractionFailure {
                            path,
                            kind: e.kind(),
                        });
                    }
                }
            }
        });

        let interrupted = self.shutdown_flag.load(Ordering::SeqCst);
        let discovered = self.tracker.snapshot().total;
        self.tracker.mark_done();

        failures.sort_by(|a, b| a.path.cmp(&b.path));
        let groups = group_identities(index);

        let stats = ScanStats {
            discovered,
            filtered: walker.skipped_count(),
            hashed,
            failed: failures.len() as u64,
            duplicate_groups: groups.len(),
            duplicate_files: groups.iter().map(super::DuplicateGroup::duplicate_count).sum(),
            reclaimable_bytes: groups.iter().map(super::DuplicateGroup::wasted_space).sum(),
            duration: start.elapsed(),
        };

        if interrupted {
            log::info!(
                "Scan interrupted: {}/{} files processed before the stop signal",
                stats.hashed + stats.failed,
                stats.discovered
            );
        } else {
            log::info!(
                "Scan complete: {} groups, {} duplicate files, {} failures in {:.2?}",
                stats.duplicate_groups,
                stats.duplicate_files,
                stats.failed,
                stats.duration
            );
        }

        Ok(Report {
            groups,
            failures,
            stats,
            interrupted,
        })
    }
}
