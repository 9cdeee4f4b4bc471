//! Directory walker built on `walkdir`.
//!
//! The walker produces a lazy sequence of eligible file paths for the hash
//! workers. Children are visited in name order so a static tree always
//! yields the same sequence, which keeps scans reproducible. Directories
//! whose name starts with `.` are pruned from descent entirely, and an
//! unreadable subdirectory is skipped without aborting the rest of the
//! walk.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;

use super::PathFilter;

/// Candidate discovery over a directory tree.
///
/// # Example
///
/// ```no_run
/// use dupescan::config::ScanConfig;
/// use dupescan::scanner::Walker;
///
/// let walker = Walker::new(ScanConfig::new("."));
/// for path in walker.files() {
///     println!("{}", path.display());
/// }
/// println!("{} paths rejected by filters", walker.skipped_count());
/// ```
#[derive(Debug)]
pub struct Walker {
    config: ScanConfig,
    filter: PathFilter,
    shutdown_flag: Option<Arc<AtomicBool>>,
    skipped: AtomicU64,
}

impl Walker {
    /// Create a walker for the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        let filter = PathFilter::new(&config);
        Self {
            config,
            filter,
            shutdown_flag: None,
            skipped: AtomicU64::new(0),
        }
    }

    /// Set the shutdown flag. When it flips, the walk ends at the next
    /// entry instead of finishing the tree.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Number of discovered paths the filter rejected so far.
    #[must_use]
    pub fn skipped_count(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the tree, yielding eligible file paths.
    ///
    /// The sequence is lazy and not restartable; call sites that need the
    /// set twice walk twice. Traversal errors (unreadable directories,
    /// entries vanishing mid-walk) are logged at debug level and skipped.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.config.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden_dir(entry))
            .take_while(move |_| !self.is_shutdown_requested())
            .filter_map(move |entry_result| {
                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::debug!("Skipping unreadable entry: {}", e);
                        return None;
                    }
                };

                if entry.file_type().is_dir() {
                    return None;
                }

                if self.filter.accepts(&entry) {
                    Some(entry.into_path())
                } else {
                    self.skipped.fetch_add(1, Ordering::Relaxed);
                    None
                }
            })
    }
}

/// Directories named with a leading dot are never descended into.
fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}
