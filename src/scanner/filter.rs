//! Path eligibility checks.
//!
//! The filter decides whether a discovered entry becomes a candidate for
//! hashing. Checks run cheapest-first: name globs need no I/O, the symlink
//! policy reuses the file type from the walk, and only then is a single
//! metadata read spent on the size bounds. A path that fails any check is
//! silently skipped; a metadata failure here is treated the same way, not
//! as an error.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::DirEntry;

use crate::config::ScanConfig;

/// Eligibility filter applied to every non-directory entry the walker finds.
#[derive(Debug)]
pub struct PathFilter {
    matcher: Option<Gitignore>,
    min_size: Option<u64>,
    max_size: Option<u64>,
    follow_symlinks: bool,
}

impl PathFilter {
    /// Build the filter for a scan configuration.
    ///
    /// Invalid exclusion patterns are logged and ignored rather than
    /// failing the scan.
    #[must_use]
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            matcher: build_matcher(&config.root, &config.exclude_patterns),
            min_size: config.min_size,
            max_size: config.max_size,
            follow_symlinks: config.follow_symlinks,
        }
    }

    /// Decide whether the entry is eligible for hashing.
    #[must_use]
    pub fn accepts(&self, entry: &DirEntry) -> bool {
        let path = entry.path();

        if self.name_excluded(path) {
            log::trace!("Excluded by pattern: {}", path.display());
            return false;
        }

        if entry.path_is_symlink() && !self.follow_symlinks {
            log::trace!("Skipping symlink: {}", path.display());
            return false;
        }

        // One stat per surviving entry. Resolves the symlink target when
        // following is enabled.
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                log::debug!("Metadata unavailable for {}: {}", path.display(), e);
                return false;
            }
        };

        if !metadata.is_file() {
            return false;
        }

        if !self.passes_size_filter(metadata.len()) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                metadata.len(),
                path.display()
            );
            return false;
        }

        true
    }

    /// Check the file name against the exclusion globs.
    fn name_excluded(&self, path: &Path) -> bool {
        self.matcher
            .as_ref()
            .is_some_and(|gi| gi.matched(path, false).is_ignore())
    }

    /// Check a file size against the configured bounds.
    fn passes_size_filter(&self, size: u64) -> bool {
        if let Some(min) = self.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.max_size {
            if size > max {
                return false;
            }
        }
        true
    }
}

/// Compile exclusion patterns into a gitignore matcher.
///
/// Returns `None` when no usable pattern remains, so the hot path can skip
/// matching entirely.
fn build_matcher(root: &Path, patterns: &[String]) -> Option<Gitignore> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        if let Err(e) = builder.add_line(None, pattern) {
            log::warn!("Invalid exclude pattern '{}': {}", pattern, e);
        }
    }

    match builder.build() {
        Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Failed to build exclude patterns: {}", e);
            None
        }
    }
}
