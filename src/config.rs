//! Scan configuration.
//!
//! [`ScanConfig`] carries everything the duplicate finder needs: the root
//! directory, exclusion globs, size bounds, the symlink policy, and the
//! worker count. Callers resolve CLI input (size suffixes, pattern lists)
//! before constructing it; once handed to the finder it is never mutated.

use std::path::PathBuf;
use std::thread;

/// Configuration errors reported before any scanning starts.
///
/// These are the only errors the finder surfaces as hard failures; every
/// per-file problem during the scan is contained and reported in the
/// [`Report`](crate::duplicates::Report) instead.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The scan root does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The scan root exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The worker count is zero.
    #[error("Worker count must be at least 1")]
    ZeroWorkers,
}

/// Configuration for a duplicate scan.
///
/// # Example
///
/// ```no_run
/// use dupescan::config::ScanConfig;
///
/// let config = ScanConfig::new("/home/user/Downloads")
///     .with_exclude_patterns(vec!["*.tmp".to_string(), "*.bak".to_string()])
///     .with_min_size(Some(1024))
///     .with_workers(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Glob patterns excluding files by name (gitignore-style).
    pub exclude_patterns: Vec<String>,

    /// Minimum file size in bytes. Smaller files are skipped.
    pub min_size: Option<u64>,

    /// Maximum file size in bytes. Larger files are skipped.
    pub max_size: Option<u64>,

    /// Follow symbolic links. When false, symlinks are never candidates.
    pub follow_symlinks: bool,

    /// Number of hash workers. Defaults to half the available cores.
    pub workers: usize,
}

impl ScanConfig {
    /// Create a configuration for the given root with default settings.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_patterns: Vec::new(),
            min_size: None,
            max_size: None,
            follow_symlinks: false,
            workers: default_worker_count(),
        }
    }

    /// Set the exclusion globs.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Set the minimum file size filter.
    #[must_use]
    pub fn with_min_size(mut self, min_size: Option<u64>) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum file size filter.
    #[must_use]
    pub fn with_max_size(mut self, max_size: Option<u64>) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set whether symbolic links are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check that the configuration can drive a scan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the root is missing or not a directory,
    /// or if the worker count is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.exists() {
            return Err(ConfigError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::NotADirectory(self.root.clone()));
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

/// Default worker count: half the available cores, at least one.
#[must_use]
pub fn default_worker_count() -> usize {
    let cores = thread::available_parallelism().map_or(1, |n| n.get());
    (cores / 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_default_worker_count_positive() {
        assert!(default_worker_count() >= 1);
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ScanConfig::new("/some/dir");
        assert_eq!(config.root, PathBuf::from("/some/dir"));
        assert!(config.exclude_patterns.is_empty());
        assert!(config.min_size.is_none());
        assert!(config.max_size.is_none());
        assert!(!config.follow_symlinks);
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_builders() {
        let config = ScanConfig::new("/some/dir")
            .with_exclude_patterns(vec!["*.tmp".to_string()])
            .with_min_size(Some(1024))
            .with_max_size(Some(1_000_000))
            .with_follow_symlinks(true)
            .with_workers(8);

        assert_eq!(config.exclude_patterns, vec!["*.tmp".to_string()]);
        assert_eq!(config.min_size, Some(1024));
        assert_eq!(config.max_size, Some(1_000_000));
        assert!(config.follow_symlinks);
        assert_eq!(config.workers, 8);
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        let config = ScanConfig::new(dir.path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_root() {
        let config = ScanConfig::new("/nonexistent/path/12345");
        assert!(matches!(config.validate(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_validate_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        File::create(&file).unwrap();

        let config = ScanConfig::new(&file);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_validate_zero_workers() {
        let dir = TempDir::new().unwrap();
        let config = ScanConfig::new(dir.path()).with_workers(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWorkers)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotADirectory(PathBuf::from("/file.txt"));
        assert_eq!(err.to_string(), "Not a directory: /file.txt");

        let err = ConfigError::NotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Path not found: /missing");
    }
}
