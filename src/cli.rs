//! Command-line interface for the dupescan binary.
//!
//! The CLI resolves everything the core should not have to think about:
//! size suffixes become byte counts, the comma-separated exclude list
//! becomes a pattern vector, and the worker default is filled in before a
//! [`ScanConfig`] is built.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory, writing duplicates.txt next to you
//! dupescan ~/Downloads
//!
//! # Exclude temp files, only look at files between 500K and 1G
//! dupescan ~/Downloads --exclude "*.tmp,*.bak" --min-size 500K --max-size 1G
//!
//! # JSON report with 8 workers
//! dupescan ~/Downloads --format json --output dupes.json --workers 8
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::ScanConfig;
use crate::output::ReportFormat;

/// Find duplicate files by size, content hash, and name.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// File to write the report to
    #[arg(short, long, value_name = "PATH", default_value = "duplicates.txt")]
    pub output: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Number of worker threads (default: half the available cores)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Glob patterns to exclude, comma-separated (e.g. "*.tmp,*.bak")
    #[arg(short, long, value_name = "PATTERNS", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Minimum file size to check (e.g. 1M, 500K, 1000000)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to check (e.g. 10M, 1G, 50000000)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress the progress display and all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Build the scan configuration from the parsed arguments.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::new(&self.directory)
            .with_exclude_patterns(self.exclude.iter().map(|p| p.trim().to_string()).collect())
            .with_min_size(self.min_size)
            .with_max_size(self.max_size)
            .with_follow_symlinks(self.follow_symlinks);
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config
    }
}

/// Parse a size string with K/M/G suffixes (powers of 1024).
///
/// A bare number is taken as bytes. Case-insensitive.
///
/// # Examples
///
/// ```
/// use dupescan::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("500K").unwrap(), 500 * 1024);
/// assert_eq!(parse_size("10m").unwrap(), 10 * 1024 * 1024);
/// assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
/// ```
///
/// # Errors
///
/// Returns a message if the string is empty, the number part does not
/// parse, or the result overflows.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim().to_uppercase();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (digits, multiplier) = if let Some(rest) = s.strip_suffix('K') {
        (rest, 1024u64)
    } else if let Some(rest) = s.strip_suffix('M') {
        (rest, 1024 * 1024)
    } else if let Some(rest) = s.strip_suffix('G') {
        (rest, 1024 * 1024 * 1024)
    } else {
        (s.as_str(), 1)
    };

    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("Invalid size: '{s}'"))?;

    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Size too large: '{s}'"))
}
