//! DupeScan - Concurrent Duplicate File Finder
//!
//! Scans a directory tree, filters candidates by name pattern, size
//! bounds, and symlink policy, hashes surviving files in parallel with
//! BLAKE3, and groups files whose (size, digest, base name) triple
//! collides. Per-file errors never abort a scan, and Ctrl+C yields a
//! partial report instead of nothing.
//!
//! The library boundary is `ScanConfig → Report` via
//! [`duplicates::DuplicateFinder`], plus an optional
//! [`progress::ProgressTracker`] subscription for live status. The
//! binary in `main.rs` is one caller of that contract.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::sync::Arc;
use std::thread;

use bytesize::ByteSize;

use crate::cli::Cli;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::progress::{ProgressMonitor, ProgressTracker};

/// Run a full scan from parsed CLI arguments and return the exit code.
///
/// # Errors
///
/// Returns an error for invalid configuration (missing root, zero
/// workers) or an unwritable output file. Per-file scan problems are
/// reported inside the written report, not here.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = cli.scan_config();
    config.validate()?;

    let total_cores = thread::available_parallelism().map_or(1, |n| n.get());
    log::info!("Available cores: {total_cores}");
    log::info!("Using {} worker threads", config.workers);
    if !config.exclude_patterns.is_empty() {
        log::info!("Excluding patterns: {}", config.exclude_patterns.join(", "));
    }
    if let Some(min) = config.min_size {
        log::info!("Minimum file size: {}", ByteSize::b(min));
    }
    if let Some(max) = config.max_size {
        log::info!("Maximum file size: {}", ByteSize::b(max));
    }
    log::info!(
        "Following symlinks: {}",
        if config.follow_symlinks { "yes" } else { "no" }
    );

    let handler = signal::install_handler()?;
    let tracker = Arc::new(ProgressTracker::new());
    let monitor = (!cli.quiet).then(|| ProgressMonitor::spawn(Arc::clone(&tracker)));

    let finder = DuplicateFinder::new(config)
        .with_shutdown_flag(handler.get_flag())
        .with_progress(Arc::clone(&tracker));
    let report = finder.run()?;

    if let Some(monitor) = monitor {
        monitor.join();
    }

    output::write_report(&report, &cli.output, cli.format)?;

    if report.has_duplicates() {
        log::info!(
            "Found {} duplicate groups, {} reclaimable. Results saved to {}",
            report.stats.duplicate_groups,
            ByteSize::b(report.stats.reclaimable_bytes),
            cli.output.display()
        );
    } else {
        log::info!("No duplicate files found.");
    }
    if !report.failures.is_empty() {
        log::warn!("{} file(s) could not be checked", report.failures.len());
    }

    Ok(if report.interrupted {
        ExitCode::Interrupted
    } else if !report.failures.is_empty() {
        ExitCode::PartialSuccess
    } else if report.has_duplicates() {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    })
}
