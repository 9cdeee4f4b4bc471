//! Report writers.
//!
//! The core hands the caller an in-memory [`Report`]; everything here is
//! caller-side serialization of that structure.

pub mod json;
pub mod text;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;

use crate::duplicates::Report;

/// On-disk report representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Plain text listing, one group per block.
    Text,
    /// Pretty-printed JSON for scripting.
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Write the report to `path` in the requested format.
///
/// # Errors
///
/// Fails if the output file cannot be created or written.
pub fn write_report(report: &Report, path: &Path, format: ReportFormat) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut out = BufWriter::new(file);

    match format {
        ReportFormat::Text => text::write_text(report, &mut out)?,
        ReportFormat::Json => json::write_json(report, &mut out)?,
    }

    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Report written to {} as {}", path.display(), format);
    Ok(())
}
