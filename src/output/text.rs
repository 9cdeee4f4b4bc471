//! Plain-text report listing.
//!
//! One block per duplicate group: an identity header followed by the
//! paths sharing it. Matches what a person skims in a terminal or diff.

use std::io::Write;

use bytesize::ByteSize;

use crate::duplicates::Report;

/// Write the report as plain text.
///
/// # Errors
///
/// Propagates any I/O error from the writer.
pub fn write_text(report: &Report, out: &mut impl Write) -> std::io::Result<()> {
    if report.interrupted {
        writeln!(
            out,
            "Scan interrupted: partial results covering {}/{} files.",
            report.stats.hashed + report.stats.failed,
            report.stats.discovered
        )?;
        writeln!(out)?;
    }

    if report.has_duplicates() {
        writeln!(out, "Found duplicate files (same size, hash, and name):")?;
        for group in &report.groups {
            writeln!(out)?;
            writeln!(
                out,
                "Name: {} | Size: {} | Hash: {}",
                group.identity.name,
                ByteSize::b(group.identity.size),
                group.identity.digest_hex()
            )?;
            for path in &group.paths {
                writeln!(out, "{}", path.display())?;
            }
        }
    } else {
        writeln!(out, "No duplicate files found.")?;
    }

    if !report.failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "Files that could not be checked:")?;
        for failure in &report.failures {
            writeln!(out, "{} ({})", failure.path.display(), failure.kind)?;
        }
    }

    Ok(())
}
