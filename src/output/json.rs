//! JSON report serialization.

use std::io::Write;

use crate::duplicates::Report;

/// Write the report as pretty-printed JSON.
///
/// Digests are rendered as lowercase hex strings; failure kinds as
/// kebab-case strings.
///
/// # Errors
///
/// Propagates serialization and I/O errors from `serde_json`.
pub fn write_json(report: &Report, out: &mut impl Write) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(out, report)
}
