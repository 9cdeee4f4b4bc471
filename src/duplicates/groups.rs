//! Identity keys, duplicate groups, and the final report.
//!
//! Two files are duplicates exactly when their [`FileIdentity`] triples
//! are equal: same size, same content digest, same base name. The grouper
//! consumes the identity index the dispatcher accumulated, drops
//! singletons, and orders everything deterministically so the same tree
//! always produces the same report regardless of worker count.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::scanner::{digest_to_hex, Digest, FailureKind};

/// The duplicate-equality key: (size, digest, base name).
///
/// Field order matters for the derived `Ord`: groups sort by size first,
/// then digest, then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileIdentity {
    /// File size in bytes.
    pub size: u64,
    /// BLAKE3 digest of the file content.
    #[serde(serialize_with = "serialize_digest")]
    pub digest: Digest,
    /// Base file name, unmodified (no case folding or normalization).
    pub name: String,
}

impl FileIdentity {
    /// Digest as lowercase hex.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }
}

fn serialize_digest<S: Serializer>(digest: &Digest, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&digest_to_hex(digest))
}

/// A file that could not be fingerprinted, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionFailure {
    /// Path the extraction failed on.
    pub path: PathBuf,
    /// Failure category.
    pub kind: FailureKind,
}

/// A set of distinct paths sharing one identity. Always at least two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// The shared identity.
    pub identity: FileIdentity,
    /// Paths carrying it, sorted lexicographically.
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Groups are never empty by construction, but the conventional pair
    /// to `len` is kept for callers iterating generically.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (total minus one original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes reclaimable by keeping a single copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.identity.size * self.duplicate_count() as u64
    }
}

/// Aggregate counters for a finished (or cancelled) scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Eligible files the walker handed to the workers.
    pub discovered: u64,
    /// Discovered paths rejected by the filters.
    pub filtered: u64,
    /// Files successfully fingerprinted.
    pub hashed: u64,
    /// Files that produced an extraction failure.
    pub failed: u64,
    /// Number of duplicate groups in the report.
    pub duplicate_groups: usize,
    /// Redundant copies across all groups (group sizes minus group count).
    pub duplicate_files: usize,
    /// Bytes reclaimable by deleting every redundant copy.
    pub reclaimable_bytes: u64,
    /// Wall-clock duration of the scan.
    pub duration: Duration,
}

/// The scan result: duplicate groups, failures, and statistics.
///
/// Assembled only after the dispatcher has drained all work; immutable
/// afterwards. A cancelled run yields a valid report with `interrupted`
/// set, covering whatever was processed before the stop signal.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Duplicate groups, ordered by identity.
    pub groups: Vec<DuplicateGroup>,
    /// Files that could not be hashed, with reasons.
    pub failures: Vec<ExtractionFailure>,
    /// Aggregate counters.
    pub stats: ScanStats,
    /// True when the scan was cut short by a stop signal.
    pub interrupted: bool,
}

impl Report {
    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// Partition collected identities into duplicate groups.
///
/// Singleton partitions are discarded. Paths within a group are sorted,
/// and groups are ordered by identity, so the output is independent of
/// the order in which extractions completed.
#[must_use]
pub fn group_identities(index: HashMap<FileIdentity, Vec<PathBuf>>) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = index
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(identity, mut paths)| {
            paths.sort();
            log::debug!(
                "Duplicate group {} ({} bytes): {} files",
                digest_to_hex(&identity.digest),
                identity.size,
                paths.len()
            );
            DuplicateGroup { identity, paths }
        })
        .collect();

    groups.sort_by(|a, b| a.identity.cmp(&b.identity));
    groups
}
