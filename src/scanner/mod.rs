//! Directory traversal, path filtering, and content hashing.
//!
//! The scanner is divided into submodules:
//! - [`walker`]: deterministic directory traversal and candidate discovery
//! - [`filter`]: per-path eligibility checks (globs, symlinks, size bounds)
//! - [`hasher`]: streaming BLAKE3 content digests
//!
//! The walker yields only eligible file paths; everything it rejects is
//! counted but never reported as an error. Hashing failures, by contrast,
//! are surfaced as [`ExtractError`] values so the final report can list
//! which files could not be fingerprinted and why.

pub mod filter;
pub mod hasher;
pub mod walker;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use filter::PathFilter;
pub use hasher::{digest_to_hex, hash_file, Digest, BLOCK_SIZE};
pub use walker::Walker;

/// Why a file could not be fingerprinted.
///
/// Collapsed from the underlying I/O error so the report stays stable
/// across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Read failed for a reason other than the two below (device error,
    /// interrupted read, not a regular file anymore).
    Unreadable,
    /// The file exists but could not be opened for reading.
    PermissionDenied,
    /// The file disappeared between discovery and hashing.
    Vanished,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreadable => write!(f, "unreadable"),
            Self::PermissionDenied => write!(f, "permission-denied"),
            Self::Vanished => write!(f, "vanished"),
        }
    }
}

/// Errors that can occur while extracting a file's identity.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The file disappeared between discovery and hashing.
    #[error("File vanished: {0}")]
    Vanished(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Any other I/O error while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::Vanished(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The path the extraction failed on.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Vanished(path) | Self::PermissionDenied(path) => path,
            Self::Io { path, .. } => path,
        }
    }

    /// The report-facing failure category.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Vanished(_) => FailureKind::Vanished,
            Self::PermissionDenied(_) => FailureKind::PermissionDenied,
            Self::Io { .. } => FailureKind::Unreadable,
        }
    }
}
