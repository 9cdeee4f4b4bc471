//! Streaming BLAKE3 content digests.
//!
//! Files are read in fixed-size blocks and fed through an incremental
//! hasher, so memory use stays flat regardless of file size. The block
//! size is an implementation constant, not a tunable.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::ExtractError;

/// Read granularity for streaming hashes.
pub const BLOCK_SIZE: usize = 64 * 1024;

/// A 32-byte BLAKE3 digest.
pub type Digest = [u8; 32];

/// Hash a file's entire content.
///
/// # Errors
///
/// Returns [`ExtractError`] classified from the underlying I/O error; the
/// caller records it against the path and moves on.
pub fn hash_file(path: &Path) -> Result<Digest, ExtractError> {
    let mut file = File::open(path).map_err(|e| ExtractError::from_io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut block = vec![0u8; BLOCK_SIZE];

    loop {
        let n = file
            .read(&mut block)
            .map_err(|e| ExtractError::from_io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Render a digest as lowercase hex.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    let mut hex = String::with_capacity(64);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}
