//! Duplicate detection: identity extraction, the worker-pool dispatcher,
//! and grouping into the final report.
//!
//! - [`finder`]: the [`DuplicateFinder`] pipeline orchestrator
//! - [`groups`]: [`FileIdentity`] keys, [`DuplicateGroup`]s, and [`Report`]

pub mod finder;
pub mod groups;

pub use finder::{extract_identity, DuplicateFinder};
pub use groups::{
    group_identities, DuplicateGroup, ExtractionFailure, FileIdentity, Report, ScanStats,
};
