//! Directory state hashing for MirrorDNA vaults.
//!
//! A directory's state hash is the SHA-256 digest of a text block listing every
//! included file as `relative/path:content_digest`, one per line, sorted by path.
//! The result is independent of traversal order, file creation order and the
//! host's path separator. Ignored names never influence it: ignored directories
//! are pruned before they are visited.
//!
//! ```rust,no_run
//! use mirrordna_dirhash::{hash_directory, IgnoreSet};
//!
//! let digest = hash_directory("./vault", &IgnoreSet::default())?;
//! println!("vault state: {}", digest);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for directory hashing.
pub mod errors;
/// Aggregate hashing over walked files.
pub mod hasher;
/// Ignore patterns.
pub mod ignore;
/// Relative path normalization.
pub mod path;
/// Pruning directory walker.
pub mod walker;

pub use errors::DirHashError;
pub use hasher::{aggregate_digest, hash_directory, DirectoryHash, DirectoryHasher};
pub use ignore::{IgnorePattern, IgnoreSet, DEFAULT_IGNORE_PATTERNS};
pub use walker::{FileEntry, SkippedFile, WalkOutcome, Walker, WalkerConfig};
