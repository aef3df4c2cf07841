//! Canonical encoding and checksum primitives for MirrorDNA continuity state.
//!
//! Every digest the toolkit produces flows through this crate: arbitrary nested
//! data is canonicalized into one byte-stable JSON form, hashed with SHA-256 and
//! rendered as lowercase hex. The canonical form is part of the wire contract;
//! see [`canonicalizer`] for the exact encoding.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Digest type and the hashing entry points.
pub mod digest;
/// Errors raised while computing or verifying checksums.
pub mod errors;
mod finite;
/// Identifier newtypes shared by snapshot and config records.
pub mod identifiers;
/// Line-ending and trailing-whitespace normalization for text digests.
pub mod normalize;
/// Validation helpers used by canonical types.
pub mod validation;
/// Checksum verification against stored digests.
pub mod verify;

pub use canonicalizer::{canonicalize, CanonicalizationError, Canonicalizer, MAX_DEPTH};
pub use digest::{
    compute_file_checksum, compute_state_checksum, compute_text_checksum, digest_bytes,
    digest_file, digest_text, digest_text_bytes, digest_value, Digest, DigestAlg,
};
pub use errors::ChecksumError;
pub use identifiers::Timestamp;
pub use normalize::normalize_text;
pub use validation::ValidationError;
pub use verify::{digests_match, verify_checksum, ChecksumSubject};
