use crate::canonicalizer::{canonicalize, CanonicalizationError};
use crate::errors::ChecksumError;
use crate::normalize::normalize_text;
use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256, the only algorithm MirrorDNA emits.
    #[serde(rename = "sha256")]
    Sha256,
}

impl DigestAlg {
    /// Name used in persisted checksum metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlg::Sha256 => "sha256",
        }
    }
}

/// SHA-256 digest rendered as 64 lowercase hex characters.
///
/// Deserialization goes through [`Digest::parse`], so stored digests in either
/// case load lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Length of a hex-encoded SHA-256 digest.
    pub const HEX_LEN: usize = 64;

    /// Parses a hex digest, accepting either case and storing it lowercase.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref();
        let re = Regex::new(r"^[0-9A-Fa-f]{64}$").expect("invalid regex");
        if !re.is_match(value) {
            return Err(ValidationError::InvalidDigest(value.to_string()));
        }
        Ok(Digest(value.to_ascii_lowercase()))
    }

    fn from_hash(hash: &[u8]) -> Self {
        Digest(hex::encode(hash))
    }

    /// Borrows the lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a stored digest string, ignoring hex case.
    pub fn matches(&self, expected: &str) -> bool {
        self.0.eq_ignore_ascii_case(expected.trim())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Digest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::parse(s)
    }
}

impl TryFrom<String> for Digest {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Digest::parse(value)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hashes raw bytes.
pub fn digest_bytes(bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Digest::from_hash(&hasher.finalize())
}

/// Canonicalizes a value and hashes the canonical bytes.
pub fn digest_value<T: Serialize + ?Sized>(value: &T) -> Result<Digest, CanonicalizationError> {
    let bytes = canonicalize(value)?;
    Ok(digest_bytes(&bytes))
}

/// Hashes text as UTF-8, optionally normalizing line endings and trailing
/// whitespace first.
pub fn digest_text(text: &str, normalize: bool) -> Digest {
    if normalize {
        digest_bytes(normalize_text(text).as_bytes())
    } else {
        digest_bytes(text.as_bytes())
    }
}

/// Hashes bytes that are expected to hold UTF-8 text.
///
/// Content that does not decode as UTF-8 is treated as binary and hashed as-is.
pub fn digest_text_bytes(bytes: &[u8], normalize: bool) -> Digest {
    match std::str::from_utf8(bytes) {
        Ok(text) => digest_text(text, normalize),
        Err(_) => {
            tracing::debug!(len = bytes.len(), "content is not UTF-8, hashing raw bytes");
            digest_bytes(bytes)
        }
    }
}

/// Reads a file once and hashes its raw bytes.
pub fn digest_file(path: impl AsRef<Path>) -> Result<Digest, ChecksumError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| ChecksumError::from_io(path, e))?;
    Ok(digest_bytes(&bytes))
}

/// Checksum of a state mapping (or any serializable value) over its canonical form.
pub fn compute_state_checksum<T: Serialize + ?Sized>(state: &T) -> Result<Digest, ChecksumError> {
    Ok(digest_value(state)?)
}

/// Checksum of text after line-ending and whitespace normalization.
pub fn compute_text_checksum(text: &str) -> Digest {
    digest_text(text, true)
}

/// Checksum of a file's raw bytes.
pub fn compute_file_checksum(path: impl AsRef<Path>) -> Result<Digest, ChecksumError> {
    digest_file(path)
}
