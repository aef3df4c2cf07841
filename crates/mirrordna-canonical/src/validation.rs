use thiserror::Error;

/// Rejected digest or timestamp strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Not 64 hex characters.
    #[error("invalid digest {0:?}: expected 64 hex characters")]
    InvalidDigest(String),
    /// Not a UTC ISO-8601 timestamp ending in `Z`.
    #[error("invalid timestamp {0:?}: expected UTC ISO-8601 with a trailing Z")]
    InvalidTimestamp(String),
}
