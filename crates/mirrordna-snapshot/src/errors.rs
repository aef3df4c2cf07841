use crate::format::SnapshotFormat;
use mirrordna_canonical::{CanonicalizationError, ChecksumError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while capturing, persisting or loading snapshots.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot file does not exist.
    #[error("snapshot file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error while reading or writing a snapshot file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The stored checksum does not match the recomputed one.
    #[error("snapshot integrity check failed for {}: expected {expected}, computed {actual}", path.display())]
    Integrity {
        /// File that failed verification.
        path: PathBuf,
        /// Checksum recorded in the file.
        expected: String,
        /// Checksum recomputed from the file's fields.
        actual: String,
    },
    /// The file carries no string `checksum` field.
    #[error("snapshot has no checksum: {}", .0.display())]
    MissingChecksum(PathBuf),
    /// A section that must be a mapping holds something else.
    #[error("section `{0}` must be a mapping")]
    NotAMapping(&'static str),
    /// The file could not be parsed or its fields have the wrong shape.
    #[error("failed to decode snapshot: {0}")]
    Decode(String),
    /// The snapshot could not be rendered.
    #[error("failed to encode snapshot: {0}")]
    Encode(String),
    /// No codec for the requested format is installed in the store.
    #[error("no {0} codec is installed")]
    BackendUnavailable(SnapshotFormat),
    /// Checksum computation failed.
    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),
}

impl From<CanonicalizationError> for SnapshotError {
    fn from(err: CanonicalizationError) -> Self {
        SnapshotError::Checksum(ChecksumError::Canonicalization(err))
    }
}

impl SnapshotError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            SnapshotError::NotFound(path)
        } else {
            SnapshotError::Io { path, source }
        }
    }
}
