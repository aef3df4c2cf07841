use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the digest engine and checksum verifier.
#[derive(Error, Debug)]
pub enum ChecksumError {
    /// The file to digest does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The value could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] crate::CanonicalizationError),
}

impl ChecksumError {
    /// Maps an I/O error for `path`, turning `NotFound` into its own variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ChecksumError::NotFound(path)
        } else {
            ChecksumError::Io { path, source }
        }
    }
}
