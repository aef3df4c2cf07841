use mirrordna_canonical::ChecksumError;
use mirrordna_dirhash::DirHashError;
use mirrordna_snapshot::SnapshotError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`MirrorClient`](crate::MirrorClient) operations.
#[derive(Error, Debug)]
pub enum SdkError {
    /// The file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error while reading a file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON or YAML, or has the wrong shape.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// A vault configuration lacks required fields.
    #[error("vault config missing required fields: {fields:?}")]
    MissingFields {
        /// Config file.
        path: PathBuf,
        /// Names of the absent fields.
        fields: Vec<String>,
    },
    /// Directory hashing failed.
    #[error(transparent)]
    DirHash(#[from] DirHashError),
    /// Snapshot operation failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Checksum computation failed.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),
}
