use mirrordna_canonical::ChecksumError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the configuration store.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration or checksum file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error while reading or writing a file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A file does not hold valid JSON of the expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The configuration does not match its recorded checksum.
    #[error("checksum verification failed for config '{name}': expected {expected}, got {actual}")]
    Integrity {
        /// Configuration name.
        name: String,
        /// Digest recorded in the checksum file.
        expected: String,
        /// Digest of the configuration as stored.
        actual: String,
    },
    /// The checksum file names an algorithm this store cannot compute.
    #[error("unsupported checksum algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The name is outside the store's allow-list.
    #[error("config '{0}' not in allowed list")]
    NotAllowed(String),
    /// The name cannot be used as a configuration file stem.
    #[error("invalid config name: {0:?}")]
    InvalidName(String),
    /// No home directory to place the default store in.
    #[error("cannot determine home directory")]
    NoHomeDir,
    /// Digest computation failed.
    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),
}

impl ConfigError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path)
        } else {
            ConfigError::Io { path, source }
        }
    }
}
