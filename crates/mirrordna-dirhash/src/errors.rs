use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a directory hash.
///
/// Individual unreadable files are not errors; they are reported as
/// [`SkippedFile`](crate::SkippedFile) entries.
#[derive(Error, Debug)]
pub enum DirHashError {
    /// The root does not exist.
    #[error("directory not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The root exists but is not a directory.
    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// The root itself could not be inspected.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being inspected.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
