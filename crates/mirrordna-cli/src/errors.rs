use thiserror::Error;

/// Failures that end a command with exit code 1 without being I/O or parse errors.
#[derive(Error, Debug)]
pub enum CliError {
    /// A verification step did not pass.
    #[error("{0}")]
    CheckFailed(String),
    /// Command-line input was unusable.
    #[error("{0}")]
    InvalidInput(String),
}
