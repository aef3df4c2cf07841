//! Verify command implementation.

use crate::errors::CliError;
use mirrordna_canonical::{verify_checksum, ChecksumSubject};
use std::path::PathBuf;

pub fn run(path: PathBuf, expected: String, text: bool) -> Result<(), Box<dyn std::error::Error>> {
    let matched = if text {
        let bytes = std::fs::read(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path.display(), e))?;
        // non-UTF-8 content is compared as raw bytes
        let subject = match std::str::from_utf8(&bytes) {
            Ok(text) => ChecksumSubject::Text(text),
            Err(_) => ChecksumSubject::Bytes(&bytes),
        };
        verify_checksum(subject, &expected)?
    } else {
        verify_checksum(ChecksumSubject::File(&path), &expected)?
    };

    if !matched {
        return Err(CliError::CheckFailed(format!(
            "checksum mismatch for {}",
            path.display()
        ))
        .into());
    }
    println!("OK  {}", path.display());
    Ok(())
}
