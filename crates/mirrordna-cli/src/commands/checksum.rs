//! Checksum command implementation.

use mirrordna_canonical::{digest_file, digest_text_bytes};
use std::path::PathBuf;

pub fn run(path: PathBuf, text: bool, no_normalize: bool) -> Result<(), Box<dyn std::error::Error>> {
    let digest = if text {
        let bytes = std::fs::read(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path.display(), e))?;
        digest_text_bytes(&bytes, !no_normalize)
    } else {
        digest_file(&path)?
    };

    println!("{}  {}", digest, path.display());
    Ok(())
}
