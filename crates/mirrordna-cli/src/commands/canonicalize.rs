//! Canonicalize command implementation.

use mirrordna_canonical::{digest_bytes, Canonicalizer};
use mirrordna_sdk::read_document;
use serde_json::Value;
use std::io::{self, Read};
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, show_digest: bool) -> Result<(), Box<dyn std::error::Error>> {
    let value: Value = match input {
        Some(path) => read_document(&path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            serde_json::from_str(&buffer).map_err(|e| format!("invalid JSON on stdin: {}", e))?
        }
    };

    let bytes = Canonicalizer::new().canonicalize(&value)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    if show_digest {
        eprintln!("sha256: {}", digest_bytes(&bytes));
    }
    Ok(())
}
