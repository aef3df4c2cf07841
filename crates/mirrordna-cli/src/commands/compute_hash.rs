//! Compute-hash command implementation.

use crate::output::{format_json, format_table_row, print_table_header};
use mirrordna_dirhash::{DirectoryHasher, IgnoreSet};
use serde_json::json;
use std::path::PathBuf;

pub fn run(
    dir: PathBuf,
    ignore: Vec<String>,
    verbose: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ignore = if ignore.is_empty() {
        IgnoreSet::default()
    } else {
        IgnoreSet::from_patterns(&ignore)
    };
    let result = DirectoryHasher::with_ignore(ignore).hash(&dir)?;

    for skipped in &result.skipped {
        tracing::warn!(path = %skipped.path.display(), reason = %skipped.reason, "file left out of state hash");
    }

    if json_output {
        let mut report = json!({
            "directory": dir.display().to_string(),
            "state_hash": result.digest,
            "file_count": result.file_count(),
            "skipped": result.skipped,
        });
        if verbose {
            report["files"] = json!(result.files);
        }
        println!("{}", format_json(&report));
        return Ok(());
    }

    if verbose {
        print_table_header("SHA256", "PATH");
        for (path, digest) in &result.files {
            println!("{}", format_table_row(digest.as_str(), path));
        }
        println!();
    }
    println!("Directory:  {}", dir.display());
    println!("Files:      {}", result.file_count());
    println!("State hash: {}", result.digest);
    Ok(())
}
