//! Snapshot command implementation.

use crate::output::{format_json, yes_no};
use clap::Subcommand;
use mirrordna_sdk::read_document;
use mirrordna_snapshot::{
    capture_snapshot, compare_snapshots, into_state_map, SnapshotFormat, SnapshotSections,
    SnapshotStore, StateMap, SNAPSHOT_VERSION,
};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum SnapshotCommand {
    /// Capture a snapshot from JSON/YAML section files
    Capture {
        /// Snapshot identifier
        #[arg(long)]
        id: String,
        /// Identity state file
        #[arg(long)]
        identity: PathBuf,
        /// Continuity state file
        #[arg(long)]
        continuity: PathBuf,
        /// Vault state file
        #[arg(long)]
        vault: Option<PathBuf>,
        /// Timeline summary file
        #[arg(long)]
        timeline: Option<PathBuf>,
        /// Metadata file
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Snapshot format version
        #[arg(long, default_value = SNAPSHOT_VERSION)]
        version: String,
        /// Output path
        #[arg(long)]
        out: PathBuf,
        /// Output format (default: from the output extension)
        #[arg(long)]
        format: Option<SnapshotFormat>,
    },
    /// Load, verify and print a snapshot
    Show {
        /// Snapshot file
        path: PathBuf,
    },
    /// Compare two snapshots
    Diff {
        /// Earlier snapshot
        from: PathBuf,
        /// Later snapshot
        to: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: SnapshotCommand) -> Result<(), Box<dyn std::error::Error>> {
    let store = SnapshotStore::new();
    match command {
        SnapshotCommand::Capture {
            id,
            identity,
            continuity,
            vault,
            timeline,
            metadata,
            version,
            out,
            format,
        } => {
            let mut sections = SnapshotSections::new(
                read_section(&identity, "identity_state")?,
                read_section(&continuity, "continuity_state")?,
            )
            .with_version(version);
            if let Some(path) = vault {
                sections = sections.with_vault_state(read_section(&path, "vault_state")?);
            }
            if let Some(path) = timeline {
                sections = sections.with_timeline_summary(read_section(&path, "timeline_summary")?);
            }
            if let Some(path) = metadata {
                sections = sections.with_metadata(read_section(&path, "metadata")?);
            }

            let snapshot = capture_snapshot(id, sections)?;
            store.save(&snapshot, &out, format)?;
            println!("Snapshot: {}", snapshot.snapshot_id);
            println!("Checksum: {}", snapshot.checksum);
            println!("Saved:    {}", out.display());
        }
        SnapshotCommand::Show { path } => {
            let loaded = store.load_detailed(&path, None)?;
            for name in loaded.unknown_fields.keys() {
                tracing::warn!(path = %path.display(), field = %name, "ignored unknown snapshot field");
            }
            println!("{}", format_json(&loaded.snapshot));
        }
        SnapshotCommand::Diff { from, to, json } => {
            let diff = compare_snapshots(&store.load(&from)?, &store.load(&to)?);
            if json {
                println!("{}", format_json(&diff));
            } else {
                println!("Checksum changed: {}", yes_no(diff.checksum_changed));
                println!("From:             {}", diff.from_timestamp);
                println!("To:               {}", diff.to_timestamp);
                if let Some(seconds) = diff.elapsed_seconds {
                    println!("Elapsed:          {}s", seconds);
                }
                if diff.changed_sections.is_empty() {
                    println!("Changed sections: none");
                } else {
                    let names: Vec<&str> = diff.changed_sections.iter().map(|s| s.as_str()).collect();
                    println!("Changed sections: {}", names.join(", "));
                }
            }
        }
    }
    Ok(())
}

fn read_section(path: &Path, section: &'static str) -> Result<StateMap, Box<dyn std::error::Error>> {
    Ok(into_state_map(read_document(path)?, section)?)
}
