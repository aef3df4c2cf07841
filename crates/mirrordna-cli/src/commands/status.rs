//! Status command implementation.

use crate::errors::CliError;
use crate::output::{format_json, yes_no};
use mirrordna_sdk::MirrorClient;
use std::path::PathBuf;

pub fn run(
    vault: Option<PathBuf>,
    timeline: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if vault.is_none() && timeline.is_none() {
        return Err(CliError::InvalidInput("pass --vault and/or --timeline".to_string()).into());
    }

    let mut client = MirrorClient::new();
    let status = client.continuity_status(vault.as_deref(), timeline.as_deref());

    if json {
        println!("{}", format_json(&status));
        return Ok(());
    }

    println!("Timestamp:      {}", status.timestamp);
    if vault.is_some() {
        println!("Vault loaded:   {}", yes_no(status.vault_loaded));
        if let (Some(id), Some(name)) = (&status.vault_id, &status.vault_name) {
            println!("Vault:          {} ({})", id, name);
        }
        if let Some(error) = &status.vault_error {
            println!("Vault error:    {}", error);
        }
        match (&status.state_hash, &status.state_hash_error) {
            (Some(hash), _) => println!("State hash:     {}", hash),
            (None, Some(error)) => println!("State hash:     error: {}", error),
            (None, None) => {}
        }
    }
    if timeline.is_some() {
        println!("Timeline valid: {}", yes_no(status.timeline_valid));
        println!("Events:         {}", status.event_count.unwrap_or(0));
        for error in status.timeline_errors.iter().flatten() {
            println!("  - {}", error);
        }
    }
    Ok(())
}
