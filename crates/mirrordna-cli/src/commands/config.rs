//! Config command implementation.

use crate::errors::CliError;
use crate::output::{format_json, yes_no};
use clap::Subcommand;
use mirrordna_config::{ChecksummedConfigStore, LoadOptions};
use mirrordna_sdk::read_document;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Store a JSON/YAML file as a checksummed config
    Save {
        /// Config name
        name: String,
        /// Source file
        file: PathBuf,
        /// Config version
        #[arg(long, default_value = "1.0.0")]
        version: String,
    },
    /// Print a config
    Show {
        /// Config name
        name: String,
        /// Skip checksum verification
        #[arg(long)]
        no_verify: bool,
    },
    /// Check a config against its checksum
    Verify {
        /// Config name
        name: String,
    },
    /// List stored configs
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ConfigCommand, dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = match dir {
        Some(dir) => ChecksummedConfigStore::open(dir)?,
        None => ChecksummedConfigStore::open_default()?,
    };

    match command {
        ConfigCommand::Save {
            name,
            file,
            version,
        } => {
            let value = read_document(&file)?;
            let checksum = store.save_config(&name, &value, &version)?;
            println!("Saved config '{}' (version {})", name, checksum.version);
            println!("Checksum: {}", checksum.hash);
        }
        ConfigCommand::Show { name, no_verify } => {
            let options = LoadOptions {
                verify: !no_verify,
                use_cache: false,
            };
            let value = store.load_config(&name, options)?;
            println!("{}", format_json(&value));
        }
        ConfigCommand::Verify { name } => {
            if !store.verify_integrity(&name) {
                return Err(CliError::CheckFailed(format!(
                    "config '{}' failed integrity verification",
                    name
                ))
                .into());
            }
            println!("OK  {}", name);
        }
        ConfigCommand::List { json } => {
            let configs = store.list_configs()?;
            if json {
                println!("{}", format_json(&configs));
            } else {
                println!("{:<32} {:<10} {:<12} {}", "NAME", "CHECKSUM", "VERSION", "CREATED_AT");
                println!("{}", "-".repeat(90));
                for (name, listing) in &configs {
                    println!(
                        "{:<32} {:<10} {:<12} {}",
                        name,
                        yes_no(listing.has_checksum),
                        listing.version.as_deref().unwrap_or("-"),
                        listing.created_at.as_deref().unwrap_or("-")
                    );
                }
            }
        }
    }
    Ok(())
}
