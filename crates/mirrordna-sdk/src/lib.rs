//! Local-only MirrorDNA client.
//!
//! [`MirrorClient`] ties the canonical digest engine, the directory state hasher
//! and the snapshot store together behind one entry point, and adds vault
//! configuration loading and timeline validation.
//!
//! ```rust,no_run
//! use mirrordna_sdk::MirrorClient;
//!
//! let mut client = MirrorClient::new();
//! let vault = client.load_vault_config("vault.yaml")?;
//! let hash = client.compute_state_hash(&vault.path)?;
//! let report = client.validate_timeline("timeline.json");
//! println!("{} {} valid={}", vault.vault_id, hash, report.valid);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// The client.
pub mod client;
/// JSON/YAML document loading.
pub mod document;
/// Error types for client operations.
pub mod errors;
/// Timeline validation.
pub mod timeline;
/// Vault configuration.
pub mod vault;

pub use client::{ContinuityStatus, MirrorClient};
pub use document::read_document;
pub use errors::SdkError;
pub use timeline::{validate_timeline, validate_timeline_value, TimelineReport, REQUIRED_EVENT_FIELDS};
pub use vault::{load_vault_config, VaultConfig, REQUIRED_VAULT_FIELDS};
