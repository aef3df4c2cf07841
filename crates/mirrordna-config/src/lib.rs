//! Checksummed configuration storage for MirrorDNA.
//!
//! Each configuration `name` is stored as `<name>.json` next to a
//! `<name>.checksum.json` sidecar recording the SHA-256 digest of the
//! configuration's canonical form. Loading recomputes the digest and refuses
//! tampered files.
//!
//! ```rust,no_run
//! use mirrordna_config::{ChecksummedConfigStore, LoadOptions};
//! use serde_json::json;
//!
//! let mut store = ChecksummedConfigStore::open("./config")?;
//! store.save_config("agent", &json!({"model": "local", "retries": 3}), "1.0.0")?;
//! let config = store.load_config("agent", LoadOptions::default())?;
//! assert_eq!(config["retries"], 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Error types for configuration storage.
pub mod errors;
/// The checksummed store.
pub mod store;

pub use errors::ConfigError;
pub use store::{
    default_config_dir, ChecksummedConfigStore, ConfigChecksum, ConfigListing, LoadOptions,
};
