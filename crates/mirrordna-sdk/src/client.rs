use crate::errors::SdkError;
use crate::timeline::{validate_timeline, TimelineReport};
use crate::vault::{load_vault_config, VaultConfig};
use mirrordna_canonical::{compute_state_checksum, Digest, Timestamp};
use mirrordna_dirhash::{DirectoryHash, DirectoryHasher, IgnoreSet};
use mirrordna_snapshot::{
    capture_snapshot, compare_snapshots, SnapshotDiff, SnapshotFormat, SnapshotSections,
    SnapshotStore, StateSnapshot,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Combined vault, timeline and state-hash summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuityStatus {
    /// When the status was computed.
    pub timestamp: Timestamp,
    /// Whether the vault config loaded.
    pub vault_loaded: bool,
    /// Vault identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
    /// Vault name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_name: Option<String>,
    /// Why the vault config failed to load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_error: Option<String>,
    /// Whether the timeline validated.
    pub timeline_valid: bool,
    /// Timeline event count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_count: Option<usize>,
    /// Timeline problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_errors: Option<Vec<String>>,
    /// State hash of the vault directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_hash: Option<Digest>,
    /// Why the vault directory could not be hashed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_hash_error: Option<String>,
}

/// Local MirrorDNA client.
///
/// Holds its ignore rules and snapshot store explicitly and remembers the most
/// recent vault config and state hash it produced.
#[derive(Debug, Default)]
pub struct MirrorClient {
    hasher: DirectoryHasher,
    store: SnapshotStore,
    last_vault_config: Option<VaultConfig>,
    last_state_hash: Option<Digest>,
}

impl MirrorClient {
    /// Client with the default ignore set and a JSON + YAML snapshot store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the ignore rules used for state hashes.
    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.hasher = DirectoryHasher::with_ignore(ignore);
        self
    }

    /// Replaces the snapshot store.
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        self.store = store;
        self
    }

    /// Ignore rules used for state hashes.
    pub fn ignore(&self) -> &IgnoreSet {
        self.hasher.ignore()
    }

    /// The most recently loaded vault config.
    pub fn last_vault_config(&self) -> Option<&VaultConfig> {
        self.last_vault_config.as_ref()
    }

    /// The most recently computed state hash.
    pub fn last_state_hash(&self) -> Option<&Digest> {
        self.last_state_hash.as_ref()
    }

    /// Loads a vault config and remembers it.
    pub fn load_vault_config(&mut self, path: impl AsRef<Path>) -> Result<VaultConfig, SdkError> {
        let config = load_vault_config(path)?;
        self.last_vault_config = Some(config.clone());
        Ok(config)
    }

    /// Computes a directory's state hash and remembers it.
    pub fn compute_state_hash(&mut self, dir: impl AsRef<Path>) -> Result<Digest, SdkError> {
        Ok(self.compute_state_hash_report(dir)?.digest)
    }

    /// Computes a directory's state hash with its per-file breakdown.
    pub fn compute_state_hash_report(
        &mut self,
        dir: impl AsRef<Path>,
    ) -> Result<DirectoryHash, SdkError> {
        let report = self.hasher.hash(dir)?;
        self.last_state_hash = Some(report.digest.clone());
        Ok(report)
    }

    /// Validates a timeline file.
    pub fn validate_timeline(&self, path: impl AsRef<Path>) -> TimelineReport {
        validate_timeline(path)
    }

    /// Checksum of a data value over its canonical form.
    pub fn compute_data_checksum(&self, data: &Value) -> Result<Digest, SdkError> {
        Ok(compute_state_checksum(data)?)
    }

    /// Summarizes vault and timeline state.
    ///
    /// Failures are recorded in the status rather than returned. The state hash
    /// is computed over the vault's `path` when that directory exists.
    pub fn continuity_status(
        &mut self,
        vault: Option<&Path>,
        timeline: Option<&Path>,
    ) -> ContinuityStatus {
        let mut status = ContinuityStatus {
            timestamp: Timestamp::now(),
            vault_loaded: false,
            vault_id: None,
            vault_name: None,
            vault_error: None,
            timeline_valid: false,
            event_count: None,
            timeline_errors: None,
            state_hash: None,
            state_hash_error: None,
        };

        let mut vault_dir = None;
        if let Some(path) = vault {
            match self.load_vault_config(path) {
                Ok(config) => {
                    status.vault_loaded = true;
                    status.vault_id = Some(config.vault_id);
                    status.vault_name = Some(config.name);
                    vault_dir = Some(config.path);
                }
                Err(err) => status.vault_error = Some(err.to_string()),
            }
        }

        if let Some(path) = timeline {
            let report = self.validate_timeline(path);
            status.timeline_valid = report.valid;
            status.event_count = Some(report.event_count);
            status.timeline_errors = Some(report.errors);
        }

        if let Some(dir) = vault_dir.filter(|dir| Path::new(dir).exists()) {
            match self.compute_state_hash(&dir) {
                Ok(hash) => status.state_hash = Some(hash),
                Err(err) => status.state_hash_error = Some(err.to_string()),
            }
        }
        status
    }

    /// Captures a snapshot stamped with the current time.
    pub fn capture_snapshot(
        &self,
        snapshot_id: impl Into<String>,
        sections: SnapshotSections,
    ) -> Result<StateSnapshot, SdkError> {
        Ok(capture_snapshot(snapshot_id, sections)?)
    }

    /// Saves a snapshot through the client's store.
    pub fn save_snapshot(
        &self,
        snapshot: &StateSnapshot,
        path: impl AsRef<Path>,
        format: Option<SnapshotFormat>,
    ) -> Result<(), SdkError> {
        Ok(self.store.save(snapshot, path, format)?)
    }

    /// Loads and verifies a snapshot through the client's store.
    pub fn load_snapshot(&self, path: impl AsRef<Path>) -> Result<StateSnapshot, SdkError> {
        Ok(self.store.load(path)?)
    }

    /// Compares two snapshots.
    pub fn compare_snapshots(&self, from: &StateSnapshot, to: &StateSnapshot) -> SnapshotDiff {
        compare_snapshots(from, to)
    }
}
