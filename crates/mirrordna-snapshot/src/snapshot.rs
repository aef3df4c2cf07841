use crate::errors::SnapshotError;
use mirrordna_canonical::{digest_value, digests_match, Digest, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A state section: a JSON-style mapping with string keys.
pub type StateMap = Map<String, Value>;

/// Format version stamped on snapshots unless the caller overrides it.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Top-level field names of a persisted snapshot, in declared order.
pub const SNAPSHOT_FIELDS: &[&str] = &[
    "snapshot_id",
    "timestamp",
    "version",
    "checksum",
    "identity_state",
    "continuity_state",
    "vault_state",
    "timeline_summary",
    "metadata",
];

/// Point-in-time capture of continuity state.
///
/// `checksum` is the digest of the canonical form of every other field. Absent
/// optional sections serialize as `null`, which canonicalizes differently from an
/// empty mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Caller-supplied identifier.
    pub snapshot_id: String,
    /// Capture time (UTC, `Z` suffix).
    pub timestamp: Timestamp,
    /// Snapshot format version.
    pub version: String,
    /// Digest over all other fields.
    pub checksum: Digest,
    /// Identity section.
    pub identity_state: StateMap,
    /// Continuity section.
    pub continuity_state: StateMap,
    /// Vault section, if captured.
    pub vault_state: Option<StateMap>,
    /// Timeline summary, if captured.
    pub timeline_summary: Option<StateMap>,
    /// Free-form metadata, if any.
    pub metadata: Option<StateMap>,
}

// The checksummed record: every snapshot field except `checksum`.
#[derive(Serialize)]
struct SnapshotBody<'a> {
    snapshot_id: &'a str,
    timestamp: &'a Timestamp,
    version: &'a str,
    identity_state: &'a StateMap,
    continuity_state: &'a StateMap,
    vault_state: Option<&'a StateMap>,
    timeline_summary: Option<&'a StateMap>,
    metadata: Option<&'a StateMap>,
}

impl StateSnapshot {
    fn body(&self) -> SnapshotBody<'_> {
        SnapshotBody {
            snapshot_id: &self.snapshot_id,
            timestamp: &self.timestamp,
            version: &self.version,
            identity_state: &self.identity_state,
            continuity_state: &self.continuity_state,
            vault_state: self.vault_state.as_ref(),
            timeline_summary: self.timeline_summary.as_ref(),
            metadata: self.metadata.as_ref(),
        }
    }

    /// Recomputes the checksum from the record's current fields.
    pub fn compute_checksum(&self) -> Result<Digest, SnapshotError> {
        Ok(digest_value(&self.body())?)
    }

    /// Returns true if the stored checksum matches the record's fields.
    pub fn verify(&self) -> Result<bool, SnapshotError> {
        let actual = self.compute_checksum()?;
        Ok(digests_match(actual.as_str(), self.checksum.as_str()))
    }
}

/// The state sections handed to capture.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSections {
    /// Identity section.
    pub identity_state: StateMap,
    /// Continuity section.
    pub continuity_state: StateMap,
    /// Vault section.
    pub vault_state: Option<StateMap>,
    /// Timeline summary.
    pub timeline_summary: Option<StateMap>,
    /// Metadata.
    pub metadata: Option<StateMap>,
    /// Format version (defaults to [`SNAPSHOT_VERSION`]).
    pub version: String,
}

impl SnapshotSections {
    /// Sections with only the required identity and continuity state.
    pub fn new(identity_state: StateMap, continuity_state: StateMap) -> Self {
        Self {
            identity_state,
            continuity_state,
            vault_state: None,
            timeline_summary: None,
            metadata: None,
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Adds a vault section.
    pub fn with_vault_state(mut self, vault_state: StateMap) -> Self {
        self.vault_state = Some(vault_state);
        self
    }

    /// Adds a timeline summary.
    pub fn with_timeline_summary(mut self, timeline_summary: StateMap) -> Self {
        self.timeline_summary = Some(timeline_summary);
        self
    }

    /// Adds metadata.
    pub fn with_metadata(mut self, metadata: StateMap) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Overrides the format version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Captures a snapshot stamped with the current UTC time.
pub fn capture_snapshot(
    snapshot_id: impl Into<String>,
    sections: SnapshotSections,
) -> Result<StateSnapshot, SnapshotError> {
    capture_snapshot_at(snapshot_id, sections, Timestamp::now())
}

/// Captures a snapshot with a fixed timestamp.
pub fn capture_snapshot_at(
    snapshot_id: impl Into<String>,
    sections: SnapshotSections,
    timestamp: Timestamp,
) -> Result<StateSnapshot, SnapshotError> {
    let snapshot_id = snapshot_id.into();
    let checksum = digest_value(&SnapshotBody {
        snapshot_id: &snapshot_id,
        timestamp: &timestamp,
        version: &sections.version,
        identity_state: &sections.identity_state,
        continuity_state: &sections.continuity_state,
        vault_state: sections.vault_state.as_ref(),
        timeline_summary: sections.timeline_summary.as_ref(),
        metadata: sections.metadata.as_ref(),
    })?;
    let snapshot = StateSnapshot {
        snapshot_id,
        timestamp,
        version: sections.version,
        checksum,
        identity_state: sections.identity_state,
        continuity_state: sections.continuity_state,
        vault_state: sections.vault_state,
        timeline_summary: sections.timeline_summary,
        metadata: sections.metadata,
    };
    tracing::debug!(
        snapshot_id = %snapshot.snapshot_id,
        checksum = %snapshot.checksum,
        "captured snapshot"
    );
    Ok(snapshot)
}

/// Unwraps a JSON value that must be a mapping.
pub fn into_state_map(value: Value, section: &'static str) -> Result<StateMap, SnapshotError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SnapshotError::NotAMapping(section)),
    }
}
