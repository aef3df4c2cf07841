use crate::errors::SnapshotError;
use crate::snapshot::StateSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Persisted representation of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Pretty-printed JSON.
    Json,
    /// Block-style YAML.
    Yaml,
}

impl SnapshotFormat {
    /// Picks the format from a file extension: `.yaml`/`.yml` is YAML, anything else JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }

    /// Lower-case format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            other => Err(format!("unknown snapshot format: {}", other)),
        }
    }
}

/// Serialization backend for one snapshot format.
///
/// `decode` only parses; checksum verification and typed reconstruction happen
/// in [`SnapshotStore`](crate::SnapshotStore) so every backend gets the same checks.
pub trait SnapshotCodec: Send + Sync {
    /// The format this codec handles.
    fn format(&self) -> SnapshotFormat;
    /// Renders a snapshot with fields in declared order.
    fn encode(&self, snapshot: &StateSnapshot) -> Result<String, SnapshotError>;
    /// Parses persisted text into an untyped value.
    fn decode(&self, text: &str) -> Result<Value, SnapshotError>;
}

/// JSON backend (2-space indentation).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl SnapshotCodec for JsonCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Json
    }

    fn encode(&self, snapshot: &StateSnapshot) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<Value, SnapshotError> {
        serde_json::from_str(text).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}

/// YAML backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl SnapshotCodec for YamlCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Yaml
    }

    fn encode(&self, snapshot: &StateSnapshot) -> Result<String, SnapshotError> {
        serde_yaml::to_string(snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<Value, SnapshotError> {
        serde_yaml::from_str(text).map_err(|e| SnapshotError::Decode(e.to_string()))
    }
}

/// Renders a snapshot in the given format.
pub fn serialize_snapshot(
    snapshot: &StateSnapshot,
    format: SnapshotFormat,
) -> Result<String, SnapshotError> {
    match format {
        SnapshotFormat::Json => JsonCodec.encode(snapshot),
        SnapshotFormat::Yaml => YamlCodec.encode(snapshot),
    }
}
