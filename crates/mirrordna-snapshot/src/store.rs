use crate::errors::SnapshotError;
use crate::format::{JsonCodec, SnapshotCodec, SnapshotFormat, YamlCodec};
use crate::snapshot::{StateSnapshot, SNAPSHOT_FIELDS};
use mirrordna_canonical::{digest_value, digests_match};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A verified snapshot together with the top-level fields it did not recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSnapshot {
    /// The verified record.
    pub snapshot: StateSnapshot,
    /// Unrecognized top-level fields, dropped from the record.
    pub unknown_fields: Map<String, Value>,
}

/// Saves and loads snapshots through an injected set of codecs.
///
/// Requesting a format whose codec was not installed fails with
/// [`SnapshotError::BackendUnavailable`] before any file is touched.
pub struct SnapshotStore {
    codecs: Vec<Box<dyn SnapshotCodec>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("formats", &self.formats())
            .finish()
    }
}

impl SnapshotStore {
    /// Store with both JSON and YAML codecs.
    pub fn new() -> Self {
        Self::with_codecs(vec![Box::new(JsonCodec), Box::new(YamlCodec)])
    }

    /// Store that only handles JSON.
    pub fn json_only() -> Self {
        Self::with_codecs(vec![Box::new(JsonCodec)])
    }

    /// Store with an explicit codec list. The first codec for a format wins.
    pub fn with_codecs(codecs: Vec<Box<dyn SnapshotCodec>>) -> Self {
        Self { codecs }
    }

    /// Formats this store can read and write.
    pub fn formats(&self) -> Vec<SnapshotFormat> {
        self.codecs.iter().map(|c| c.format()).collect()
    }

    /// Looks up the codec for `format`.
    pub fn codec(&self, format: SnapshotFormat) -> Result<&dyn SnapshotCodec, SnapshotError> {
        self.codecs
            .iter()
            .find(|c| c.format() == format)
            .map(|c| &**c)
            .ok_or(SnapshotError::BackendUnavailable(format))
    }

    /// Writes `snapshot` to `path`, creating parent directories.
    ///
    /// The format is `format` if given, otherwise inferred from the extension.
    /// The file is overwritten in place.
    pub fn save(
        &self,
        snapshot: &StateSnapshot,
        path: impl AsRef<Path>,
        format: Option<SnapshotFormat>,
    ) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| SnapshotFormat::from_path(path));
        let text = self.codec(format)?.encode(snapshot)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::from_io(parent, e))?;
        }
        fs::write(path, text).map_err(|e| SnapshotError::from_io(path, e))?;
        tracing::debug!(
            path = %path.display(),
            format = %format,
            snapshot_id = %snapshot.snapshot_id,
            "saved snapshot"
        );
        Ok(())
    }

    /// Loads and verifies a snapshot, inferring the format from the extension.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<StateSnapshot, SnapshotError> {
        Ok(self.load_detailed(path, None)?.snapshot)
    }

    /// Loads and verifies a snapshot, also returning any unknown fields.
    ///
    /// The checksum is recomputed over the recognized fields as stored before
    /// the typed record is built; a mismatch is [`SnapshotError::Integrity`].
    pub fn load_detailed(
        &self,
        path: impl AsRef<Path>,
        format: Option<SnapshotFormat>,
    ) -> Result<LoadedSnapshot, SnapshotError> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| SnapshotFormat::from_path(path));
        let codec = self.codec(format)?;
        let text = fs::read_to_string(path).map_err(|e| SnapshotError::from_io(path, e))?;
        let value = codec.decode(&text)?;
        let loaded = decode_verified(value, path)?;
        tracing::debug!(
            path = %path.display(),
            snapshot_id = %loaded.snapshot.snapshot_id,
            "loaded snapshot"
        );
        Ok(loaded)
    }
}

fn decode_verified(value: Value, path: &Path) -> Result<LoadedSnapshot, SnapshotError> {
    let Value::Object(fields) = value else {
        return Err(SnapshotError::Decode(
            "top-level value must be a mapping".to_string(),
        ));
    };

    let (mut known, unknown): (Map<String, Value>, Map<String, Value>) = fields
        .into_iter()
        .partition(|(key, _)| SNAPSHOT_FIELDS.contains(&key.as_str()));
    if !unknown.is_empty() {
        let names: Vec<&str> = unknown.keys().map(String::as_str).collect();
        tracing::warn!(path = %path.display(), fields = ?names, "ignoring unknown snapshot fields");
    }

    let expected = match known.remove("checksum") {
        Some(Value::String(checksum)) => checksum,
        _ => return Err(SnapshotError::MissingChecksum(path.to_path_buf())),
    };

    let actual = digest_value(&known)?;
    if !digests_match(actual.as_str(), &expected) {
        tracing::warn!(
            path = %path.display(),
            expected = %expected,
            actual = %actual,
            "snapshot checksum mismatch"
        );
        return Err(SnapshotError::Integrity {
            path: path.to_path_buf(),
            expected,
            actual: actual.to_string(),
        });
    }

    known.insert("checksum".to_string(), Value::String(expected.trim().to_string()));
    let snapshot: StateSnapshot = serde_json::from_value(Value::Object(known))
        .map_err(|e| SnapshotError::Decode(e.to_string()))?;
    Ok(LoadedSnapshot {
        snapshot,
        unknown_fields: unknown,
    })
}

/// Saves with a default JSON + YAML store.
pub fn save_snapshot(
    snapshot: &StateSnapshot,
    path: impl AsRef<Path>,
    format: Option<SnapshotFormat>,
) -> Result<(), SnapshotError> {
    SnapshotStore::new().save(snapshot, path, format)
}

/// Loads and verifies with a default JSON + YAML store.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<StateSnapshot, SnapshotError> {
    SnapshotStore::new().load(path)
}
