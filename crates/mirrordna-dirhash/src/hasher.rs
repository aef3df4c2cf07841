use crate::errors::DirHashError;
use crate::ignore::IgnoreSet;
use crate::walker::{SkippedFile, Walker, WalkerConfig};
use mirrordna_canonical::{digest_bytes, digest_text, Digest};
use std::collections::BTreeMap;
use std::path::Path;

/// Aggregate state hash of a directory tree, with its per-file breakdown.
#[derive(Debug, Clone)]
pub struct DirectoryHash {
    /// Digest over the sorted `path:digest` lines.
    pub digest: Digest,
    /// Content digest of every included file, keyed by relative path.
    pub files: BTreeMap<String, Digest>,
    /// Files that could not be read and are absent from `digest`.
    pub skipped: Vec<SkippedFile>,
}

impl DirectoryHash {
    /// Number of files folded into the aggregate digest.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Whether every visited file was read.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Hashes directory trees with a fixed walker configuration.
#[derive(Debug, Clone, Default)]
pub struct DirectoryHasher {
    config: WalkerConfig,
}

impl DirectoryHasher {
    /// Hasher using the default ignore set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher using `ignore` in place of the defaults.
    pub fn with_ignore(ignore: IgnoreSet) -> Self {
        Self {
            config: WalkerConfig {
                ignore,
                ..WalkerConfig::default()
            },
        }
    }

    /// Hasher with a full walker configuration.
    pub fn with_config(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// The ignore rules applied by this hasher.
    pub fn ignore(&self) -> &IgnoreSet {
        &self.config.ignore
    }

    /// Walks `root` and computes its aggregate hash.
    pub fn hash(&self, root: impl AsRef<Path>) -> Result<DirectoryHash, DirHashError> {
        let root = root.as_ref();
        let outcome = Walker::with_config(root, self.config.clone()).walk()?;
        let mut skipped = outcome.skipped;
        let mut files = BTreeMap::new();

        for entry in outcome.files {
            match std::fs::read(&entry.path) {
                Ok(bytes) => {
                    files.insert(entry.key, digest_bytes(&bytes));
                }
                Err(err) => {
                    tracing::warn!(path = %entry.path.display(), error = %err, "skipping unreadable file");
                    skipped.push(SkippedFile {
                        path: entry.path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let digest = aggregate_digest(&files);
        tracing::debug!(
            root = %root.display(),
            files = files.len(),
            skipped = skipped.len(),
            digest = %digest,
            "hashed directory"
        );
        Ok(DirectoryHash {
            digest,
            files,
            skipped,
        })
    }
}

/// Folds sorted `(path, digest)` pairs into one digest.
///
/// Each pair becomes a `path:digest` line; lines are joined with `\n` (no
/// trailing newline) and hashed as text without normalization.
pub fn aggregate_digest(files: &BTreeMap<String, Digest>) -> Digest {
    let block = files
        .iter()
        .map(|(path, digest)| format!("{}:{}", path, digest))
        .collect::<Vec<_>>()
        .join("\n");
    digest_text(&block, false)
}

/// Computes the state hash of `root`, excluding names matched by `ignore`.
pub fn hash_directory(root: impl AsRef<Path>, ignore: &IgnoreSet) -> Result<Digest, DirHashError> {
    Ok(DirectoryHasher::with_ignore(ignore.clone()).hash(root)?.digest)
}
