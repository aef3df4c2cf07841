//! Filesystem walker for collecting the files that make up a directory state.

use crate::errors::DirHashError;
use crate::ignore::IgnoreSet;
use crate::path::relative_key;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A regular file selected for hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// `/`-separated, NFC-normalized path relative to the walk root.
    pub key: String,
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
}

/// A file or directory that could not be read and was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Path of the entry that failed.
    pub path: PathBuf,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Result of a walk: the included files sorted by key, plus anything skipped.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Included files, sorted by `key`.
    pub files: Vec<FileEntry>,
    /// Entries that could not be visited.
    pub skipped: Vec<SkippedFile>,
}

/// Walker configuration.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to descend into symlinked directories (default: false).
    pub follow_symlinks: bool,
    /// Names pruned from the walk.
    pub ignore: IgnoreSet,
    /// Maximum depth to traverse (None = unlimited).
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore: IgnoreSet::default(),
            max_depth: None,
        }
    }
}

/// Directory walker that prunes ignored names before visiting them.
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a walker for `root` with the default configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with a custom configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// The walk root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the tree and returns every included regular file, sorted by key.
    ///
    /// Fails only if the root is missing or is not a directory. Unreadable
    /// entries below the root are logged and reported in `skipped`.
    pub fn walk(&self) -> Result<WalkOutcome, DirHashError> {
        check_root(&self.root)?;

        let ignore = &self.config.ignore;
        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry, ignore));

        let mut outcome = WalkOutcome::default();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    outcome.skipped.push(SkippedFile {
                        path,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            match classify(&entry) {
                EntryKind::File => {}
                EntryKind::Other => continue,
                EntryKind::Unresolved(reason) => {
                    tracing::warn!(path = %entry.path().display(), error = %reason, "skipping unresolvable symlink");
                    outcome.skipped.push(SkippedFile {
                        path: entry.into_path(),
                        reason,
                    });
                    continue;
                }
            }

            match relative_key(&self.root, entry.path()) {
                Some(key) => outcome.files.push(FileEntry {
                    key,
                    path: entry.into_path(),
                }),
                None => tracing::debug!(path = %entry.path().display(), "entry outside walk root"),
            }
        }

        outcome.files.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.path.cmp(&b.path)));
        drop_duplicate_keys(&mut outcome);
        Ok(outcome)
    }
}

// Distinct on-disk names can share a key after NFC and lossy UTF-8 conversion.
// The first path in sort order keeps the key; the rest are reported as skipped.
fn drop_duplicate_keys(outcome: &mut WalkOutcome) {
    let files = std::mem::take(&mut outcome.files);
    for file in files {
        match outcome.files.last() {
            Some(prev) if prev.key == file.key => {
                tracing::warn!(
                    path = %file.path.display(),
                    kept = %prev.path.display(),
                    key = %file.key,
                    "skipping file with duplicate key"
                );
                outcome.skipped.push(SkippedFile {
                    reason: format!("duplicate key {:?} (kept {})", file.key, prev.path.display()),
                    path: file.path,
                });
            }
            _ => outcome.files.push(file),
        }
    }
}

fn check_root(root: &Path) -> Result<(), DirHashError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DirHashError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DirHashError::NotFound(root.to_path_buf()))
        }
        Err(e) => Err(DirHashError::Io {
            path: root.to_path_buf(),
            source: e,
        }),
    }
}

// The root itself is never pruned, even if its own name matches a pattern.
fn is_ignored(entry: &DirEntry, ignore: &IgnoreSet) -> bool {
    entry.depth() > 0 && ignore.matches(&entry.file_name().to_string_lossy())
}

enum EntryKind {
    File,
    Other,
    Unresolved(String),
}

// Symlinks to files count as files; symlinked directories are not descended.
fn classify(entry: &DirEntry) -> EntryKind {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return EntryKind::File;
    }
    if !file_type.is_symlink() {
        return EntryKind::Other;
    }
    match std::fs::metadata(entry.path()) {
        Ok(meta) if meta.is_file() => EntryKind::File,
        Ok(_) => EntryKind::Other,
        Err(err) => EntryKind::Unresolved(err.to_string()),
    }
}
