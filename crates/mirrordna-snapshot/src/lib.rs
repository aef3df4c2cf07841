//! Point-in-time state snapshots for MirrorDNA continuity tracking.
//!
//! A [`StateSnapshot`] bundles identity, continuity and optional vault, timeline
//! and metadata sections with a SHA-256 checksum over the canonical form of every
//! other field. Snapshots persist as JSON or YAML; loading recomputes the checksum
//! before the record is handed back, so a tampered file never yields a trusted
//! snapshot.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mirrordna_snapshot::{capture_snapshot, SnapshotSections, SnapshotStore};
//! use serde_json::{json, Map};
//!
//! let mut identity = Map::new();
//! identity.insert("id".into(), json!("alice"));
//! let mut continuity = Map::new();
//! continuity.insert("sessions".into(), json!(1));
//!
//! let snapshot = capture_snapshot("snap_001", SnapshotSections::new(identity, continuity))?;
//!
//! let store = SnapshotStore::new();
//! store.save(&snapshot, "snap_001.yaml", None)?;
//! let loaded = store.load("snap_001.yaml")?;
//! assert_eq!(loaded, snapshot);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`StateSnapshot`] - Immutable checksummed record
//! - [`SnapshotStore`] - Save and verified load through injected codecs
//! - [`SnapshotDiff`] - Result of [`compare_snapshots`]

#![deny(missing_docs)]

/// Snapshot comparison.
pub mod compare;
/// Error types for snapshot operations.
pub mod errors;
/// Serialization codecs and format selection.
pub mod format;
/// The snapshot record and capture.
pub mod snapshot;
/// Persistence with checksum verification on load.
pub mod store;

pub use compare::{compare_snapshots, SnapshotDiff, StateSection};
pub use errors::SnapshotError;
pub use format::{serialize_snapshot, JsonCodec, SnapshotCodec, SnapshotFormat, YamlCodec};
pub use snapshot::{
    capture_snapshot, capture_snapshot_at, into_state_map, SnapshotSections, StateMap,
    StateSnapshot, SNAPSHOT_FIELDS, SNAPSHOT_VERSION,
};
pub use store::{load_snapshot, save_snapshot, LoadedSnapshot, SnapshotStore};
