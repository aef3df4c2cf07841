use crate::snapshot::StateSnapshot;
use mirrordna_canonical::Timestamp;
use serde::Serialize;
use std::fmt;

/// A section that [`compare_snapshots`] checks for structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StateSection {
    /// `identity_state`
    #[serde(rename = "identity_state")]
    Identity,
    /// `continuity_state`
    #[serde(rename = "continuity_state")]
    Continuity,
    /// `vault_state`
    #[serde(rename = "vault_state")]
    Vault,
}

impl StateSection {
    /// Field name of the section.
    pub fn as_str(&self) -> &'static str {
        match self {
            StateSection::Identity => "identity_state",
            StateSection::Continuity => "continuity_state",
            StateSection::Vault => "vault_state",
        }
    }
}

impl fmt::Display for StateSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Differences between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotDiff {
    /// Whether the stored checksums differ.
    pub checksum_changed: bool,
    /// Timestamp of the earlier (first) snapshot.
    pub from_timestamp: Timestamp,
    /// Timestamp of the later (second) snapshot.
    pub to_timestamp: Timestamp,
    /// Seconds from `from_timestamp` to `to_timestamp`, when both parse.
    pub elapsed_seconds: Option<f64>,
    /// Sections whose content differs structurally.
    pub changed_sections: Vec<StateSection>,
}

impl SnapshotDiff {
    /// Whether `section` changed.
    pub fn section_changed(&self, section: StateSection) -> bool {
        self.changed_sections.contains(&section)
    }

    /// Whether any compared section changed.
    pub fn has_section_changes(&self) -> bool {
        !self.changed_sections.is_empty()
    }
}

/// Compares two snapshots.
///
/// Section changes are detected by structural equality, independent of the
/// checksums, so an absent section differs from an empty one.
pub fn compare_snapshots(from: &StateSnapshot, to: &StateSnapshot) -> SnapshotDiff {
    let mut changed_sections = Vec::new();
    if from.identity_state != to.identity_state {
        changed_sections.push(StateSection::Identity);
    }
    if from.continuity_state != to.continuity_state {
        changed_sections.push(StateSection::Continuity);
    }
    if from.vault_state != to.vault_state {
        changed_sections.push(StateSection::Vault);
    }

    let elapsed_seconds = match (from.timestamp.to_datetime(), to.timestamp.to_datetime()) {
        (Some(start), Some(end)) => (end - start)
            .num_microseconds()
            .map(|micros| micros as f64 / 1_000_000.0),
        _ => None,
    };

    SnapshotDiff {
        checksum_changed: !from.checksum.matches(to.checksum.as_str()),
        from_timestamp: from.timestamp.clone(),
        to_timestamp: to.timestamp.clone(),
        elapsed_seconds,
        changed_sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{capture_snapshot_at, into_state_map, SnapshotSections};
    use serde_json::json;

    fn snap(at: &str, continuity: serde_json::Value, vault: Option<serde_json::Value>) -> StateSnapshot {
        let mut sections = SnapshotSections::new(
            into_state_map(json!({"id": "alice"}), "identity_state").unwrap(),
            into_state_map(continuity, "continuity_state").unwrap(),
        );
        if let Some(vault) = vault {
            sections = sections.with_vault_state(into_state_map(vault, "vault_state").unwrap());
        }
        capture_snapshot_at("s", sections, Timestamp::new(at.into())).unwrap()
    }

    #[test]
    fn test_identical_snapshots() {
        let a = snap("2025-11-14T10:30:00Z", json!({"sessions": 1}), None);
        let diff = compare_snapshots(&a, &a.clone());
        assert!(!diff.checksum_changed);
        assert!(!diff.has_section_changes());
        assert_eq!(diff.elapsed_seconds, Some(0.0));
    }

    #[test]
    fn test_continuity_change_and_elapsed() {
        let a = snap("2025-11-14T10:30:00Z", json!({"sessions": 1}), None);
        let b = snap("2025-11-14T10:31:30.500000Z", json!({"sessions": 2}), None);
        let diff = compare_snapshots(&a, &b);
        assert!(diff.checksum_changed);
        assert_eq!(diff.changed_sections, vec![StateSection::Continuity]);
        assert_eq!(diff.elapsed_seconds, Some(90.5));
    }

    #[test]
    fn test_timestamp_only_change_has_no_section_changes() {
        let a = snap("2025-11-14T10:30:00Z", json!({"sessions": 1}), None);
        let b = snap("2025-11-14T11:30:00Z", json!({"sessions": 1}), None);
        let diff = compare_snapshots(&a, &b);
        assert!(diff.checksum_changed);
        assert!(!diff.has_section_changes());
    }

    #[test]
    fn test_vault_absent_versus_present() {
        let a = snap("2025-11-14T10:30:00Z", json!({}), None);
        let b = snap("2025-11-14T10:30:00Z", json!({}), Some(json!({})));
        let diff = compare_snapshots(&a, &b);
        assert!(diff.section_changed(StateSection::Vault));
        assert!(!diff.section_changed(StateSection::Identity));
    }

    #[test]
    fn test_unparseable_timestamp() {
        let a = snap("not-a-time", json!({}), None);
        let b = snap("2025-11-14T10:30:00Z", json!({}), None);
        assert_eq!(compare_snapshots(&a, &b).elapsed_seconds, None);
    }

    #[test]
    fn test_diff_serializes_section_names() {
        let a = snap("2025-11-14T10:30:00Z", json!({"sessions": 1}), None);
        let b = snap("2025-11-14T10:30:00Z", json!({"sessions": 2}), None);
        let value = serde_json::to_value(compare_snapshots(&a, &b)).unwrap();
        assert_eq!(value["changed_sections"], json!(["continuity_state"]));
    }
}
