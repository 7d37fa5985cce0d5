//! Serialized editor snapshot stored in the local key-value entry.
//!
//! # Responsibility
//! - Encode/decode editor state with an explicit schema version.
//! - Repair structurally inconsistent snapshots before they reach the store.
//!
//! # Invariants
//! - Snapshots newer than [`SNAPSHOT_SCHEMA_VERSION`] are rejected.
//! - A missing `schema_version` is read as legacy version 0, which shares
//!   the version 1 field layout.
//! - A repaired snapshot always builds a valid [`EditorStore`].

use crate::editor::assembler::AssembleOptions;
use crate::editor::error::StoreError;
use crate::editor::store::EditorStore;
use crate::editor::ui_state::EditorUiState;
use crate::model::container::{Container, ContainerId};
use crate::model::paragraph::{Paragraph, ParagraphId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Snapshot schema version written by this binary.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Errors from snapshot encode/decode.
#[derive(Debug)]
pub enum SnapshotError {
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    UnsupportedVersion { found: u32, supported: u32 },
    /// Repaired snapshot still failed store validation.
    Restore(StoreError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode editor snapshot: {err}"),
            Self::Decode(err) => write!(f, "failed to decode editor snapshot: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "editor snapshot version {found} is newer than supported {supported}"
            ),
            Self::Restore(err) => write!(f, "failed to restore editor snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::Restore(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

/// Counts of corrections applied while restoring a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub dropped_containers: usize,
    pub renumbered_containers: usize,
    pub dropped_paragraphs: usize,
    pub unassigned_paragraphs: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Persisted editor state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub ui: EditorUiState,
}

impl EditorSnapshot {
    /// Captures the current store and UI state.
    pub fn capture(store: &EditorStore, ui: &EditorUiState) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            containers: store.containers().into_iter().cloned().collect(),
            paragraphs: store.paragraphs().to_vec(),
            is_completed: store.is_completed(),
            ui: ui.clone(),
        }
    }

    pub fn encode(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(SnapshotError::Encode)
    }

    /// Decodes and upgrades a stored snapshot.
    pub fn decode(text: &str) -> Result<Self, SnapshotError> {
        let mut snapshot: Self = serde_json::from_str(text).map_err(SnapshotError::Decode)?;
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.schema_version,
                supported: SNAPSHOT_SCHEMA_VERSION,
            });
        }
        snapshot.schema_version = SNAPSHOT_SCHEMA_VERSION;
        Ok(snapshot)
    }

    /// Rebuilds store and UI state, repairing inconsistencies.
    ///
    /// Repairs: repeated container ids keep the first occurrence; colliding
    /// container orders are renumbered by position; repeated paragraph ids
    /// keep the first occurrence; dangling container references are cleared.
    pub fn restore(
        self,
        options: AssembleOptions,
    ) -> Result<(EditorStore, EditorUiState, RepairReport), SnapshotError> {
        let mut report = RepairReport::default();

        let mut seen_containers: HashSet<ContainerId> = HashSet::new();
        let mut containers: Vec<Container> = Vec::with_capacity(self.containers.len());
        for container in self.containers {
            if seen_containers.insert(container.id.clone()) {
                containers.push(container);
            } else {
                report.dropped_containers += 1;
            }
        }
        let mut used_orders = HashSet::new();
        if containers.iter().any(|container| !used_orders.insert(container.order)) {
            containers.sort_by_key(|container| container.order);
            for (index, container) in containers.iter_mut().enumerate() {
                if container.order != index as i64 {
                    container.order = index as i64;
                    report.renumbered_containers += 1;
                }
            }
        }

        let mut seen_paragraphs: HashSet<ParagraphId> = HashSet::new();
        let mut paragraphs: Vec<Paragraph> = Vec::with_capacity(self.paragraphs.len());
        for mut paragraph in self.paragraphs {
            if !seen_paragraphs.insert(paragraph.id.clone()) {
                report.dropped_paragraphs += 1;
                continue;
            }
            let dangling = paragraph
                .container_id
                .as_ref()
                .is_some_and(|container_id| !seen_containers.contains(container_id));
            if dangling {
                paragraph.container_id = None;
                report.unassigned_paragraphs += 1;
            }
            paragraphs.push(paragraph);
        }

        let store = EditorStore::from_parts(containers, paragraphs, self.is_completed, options)
            .map_err(SnapshotError::Restore)?;
        let mut ui = self.ui;
        ui.retain_known(&store);
        Ok((store, ui, report))
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorSnapshot, SnapshotError, SNAPSHOT_SCHEMA_VERSION};
    use crate::editor::assembler::AssembleOptions;

    #[test]
    fn missing_version_is_read_as_legacy_and_upgraded() {
        let snapshot = EditorSnapshot::decode(r#"{"containers": [], "paragraphs": []}"#)
            .expect("legacy snapshot should decode");
        assert_eq!(snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION);
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = EditorSnapshot::decode(r#"{"schema_version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn restore_repairs_dangling_and_duplicate_entries() {
        let text = r#"{
            "schema_version": 1,
            "containers": [
                {"id": "c1", "name": "Intro", "order": 0, "created_at": 1, "updated_at": 1},
                {"id": "c1", "name": "Copy", "order": 1, "created_at": 1, "updated_at": 1},
                {"id": "c2", "name": "Body", "order": 0, "created_at": 1, "updated_at": 1}
            ],
            "paragraphs": [
                {"id": "p1", "content": "a", "container_id": "c1", "order": 0, "created_at": 1, "updated_at": 1},
                {"id": "p1", "content": "b", "container_id": null, "order": 1, "created_at": 1, "updated_at": 1},
                {"id": "p2", "content": "c", "container_id": "gone", "order": 0, "created_at": 1, "updated_at": 1}
            ]
        }"#;
        let (store, _, report) = EditorSnapshot::decode(text)
            .unwrap()
            .restore(AssembleOptions::default())
            .unwrap();

        assert_eq!(report.dropped_containers, 1);
        assert_eq!(report.dropped_paragraphs, 1);
        assert_eq!(report.unassigned_paragraphs, 1);
        assert!(report.renumbered_containers > 0);
        assert_eq!(store.containers().len(), 2);
        assert_eq!(store.unassigned_paragraphs().len(), 1);
    }
}
