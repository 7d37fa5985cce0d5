//! Editor UI state consumed by the core.
//!
//! # Responsibility
//! - Track sub-step, active paragraph, selection set and section-name drafts.
//! - Resolve "edit" and "bulk move" actions against an [`EditorStore`].
//!
//! # Invariants
//! - Store-facing helpers only clear a selection they have just consumed or
//!   switch the sub-step after applying a structure.
//! - `selected_paragraph_ids` holds no duplicates and keeps click order.

use super::error::StoreResult;
use super::store::EditorStore;
use crate::model::container::ContainerId;
use crate::model::paragraph::ParagraphId;
use serde::{Deserialize, Serialize};

/// Module editor sub-step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorSubStep {
    /// Define section names and create containers.
    #[default]
    Structure,
    /// Write paragraphs and assign them to containers.
    Writing,
}

/// UI-facing editor state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorUiState {
    pub current_sub_step: EditorSubStep,
    pub active_paragraph_id: Option<ParagraphId>,
    pub selected_paragraph_ids: Vec<ParagraphId>,
    /// Section-name drafts typed in the structure step.
    pub section_inputs: Vec<String>,
}

/// Where an "edit" action should be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub paragraph_id: ParagraphId,
    /// Authoring session identity; the paragraph id when none was recorded.
    pub session_id: String,
}

impl EditorUiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn go_to_writing(&mut self) {
        self.current_sub_step = EditorSubStep::Writing;
    }

    pub fn go_to_structure(&mut self) {
        self.current_sub_step = EditorSubStep::Structure;
        self.active_paragraph_id = None;
    }

    pub fn activate_paragraph(&mut self, id: ParagraphId) {
        self.active_paragraph_id = Some(id);
    }

    pub fn deactivate_paragraph(&mut self) {
        self.active_paragraph_id = None;
    }

    /// Adds or removes one id from the selection. Returns whether it is now
    /// selected.
    pub fn toggle_selection(&mut self, id: ParagraphId) -> bool {
        if let Some(index) = self.selected_paragraph_ids.iter().position(|item| item == &id) {
            self.selected_paragraph_ids.remove(index);
            return false;
        }
        self.selected_paragraph_ids.push(id);
        true
    }

    pub fn is_selected(&self, id: &ParagraphId) -> bool {
        self.selected_paragraph_ids.contains(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_paragraph_ids.clear();
    }

    pub fn add_section_input(&mut self, value: impl Into<String>) {
        self.section_inputs.push(value.into());
    }

    /// Replaces one draft. Returns `false` when `index` is out of range.
    pub fn update_section_input(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.section_inputs.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Removes one draft. Returns the removed value when `index` was valid.
    pub fn remove_section_input(&mut self, index: usize) -> Option<String> {
        (index < self.section_inputs.len()).then(|| self.section_inputs.remove(index))
    }

    /// Non-blank, trimmed section names in input order.
    pub fn section_names(&self) -> Vec<String> {
        self.section_inputs
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Returns the section names and clears every draft.
    pub fn take_section_names(&mut self) -> Vec<String> {
        let names = self.section_names();
        self.section_inputs.clear();
        names
    }

    /// Drops active/selected ids that no longer exist in `store`.
    pub fn retain_known(&mut self, store: &EditorStore) {
        if let Some(active) = &self.active_paragraph_id {
            if store.paragraph(active).is_none() {
                self.active_paragraph_id = None;
            }
        }
        self.selected_paragraph_ids
            .retain(|id| store.paragraph(id).is_some());
    }
}

/// Creates containers for drafted section names not yet present in `store`
/// and switches to the writing sub-step.
///
/// Returns ids of the containers created by this call.
pub fn apply_structure(store: &mut EditorStore, ui: &mut EditorUiState) -> Vec<ContainerId> {
    let missing: Vec<String> = ui
        .section_names()
        .into_iter()
        .filter(|name| {
            !store
                .containers()
                .iter()
                .any(|container| container.name.trim() == name.as_str())
        })
        .collect();
    let created = store.add_containers_from_names(&missing);
    ui.go_to_writing();
    created
}

/// Resolves the active paragraph into an edit routing target.
pub fn resolve_edit_target(store: &EditorStore, ui: &EditorUiState) -> Option<EditTarget> {
    let paragraph = store.paragraph(ui.active_paragraph_id.as_ref()?)?;
    Some(EditTarget {
        paragraph_id: paragraph.id.clone(),
        session_id: paragraph
            .original_id
            .clone()
            .unwrap_or_else(|| paragraph.id.to_string()),
    })
}

/// Moves every selected paragraph into `container_id` and clears the
/// selection on success.
///
/// Validation happens before any paragraph moves; on error the store and the
/// selection are unchanged. Returns the number of selected paragraphs.
pub fn move_selected_to_container(
    store: &mut EditorStore,
    ui: &mut EditorUiState,
    container_id: Option<&ContainerId>,
) -> StoreResult<usize> {
    let count = ui.selected_paragraph_ids.len();
    store.move_paragraphs_to_container(&ui.selected_paragraph_ids, container_id)?;
    ui.clear_selection();
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::{apply_structure, resolve_edit_target, EditorSubStep, EditorUiState};
    use crate::editor::store::EditorStore;
    use crate::model::paragraph::{Paragraph, ParagraphId};

    #[test]
    fn toggle_selection_flips_membership() {
        let mut ui = EditorUiState::new();
        let id = ParagraphId::new("p1");

        assert!(ui.toggle_selection(id.clone()));
        assert!(ui.is_selected(&id));
        assert!(!ui.toggle_selection(id.clone()));
        assert!(ui.selected_paragraph_ids.is_empty());
    }

    #[test]
    fn section_drafts_are_edited_by_index() {
        let mut ui = EditorUiState::new();
        ui.add_section_input("Intro");
        ui.add_section_input("");

        assert!(ui.update_section_input(1, " Body "));
        assert!(!ui.update_section_input(5, "x"));
        assert_eq!(ui.remove_section_input(9), None);
        assert_eq!(ui.section_names(), vec!["Intro", "Body"]);
        assert_eq!(ui.take_section_names(), vec!["Intro", "Body"]);
        assert!(ui.section_inputs.is_empty());
    }

    #[test]
    fn apply_structure_switches_to_writing() {
        let mut store = EditorStore::new();
        let mut ui = EditorUiState::new();
        ui.add_section_input("Intro");

        let created = apply_structure(&mut store, &mut ui);

        assert_eq!(created.len(), 1);
        assert_eq!(ui.current_sub_step, EditorSubStep::Writing);
        assert_eq!(store.containers()[0].name, "Intro");
    }

    #[test]
    fn edit_target_prefers_original_session_id() {
        let mut store = EditorStore::new();
        let mut paragraph = Paragraph::with_id("p1", "Hello", 0);
        paragraph.original_id = Some("draft-9".to_string());
        store.add_paragraph(paragraph).unwrap();
        let mut ui = EditorUiState::new();
        assert!(resolve_edit_target(&store, &ui).is_none());

        ui.activate_paragraph(ParagraphId::new("p1"));
        let target = resolve_edit_target(&store, &ui).unwrap();

        assert_eq!(target.session_id, "draft-9");
        assert_eq!(target.paragraph_id, ParagraphId::new("p1"));
    }
}
