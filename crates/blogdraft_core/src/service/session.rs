//! Editor session aggregate.
//!
//! # Responsibility
//! - Own one [`EditorStore`], its UI state and the edit debouncer.
//! - Persist a snapshot to the local key-value entry after every successful
//!   mutation and restore it at startup.
//! - Bridge the assembled document into the blog post form.
//!
//! # Invariants
//! - Persistence failures never fail a mutation; they are logged once and
//!   the session continues in memory only.
//! - A stored snapshot this binary cannot restore is left untouched.
//! - Failed mutations are not persisted and leave state unchanged.

use crate::config::EditorConfig;
use crate::editor::debounce::{EditDebouncer, PendingEdit};
use crate::editor::error::{StoreError, StoreResult};
use crate::editor::store::EditorStore;
use crate::editor::ui_state::{self, EditTarget, EditorUiState};
use crate::model::container::ContainerId;
use crate::model::form::BlogPostForm;
use crate::model::paragraph::ParagraphId;
use crate::persistence::EditorSnapshot;
use crate::repo::snapshot_repo::KvRepository;
use log::{debug, info, warn};

/// Editor state plus optional local persistence.
pub struct EditorSession<'repo> {
    config: EditorConfig,
    store: EditorStore,
    ui: EditorUiState,
    debouncer: EditDebouncer,
    snapshots: Option<Box<dyn KvRepository + 'repo>>,
    persistence_degraded: bool,
}

impl EditorSession<'static> {
    /// Creates a session that never touches local storage.
    pub fn in_memory(config: EditorConfig) -> Self {
        info!("event=session_open module=session status=ok mode=memory");
        Self {
            store: EditorStore::with_options(config.assemble_options()),
            ui: EditorUiState::new(),
            debouncer: EditDebouncer::new(config.debounce_ms),
            snapshots: None,
            persistence_degraded: false,
            config,
        }
    }
}

impl<'repo> EditorSession<'repo> {
    /// Creates a session backed by `repo`, restoring any stored snapshot.
    ///
    /// A failing repository or an entry that cannot be restored (newer
    /// schema, malformed JSON) starts an empty session in in-memory mode, so
    /// the stored entry is never overwritten.
    pub fn with_persistence(repo: impl KvRepository + 'repo, config: EditorConfig) -> Self {
        let options = config.assemble_options();
        let mut session = Self {
            store: EditorStore::with_options(options),
            ui: EditorUiState::new(),
            debouncer: EditDebouncer::new(config.debounce_ms),
            snapshots: None,
            persistence_degraded: false,
            config,
        };

        match repo.load(&session.config.storage_key) {
            Ok(Some(text)) => {
                match EditorSnapshot::decode(&text).and_then(|snapshot| snapshot.restore(options)) {
                    Ok((store, ui, report)) => {
                        if !report.is_clean() {
                            warn!(
                                "event=snapshot_restore module=session status=repaired dropped_containers={} renumbered_containers={} dropped_paragraphs={} unassigned_paragraphs={}",
                                report.dropped_containers,
                                report.renumbered_containers,
                                report.dropped_paragraphs,
                                report.unassigned_paragraphs
                            );
                        }
                        session.store = store;
                        session.ui = ui;
                    }
                    Err(err) => {
                        warn!(
                            "event=snapshot_restore module=session status=error action=memory_only error={}",
                            err
                        );
                        session.persistence_degraded = true;
                    }
                }
            }
            Ok(None) => debug!("event=snapshot_restore module=session status=empty"),
            Err(err) => {
                warn!(
                    "event=snapshot_restore module=session status=error action=memory_only error={}",
                    err
                );
                session.persistence_degraded = true;
            }
        }

        info!(
            "event=session_open module=session status=ok mode=persistent containers={} paragraphs={} degraded={}",
            session.store.containers().len(),
            session.store.paragraphs().len(),
            session.persistence_degraded
        );
        session.snapshots = Some(Box::new(repo));
        session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn ui(&self) -> &EditorUiState {
        &self.ui
    }

    /// Whether writes currently reach local storage.
    pub fn is_persistent(&self) -> bool {
        self.snapshots.is_some() && !self.persistence_degraded
    }

    pub fn is_persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    /// Runs one store/UI mutation and persists on success.
    ///
    /// `op` names the operation in log events.
    pub fn mutate<T, F>(&mut self, op: &'static str, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut EditorStore, &mut EditorUiState) -> StoreResult<T>,
    {
        match apply(&mut self.store, &mut self.ui) {
            Ok(value) => {
                self.ui.retain_known(&self.store);
                debug!(
                    "event=editor_mutation module=session status=ok op={} containers={} paragraphs={}",
                    op,
                    self.store.containers().len(),
                    self.store.paragraphs().len()
                );
                self.persist();
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event=editor_mutation module=session status=error op={} error_code={}",
                    op,
                    err.code()
                );
                Err(err)
            }
        }
    }

    /// Applies a UI-only change and persists it.
    pub fn update_ui<F>(&mut self, apply: F)
    where
        F: FnOnce(&mut EditorUiState),
    {
        apply(&mut self.ui);
        self.persist();
    }

    /// Creates containers from section-name drafts and enters writing mode.
    pub fn apply_structure(&mut self) -> Vec<ContainerId> {
        let created = ui_state::apply_structure(&mut self.store, &mut self.ui);
        info!(
            "event=structure_apply module=session status=ok created={} containers={}",
            created.len(),
            self.store.containers().len()
        );
        self.persist();
        created
    }

    /// Moves every selected paragraph to one bucket.
    pub fn move_selected_to_container(
        &mut self,
        container_id: Option<&ContainerId>,
    ) -> StoreResult<usize> {
        self.mutate("move_selected", |store, ui| {
            ui_state::move_selected_to_container(store, ui, container_id)
        })
    }

    /// Routing target for editing the active paragraph.
    pub fn edit_target(&self) -> Option<EditTarget> {
        ui_state::resolve_edit_target(&self.store, &self.ui)
    }

    /// Queues a rich-text edit; it reaches the store once its quiet period
    /// has passed and [`EditorSession::commit_due_edits`] runs.
    pub fn queue_content_edit(
        &mut self,
        paragraph_id: ParagraphId,
        content: impl Into<String>,
        now_ms: i64,
    ) {
        self.debouncer.push(paragraph_id, content, now_ms);
    }

    /// Earliest deadline among queued edits.
    pub fn next_edit_deadline(&self) -> Option<i64> {
        self.debouncer.next_due_at()
    }

    /// Commits queued edits that are due at `now_ms`. Returns how many were
    /// applied.
    pub fn commit_due_edits(&mut self, now_ms: i64) -> usize {
        let due = self.debouncer.drain_due(now_ms);
        self.commit_edits(due)
    }

    /// Commits every queued edit regardless of deadline.
    pub fn flush_edits(&mut self) -> usize {
        let pending = self.debouncer.flush_all();
        self.commit_edits(pending)
    }

    /// Discards queued edits, as on component teardown.
    pub fn teardown(&mut self) -> usize {
        let dropped = self.debouncer.cancel();
        if dropped > 0 {
            debug!(
                "event=edit_debounce module=session status=cancelled dropped={}",
                dropped
            );
        }
        dropped
    }

    /// Signals completion of the module editor.
    pub fn complete(&mut self) -> StoreResult<String> {
        self.mutate("complete", |store, _| {
            store.complete_editor().map(str::to_string)
        })
    }

    /// Clears containers and paragraphs; section-name drafts survive.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.store.reset_editor_state();
        self.ui.clear_selection();
        self.ui.go_to_structure();
        info!("event=editor_reset module=session status=ok");
        self.persist();
    }

    /// Writes the assembled document and completion flag into the form
    /// bridge fields.
    pub fn write_to_form(&self, form: &mut BlogPostForm) {
        form.editor_completed_content = self.store.completed_content().to_string();
        form.is_editor_completed = self.store.is_completed();
    }

    fn commit_edits(&mut self, edits: Vec<PendingEdit>) -> usize {
        let mut applied = 0;
        for edit in edits {
            match self
                .store
                .update_paragraph_content(&edit.paragraph_id, edit.content)
            {
                Ok(()) => applied += 1,
                Err(StoreError::NotFound { .. }) => debug!(
                    "event=edit_commit module=session status=skipped reason=paragraph_gone paragraph_id={}",
                    edit.paragraph_id
                ),
                Err(err) => warn!(
                    "event=edit_commit module=session status=error error_code={}",
                    err.code()
                ),
            }
        }
        if applied > 0 {
            self.persist();
        }
        applied
    }

    fn persist(&mut self) {
        if self.persistence_degraded {
            return;
        }
        let Some(repo) = self.snapshots.as_ref() else {
            return;
        };

        let result = EditorSnapshot::capture(&self.store, &self.ui)
            .encode()
            .map_err(|err| err.to_string())
            .and_then(|text| {
                repo.save(&self.config.storage_key, &text)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            warn!(
                "event=snapshot_save module=session status=error action=memory_only error={}",
                err
            );
            self.persistence_degraded = true;
        }
    }
}
