use blogdraft_core::db::open_db_in_memory;
use blogdraft_core::{
    BlogPostForm, Container, ContainerId, EditorConfig, EditorSession, EditorSnapshot,
    EditorSubStep, KvRepository, Paragraph, ParagraphId, RepoError, RepoResult,
    SqliteKvRepository, StoreError,
};
use std::cell::RefCell;
use std::collections::HashMap;

/// Key-value store that can be told to fail on writes.
#[derive(Default)]
struct MemoryKv<'a> {
    entries: Option<&'a RefCell<HashMap<String, String>>>,
    fail_loads: bool,
    fail_saves: bool,
}

impl KvRepository for MemoryKv<'_> {
    fn load(&self, key: &str) -> RepoResult<Option<String>> {
        if self.fail_loads {
            return Err(RepoError::InvalidData("storage unavailable".to_string()));
        }
        Ok(self
            .entries
            .and_then(|entries| entries.borrow().get(key).cloned()))
    }

    fn save(&self, key: &str, value: &str) -> RepoResult<()> {
        if self.fail_saves {
            return Err(RepoError::InvalidData("quota exceeded".to_string()));
        }
        if let Some(entries) = self.entries {
            entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> RepoResult<bool> {
        Ok(self
            .entries
            .is_some_and(|entries| entries.borrow_mut().remove(key).is_some()))
    }
}

fn seed(session: &mut EditorSession<'_>) {
    session
        .mutate("seed", |store, _| {
            store.add_container(Container::with_id("c1", "Intro", 0))?;
            store.add_paragraph(Paragraph::with_id("p1", "Hello", 0).in_container("c1"))?;
            store.add_paragraph(Paragraph::with_id("p2", "Orphan", 0))
        })
        .unwrap();
}

#[test]
fn state_survives_session_restart() {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let mut session = EditorSession::with_persistence(repo, EditorConfig::default());
        assert!(session.is_persistent());
        seed(&mut session);
        session.update_ui(|ui| ui.go_to_writing());
    }

    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    let session = EditorSession::with_persistence(repo, EditorConfig::default());

    assert_eq!(session.store().containers().len(), 1);
    assert_eq!(session.store().paragraphs().len(), 2);
    assert_eq!(session.store().completed_content(), "Hello\n\n");
    assert_eq!(session.ui().current_sub_step, EditorSubStep::Writing);
}

#[test]
fn persisted_entry_is_versioned_json_under_configured_key() {
    let conn = open_db_in_memory().unwrap();
    let config = EditorConfig {
        storage_key: "draft-42".to_string(),
        ..EditorConfig::default()
    };
    {
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let mut session = EditorSession::with_persistence(repo, config);
        seed(&mut session);
    }

    let repo = SqliteKvRepository::try_new(&conn).unwrap();
    assert!(repo.load("blog-editor-state").unwrap().is_none());
    let text = repo.load("draft-42").unwrap().expect("snapshot stored");
    let snapshot = EditorSnapshot::decode(&text).unwrap();
    assert_eq!(snapshot.schema_version, 1);
    assert_eq!(snapshot.paragraphs.len(), 2);
}

#[test]
fn failed_mutation_is_not_persisted() {
    let entries = RefCell::new(HashMap::new());
    let mut session = EditorSession::with_persistence(
        MemoryKv {
            entries: Some(&entries),
            ..MemoryKv::default()
        },
        EditorConfig::default(),
    );
    seed(&mut session);
    let stored_before = entries.borrow().get("blog-editor-state").cloned();

    let err = session
        .mutate("add_paragraph", |store, _| {
            store.add_paragraph(Paragraph::with_id("p1", "dup", 3))
        })
        .unwrap_err();

    assert_eq!(err.code(), "duplicate_id");
    assert_eq!(entries.borrow().get("blog-editor-state").cloned(), stored_before);
    assert_eq!(session.store().paragraphs().len(), 2);
}

#[test]
fn unreadable_storage_degrades_to_memory_only() {
    let mut session = EditorSession::with_persistence(
        MemoryKv {
            fail_loads: true,
            ..MemoryKv::default()
        },
        EditorConfig::default(),
    );

    assert!(session.is_persistence_degraded());
    assert!(!session.is_persistent());
    seed(&mut session);
    assert_eq!(session.store().paragraphs().len(), 2);
}

#[test]
fn failing_save_keeps_mutation_and_stops_writing() {
    let mut session = EditorSession::with_persistence(
        MemoryKv {
            fail_saves: true,
            ..MemoryKv::default()
        },
        EditorConfig::default(),
    );
    assert!(session.is_persistent());

    seed(&mut session);

    assert!(session.is_persistence_degraded());
    assert_eq!(session.store().containers().len(), 1);
}

#[test]
fn corrupt_snapshot_starts_empty_and_is_kept() {
    let entries = RefCell::new(HashMap::from([(
        "blog-editor-state".to_string(),
        "{not json".to_string(),
    )]));

    let mut session = EditorSession::with_persistence(
        MemoryKv {
            entries: Some(&entries),
            ..MemoryKv::default()
        },
        EditorConfig::default(),
    );

    assert!(session.store().paragraphs().is_empty());
    assert!(session.is_persistence_degraded());
    seed(&mut session);
    assert_eq!(
        entries.borrow().get("blog-editor-state").map(String::as_str),
        Some("{not json")
    );
}

#[test]
fn newer_snapshot_version_is_never_overwritten() {
    let conn = open_db_in_memory().unwrap();
    let future = r#"{"schema_version":2,"containers":[],"paragraphs":[],"layout":"v2"}"#;
    SqliteKvRepository::try_new(&conn)
        .unwrap()
        .save("blog-editor-state", future)
        .unwrap();

    {
        let repo = SqliteKvRepository::try_new(&conn).unwrap();
        let mut session = EditorSession::with_persistence(repo, EditorConfig::default());
        assert!(session.is_persistence_degraded());
        assert!(!session.is_persistent());
        seed(&mut session);
        session.update_ui(|ui| ui.go_to_writing());
        assert_eq!(session.store().paragraphs().len(), 2);
    }

    let stored = SqliteKvRepository::try_new(&conn)
        .unwrap()
        .load("blog-editor-state")
        .unwrap();
    assert_eq!(stored.as_deref(), Some(future));
}

#[test]
fn debounced_edits_commit_after_quiet_period() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    seed(&mut session);
    let p1 = ParagraphId::new("p1");

    session.queue_content_edit(p1.clone(), "Hel", 1_000);
    session.queue_content_edit(p1.clone(), "Hello world", 1_100);
    assert_eq!(session.next_edit_deadline(), Some(1_400));

    assert_eq!(session.commit_due_edits(1_399), 0);
    assert_eq!(session.store().paragraph(&p1).unwrap().content, "Hello");

    assert_eq!(session.commit_due_edits(1_400), 1);
    assert_eq!(session.store().paragraph(&p1).unwrap().content, "Hello world");
    assert!(session.next_edit_deadline().is_none());
}

#[test]
fn teardown_drops_pending_edits() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    seed(&mut session);
    session.queue_content_edit(ParagraphId::new("p1"), "lost", 0);

    assert_eq!(session.teardown(), 1);
    assert_eq!(session.flush_edits(), 0);
    assert_eq!(
        session.store().paragraph(&ParagraphId::new("p1")).unwrap().content,
        "Hello"
    );
}

#[test]
fn edit_for_deleted_paragraph_is_skipped() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    seed(&mut session);
    session.queue_content_edit(ParagraphId::new("p2"), "late", 0);
    session
        .mutate("delete_paragraph", |store, _| {
            store.delete_paragraph(&ParagraphId::new("p2")).map(|_| ())
        })
        .unwrap();

    assert_eq!(session.flush_edits(), 0);
}

#[test]
fn apply_structure_creates_sections_once() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    session.update_ui(|ui| {
        ui.add_section_input("Intro");
        ui.add_section_input(" ");
        ui.add_section_input("Body");
    });

    let created = session.apply_structure();
    assert_eq!(created.len(), 2);
    assert_eq!(session.ui().current_sub_step, EditorSubStep::Writing);

    let again = session.apply_structure();
    assert!(again.is_empty());
    assert_eq!(session.store().containers().len(), 2);
}

#[test]
fn move_selected_clears_selection_only_on_success() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    seed(&mut session);
    session.update_ui(|ui| {
        ui.toggle_selection(ParagraphId::new("p2"));
    });

    let err = session
        .move_selected_to_container(Some(&ContainerId::new("ghost")))
        .unwrap_err();
    assert_eq!(err, StoreError::InvalidReference(ContainerId::new("ghost")));
    assert!(session.ui().is_selected(&ParagraphId::new("p2")));

    let moved = session
        .move_selected_to_container(Some(&ContainerId::new("c1")))
        .unwrap();
    assert_eq!(moved, 1);
    assert!(session.ui().selected_paragraph_ids.is_empty());
    assert_eq!(
        session.store().completed_content(),
        "Hello\n\nOrphan\n\n"
    );
}

#[test]
fn deleting_active_paragraph_clears_ui_reference() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    seed(&mut session);
    session.update_ui(|ui| ui.activate_paragraph(ParagraphId::new("p1")));
    assert_eq!(session.edit_target().unwrap().session_id, "p1");

    session
        .mutate("delete_paragraph", |store, _| {
            store.delete_paragraph(&ParagraphId::new("p1")).map(|_| ())
        })
        .unwrap();

    assert!(session.ui().active_paragraph_id.is_none());
    assert!(session.edit_target().is_none());
}

#[test]
fn completion_flows_into_form() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    let mut form = BlogPostForm::default();
    assert_eq!(session.complete().unwrap_err(), StoreError::NothingToComplete);

    seed(&mut session);
    let content = session.complete().unwrap();
    session.write_to_form(&mut form);

    assert_eq!(content, "Hello\n\n");
    assert_eq!(form.editor_completed_content, content);
    assert!(form.is_editor_completed);
    assert_eq!(form.preview_content(), content);
}

#[test]
fn reset_keeps_section_drafts() {
    let mut session = EditorSession::in_memory(EditorConfig::default());
    session.update_ui(|ui| ui.add_section_input("Intro"));
    session.apply_structure();
    seed_paragraph_only(&mut session);

    session.reset();

    assert!(session.store().containers().is_empty());
    assert!(session.store().paragraphs().is_empty());
    assert_eq!(session.ui().section_inputs, vec!["Intro".to_string()]);
    assert_eq!(session.ui().current_sub_step, EditorSubStep::Structure);
}

fn seed_paragraph_only(session: &mut EditorSession<'_>) {
    session
        .mutate("add_paragraph", |store, _| {
            store.add_paragraph(Paragraph::new("loose", 0))
        })
        .unwrap();
}
