//! Autosave, save status and store integration
//!
//! This tests:
//! - Debounce collapsing bursts of edits into one save
//! - The save status lifecycle for successful and failing writes
//! - Edits racing an in-flight save
//! - Loading, identity gating and flushing
//! - The background tokio driver

use bookforge_editor::{ComponentKind, ComponentPatch, ProjectPatch, ProjectType};
use bookforge_persistence::{
    spawn_autosave, AutosaveConfig, Clock, EditorController, Identity, ManualClock, MemoryStore,
    NewProject, PersistenceError, ProjectStore, SaveOutcome, SaveStatus, StaticSession,
    StoreError, TokioClock,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const USER: &str = "user-1";

async fn seeded_store() -> (Arc<MemoryStore>, String) {
    let store = Arc::new(MemoryStore::new());
    let record = store
        .create(&Identity::new(USER), NewProject::new("Rivers", ProjectType::Textbook))
        .await
        .unwrap();
    (store, record.id)
}

async fn open_editor(clock: Arc<dyn Clock>) -> (EditorController<MemoryStore>, Arc<MemoryStore>) {
    let (store, id) = seeded_store().await;
    let mut editor = EditorController::new(
        Arc::clone(&store),
        Arc::new(StaticSession::signed_in(USER)),
        clock,
        AutosaveConfig::default(),
    );
    editor.load(&id).await.unwrap();
    (editor, store)
}

#[tokio::test]
async fn test_burst_of_edits_collapses_into_one_save() {
    let clock = ManualClock::new();
    let (mut editor, store) = open_editor(Arc::new(clock.clone())).await;
    let text = editor.add_component(ComponentKind::Text).unwrap();

    for i in 0..9 {
        clock.advance(Duration::from_millis(100));
        assert!(editor.update_component(&text, ComponentPatch::content(format!("draft {}", i))));
        assert!(editor.tick().await.is_none());
    }
    // Ten edits, the last at t=0.9s

    let mut saves = Vec::new();
    for step in 1..=200 {
        clock.advance(Duration::from_millis(100));
        if let Some(outcome) = editor.tick().await {
            saves.push((step, outcome));
        }
    }

    assert_eq!(saves.len(), 1);
    assert_eq!(store.save_calls(), 1);
    // 150 steps of 100ms after the last edit
    assert_eq!(saves[0].0, 150);
    assert!(matches!(saves[0].1, SaveOutcome::Saved { clean: true, .. }));
    assert!(!editor.is_dirty());
}

#[tokio::test]
async fn test_successful_save_status_lifecycle() {
    let clock = ManualClock::new();
    let (mut editor, store) = open_editor(Arc::new(clock.clone())).await;
    let status = editor.subscribe_status();
    assert_eq!(editor.status(), SaveStatus::Idle);

    editor.update_project(ProjectPatch::title("Rivers of Europe"));
    let outcome = editor.save().await;

    assert!(matches!(outcome, SaveOutcome::Saved { clean: true, .. }));
    assert_eq!(*status.borrow(), SaveStatus::Saved);

    clock.advance(Duration::from_millis(1500));
    editor.tick().await;
    assert_eq!(editor.status(), SaveStatus::Saved);

    clock.advance(Duration::from_millis(500));
    editor.tick().await;
    assert_eq!(editor.status(), SaveStatus::Idle);

    let id = editor.session().project().unwrap().id.clone();
    assert_eq!(store.get(&id).unwrap().title, "Rivers of Europe");
}

#[tokio::test]
async fn test_failed_save_status_lifecycle_and_retry() {
    let clock = ManualClock::new();
    let (mut editor, store) = open_editor(Arc::new(clock.clone())).await;

    editor.add_page().unwrap();
    store.fail_next_saves(1);

    assert_eq!(editor.save().await, SaveOutcome::Failed);
    assert_eq!(editor.status(), SaveStatus::Error);
    assert!(editor.is_dirty());

    clock.advance(Duration::from_secs(3));
    editor.tick().await;
    assert_eq!(editor.status(), SaveStatus::Idle);

    // No retry loop: nothing happens until the next trigger
    clock.advance(Duration::from_secs(60));
    assert!(editor.tick().await.is_none());
    assert_eq!(store.save_calls(), 1);

    editor.add_component(ComponentKind::Qr).unwrap();
    clock.advance(Duration::from_secs(15));
    let outcome = editor.tick().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { clean: true, .. }));

    let id = editor.session().project().unwrap().id.clone();
    let stored = store.get(&id).unwrap();
    assert_eq!(stored.pages.len(), 2);
    assert_eq!(stored.pages[1].components.len(), 1);
}

#[tokio::test]
async fn test_immediate_save_cancels_pending_autosave() {
    let clock = ManualClock::new();
    let (mut editor, store) = open_editor(Arc::new(clock.clone())).await;

    editor.add_component(ComponentKind::Image).unwrap();
    assert!(editor.autosave_pending());

    clock.advance(Duration::from_secs(5));
    editor.save().await;
    assert!(!editor.autosave_pending());

    clock.advance(Duration::from_secs(30));
    assert!(editor.tick().await.is_none());
    assert_eq!(store.save_calls(), 1);
}

#[tokio::test]
async fn test_edit_during_in_flight_save_stays_dirty() {
    let clock = ManualClock::new();
    let (mut editor, store) = open_editor(Arc::new(clock.clone())).await;
    editor.add_component(ComponentKind::Text).unwrap();

    let ticket = editor.begin_save().unwrap().unwrap();
    assert_eq!(editor.status(), SaveStatus::Saving);

    // User keeps editing while the write is in flight
    editor.add_page().unwrap();

    let result = store.save(&ticket.owner, ticket.record).await;
    let outcome = editor.finish_save(ticket.version, result);
    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            version: ticket.version,
            clean: false
        }
    );
    assert!(editor.is_dirty());

    clock.advance(Duration::from_secs(15));
    let outcome = editor.tick().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { clean: true, .. }));

    let id = editor.session().project().unwrap().id.clone();
    assert_eq!(store.get(&id).unwrap().pages.len(), 2);
}

#[tokio::test]
async fn test_undo_redo_schedule_autosave() {
    let clock = ManualClock::new();
    let (mut editor, store) = open_editor(Arc::new(clock.clone())).await;

    editor.add_component(ComponentKind::Text).unwrap();
    editor.save().await;
    assert!(!editor.is_dirty());

    editor.undo().unwrap();
    assert!(editor.is_dirty());
    assert!(editor.autosave_pending());

    clock.advance(Duration::from_secs(15));
    editor.tick().await.unwrap();

    let id = editor.session().project().unwrap().id.clone();
    assert_eq!(store.get(&id).unwrap().pages[0].components.len(), 0);
    assert!(editor.redo().is_some());
}

#[tokio::test]
async fn test_noop_commands_do_not_schedule_autosave() {
    let (mut editor, _store) = open_editor(Arc::new(ManualClock::new())).await;
    let page_id = editor.session().project().unwrap().pages[0].id.clone();

    assert!(!editor.delete_page(&page_id));
    assert!(!editor.delete_component("missing"));
    assert!(editor.undo().is_none());

    assert!(!editor.autosave_pending());
    assert!(!editor.is_dirty());
}

#[tokio::test]
async fn test_load_requires_identity_and_ownership() {
    let (store, id) = seeded_store().await;
    let auth = Arc::new(StaticSession::anonymous());
    let mut editor = EditorController::new(
        Arc::clone(&store),
        auth.clone(),
        Arc::new(ManualClock::new()),
        AutosaveConfig::default(),
    );

    assert!(matches!(
        editor.load(&id).await,
        Err(PersistenceError::Store(StoreError::Unauthenticated))
    ));

    auth.sign_in("someone-else");
    assert!(matches!(
        editor.load(&id).await,
        Err(PersistenceError::Store(StoreError::PermissionDenied(_)))
    ));

    assert!(matches!(
        editor.load("does-not-exist").await,
        Err(PersistenceError::Store(StoreError::NotFound(_)))
    ));

    auth.sign_in(USER);
    editor.load(&id).await.unwrap();
    assert_eq!(editor.session().project().unwrap().title, "Rivers");
}

#[tokio::test]
async fn test_load_resets_editing_state() {
    let (mut editor, _store) = open_editor(Arc::new(ManualClock::new())).await;
    let id = editor.session().project().unwrap().id.clone();
    let first_page = editor.session().project().unwrap().pages[0].id.clone();

    let second_page = editor.add_page().unwrap();
    let component = editor.add_component(ComponentKind::Text).unwrap();
    assert_eq!(
        editor.session().selection().active_page_id.as_deref(),
        Some(second_page.as_str())
    );
    assert!(editor.session().selection().is_selected(&component));
    assert!(editor.session().history().can_undo());
    assert!(editor.is_dirty());
    assert!(editor.autosave_pending());

    editor.load(&id).await.unwrap();

    let selection = editor.session().selection();
    assert_eq!(selection.active_page_id.as_deref(), Some(first_page.as_str()));
    assert_eq!(selection.selected_component_id, None);
    assert!(!editor.session().history().can_undo());
    assert!(!editor.session().history().can_redo());
    assert!(!editor.is_dirty());
    assert!(!editor.autosave_pending());
    assert_eq!(editor.session().project().unwrap().pages.len(), 1);
}

#[tokio::test]
async fn test_load_normalizes_project_without_pages() {
    let (store, id) = seeded_store().await;
    let mut record = store.get(&id).unwrap();
    record.pages.clear();
    store.insert(record);

    let mut editor = EditorController::new(
        Arc::clone(&store),
        Arc::new(StaticSession::signed_in(USER)),
        Arc::new(ManualClock::new()),
        AutosaveConfig::default(),
    );
    editor.load(&id).await.unwrap();

    let project = editor.session().project().unwrap();
    assert_eq!(project.pages.len(), 1);
    assert_eq!(
        editor.session().selection().active_page_id.as_deref(),
        Some(project.pages[0].id.as_str())
    );
}

#[tokio::test]
async fn test_save_without_identity_surfaces_as_error_status() {
    let clock = ManualClock::new();
    let auth = Arc::new(StaticSession::signed_in(USER));
    let (store, id) = seeded_store().await;
    let mut editor = EditorController::new(
        Arc::clone(&store),
        auth.clone(),
        Arc::new(clock.clone()),
        AutosaveConfig::default(),
    );
    editor.load(&id).await.unwrap();
    editor.add_page().unwrap();

    auth.sign_out();
    assert_eq!(editor.save().await, SaveOutcome::Failed);
    assert_eq!(editor.status(), SaveStatus::Error);
    assert!(editor.is_dirty());
    assert_eq!(store.save_calls(), 0);

    clock.advance(Duration::from_secs(3));
    editor.tick().await;
    assert_eq!(editor.status(), SaveStatus::Idle);
}

#[tokio::test]
async fn test_create_opens_new_project() {
    let store = Arc::new(MemoryStore::new());
    let mut editor = EditorController::new(
        Arc::clone(&store),
        Arc::new(StaticSession::signed_in(USER)),
        Arc::new(ManualClock::new()),
        AutosaveConfig::default(),
    );

    let id = editor
        .create(NewProject {
            title: "Fractions".to_string(),
            project_type: ProjectType::Workbook,
            cover_type: Some("mathematics".to_string()),
            template_type: Some("interactive".to_string()),
        })
        .await
        .unwrap();

    let project = editor.session().project().unwrap();
    assert_eq!(project.id, id);
    assert_eq!(project.project_type, ProjectType::Workbook);
    assert_eq!(project.metadata.template_type.as_deref(), Some("interactive"));
    assert_eq!(project.pages.len(), 1);
    assert!(!editor.is_dirty());

    let listed = store.list(&Identity::new(USER)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Fractions");
}

#[tokio::test]
async fn test_flush_saves_dirty_or_drops_timer() {
    let (mut editor, store) = open_editor(Arc::new(ManualClock::new())).await;

    assert!(editor.flush().await.is_none());

    editor.add_component(ComponentKind::Text).unwrap();
    let outcome = editor.flush().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { clean: true, .. }));
    assert!(!editor.autosave_pending());
    assert_eq!(store.save_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_driver_autosaves_without_blocking_edits() {
    let (store, id) = seeded_store().await;
    let store = Arc::new(MemoryStore::clone(&store).with_save_delay(Duration::from_secs(1)));
    let mut editor = EditorController::new(
        Arc::clone(&store),
        Arc::new(StaticSession::signed_in(USER)),
        Arc::new(TokioClock),
        AutosaveConfig::default(),
    );
    editor.load(&id).await.unwrap();
    let editor = Arc::new(Mutex::new(editor));

    let handle = spawn_autosave(Arc::clone(&editor), Duration::from_millis(250));
    editor.lock().await.add_component(ComponentKind::Text).unwrap();

    // The autosave fires at 15s and its write takes 1s
    tokio::time::sleep(Duration::from_millis(15_500)).await;
    assert_eq!(store.save_calls(), 1);
    {
        let mut ctrl = editor.lock().await;
        assert_eq!(ctrl.status(), SaveStatus::Saving);
        ctrl.add_page().unwrap();
    }

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(editor.lock().await.is_dirty());

    tokio::time::sleep(Duration::from_secs(16)).await;
    assert_eq!(store.save_calls(), 2);
    assert!(!editor.lock().await.is_dirty());
    assert_eq!(store.get(&id).unwrap().pages.len(), 2);

    assert!(handle.shutdown().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_driver_shutdown_flushes_pending_changes() {
    let (store, id) = seeded_store().await;
    let mut editor = EditorController::new(
        Arc::clone(&store),
        Arc::new(StaticSession::signed_in(USER)),
        Arc::new(TokioClock),
        AutosaveConfig::default(),
    );
    editor.load(&id).await.unwrap();
    let editor = Arc::new(Mutex::new(editor));

    let handle = spawn_autosave(Arc::clone(&editor), Duration::from_millis(250));
    editor
        .lock()
        .await
        .update_project(ProjectPatch::title("Rivers and Lakes"));

    let outcome = handle.shutdown().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { clean: true, .. }));
    assert_eq!(store.get(&id).unwrap().title, "Rivers and Lakes");
}
