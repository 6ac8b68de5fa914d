//! # Editor Controller
//!
//! Single owner of an editing session and its persistence: every editor
//! command goes through here, so each committed edit also restarts the
//! autosave timer.
//!
//! ```rust,ignore
//! let mut editor = EditorController::new(store, sessions, Arc::new(SystemClock), AutosaveConfig::default());
//! editor.load("3f2a...").await?;
//!
//! editor.add_component(ComponentKind::Text);
//! editor.tick().await;   // autosaves once the document has been quiet long enough
//! editor.save().await;   // or save right now
//! ```

use crate::clock::Clock;
use crate::config::AutosaveConfig;
use crate::errors::{PersistenceError, StoreError};
use crate::gateway::{PersistenceGateway, SaveOutcome, SaveTicket};
use crate::identity::{Identity, SessionProvider};
use crate::status::SaveStatus;
use crate::store::{NewProject, ProjectRecord, ProjectStore};
use bookforge_editor::{
    ComponentKind, ComponentPatch, EditSession, EditorEvent, Mutation, ProjectPatch,
};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, instrument};

pub struct EditorController<S: ProjectStore> {
    session: EditSession,
    gateway: PersistenceGateway,
    store: Arc<S>,
    auth: Arc<dyn SessionProvider>,
    clock: Arc<dyn Clock>,
}

impl<S: ProjectStore> EditorController<S> {
    pub fn new(
        store: Arc<S>,
        auth: Arc<dyn SessionProvider>,
        clock: Arc<dyn Clock>,
        config: AutosaveConfig,
    ) -> Self {
        Self {
            session: EditSession::new(),
            gateway: PersistenceGateway::new(&config),
            store,
            auth,
            clock,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn status(&self) -> SaveStatus {
        self.gateway.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.gateway.subscribe_status()
    }

    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        self.session.subscribe()
    }

    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    /// True if the autosave timer is armed
    pub fn autosave_pending(&self) -> bool {
        self.gateway.debouncer().is_armed()
    }

    fn current_user(&self) -> Result<Identity, StoreError> {
        self.auth.current_user().ok_or(StoreError::Unauthenticated)
    }

    /// Fetch a project and open it, replacing whatever was open
    #[instrument(skip(self))]
    pub async fn load(&mut self, id: &str) -> Result<(), PersistenceError> {
        let user = self.current_user()?;
        let record = self.store.load(&user, id).await?;

        self.gateway.cancel_autosave();
        self.session.load_project(record.into_project());
        Ok(())
    }

    /// Create a project through the store and open it; returns its id
    #[instrument(skip(self, project), fields(title = %project.title))]
    pub async fn create(&mut self, project: NewProject) -> Result<String, PersistenceError> {
        let user = self.current_user()?;
        let record = self.store.create(&user, project).await?;
        let id = record.id.clone();

        self.gateway.cancel_autosave();
        self.session.load_project(record.into_project());
        Ok(id)
    }

    fn committed<T>(&mut self, result: Option<T>) -> Option<T> {
        if result.is_some() {
            self.gateway.note_edit(self.clock.now());
        }
        result
    }

    pub fn apply(&mut self, mutation: Mutation) -> Option<u64> {
        let result = self.session.apply(mutation);
        self.committed(result)
    }

    pub fn add_page(&mut self) -> Option<String> {
        let result = self.session.add_page();
        self.committed(result)
    }

    pub fn delete_page(&mut self, page_id: &str) -> bool {
        let result = self.session.delete_page(page_id).then_some(());
        self.committed(result).is_some()
    }

    pub fn add_component(&mut self, kind: ComponentKind) -> Option<String> {
        let result = self.session.add_component(kind);
        self.committed(result)
    }

    pub fn update_component(&mut self, component_id: &str, patch: ComponentPatch) -> bool {
        let result = self.session.update_component(component_id, patch).then_some(());
        self.committed(result).is_some()
    }

    pub fn delete_component(&mut self, component_id: &str) -> bool {
        let result = self.session.delete_component(component_id).then_some(());
        self.committed(result).is_some()
    }

    pub fn duplicate_component(&mut self, component_id: &str) -> Option<String> {
        let result = self.session.duplicate_component(component_id);
        self.committed(result)
    }

    pub fn update_project(&mut self, patch: ProjectPatch) -> bool {
        let result = self.session.update_project(patch).then_some(());
        self.committed(result).is_some()
    }

    pub fn undo(&mut self) -> Option<u64> {
        let result = self.session.undo();
        self.committed(result)
    }

    pub fn redo(&mut self) -> Option<u64> {
        let result = self.session.redo();
        self.committed(result)
    }

    pub fn set_active_page(&mut self, page_id: &str) -> bool {
        self.session.set_active_page(page_id)
    }

    pub fn select_component(&mut self, component_id: Option<&str>) -> bool {
        self.session.select_component(component_id)
    }

    /// First half of a save. `Ok(None)` if there is nothing to write right
    /// now; an error (already reflected in the status) if nobody is signed in.
    pub fn begin_save(&mut self) -> Result<Option<SaveTicket>, StoreError> {
        let user = match self.current_user() {
            Ok(user) => user,
            Err(e) => {
                if self.session.project().is_some() {
                    self.gateway.reject_save(&e, self.clock.now());
                }
                return Err(e);
            }
        };
        Ok(self.gateway.begin_save(&self.session, user))
    }

    /// Second half of a save
    pub fn finish_save(
        &mut self,
        version: u64,
        result: Result<ProjectRecord, StoreError>,
    ) -> SaveOutcome {
        let now = self.clock.now();
        self.gateway.finish_save(&mut self.session, version, result, now)
    }

    /// Save immediately, bypassing (and cancelling) the autosave timer
    #[instrument(skip(self))]
    pub async fn save(&mut self) -> SaveOutcome {
        let ticket = match self.begin_save() {
            Ok(Some(ticket)) => ticket,
            Ok(None) => return SaveOutcome::Skipped,
            Err(_) => return SaveOutcome::Failed,
        };

        let result = self.store.save(&ticket.owner, ticket.record).await;
        self.finish_save(ticket.version, result)
    }

    /// Expire status windows and report whether an autosave is due
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        self.gateway.poll(now);
        self.gateway.take_autosave_due(now, self.session.is_dirty())
    }

    /// Advance timers: reset display states and run a due autosave
    pub async fn tick(&mut self) -> Option<SaveOutcome> {
        if !self.poll() {
            return None;
        }
        debug!(version = self.session.version(), "Autosave fired");
        Some(self.save().await)
    }

    /// Leaving the editor: write pending changes now, or drop the timer
    pub async fn flush(&mut self) -> Option<SaveOutcome> {
        if self.session.is_dirty() {
            Some(self.save().await)
        } else {
            self.gateway.cancel_autosave();
            None
        }
    }
}

impl<S: ProjectStore> std::fmt::Debug for EditorController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorController")
            .field("session", &self.session)
            .field("gateway", &self.gateway)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
