//! # Edit Session
//!
//! Owns the live project for one editor, together with its undo history and
//! selection, and is the only place mutations are committed.
//!
//! Every committed edit follows the same protocol:
//!
//! 1. compute the next project from the current one (pure)
//! 2. record the pre-edit project in [`History`] (clears redo)
//! 3. swap in the next project and selection
//! 4. bump the document version and mark it dirty
//! 5. notify subscribers with [`EditorEvent::DocumentChanged`]
//!
//! Scheduling the save that follows step 5 is the caller's job; see the
//! persistence crate's controller.

use crate::history::History;
use crate::model::{
    new_component_id, new_page_id, ComponentKind, ComponentPatch, Project, ProjectPatch,
};
use crate::mutations::{Mutation, MutationError};
use crate::selection::Selection;
use crate::EditorError;
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, info};

/// Notifications delivered to subscribers after state changes
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A project was loaded and history reset
    ProjectLoaded { project_id: String },

    /// The document changed and is now at `version`
    DocumentChanged { version: u64 },

    SelectionChanged(Selection),

    HistoryChanged { can_undo: bool, can_redo: bool },

    /// `version` was persisted and the document is clean
    Saved { version: u64 },
}

/// Editing state for a single open project
#[derive(Debug, Default)]
pub struct EditSession {
    project: Option<Project>,

    selection: Selection,

    history: History,

    /// Increments on every change to the document
    version: u64,

    /// Document diverged from the last persisted version
    dirty: bool,

    subscribers: Vec<Sender<EditorEvent>>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(project: Project) -> Self {
        let mut session = Self::new();
        session.load_project(project);
        session
    }

    /// Replace the open project; history and selection start over
    pub fn load_project(&mut self, project: Project) {
        let project = project.normalized();
        info!(project_id = %project.id, pages = project.pages.len(), "Loaded project");

        self.selection = Selection::for_project(&project);
        self.history.clear();
        self.version += 1;
        self.dirty = false;

        let project_id = project.id.clone();
        self.project = Some(project);

        self.emit(EditorEvent::ProjectLoaded { project_id });
        self.emit(EditorEvent::SelectionChanged(self.selection.clone()));
        self.emit_history();
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if the document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Register for change notifications
    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Activate a page of the open project; unknown ids are ignored
    pub fn set_active_page(&mut self, page_id: &str) -> bool {
        let exists = self
            .project
            .as_ref()
            .is_some_and(|p| p.page(page_id).is_some());
        if !exists {
            debug!(page_id, "Ignoring activation of unknown page");
            return false;
        }

        self.selection.set_active_page(page_id);
        self.emit(EditorEvent::SelectionChanged(self.selection.clone()));
        true
    }

    /// Select a component on the active page, or clear the selection
    pub fn select_component(&mut self, component_id: Option<&str>) -> bool {
        if let Some(id) = component_id {
            let on_page = self
                .active_page()
                .is_some_and(|page| page.component(id).is_some());
            if !on_page {
                debug!(component_id = id, "Ignoring selection of unknown component");
                return false;
            }
        }

        self.selection.select(component_id.map(str::to_string));
        self.emit(EditorEvent::SelectionChanged(self.selection.clone()));
        true
    }

    pub fn active_page(&self) -> Option<&crate::model::Page> {
        let page_id = self.selection.active_page_id.as_deref()?;
        self.project.as_ref()?.page(page_id)
    }

    /// Apply a mutation; failures are logged and leave everything untouched.
    ///
    /// Returns the new document version if the edit was committed.
    pub fn apply(&mut self, mutation: Mutation) -> Option<u64> {
        match self.try_apply(mutation) {
            Ok(version) => Some(version),
            Err(e) => {
                debug!(error = %e, "Mutation skipped");
                None
            }
        }
    }

    /// Apply a mutation, reporting why it was not committed
    pub fn try_apply(&mut self, mutation: Mutation) -> Result<u64, EditorError> {
        let current = self.project.as_ref().ok_or(MutationError::NoProject)?;
        let applied = mutation.apply(current, &self.selection)?;

        self.history.record(current);

        let selection_changed = applied.selection != self.selection;
        self.project = Some(applied.project);
        self.selection = applied.selection;

        self.version += 1;
        self.dirty = true;
        debug!(op = mutation.name(), version = self.version, "Applied mutation");

        self.emit(EditorEvent::DocumentChanged {
            version: self.version,
        });
        if selection_changed {
            self.emit(EditorEvent::SelectionChanged(self.selection.clone()));
        }
        self.emit_history();

        Ok(self.version)
    }

    /// Append a page; returns its id
    pub fn add_page(&mut self) -> Option<String> {
        let page_id = new_page_id();
        self.apply(Mutation::AddPage {
            page_id: page_id.clone(),
        })
        .map(|_| page_id)
    }

    /// Remove a page unless it is the last one
    pub fn delete_page(&mut self, page_id: &str) -> bool {
        self.apply(Mutation::DeletePage {
            page_id: page_id.to_string(),
        })
        .is_some()
    }

    /// Place a default component on the active page; returns its id
    pub fn add_component(&mut self, kind: ComponentKind) -> Option<String> {
        let component_id = new_component_id();
        self.apply(Mutation::AddComponent {
            component_id: component_id.clone(),
            kind,
        })
        .map(|_| component_id)
    }

    pub fn update_component(&mut self, component_id: &str, patch: ComponentPatch) -> bool {
        self.apply(Mutation::UpdateComponent {
            component_id: component_id.to_string(),
            patch,
        })
        .is_some()
    }

    pub fn delete_component(&mut self, component_id: &str) -> bool {
        self.apply(Mutation::DeleteComponent {
            component_id: component_id.to_string(),
        })
        .is_some()
    }

    /// Copy a component; returns the copy's id
    pub fn duplicate_component(&mut self, component_id: &str) -> Option<String> {
        let new_component_id = new_component_id();
        self.apply(Mutation::DuplicateComponent {
            component_id: component_id.to_string(),
            new_component_id: new_component_id.clone(),
        })
        .map(|_| new_component_id)
    }

    pub fn update_project(&mut self, patch: ProjectPatch) -> bool {
        self.apply(Mutation::UpdateProject { patch }).is_some()
    }

    /// Step back one edit; no-op when there is nothing to undo
    pub fn undo(&mut self) -> Option<u64> {
        self.try_undo().ok()
    }

    pub fn try_undo(&mut self) -> Result<u64, EditorError> {
        let current = self.project.as_ref().ok_or(EditorError::NothingToUndo)?;
        let previous = self
            .history
            .undo(current)
            .ok_or(EditorError::NothingToUndo)?;
        Ok(self.restore(previous, "undo"))
    }

    /// Re-apply the last undone edit; no-op when there is nothing to redo
    pub fn redo(&mut self) -> Option<u64> {
        self.try_redo().ok()
    }

    pub fn try_redo(&mut self) -> Result<u64, EditorError> {
        let current = self.project.as_ref().ok_or(EditorError::NothingToRedo)?;
        let next = self.history.redo(current).ok_or(EditorError::NothingToRedo)?;
        Ok(self.restore(next, "redo"))
    }

    fn restore(&mut self, project: Project, direction: &'static str) -> u64 {
        let before = self.selection.clone();
        self.selection.reconcile(&project);
        self.project = Some(project);

        self.version += 1;
        self.dirty = true;
        debug!(
            direction,
            version = self.version,
            undo_levels = self.history.undo_levels(),
            redo_levels = self.history.redo_levels(),
            "Restored snapshot"
        );

        self.emit(EditorEvent::DocumentChanged {
            version: self.version,
        });
        if before != self.selection {
            self.emit(EditorEvent::SelectionChanged(self.selection.clone()));
        }
        self.emit_history();

        self.version
    }

    /// Record that `version` reached the store.
    ///
    /// The dirty flag is only cleared when no edit happened after `version`
    /// was captured; otherwise the newer edit is still unsaved.
    pub fn mark_saved(&mut self, version: u64) -> bool {
        if version != self.version {
            debug!(saved = version, current = self.version, "Document changed during save; still dirty");
            return false;
        }

        self.dirty = false;
        self.emit(EditorEvent::Saved { version });
        true
    }

    fn emit_history(&mut self) {
        let event = EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        };
        self.emit(event);
    }

    fn emit(&mut self, event: EditorEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
