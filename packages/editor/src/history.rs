//! # Undo/Redo History
//!
//! Bounded snapshot stacks for project editing.
//!
//! ## Design
//!
//! - Every mutating command records a full copy of the project taken before
//!   the edit
//! - Undo pops the latest snapshot and parks the current project on the redo
//!   stack
//! - Redo is the mirror image
//! - Recording a new edit clears the redo stack
//! - The undo stack holds at most [`HISTORY_CAP`] entries; the oldest entry
//!   is dropped when the cap is exceeded
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//!
//! history.record(&project);
//! project.title = "Edited".to_string();
//!
//! let previous = history.undo(&project).unwrap();
//! let edited = history.redo(&previous).unwrap();
//! ```

use crate::model::Project;
use tracing::debug;

/// Maximum number of undo levels kept
pub const HISTORY_CAP: usize = 20;

/// Undo/redo stacks of whole-project snapshots
#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots taken before each edit (most recent last)
    undo_stack: Vec<Project>,

    /// Snapshots parked by undo (most recent last)
    redo_stack: Vec<Project>,

    max_levels: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels: HISTORY_CAP,
        }
    }

    /// Record the pre-edit project and invalidate redo history
    pub fn record(&mut self, project: &Project) {
        self.snapshot(project);
        self.clear_redo();
    }

    /// Push a copy onto the undo stack, evicting the oldest entry past the cap
    pub fn snapshot(&mut self, project: &Project) {
        self.undo_stack.push(project.clone());

        if self.undo_stack.len() > self.max_levels {
            let evicted = self.undo_stack.remove(0);
            debug!(project_id = %evicted.id, cap = self.max_levels, "Evicted oldest undo snapshot");
        }
    }

    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Step back; returns the project to restore, or `None` if there is
    /// nothing to undo
    pub fn undo(&mut self, current: &Project) -> Option<Project> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Step forward; returns the project to restore, or `None` if there is
    /// nothing to redo
    pub fn redo(&mut self, current: &Project) -> Option<Project> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history (used when a different project is loaded)
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectType;

    fn project_titled(title: &str) -> Project {
        let mut project = Project::new("proj-1", title, ProjectType::Textbook);
        project.pages[0].id = "p1".to_string();
        project
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let mut history = History::new();
        let current = project_titled("v0");

        assert!(history.undo(&current).is_none());
        assert!(history.redo(&current).is_none());
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let mut history = History::new();
        let v0 = project_titled("v0");
        let v1 = project_titled("v1");

        history.record(&v0);

        let undone = history.undo(&v1).unwrap();
        assert_eq!(undone, v0);
        assert_eq!(history.undo_levels(), 0);
        assert_eq!(history.redo_levels(), 1);

        let redone = history.redo(&undone).unwrap();
        assert_eq!(redone, v1);
        assert_eq!(history.undo_levels(), 1);
        assert_eq!(history.redo_levels(), 0);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        let v0 = project_titled("v0");
        let v1 = project_titled("v1");

        history.record(&v0);
        let restored = history.undo(&v1).unwrap();
        assert_eq!(history.redo_levels(), 1);

        history.record(&restored);
        assert_eq!(history.redo_levels(), 0);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::new();

        for i in 0..25 {
            history.record(&project_titled(&format!("v{}", i)));
        }
        assert_eq!(history.undo_levels(), HISTORY_CAP);

        let mut current = project_titled("v25");
        let mut restored = Vec::new();
        while let Some(previous) = history.undo(&current) {
            restored.push(previous.title.clone());
            current = previous;
        }

        assert_eq!(restored.len(), HISTORY_CAP);
        assert_eq!(restored.first().map(String::as_str), Some("v24"));
        assert_eq!(restored.last().map(String::as_str), Some("v5"));
    }

    #[test]
    fn test_snapshots_do_not_alias_live_project() {
        let mut history = History::new();
        let mut live = project_titled("v0");

        history.record(&live);
        live.pages[0].title = "Changed".to_string();

        let restored = history.undo(&live).unwrap();
        assert_eq!(restored.pages[0].title, "Page 1");
    }
}
