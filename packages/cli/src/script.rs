//! # Edit Scripts
//!
//! A script is a JSON array of editor commands, run in order against an open
//! project:
//!
//! ```json
//! [
//!   { "command": "addComponent", "kind": "text" },
//!   { "command": "updateComponent", "componentId": "$last", "patch": { "content": "Hello" } },
//!   { "command": "duplicateComponent", "componentId": "$last" },
//!   { "command": "undo" }
//! ]
//! ```
//!
//! `$last` stands for the id of the most recently created page or component.
//! Commands that change nothing (unknown ids, deleting the last page, undo
//! with empty history) are skipped, the same way the editor ignores them.

use bookforge_editor::{ComponentKind, ComponentPatch, ProjectPatch};
use bookforge_persistence::{EditorController, ProjectStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Placeholder for the most recently created id
pub const LAST_CREATED: &str = "$last";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ScriptCommand {
    AddPage,

    #[serde(rename_all = "camelCase")]
    DeletePage { page_id: String },

    AddComponent { kind: ComponentKind },

    #[serde(rename_all = "camelCase")]
    UpdateComponent {
        component_id: String,
        patch: ComponentPatch,
    },

    #[serde(rename_all = "camelCase")]
    DeleteComponent { component_id: String },

    #[serde(rename_all = "camelCase")]
    DuplicateComponent { component_id: String },

    UpdateProject { patch: ProjectPatch },

    Undo,

    Redo,

    #[serde(rename_all = "camelCase")]
    SelectPage { page_id: String },

    /// Select a component, or clear the selection when `componentId` is absent
    #[serde(rename_all = "camelCase")]
    SelectComponent {
        #[serde(default)]
        component_id: Option<String>,
    },
}

impl ScriptCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptCommand::AddPage => "addPage",
            ScriptCommand::DeletePage { .. } => "deletePage",
            ScriptCommand::AddComponent { .. } => "addComponent",
            ScriptCommand::UpdateComponent { .. } => "updateComponent",
            ScriptCommand::DeleteComponent { .. } => "deleteComponent",
            ScriptCommand::DuplicateComponent { .. } => "duplicateComponent",
            ScriptCommand::UpdateProject { .. } => "updateProject",
            ScriptCommand::Undo => "undo",
            ScriptCommand::Redo => "redo",
            ScriptCommand::SelectPage { .. } => "selectPage",
            ScriptCommand::SelectComponent { .. } => "selectComponent",
        }
    }
}

pub fn parse(json: &str) -> serde_json::Result<Vec<ScriptCommand>> {
    serde_json::from_str(json)
}

/// What happened to each command of a script
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    pub applied: usize,
    /// Indices of commands that had no effect
    pub skipped: Vec<usize>,
}

/// Run `commands` against the project open in `editor`
pub fn run_script<S: ProjectStore>(
    editor: &mut EditorController<S>,
    commands: Vec<ScriptCommand>,
) -> ScriptReport {
    let mut runner = ScriptRunner::default();
    let mut report = ScriptReport::default();

    for (index, command) in commands.into_iter().enumerate() {
        let name = command.name();
        if runner.step(editor, command) {
            debug!(index, command = name, "Script command applied");
            report.applied += 1;
        } else {
            warn!(index, command = name, "Script command had no effect");
            report.skipped.push(index);
        }
    }

    report
}

#[derive(Debug, Default)]
struct ScriptRunner {
    last_created: Option<String>,
}

impl ScriptRunner {
    fn resolve(&self, id: String) -> String {
        match (id.as_str(), &self.last_created) {
            (LAST_CREATED, Some(last)) => last.clone(),
            _ => id,
        }
    }

    fn created(&mut self, id: Option<String>) -> bool {
        match id {
            Some(id) => {
                self.last_created = Some(id);
                true
            }
            None => false,
        }
    }

    fn step<S: ProjectStore>(&mut self, editor: &mut EditorController<S>, command: ScriptCommand) -> bool {
        match command {
            ScriptCommand::AddPage => {
                let id = editor.add_page();
                self.created(id)
            }
            ScriptCommand::DeletePage { page_id } => editor.delete_page(&self.resolve(page_id)),
            ScriptCommand::AddComponent { kind } => {
                let id = editor.add_component(kind);
                self.created(id)
            }
            ScriptCommand::UpdateComponent {
                component_id,
                patch,
            } => editor.update_component(&self.resolve(component_id), patch),
            ScriptCommand::DeleteComponent { component_id } => {
                editor.delete_component(&self.resolve(component_id))
            }
            ScriptCommand::DuplicateComponent { component_id } => {
                let id = editor.duplicate_component(&self.resolve(component_id));
                self.created(id)
            }
            ScriptCommand::UpdateProject { patch } => editor.update_project(patch),
            ScriptCommand::Undo => editor.undo().is_some(),
            ScriptCommand::Redo => editor.redo().is_some(),
            ScriptCommand::SelectPage { page_id } => editor.set_active_page(&self.resolve(page_id)),
            ScriptCommand::SelectComponent { component_id } => {
                let id = component_id.map(|id| self.resolve(id));
                editor.select_component(id.as_deref())
            }
        }
    }
}
