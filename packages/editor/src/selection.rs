//! Active page and selected component tracking.

use crate::model::Project;
use serde::{Deserialize, Serialize};

/// Which page is shown on the canvas and which component is selected on it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub active_page_id: Option<String>,
    pub selected_component_id: Option<String>,
}

impl Selection {
    /// First page active, nothing selected
    pub fn for_project(project: &Project) -> Self {
        Self {
            active_page_id: project.first_page_id().map(str::to_string),
            selected_component_id: None,
        }
    }

    /// Switch page; selection is scoped to a page so it is cleared
    pub fn set_active_page(&mut self, page_id: impl Into<String>) {
        self.active_page_id = Some(page_id.into());
        self.selected_component_id = None;
    }

    pub fn select(&mut self, component_id: Option<String>) {
        self.selected_component_id = component_id;
    }

    pub fn is_selected(&self, component_id: &str) -> bool {
        self.selected_component_id.as_deref() == Some(component_id)
    }

    /// Repair references that no longer exist in `project`.
    ///
    /// A missing active page falls back to the first page; a selected
    /// component not on the active page is deselected.
    pub fn reconcile(&mut self, project: &Project) {
        let page_exists = self
            .active_page_id
            .as_deref()
            .is_some_and(|id| project.page(id).is_some());

        if !page_exists {
            *self = Self::for_project(project);
            return;
        }

        if let Some(component_id) = self.selected_component_id.as_deref() {
            let still_there = self
                .active_page_id
                .as_deref()
                .and_then(|id| project.page(id))
                .is_some_and(|page| page.component(component_id).is_some());
            if !still_there {
                self.selected_component_id = None;
            }
        }
    }
}
