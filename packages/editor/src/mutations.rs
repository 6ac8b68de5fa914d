//! # Project Mutations
//!
//! Structural edits on a BookForge project.
//!
//! ## Design Principles
//!
//! 1. **Pure**: `apply` reads the current project and returns the next one;
//!    the input is never touched, so undo snapshots stay valid
//! 2. **Deterministic**: ids for new pages and components are carried inside
//!    the mutation, so replaying a mutation yields the same project
//! 3. **Scoped**: component edits only address the active page
//!
//! ## Mutation Semantics
//!
//! ### AddPage
//! - Appends an empty page titled "Page N" and makes it active
//!
//! ### DeletePage
//! - Refused for the last remaining page
//! - If the removed page was active, the first remaining page becomes active
//!
//! ### AddComponent / DuplicateComponent
//! - The new component is stacked above everything on the page and selected
//!
//! ### UpdateComponent / DeleteComponent
//! - Unknown ids are rejected with [`MutationError::ComponentNotFound`]; the
//!   edit session turns that into a no-op

use crate::model::{
    page_title, Component, ComponentKind, ComponentPatch, Page, Project, ProjectPatch,
    DUPLICATE_OFFSET,
};
use crate::selection::Selection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural edits, one per editor command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Append a new page and activate it
    #[serde(rename_all = "camelCase")]
    AddPage { page_id: String },

    /// Remove a page (never the last one)
    #[serde(rename_all = "camelCase")]
    DeletePage { page_id: String },

    /// Place a default component of `kind` on the active page
    #[serde(rename_all = "camelCase")]
    AddComponent {
        component_id: String,
        kind: ComponentKind,
    },

    /// Merge a partial update into a component on the active page
    #[serde(rename_all = "camelCase")]
    UpdateComponent {
        component_id: String,
        patch: ComponentPatch,
    },

    /// Remove a component from the active page
    #[serde(rename_all = "camelCase")]
    DeleteComponent { component_id: String },

    /// Copy a component on the active page, offset down and right
    #[serde(rename_all = "camelCase")]
    DuplicateComponent {
        component_id: String,
        new_component_id: String,
    },

    /// Merge project-level metadata
    UpdateProject { patch: ProjectPatch },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("No project loaded")]
    NoProject,

    #[error("No active page")]
    NoActivePage,

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Cannot delete the last page: {0}")]
    LastPage(String),
}

/// Project and selection after a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub project: Project,
    pub selection: Selection,
}

impl Mutation {
    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddPage { .. } => "add_page",
            Mutation::DeletePage { .. } => "delete_page",
            Mutation::AddComponent { .. } => "add_component",
            Mutation::UpdateComponent { .. } => "update_component",
            Mutation::DeleteComponent { .. } => "delete_component",
            Mutation::DuplicateComponent { .. } => "duplicate_component",
            Mutation::UpdateProject { .. } => "update_project",
        }
    }

    /// Compute the next project and selection
    pub fn apply(&self, project: &Project, selection: &Selection) -> Result<Applied, MutationError> {
        let mut next = project.clone();
        let mut selection = selection.clone();

        match self {
            Mutation::AddPage { page_id } => {
                let title = page_title(next.pages.len() + 1);
                next.pages.push(Page::new(page_id.clone(), title));
                selection.set_active_page(page_id.clone());
            }

            Mutation::DeletePage { page_id } => {
                let index = next
                    .pages
                    .iter()
                    .position(|p| &p.id == page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;

                if next.pages.len() <= 1 {
                    return Err(MutationError::LastPage(page_id.clone()));
                }

                next.pages.remove(index);

                if selection.active_page_id.as_deref() == Some(page_id.as_str()) {
                    if let Some(first) = next.first_page_id() {
                        selection.set_active_page(first);
                    }
                }
            }

            Mutation::AddComponent { component_id, kind } => {
                let page = Self::active_page_mut(&mut next, &selection)?;
                let component = Component::new(component_id.clone(), *kind, page.next_z_index());
                page.components.push(component);
                selection.select(Some(component_id.clone()));
            }

            Mutation::UpdateComponent { component_id, patch } => {
                let page = Self::active_page_mut(&mut next, &selection)?;
                let component = page
                    .component_mut(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                component.apply_patch(patch);
            }

            Mutation::DeleteComponent { component_id } => {
                let page = Self::active_page_mut(&mut next, &selection)?;
                let index = page
                    .components
                    .iter()
                    .position(|c| &c.id == component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;
                page.components.remove(index);

                if selection.is_selected(component_id) {
                    selection.select(None);
                }
            }

            Mutation::DuplicateComponent {
                component_id,
                new_component_id,
            } => {
                let page = Self::active_page_mut(&mut next, &selection)?;
                let source = page
                    .component(component_id)
                    .ok_or_else(|| MutationError::ComponentNotFound(component_id.clone()))?;

                let mut copy = source.clone();
                copy.id = new_component_id.clone();
                copy.position = source.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
                copy.z_index = page.next_z_index();
                page.components.push(copy);

                selection.select(Some(new_component_id.clone()));
            }

            Mutation::UpdateProject { patch } => {
                next.apply_patch(patch);
            }
        }

        Ok(Applied {
            project: next,
            selection,
        })
    }

    fn active_page_mut<'a>(
        project: &'a mut Project,
        selection: &Selection,
    ) -> Result<&'a mut Page, MutationError> {
        let page_id = selection
            .active_page_id
            .as_deref()
            .ok_or(MutationError::NoActivePage)?;

        project
            .page_mut(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
    }
}
