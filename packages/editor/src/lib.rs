//! # BookForge Editor
//!
//! Core editing engine for BookForge interactive books.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Project → Page → Component           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Apply mutations (pure, snapshot first)   │
//! │  - Bounded undo/redo of whole projects      │
//! │  - Active page / selected component         │
//! │  - Version + dirty tracking                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ persistence: debounced autosave, status     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookforge_editor::{ComponentKind, EditSession, Project, ProjectType};
//!
//! let mut session = EditSession::with_project(Project::new("p", "Biology", ProjectType::Textbook));
//!
//! let text = session.add_component(ComponentKind::Text).unwrap();
//! session.duplicate_component(&text);
//!
//! session.undo();
//! session.redo();
//! ```

mod errors;
mod history;
mod model;
mod mutations;
mod selection;
mod session;

pub use errors::EditorError;
pub use history::{History, HISTORY_CAP};
pub use model::{
    new_component_id, new_page_id, page_title, Component, ComponentKind, ComponentPatch,
    ComponentProps, Page, Position, Project, ProjectMetadata, ProjectPatch, ProjectType, Size,
    DEFAULT_FONT_SIZE, DEFAULT_IMAGE_URL, DEFAULT_POSITION, DEFAULT_QR_LABEL, DEFAULT_QR_TARGET,
    DEFAULT_TEXT_CONTENT, DUPLICATE_OFFSET,
};
pub use mutations::{Applied, Mutation, MutationError};
pub use selection::Selection;
pub use session::{EditSession, EditorEvent};
