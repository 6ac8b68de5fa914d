//! Error types for the editor

use thiserror::Error;

/// Failures surfaced by the strict `try_*` entry points of
/// [`EditSession`](crate::EditSession). The lenient entry points absorb them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}
