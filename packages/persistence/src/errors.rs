//! Error types for persistence

use thiserror::Error;

/// Failures reported by a [`ProjectStore`](crate::ProjectStore)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Permission denied for project: {0}")]
    PermissionDenied(String),

    #[error("No signed-in user")]
    Unauthenticated,

    #[error("Invalid project: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
