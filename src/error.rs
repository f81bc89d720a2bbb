//! Error types for the task store.

use thiserror::Error;

use crate::task::TaskId;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field (title or state) was missing.
    #[error("invalid task: {0}")]
    Validation(String),

    #[error("no task at position {index} (list has {len})")]
    Index { index: usize, len: usize },

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("storage error: {0}")]
    Persistence(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// True for read/write failures of the storage slot, as opposed to a
    /// rejected request.
    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Persistence(_) | StoreError::Io(_) | StoreError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
