use crate::backend::BackendError;
use pagedraft_editor::EditorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session queue closed")]
    QueueClosed,

    #[error("No staged edits to submit")]
    NothingToSubmit,
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
