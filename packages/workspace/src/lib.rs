//! # Pagedraft Workspace
//!
//! Async plumbing around the editor engine: the backend collaborator,
//! durable JSON storage, and a single-owner actor that serializes every
//! edit-log mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let backend = Arc::new(DirectoryBackend::new("site", "site/.pagedraft/outbox"));
//! let service = PageService::new(backend, JsonStorage::new(".pagedraft"))?;
//! let handle = SessionActor::spawn(service, 64);
//!
//! let view = handle.open_page("docs/index.html").await?;
//! handle.apply(Command::InsertAt { path, index: 1, html }).await?;
//! let request = handle.submit(vec!["docs/index.html".into()]).await?;
//! handle.poll(&request.request_id).await?;
//! ```

mod actor;
mod backend;
mod error;
mod service;
mod storage;

pub use actor::{SessionActor, SessionHandle};
pub use backend::{Backend, BackendError, DirectoryBackend, FileChange, MemoryBackend, SubmittedRequest};
pub use error::{WorkspaceError, WorkspaceResult};
pub use service::PageService;
pub use storage::{JsonStorage, LEDGER_FILE, STORE_FILE};
