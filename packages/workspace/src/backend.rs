//! # Backend Collaborator
//!
//! The repository side of the editor: where baselines come from and where
//! change requests go. The engine only awaits these calls; it never speaks
//! a wire protocol itself and never retries a failed call on its own.

use async_trait::async_trait;
use chrono::Utc;
use pagedraft_editor::RequestState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid page path: {0}")]
    InvalidPath(String),

    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// New full content of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedRequest {
    pub request_id: String,
    pub url: String,
}

#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Current repository version of a page
    async fn fetch_baseline(&self, path: &str) -> Result<String, BackendError>;

    /// Open a change request replacing `files`
    async fn submit_change(&self, files: Vec<FileChange>) -> Result<SubmittedRequest, BackendError>;

    async fn poll_request_status(&self, request_id: &str) -> Result<RequestState, BackendError>;
}

/// In-process backend; merging a request applies its files
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pages: RwLock<HashMap<String, String>>,
    requests: RwLock<BTreeMap<String, (Vec<FileChange>, RequestState)>>,
    next_request: AtomicU64,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_page(&self, path: impl Into<String>, document: impl Into<String>) {
        self.pages.write().await.insert(path.into(), document.into());
    }

    pub async fn page(&self, path: &str) -> Option<String> {
        self.pages.read().await.get(path).cloned()
    }

    /// Make every call fail with [`BackendError::Unavailable`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn submitted_files(&self, request_id: &str) -> Option<Vec<FileChange>> {
        self.requests
            .read()
            .await
            .get(request_id)
            .map(|(files, _)| files.clone())
    }

    /// Merge a request: its files become the new baselines
    pub async fn merge_request(&self, request_id: &str) -> Result<(), BackendError> {
        let mut requests = self.requests.write().await;
        let (files, state) = requests
            .get_mut(request_id)
            .ok_or_else(|| BackendError::UnknownRequest(request_id.to_string()))?;
        *state = RequestState::Merged;

        let mut pages = self.pages.write().await;
        for file in files.iter() {
            pages.insert(file.path.clone(), file.content.clone());
        }
        Ok(())
    }

    pub async fn close_request(&self, request_id: &str) -> Result<(), BackendError> {
        let mut requests = self.requests.write().await;
        let (_, state) = requests
            .get_mut(request_id)
            .ok_or_else(|| BackendError::UnknownRequest(request_id.to_string()))?;
        *state = RequestState::Closed;
        Ok(())
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("backend is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_baseline(&self, path: &str) -> Result<String, BackendError> {
        self.check_online()?;
        self.page(path)
            .await
            .ok_or_else(|| BackendError::NotFound(path.to_string()))
    }

    async fn submit_change(&self, files: Vec<FileChange>) -> Result<SubmittedRequest, BackendError> {
        self.check_online()?;
        let request_id = (self.next_request.fetch_add(1, Ordering::SeqCst) + 1).to_string();
        self.requests
            .write()
            .await
            .insert(request_id.clone(), (files, RequestState::Open));

        Ok(SubmittedRequest {
            url: format!("memory://requests/{}", request_id),
            request_id,
        })
    }

    async fn poll_request_status(&self, request_id: &str) -> Result<RequestState, BackendError> {
        self.check_online()?;
        self.requests
            .read()
            .await
            .get(request_id)
            .map(|(_, state)| *state)
            .ok_or_else(|| BackendError::UnknownRequest(request_id.to_string()))
    }
}

/// Outbox entry written for each submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutboxEntry {
    request_id: String,
    files: Vec<FileChange>,
    created_at: chrono::DateTime<Utc>,
}

/// Baselines read from a site directory; submissions land in an outbox
/// as JSON, their state in a sibling `<id>.status` file (`open`, `merged`
/// or `closed`; open when absent)
#[derive(Debug)]
pub struct DirectoryBackend {
    root: PathBuf,
    outbox: PathBuf,
    submit_lock: Mutex<()>,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>, outbox: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            outbox: outbox.into(),
            submit_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn outbox(&self) -> &Path {
        &self.outbox
    }

    fn page_path(&self, path: &str) -> Result<PathBuf, BackendError> {
        let relative = Path::new(path);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !plain {
            return Err(BackendError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn request_path(&self, request_id: &str, extension: &str) -> Result<PathBuf, BackendError> {
        if request_id.is_empty() || !request_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(BackendError::UnknownRequest(request_id.to_string()));
        }
        Ok(self.outbox.join(format!("{}.{}", request_id, extension)))
    }

    async fn next_request_id(&self) -> Result<u64, BackendError> {
        let mut highest = 0;
        let mut entries = match tokio::fs::read_dir(&self.outbox).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
            Err(e) => return Err(unavailable(e)),
        };
        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let name = entry.file_name();
            let id = name
                .to_str()
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(id) = id {
                highest = highest.max(id);
            }
        }
        Ok(highest + 1)
    }
}

fn unavailable(err: std::io::Error) -> BackendError {
    BackendError::Unavailable(err.to_string())
}

#[async_trait]
impl Backend for DirectoryBackend {
    async fn fetch_baseline(&self, path: &str) -> Result<String, BackendError> {
        let file = self.page_path(path)?;
        debug!(path, file = %file.display(), "Reading baseline");
        tokio::fs::read_to_string(&file).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BackendError::NotFound(path.to_string())
            } else {
                unavailable(e)
            }
        })
    }

    async fn submit_change(&self, files: Vec<FileChange>) -> Result<SubmittedRequest, BackendError> {
        for file in &files {
            self.page_path(&file.path)?;
        }

        let _guard = self.submit_lock.lock().await;
        tokio::fs::create_dir_all(&self.outbox)
            .await
            .map_err(unavailable)?;

        let request_id = self.next_request_id().await?.to_string();
        let target = self.request_path(&request_id, "json")?;
        let entry = OutboxEntry {
            request_id: request_id.clone(),
            files,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        tokio::fs::write(&target, json).await.map_err(unavailable)?;

        info!(request_id = %request_id, file = %target.display(), "Wrote change request");
        Ok(SubmittedRequest {
            url: format!("file://{}", target.display()),
            request_id,
        })
    }

    async fn poll_request_status(&self, request_id: &str) -> Result<RequestState, BackendError> {
        if !tokio::fs::try_exists(self.request_path(request_id, "json")?)
            .await
            .map_err(unavailable)?
        {
            return Err(BackendError::UnknownRequest(request_id.to_string()));
        }

        let status = match tokio::fs::read_to_string(self.request_path(request_id, "status")?).await {
            Ok(status) => status,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RequestState::Open),
            Err(e) => return Err(unavailable(e)),
        };

        match status.trim() {
            "open" => Ok(RequestState::Open),
            "merged" => Ok(RequestState::Merged),
            "closed" => Ok(RequestState::Closed),
            other => Err(BackendError::Unavailable(format!(
                "unrecognized status '{}' for request {}",
                other, request_id
            ))),
        }
    }
}
