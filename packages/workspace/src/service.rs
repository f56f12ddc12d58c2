//! # Page Service
//!
//! Ties an [`EditorSession`] to a backend and durable storage. Every
//! successful mutation is followed by a save of the store and ledger.

use crate::backend::{Backend, FileChange, SubmittedRequest};
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::storage::JsonStorage;
use pagedraft_editor::{Command, CommandOutcome, EditorSession, PageView, RequestState};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct PageService<B: Backend> {
    backend: Arc<B>,
    storage: JsonStorage,
    session: EditorSession,
}

impl<B: Backend> PageService<B> {
    /// Resume from whatever `storage` holds
    pub fn new(backend: Arc<B>, storage: JsonStorage) -> WorkspaceResult<Self> {
        let store = storage.load_store()?;
        let ledger = storage.load_ledger()?;
        debug!(dirty_pages = store.len(), dir = %storage.dir().display(), "Loaded editor state");

        Ok(Self {
            backend,
            storage,
            session: EditorSession::restore(store, ledger),
        })
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn apply(&mut self, command: Command) -> WorkspaceResult<CommandOutcome> {
        let outcome = self.session.execute(command)?;
        self.persist()?;
        Ok(outcome)
    }

    /// Adopt a fetched baseline for `path`
    pub fn load(&mut self, path: &str, document: String) -> WorkspaceResult<CommandOutcome> {
        self.apply(Command::LoadBaseline {
            path: path.to_string(),
            document,
        })
    }

    pub fn view(&self, path: &str) -> WorkspaceResult<PageView> {
        Ok(self.session.view(path)?)
    }

    /// Fetch the current baseline and re-merge stored edits against it
    #[instrument(skip(self))]
    pub async fn open_page(&mut self, path: &str) -> WorkspaceResult<PageView> {
        let document = self.backend.fetch_baseline(path).await?;
        self.load(path, document)?;
        self.view(path)
    }

    /// Submit the staged edits of `paths` as one change request. Pages
    /// with nothing staged are skipped.
    #[instrument(skip(self, paths), fields(pages = paths.len()))]
    pub async fn submit(&mut self, paths: &[String]) -> WorkspaceResult<SubmittedRequest> {
        let staged: Vec<String> = paths
            .iter()
            .filter(|path| {
                self.session
                    .log(path)
                    .map(|log| log.has_staged())
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        if staged.is_empty() {
            return Err(WorkspaceError::NothingToSubmit);
        }

        let pages = self.session.commit_documents(&staged)?;
        for page in pages.iter().filter(|p| !p.report.is_clean()) {
            warn!(
                path = %page.path,
                outside_drift = page.report.outside_drift,
                serialized = page.report.serialized_blocks,
                reparsed = page.report.reparsed_blocks,
                "Submitting page with consistency warnings"
            );
        }

        let files = pages
            .iter()
            .map(|page| FileChange {
                path: page.path.clone(),
                content: page.document.clone(),
            })
            .collect();
        let request = self.backend.submit_change(files).await?;

        self.session.begin_request(&request.request_id, &pages)?;
        self.persist()?;
        info!(request_id = %request.request_id, url = %request.url, "Opened change request");
        Ok(request)
    }

    /// Apply a request's final state. Returns the loaded pages it touched.
    pub fn resolve(&mut self, request_id: &str, state: RequestState) -> WorkspaceResult<Vec<String>> {
        let affected = self.session.resolve_request(request_id, state)?;
        self.persist()?;
        Ok(affected
            .into_iter()
            .filter(|path| self.session.is_loaded(path))
            .collect())
    }

    /// Check a request once; on merge, reload the pages it touched
    #[instrument(skip(self))]
    pub async fn poll(&mut self, request_id: &str) -> WorkspaceResult<RequestState> {
        let state = self.backend.poll_request_status(request_id).await?;
        if state == RequestState::Open {
            return Ok(state);
        }

        let affected = self.resolve(request_id, state)?;
        if state == RequestState::Merged {
            for path in &affected {
                self.open_page(path).await?;
            }
        }
        Ok(state)
    }

    pub fn acknowledge(&mut self, path: &str) -> WorkspaceResult<()> {
        self.session.acknowledge(path)?;
        self.persist()
    }

    /// Forget session-scoped state; dirty pages stay
    pub fn end_session(&mut self) -> WorkspaceResult<()> {
        self.session.end_session();
        self.storage.clear_session()
    }

    pub fn persist(&self) -> WorkspaceResult<()> {
        self.storage.save_store(self.session.store())?;
        self.storage.save_ledger(self.session.ledger())
    }
}
