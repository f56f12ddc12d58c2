//! # Session Actor
//!
//! A single task owns the [`PageService`]; everything else talks to it
//! through a bounded queue, so edit-log mutations are applied strictly in
//! arrival order. Baseline fetches and status polls run in the caller and
//! only their results go through the queue, which lets edits keep flowing
//! against the stale baseline while a refresh is in flight.
//!
//! ```text
//! SessionHandle ──(Request + oneshot)──▶ mpsc ──▶ SessionActor ──▶ PageService
//!       │                                                              │
//!       └──── fetch_baseline / poll_request_status ──▶ Backend ◀─ submit┘
//! ```

use crate::backend::{Backend, SubmittedRequest};
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::service::PageService;
use pagedraft_editor::{Command, CommandOutcome, PageView, RequestState};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

type Reply<T> = oneshot::Sender<WorkspaceResult<T>>;

enum Request {
    Apply {
        command: Command,
        reply: Reply<CommandOutcome>,
    },
    View {
        path: String,
        reply: Reply<PageView>,
    },
    Submit {
        paths: Vec<String>,
        reply: Reply<SubmittedRequest>,
    },
    Resolve {
        request_id: String,
        state: RequestState,
        reply: Reply<Vec<String>>,
    },
    Acknowledge {
        path: String,
        reply: Reply<()>,
    },
    EndSession {
        reply: Reply<()>,
    },
}

pub struct SessionActor<B: Backend> {
    service: PageService<B>,
    receiver: mpsc::Receiver<Request>,
}

impl<B: Backend> SessionActor<B> {
    /// Start the actor on the current runtime
    pub fn spawn(service: PageService<B>, capacity: usize) -> SessionHandle<B> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let backend = service.backend().clone();
        let actor = Self { service, receiver };
        tokio::spawn(actor.run());
        SessionHandle { sender, backend }
    }

    async fn run(mut self) {
        while let Some(request) = self.receiver.recv().await {
            // A caller that went away no longer wants the reply
            match request {
                Request::Apply { command, reply } => {
                    let _ = reply.send(self.service.apply(command));
                }
                Request::View { path, reply } => {
                    let _ = reply.send(self.service.view(&path));
                }
                Request::Submit { paths, reply } => {
                    // Holds the queue so no edit lands between render and staging
                    let _ = reply.send(self.service.submit(&paths).await);
                }
                Request::Resolve {
                    request_id,
                    state,
                    reply,
                } => {
                    let _ = reply.send(self.service.resolve(&request_id, state));
                }
                Request::Acknowledge { path, reply } => {
                    let _ = reply.send(self.service.acknowledge(&path));
                }
                Request::EndSession { reply } => {
                    let _ = reply.send(self.service.end_session());
                }
            }
        }
        debug!("Session actor stopped");
    }
}

pub struct SessionHandle<B: Backend> {
    sender: mpsc::Sender<Request>,
    backend: Arc<B>,
}

impl<B: Backend> Clone for SessionHandle<B> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            backend: self.backend.clone(),
        }
    }
}

impl<B: Backend> SessionHandle<B> {
    async fn call<T>(&self, request: impl FnOnce(Reply<T>) -> Request) -> WorkspaceResult<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(request(reply))
            .await
            .map_err(|_| WorkspaceError::QueueClosed)?;
        response.await.map_err(|_| WorkspaceError::QueueClosed)?
    }

    pub async fn apply(&self, command: Command) -> WorkspaceResult<CommandOutcome> {
        self.call(|reply| Request::Apply { command, reply }).await
    }

    pub async fn view(&self, path: &str) -> WorkspaceResult<PageView> {
        let path = path.to_string();
        self.call(|reply| Request::View { path, reply }).await
    }

    /// Fetch the page outside the queue, then load it
    pub async fn open_page(&self, path: &str) -> WorkspaceResult<PageView> {
        let document = self.backend.fetch_baseline(path).await?;
        self.apply(Command::LoadBaseline {
            path: path.to_string(),
            document,
        })
        .await?;
        self.view(path).await
    }

    pub async fn submit(&self, paths: Vec<String>) -> WorkspaceResult<SubmittedRequest> {
        self.call(|reply| Request::Submit { paths, reply }).await
    }

    /// Check a request once. Dropping the returned future at any point
    /// leaves the session consistent; the request is simply polled again
    /// later.
    pub async fn poll(&self, request_id: &str) -> WorkspaceResult<RequestState> {
        let state = self.backend.poll_request_status(request_id).await?;
        if state == RequestState::Open {
            return Ok(state);
        }

        let request_id = request_id.to_string();
        let affected = self
            .call(|reply| Request::Resolve {
                request_id: request_id.clone(),
                state,
                reply,
            })
            .await?;
        info!(request_id = %request_id, state = ?state, pages = affected.len(), "Request settled");

        if state == RequestState::Merged {
            for path in &affected {
                self.open_page(path).await?;
            }
        }
        Ok(state)
    }

    pub async fn acknowledge(&self, path: &str) -> WorkspaceResult<()> {
        let path = path.to_string();
        self.call(|reply| Request::Acknowledge { path, reply }).await
    }

    pub async fn end_session(&self) -> WorkspaceResult<()> {
        self.call(|reply| Request::EndSession { reply }).await
    }
}
