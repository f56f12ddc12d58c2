//! # Editor Session
//!
//! The single owner of editing state: the dirty-page store, one edit log and
//! latest baseline per loaded page, and the session ledger. Every mutation
//! is a [`Command`] passed to [`EditorSession::execute`]; after each one the
//! page is normalized, merged and rendered, and its store entry replaced or
//! deleted.

use crate::anchor::{insertion_point, resolve_anchors, Anchor, Placement};
use crate::block::Block;
use crate::canonicalize::{main_blocks, render_document, ConsistencyReport};
use crate::classify::{classify, PageView};
use crate::edit_log::{EditLog, RecordKind};
use crate::ledger::{RequestState, SessionLedger};
use crate::merge::{effective_order, merge, merged_blocks, moved_identities, MergeOptions};
use crate::store::{DirtyPageEntry, DirtyPageStore};
use crate::EditorError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// State-changing operations on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Adopt a freshly fetched page and re-merge its edits against it
    LoadBaseline { path: String, document: String },

    Insert {
        path: String,
        anchor: Anchor,
        placement: Placement,
        html: String,
    },

    /// Insert so the new block shows at on-screen `index`
    InsertAt {
        path: String,
        index: usize,
        html: String,
    },

    Remove { path: String, identity: String },

    Mark { path: String, identity: String },

    Restore { path: String, identity: String },

    Edit {
        path: String,
        identity: String,
        html: String,
    },

    UpdateInsert {
        path: String,
        record_id: u64,
        html: String,
    },

    Reorder { path: String, order: Vec<String> },

    Discard { path: String, record_id: u64 },

    DiscardPage { path: String },
}

impl Command {
    pub fn path(&self) -> &str {
        match self {
            Command::LoadBaseline { path, .. }
            | Command::Insert { path, .. }
            | Command::InsertAt { path, .. }
            | Command::Remove { path, .. }
            | Command::Mark { path, .. }
            | Command::Restore { path, .. }
            | Command::Edit { path, .. }
            | Command::UpdateInsert { path, .. }
            | Command::Reorder { path, .. }
            | Command::Discard { path, .. }
            | Command::DiscardPage { path } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadBaseline { .. } => "load_baseline",
            Command::Insert { .. } => "insert",
            Command::InsertAt { .. } => "insert_at",
            Command::Remove { .. } => "remove",
            Command::Mark { .. } => "mark",
            Command::Restore { .. } => "restore",
            Command::Edit { .. } => "edit",
            Command::UpdateInsert { .. } => "update_insert",
            Command::Reorder { .. } => "reorder",
            Command::Discard { .. } => "discard",
            Command::DiscardPage { .. } => "discard_page",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub path: String,
    /// Record created or updated by the command
    pub record_id: Option<u64>,
    /// Whether the page has a store entry afterwards
    pub dirty: bool,
}

/// A page rendered for submission
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedPage {
    pub path: String,
    pub document: String,
    pub report: ConsistencyReport,
    /// Blocks the request adds to the page
    pub submitted: Vec<Block>,
}

#[derive(Debug, Clone)]
struct PageState {
    /// Latest baseline document
    document: String,
    baseline: Vec<Block>,
    log: EditLog,
}

enum Target {
    Baseline(Anchor),
    Record(u64),
}

#[derive(Debug, Default)]
pub struct EditorSession {
    store: DirtyPageStore,
    ledger: SessionLedger,
    pages: BTreeMap<String, PageState>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from persisted state; pages are loaded lazily
    pub fn restore(store: DirtyPageStore, ledger: SessionLedger) -> Self {
        Self {
            store,
            ledger,
            pages: BTreeMap::new(),
        }
    }

    pub fn store(&self) -> &DirtyPageStore {
        &self.store
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn entry(&self, path: &str) -> Option<&DirtyPageEntry> {
        self.store.get(path)
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    pub fn loaded_paths(&self) -> Vec<&str> {
        self.pages.keys().map(String::as_str).collect()
    }

    pub fn baseline(&self, path: &str) -> Option<&[Block]> {
        self.pages.get(path).map(|p| p.baseline.as_slice())
    }

    /// Edit log of a loaded page, else the stored one
    pub fn log(&self, path: &str) -> Option<&EditLog> {
        self.pages
            .get(path)
            .map(|p| &p.log)
            .or_else(|| self.store.get(path).map(|e| &e.edit_log))
    }

    fn page(&self, path: &str) -> Result<&PageState, EditorError> {
        self.pages
            .get(path)
            .ok_or_else(|| EditorError::UnknownPage(path.to_string()))
    }

    fn page_mut(&mut self, path: &str) -> Result<&mut PageState, EditorError> {
        self.pages
            .get_mut(path)
            .ok_or_else(|| EditorError::UnknownPage(path.to_string()))
    }

    /// Apply one command
    #[instrument(skip(self, command), fields(command = command.name(), path = %command.path()))]
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome, EditorError> {
        let path = command.path().to_string();

        let record_id = match command {
            Command::LoadBaseline { document, .. } => {
                self.load_baseline(&path, document)?;
                None
            }
            Command::Insert {
                anchor,
                placement,
                html,
                ..
            } => Some(self.page_mut(&path)?.log.insert(anchor, placement, &html)?),
            Command::InsertAt { index, html, .. } => {
                let page = self.page_mut(&path)?;
                let view = merge(&page.baseline, &page.log, MergeOptions::preview());
                let point = insertion_point(&view, &page.baseline, &page.log, index)?;
                Some(page.log.insert_at(point, &html)?)
            }
            Command::Remove { identity, .. } => self.remove_block(&path, &identity, false)?,
            Command::Mark { identity, .. } => self.remove_block(&path, &identity, true)?,
            Command::Restore { identity, .. } => {
                match self.target(&path, &identity)? {
                    Target::Baseline(anchor) => {
                        let log = &mut self.page_mut(&path)?.log;
                        if !log.restore(&anchor) {
                            log.discard_edit(&anchor);
                        }
                    }
                    Target::Record(id) => {
                        let log = &mut self.page_mut(&path)?.log;
                        if log.get(id).is_some_and(|r| r.kind == RecordKind::Edited) {
                            log.discard(id)?;
                        }
                    }
                }
                None
            }
            Command::Edit { identity, html, .. } => Some(match self.target(&path, &identity)? {
                Target::Baseline(anchor) => {
                    let current = self.page(&path)?.log.current_edit(&anchor);
                    match current {
                        Some(id) => self.update_record(&path, id, &html)?,
                        None => self.page_mut(&path)?.log.mark_edited(anchor, &html)?,
                    }
                }
                Target::Record(id) => self.update_record(&path, id, &html)?,
            }),
            Command::UpdateInsert { record_id, html, .. } => {
                Some(self.update_record(&path, record_id, &html)?)
            }
            Command::Reorder { order, .. } => {
                let page = self.page_mut(&path)?;
                let order: Vec<String> = order
                    .into_iter()
                    .filter(|id| page.baseline.iter().any(|b| &b.identity == id))
                    .collect();
                Some(page.log.reorder(order))
            }
            Command::Discard { record_id, .. } => {
                self.page_mut(&path)?.log.discard(record_id)?;
                None
            }
            Command::DiscardPage { .. } => {
                self.page_mut(&path)?.log = EditLog::new();
                None
            }
        };

        let dirty = self.refresh(&path)?;
        debug!(record_id = ?record_id, dirty, "Command applied");

        Ok(CommandOutcome {
            path,
            record_id,
            dirty,
        })
    }

    fn load_baseline(&mut self, path: &str, document: String) -> Result<(), EditorError> {
        let baseline = main_blocks(&document)?;
        self.ledger.snapshot_baseline(path, &baseline);

        // The previous merge result lets records without an anchor find
        // their neighbours in the new baseline
        let (log, previous) = match self.pages.remove(path) {
            Some(page) => {
                let view = merge(&page.baseline, &page.log, MergeOptions::preview());
                (page.log, merged_blocks(&view))
            }
            None => match self.store.get(path) {
                Some(entry) => {
                    if !entry.is_based_on(&document) {
                        info!(path, "Baseline changed since last edit, re-merging stored log");
                    }
                    let previous = main_blocks(&entry.html).unwrap_or_else(|err| {
                        warn!(path, error = %err, "Stored page is unreadable, anchoring against baseline only");
                        Vec::new()
                    });
                    (entry.edit_log.clone(), previous)
                }
                None => (EditLog::new(), Vec::new()),
            },
        };

        let log = resolve_anchors(&baseline, &log, &previous);
        debug!(path, blocks = baseline.len(), records = log.len(), "Loaded baseline");
        self.pages.insert(
            path.to_string(),
            PageState {
                document,
                baseline,
                log,
            },
        );
        Ok(())
    }

    fn target(&self, path: &str, identity: &str) -> Result<Target, EditorError> {
        let page = self.page(path)?;
        if let Some(block) = page.baseline.iter().find(|b| b.identity == identity) {
            return Ok(Target::Baseline(Anchor::of(block)));
        }

        merge(&page.baseline, &page.log, MergeOptions::preview())
            .iter()
            .find(|m| m.block.identity == identity)
            .and_then(|m| m.record_id())
            .map(Target::Record)
            .ok_or_else(|| EditorError::UnknownBlock(identity.to_string()))
    }

    /// Remove (or mark) a visible block. A block that only exists in the
    /// log is discarded; an edited block takes its baseline original along.
    fn remove_block(
        &mut self,
        path: &str,
        identity: &str,
        mark: bool,
    ) -> Result<Option<u64>, EditorError> {
        let anchor = match self.target(path, identity)? {
            Target::Baseline(anchor) => anchor,
            Target::Record(id) => {
                let log = &mut self.page_mut(path)?.log;
                let source = log
                    .get(id)
                    .filter(|r| r.kind == RecordKind::Edited)
                    .and_then(|r| r.anchor.clone());
                log.discard(id)?;
                match source {
                    Some(anchor) => anchor,
                    None => return Ok(None),
                }
            }
        };

        let log = &mut self.page_mut(path)?.log;
        Ok(Some(if mark { log.mark(anchor) } else { log.remove(anchor) }))
    }

    /// Change the html of an insert. A record already submitted stays as it
    /// was sent; a staged revision carries the change instead.
    fn update_record(&mut self, path: &str, id: u64, html: &str) -> Result<u64, EditorError> {
        let page = self.page_mut(path)?;
        let request_id = page
            .log
            .get(id)
            .filter(|r| r.is_pending())
            .and_then(|r| r.request_id.clone());
        let Some(request_id) = request_id else {
            page.log.update(id, html)?;
            return Ok(id);
        };

        // Where the record's block sits in the page the request produces
        let submitted = merge(&page.baseline, &page.log.request_log(&request_id), MergeOptions::commit());
        let landed = submitted
            .iter()
            .find(|m| m.record_id() == Some(id))
            .map(|m| Anchor::by_signature(m.block.signature.clone(), m.block.occurrence))
            .ok_or(EditorError::UnknownRecord(id))?;
        debug!(record_id = id, request_id = %request_id, "Record is pending, revising");
        page.log.revise(id, landed, html)
    }

    /// Normalize, render and persist one page. Returns whether the page is
    /// still dirty.
    fn refresh(&mut self, path: &str) -> Result<bool, EditorError> {
        let page = self
            .pages
            .get_mut(path)
            .ok_or_else(|| EditorError::UnknownPage(path.to_string()))?;
        page.log.normalize(&page.baseline);

        let merged = merge(&page.baseline, &page.log, MergeOptions::commit());
        let rendered = render_document(&page.document, &merged_blocks(&merged))?;
        let unchanged = render_document(&page.document, &page.baseline)?;

        if page.log.is_empty() || rendered.document == unchanged.document {
            if !page.log.is_empty() {
                debug!(path, records = page.log.len(), "Edits no longer change the page, dropping them");
                page.log = EditLog::new();
            }
            if self.store.remove(path).is_some() {
                info!(path, "Page is clean");
            }
            return Ok(false);
        }

        self.store.upsert(
            path,
            DirtyPageEntry::new(rendered.document, &page.document, page.log.clone()),
        );
        Ok(true)
    }

    /// Labelled preview of a loaded page
    pub fn view(&self, path: &str) -> Result<PageView, EditorError> {
        let page = self.page(path)?;
        let merged = merge(&page.baseline, &page.log, MergeOptions::preview());
        let moved = moved_identities(&page.baseline, &effective_order(&page.baseline, &page.log));
        Ok(classify(path, &merged, &page.log, &self.ledger, &moved))
    }

    /// Documents to submit for `paths`, with removals applied
    pub fn commit_documents(&self, paths: &[String]) -> Result<Vec<CommittedPage>, EditorError> {
        paths
            .iter()
            .map(|path| {
                let page = self.page(path)?;
                let merged = merge(&page.baseline, &page.log, MergeOptions::commit());
                let rendered = render_document(&page.document, &merged_blocks(&merged))?;
                Ok(CommittedPage {
                    path: path.clone(),
                    document: rendered.document,
                    report: rendered.report,
                    submitted: merged
                        .into_iter()
                        .filter(|m| !m.is_baseline())
                        .map(|m| m.block)
                        .collect(),
                })
            })
            .collect()
    }

    /// Mark the staged records of `pages` as submitted in `request_id`
    pub fn begin_request(
        &mut self,
        request_id: &str,
        pages: &[CommittedPage],
    ) -> Result<usize, EditorError> {
        let mut staged = 0;
        for page in pages {
            staged += self.page_mut(&page.path)?.log.stage_for_request(request_id);
            self.ledger
                .record_request(request_id, &page.path, &page.submitted);
            self.refresh(&page.path)?;
        }
        info!(request_id, pages = pages.len(), records = staged, "Request submitted");
        Ok(staged)
    }

    /// Apply a request's final state. Returns the affected paths; after a
    /// merge their baselines are stale and should be loaded again.
    pub fn resolve_request(
        &mut self,
        request_id: &str,
        state: RequestState,
    ) -> Result<Vec<String>, EditorError> {
        self.ledger.resolve_request(request_id, state);
        if state == RequestState::Open {
            return Ok(Vec::new());
        }

        let in_request =
            |log: &EditLog| log.records().iter().any(|r| r.request_id.as_deref() == Some(request_id));
        let loaded: Vec<String> = self
            .pages
            .iter()
            .filter(|(_, page)| in_request(&page.log))
            .map(|(path, _)| path.clone())
            .collect();
        let stored: Vec<String> = self
            .store
            .entries()
            .filter(|(path, entry)| !self.pages.contains_key(*path) && in_request(&entry.edit_log))
            .map(|(path, _)| path.to_string())
            .collect();

        let settle = |log: &mut EditLog| match state {
            RequestState::Merged => log.drop_request(request_id),
            _ => log.release_request(request_id),
        };

        for path in &loaded {
            settle(&mut self.page_mut(path)?.log);
            self.refresh(path)?;
        }
        for path in &stored {
            if let Some(mut entry) = self.store.remove(path) {
                settle(&mut entry.edit_log);
                if !entry.edit_log.is_empty() {
                    entry.updated_at = Utc::now();
                    self.store.upsert(path.clone(), entry);
                }
            }
        }

        info!(request_id, state = ?state, pages = loaded.len() + stored.len(), "Request resolved");
        Ok(loaded.into_iter().chain(stored).collect())
    }

    /// Adopt the current baseline as the session snapshot of `path`
    pub fn acknowledge(&mut self, path: &str) -> Result<(), EditorError> {
        let page = self
            .pages
            .get(path)
            .ok_or_else(|| EditorError::UnknownPage(path.to_string()))?;
        self.ledger.acknowledge_baseline(path, &page.baseline);
        Ok(())
    }

    /// Forget session-scoped classification state
    pub fn end_session(&mut self) {
        self.ledger.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;

    fn page(main: &str) -> String {
        format!(
            "<html><body>\n<!-- pagedraft:hero:start --><h1>Hi</h1><!-- pagedraft:hero:end -->\n<!-- pagedraft:main:start -->{}<!-- pagedraft:main:end -->\n</body></html>\n",
            main
        )
    }

    fn loaded(main: &str) -> EditorSession {
        let mut session = EditorSession::new();
        session
            .execute(Command::LoadBaseline {
                path: "index.html".to_string(),
                document: page(main),
            })
            .unwrap();
        session
    }

    fn identities(session: &EditorSession) -> Vec<String> {
        session.baseline("index.html").unwrap().iter().map(|b| b.identity.clone()).collect()
    }

    #[test]
    fn test_load_baseline_is_clean() {
        let session = loaded("<p>a</p><p>b</p>");
        assert!(session.entry("index.html").is_none());
        assert_eq!(session.view("index.html").unwrap().blocks.len(), 2);
    }

    #[test]
    fn test_unknown_page() {
        let mut session = EditorSession::new();
        let err = session
            .execute(Command::DiscardPage {
                path: "nope.html".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, EditorError::UnknownPage("nope.html".to_string()));
    }

    #[test]
    fn test_edit_then_revert_cleans_page() {
        let mut session = loaded("<p>a</p><p>b</p>");
        let ids = identities(&session);

        let outcome = session
            .execute(Command::Edit {
                path: "index.html".to_string(),
                identity: ids[1].clone(),
                html: "<p>B</p>".to_string(),
            })
            .unwrap();
        assert!(outcome.dirty);
        assert!(session.entry("index.html").unwrap().html.contains("<p>B</p>"));

        let outcome = session
            .execute(Command::UpdateInsert {
                path: "index.html".to_string(),
                record_id: outcome.record_id.unwrap(),
                html: "<p>b</p>".to_string(),
            })
            .unwrap();
        assert!(!outcome.dirty);
        assert!(session.log("index.html").unwrap().is_empty());
    }

    #[test]
    fn test_mark_keeps_block_visible_until_commit() {
        let mut session = loaded("<p>a</p><p>b</p>");
        let ids = identities(&session);
        session
            .execute(Command::Mark {
                path: "index.html".to_string(),
                identity: ids[0].clone(),
            })
            .unwrap();

        let view = session.view("index.html").unwrap();
        assert_eq!(view.blocks[0].classification, Classification::Removed);

        let committed = session
            .commit_documents(&["index.html".to_string()])
            .unwrap();
        assert!(!committed[0].document.contains("<p>a</p>"));
        assert!(session.entry("index.html").unwrap().html.contains("<p>b</p>"));
    }

    #[test]
    fn test_removing_new_block_discards_it() {
        let mut session = loaded("<p>a</p>");
        session
            .execute(Command::InsertAt {
                path: "index.html".to_string(),
                index: 1,
                html: "<p>new</p>".to_string(),
            })
            .unwrap();
        let view = session.view("index.html").unwrap();
        let new_identity = view.blocks[1].identity.clone();

        let outcome = session
            .execute(Command::Remove {
                path: "index.html".to_string(),
                identity: new_identity,
            })
            .unwrap();
        assert!(!outcome.dirty);
        assert!(session.log("index.html").unwrap().is_empty());
    }

    #[test]
    fn test_restore_edited_block() {
        let mut session = loaded("<p>a</p><p>b</p>");
        let ids = identities(&session);
        session
            .execute(Command::Edit {
                path: "index.html".to_string(),
                identity: ids[0].clone(),
                html: "<p>A</p>".to_string(),
            })
            .unwrap();
        let outcome = session
            .execute(Command::Restore {
                path: "index.html".to_string(),
                identity: ids[0].clone(),
            })
            .unwrap();
        assert!(!outcome.dirty);
    }

    #[test]
    fn test_unknown_block() {
        let mut session = loaded("<p>a</p>");
        let err = session
            .execute(Command::Mark {
                path: "index.html".to_string(),
                identity: "missing-0".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, EditorError::UnknownBlock("missing-0".to_string()));
    }

    fn edit(session: &mut EditorSession, identity: &str, html: &str) -> CommandOutcome {
        session
            .execute(Command::Edit {
                path: "index.html".to_string(),
                identity: identity.to_string(),
                html: html.to_string(),
            })
            .unwrap()
    }

    fn submit(session: &mut EditorSession, request_id: &str) {
        let pages = session
            .commit_documents(&["index.html".to_string()])
            .unwrap();
        session.begin_request(request_id, &pages).unwrap();
    }

    #[test]
    fn test_editing_submitted_block_keeps_request_intact() {
        let mut session = loaded("<p>a</p><p>b</p>");
        let ids = identities(&session);
        edit(&mut session, &ids[1], "<p>B1</p>");
        submit(&mut session, "1");

        let view = session.view("index.html").unwrap();
        assert_eq!(view.blocks[1].classification, Classification::Pending);
        let submitted = view.blocks[1].identity.clone();

        let outcome = edit(&mut session, &submitted, "<p>B2</p>");
        let revision = outcome.record_id.unwrap();
        assert!(session.log("index.html").unwrap().has_staged());

        // The submitted record still reads as it was sent
        let log = session.log("index.html").unwrap();
        assert!(log.records().iter().any(|r| r.is_pending() && r.html == "<p>B1</p>"));

        let view = session.view("index.html").unwrap();
        assert_eq!(view.blocks.len(), 2);
        assert!(view.blocks[1].html.contains("B2"));
        assert_eq!(view.blocks[1].classification, Classification::Edited);

        // Editing through the baseline identity reaches the same revision
        let again = edit(&mut session, &ids[1], "<p>B3</p>");
        assert_eq!(again.record_id, Some(revision));
        assert_eq!(session.log("index.html").unwrap().len(), 3);

        session.resolve_request("1", RequestState::Merged).unwrap();
        session
            .execute(Command::LoadBaseline {
                path: "index.html".to_string(),
                document: page("<p>a</p><p>B1</p>"),
            })
            .unwrap();

        let view = session.view("index.html").unwrap();
        let html: Vec<&str> = view.blocks.iter().map(|b| b.html.as_str()).collect();
        assert_eq!(html.len(), 2);
        assert!(html[0].contains(">a<"));
        assert!(html[1].contains("B3"));
        assert_eq!(view.blocks[1].classification, Classification::Edited);

        let log = session.log("index.html").unwrap();
        assert!(log.has_staged());
        assert!(log.records().iter().all(|r| !r.is_pending()));

        let committed = session
            .commit_documents(&["index.html".to_string()])
            .unwrap();
        assert!(committed[0].document.contains("<p>B3</p>"));
        assert!(!committed[0].document.contains("<p>B1</p>"));
    }

    #[test]
    fn test_revision_back_to_submitted_content_is_dropped() {
        let mut session = loaded("<p>a</p>");
        session
            .execute(Command::InsertAt {
                path: "index.html".to_string(),
                index: 1,
                html: "<p>new</p>".to_string(),
            })
            .unwrap();
        submit(&mut session, "1");
        let submitted = session.view("index.html").unwrap().blocks[1].identity.clone();

        let outcome = edit(&mut session, &submitted, "<p>newer</p>");
        session
            .execute(Command::UpdateInsert {
                path: "index.html".to_string(),
                record_id: outcome.record_id.unwrap(),
                html: "<p>new</p>".to_string(),
            })
            .unwrap();

        let log = session.log("index.html").unwrap();
        assert_eq!(log.len(), 1);
        assert!(!log.has_staged());
    }

    #[test]
    fn test_insert_at_into_empty_main_region() {
        let mut session = loaded("");
        let insert_at = |session: &mut EditorSession, index: usize, html: &str| {
            session
                .execute(Command::InsertAt {
                    path: "index.html".to_string(),
                    index,
                    html: html.to_string(),
                })
                .unwrap();
        };
        insert_at(&mut session, 0, "<p>a</p>");
        insert_at(&mut session, 0, "<p>b</p>");
        insert_at(&mut session, 1, "<p>c</p>");

        let view = session.view("index.html").unwrap();
        let html: Vec<&str> = view.blocks.iter().map(|b| b.html.as_str()).collect();
        assert_eq!(html.len(), 3);
        assert!(html[0].contains(">b<"));
        assert!(html[1].contains(">c<"));
        assert!(html[2].contains(">a<"));
    }

    #[test]
    fn test_command_json_shape() {
        let command = Command::Remove {
            path: "index.html".to_string(),
            identity: "abc-0".to_string(),
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], "remove");
        assert_eq!(json["identity"], "abc-0");
        assert_eq!(serde_json::from_value::<Command>(json).unwrap(), command);
    }
}
