//! # Session Ledger
//!
//! Remembers, for the lifetime of one editing session, what the baselines
//! looked like when the session started and which blocks went into each
//! submitted request. Only classification reads it; merge never does.

use crate::block::Block;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub identity: String,
    pub signature: String,
    pub position: usize,
}

impl SnapshotEntry {
    pub fn of(blocks: &[Block]) -> Vec<SnapshotEntry> {
        blocks
            .iter()
            .enumerate()
            .map(|(position, b)| SnapshotEntry {
                identity: b.identity.clone(),
                signature: b.signature.clone(),
                position,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestState {
    Open,
    Merged,
    Closed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLedger {
    baseline_snapshots: BTreeMap<String, Vec<SnapshotEntry>>,
    committed_by_request: BTreeMap<String, BTreeMap<String, Vec<SnapshotEntry>>>,
    request_states: BTreeMap<String, RequestState>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the first baseline seen for `path` this session
    pub fn snapshot_baseline(&mut self, path: &str, blocks: &[Block]) -> bool {
        if self.baseline_snapshots.contains_key(path) {
            return false;
        }
        self.baseline_snapshots
            .insert(path.to_string(), SnapshotEntry::of(blocks));
        true
    }

    pub fn baseline_snapshot(&self, path: &str) -> Option<&[SnapshotEntry]> {
        self.baseline_snapshots.get(path).map(Vec::as_slice)
    }

    /// Record the blocks of `path` included in request `request_id`
    pub fn record_request(&mut self, request_id: &str, path: &str, blocks: &[Block]) {
        self.committed_by_request
            .entry(request_id.to_string())
            .or_default()
            .insert(path.to_string(), SnapshotEntry::of(blocks));
        self.request_states
            .entry(request_id.to_string())
            .or_insert(RequestState::Open);
    }

    pub fn resolve_request(&mut self, request_id: &str, state: RequestState) {
        self.request_states.insert(request_id.to_string(), state);
    }

    pub fn request_state(&self, request_id: &str) -> Option<RequestState> {
        self.request_states.get(request_id).copied()
    }

    /// Ids of requests not yet merged or closed
    pub fn open_requests(&self) -> Vec<&str> {
        self.request_states
            .iter()
            .filter(|(_, state)| **state == RequestState::Open)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Paths touched by a request
    pub fn request_paths(&self, request_id: &str) -> Vec<&str> {
        self.committed_by_request
            .get(request_id)
            .map(|paths| paths.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn committed_in<'a>(
        &'a self,
        path: &'a str,
        state: RequestState,
    ) -> impl Iterator<Item = &'a SnapshotEntry> + 'a {
        self.committed_by_request
            .iter()
            .filter(move |(id, _)| self.request_state(id) == Some(state))
            .filter_map(move |(_, paths)| paths.get(path))
            .flatten()
    }

    /// Block of `path` submitted, with this content, in a still-open request
    pub fn is_pending(&self, path: &str, block: &Block) -> bool {
        self.committed_in(path, RequestState::Open)
            .any(|e| e.identity == block.identity && e.signature == block.signature)
    }

    /// Baseline block that arrived through a merged request of this session
    pub fn is_committed(&self, path: &str, block: &Block) -> bool {
        let known = self
            .baseline_snapshot(path)
            .is_some_and(|snapshot| snapshot.iter().any(|e| e.identity == block.identity));
        !known
            && self
                .committed_in(path, RequestState::Merged)
                .any(|e| e.signature == block.signature)
    }

    /// Adopt the current baseline of `path`; committed labels revert to
    /// baseline
    pub fn acknowledge_baseline(&mut self, path: &str, blocks: &[Block]) {
        self.baseline_snapshots
            .insert(path.to_string(), SnapshotEntry::of(blocks));
        for paths in self.committed_by_request.values_mut() {
            paths.remove(path);
        }
        self.committed_by_request.retain(|_, paths| !paths.is_empty());
    }

    pub fn clear(&mut self) {
        self.baseline_snapshots.clear();
        self.committed_by_request.clear();
        self.request_states.clear();
    }
}
