//! # Dirty-Page Store
//!
//! One entry per page with unsubmitted or unmerged edits. Entries are
//! replaced whole; there is no partial update.

use crate::edit_log::EditLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// SHA-256 hex of canonical html
pub fn content_hash(html: &str) -> String {
    hex::encode(Sha256::digest(html.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirtyPageEntry {
    /// Merged canonical document
    pub html: String,
    pub base_hash: String,
    pub dirty_hash: String,
    pub edit_log: EditLog,
    pub updated_at: DateTime<Utc>,
}

impl DirtyPageEntry {
    pub fn new(html: String, baseline_html: &str, edit_log: EditLog) -> Self {
        Self {
            dirty_hash: content_hash(&html),
            base_hash: content_hash(baseline_html),
            html,
            edit_log,
            updated_at: Utc::now(),
        }
    }

    /// Whether this entry was made against `baseline_html`
    pub fn is_based_on(&self, baseline_html: &str) -> bool {
        self.base_hash == content_hash(baseline_html)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirtyPageStore {
    entries: BTreeMap<String, DirtyPageEntry>,
}

impl DirtyPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole entry for `path`
    pub fn upsert(&mut self, path: impl Into<String>, entry: DirtyPageEntry) {
        self.entries.insert(path.into(), entry);
    }

    pub fn remove(&mut self, path: &str) -> Option<DirtyPageEntry> {
        self.entries.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&DirtyPageEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &DirtyPageEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
