//! # Edit Log
//!
//! Ordered local changes to one page, anchored to baseline blocks.
//!
//! ## Record Semantics
//!
//! ### Insert
//! - Carries canonical block html and an anchor + placement
//! - `position` is only a hint for records whose anchor is not known yet
//! - `kind = Edited` when the insert replaces a baseline block
//!
//! ### Remove / Mark
//! - Target a baseline block, html is empty
//! - Remove is always applied; Mark only when removals are respected (commit)
//! - Idempotent: recording the same target twice keeps one record
//!
//! ### Reorder
//! - Explicit target ordering of baseline identities
//! - A new reorder supersedes the previous one
//!
//! An in-place edit is a Remove + Insert pair sharing a `source_key`; the
//! pair is created, updated and discarded as one unit.
//!
//! ### Pending records
//! Records submitted in a request are frozen until it resolves. Changing
//! one adds a staged revision that hides it in merges; when the request
//! merges, the revision becomes an edit of the block that landed.

use crate::anchor::{Anchor, InsertionPoint, Placement};
use crate::block::Block;
use crate::identity::fresh_identity;
use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    New,
    Edited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Local only
    #[default]
    Staged,
    /// Part of a submitted, still unresolved request
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EditAction {
    Insert,
    Remove,
    Mark,
    Reorder { order: Vec<String> },
}

/// Link from a staged record to the pending insert it replaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub record_id: u64,
    /// The revised block as it reads once its request merges
    pub landed: Anchor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    /// Log-local id, never reused
    pub id: u64,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub anchor: Option<Anchor>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub kind: RecordKind,
    pub action: EditAction,
    /// Identity of the baseline block an edited insert replaces
    #[serde(default)]
    pub base_id: Option<String>,
    /// Shared by both halves of an edit pair
    #[serde(default)]
    pub source_key: Option<String>,
    /// Identity of the inserted block
    #[serde(default)]
    pub block_id: String,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub revises: Option<Revision>,
}

impl EditRecord {
    fn new(id: u64, action: EditAction) -> Self {
        Self {
            id,
            html: String::new(),
            anchor: None,
            placement: Placement::After,
            position: None,
            kind: RecordKind::New,
            action,
            base_id: None,
            source_key: None,
            block_id: String::new(),
            status: RecordStatus::Staged,
            request_id: None,
            revises: None,
        }
    }

    pub fn is_insert(&self) -> bool {
        self.action == EditAction::Insert
    }

    pub fn is_removal(&self) -> bool {
        matches!(self.action, EditAction::Remove | EditAction::Mark)
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }

    fn targets(&self, anchor: &Anchor) -> bool {
        self.anchor.as_ref().is_some_and(|a| a.same_target(anchor))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLog {
    next_id: u64,
    records: Vec<EditRecord>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut EditRecord> {
        self.records.iter_mut()
    }

    pub fn get(&self, id: u64) -> Option<&EditRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn inserts(&self) -> impl Iterator<Item = &EditRecord> {
        self.records.iter().filter(|r| r.is_insert())
    }

    /// Ids of records hidden behind a revision
    pub fn revised(&self) -> HashSet<u64> {
        self.records
            .iter()
            .filter_map(|r| r.revises.as_ref().map(|v| v.record_id))
            .collect()
    }

    /// Inserts that show up in a merge
    pub fn live_inserts(&self) -> Vec<&EditRecord> {
        let revised = self.revised();
        self.inserts().filter(|r| !revised.contains(&r.id)).collect()
    }

    /// The edited insert currently replacing the block at `anchor`
    pub fn current_edit(&self, anchor: &Anchor) -> Option<u64> {
        self.live_inserts()
            .into_iter()
            .find(|r| r.kind == RecordKind::Edited && r.targets(anchor))
            .map(|r| r.id)
    }

    /// The records submitted in `request_id`, as a log of their own
    pub fn request_log(&self, request_id: &str) -> EditLog {
        EditLog {
            next_id: self.next_id,
            records: self
                .records
                .iter()
                .filter(|r| r.request_id.as_deref() == Some(request_id))
                .cloned()
                .collect(),
        }
    }

    /// Target order of the authoritative reorder record
    pub fn ordering(&self) -> Option<&[String]> {
        self.records.iter().rev().find_map(|r| match &r.action {
            EditAction::Reorder { order } => Some(order.as_slice()),
            _ => None,
        })
    }

    pub fn has_staged(&self) -> bool {
        self.records.iter().any(|r| r.status == RecordStatus::Staged)
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert_record(&mut self, html: &str) -> Result<EditRecord, EditorError> {
        let block = Block::from_html(html)?;
        let id = self.allocate();
        let mut record = EditRecord::new(id, EditAction::Insert);
        record.block_id = fresh_identity(&block.signature, id);
        record.html = block.html;
        Ok(record)
    }

    /// Insert a new block next to a baseline block
    pub fn insert(
        &mut self,
        anchor: Anchor,
        placement: Placement,
        html: &str,
    ) -> Result<u64, EditorError> {
        let mut record = self.insert_record(html)?;
        record.anchor = Some(anchor);
        record.placement = placement;
        let id = record.id;
        self.records.push(record);
        Ok(id)
    }

    /// Insert at a resolved insertion point, keeping log adjacency
    pub fn insert_at(&mut self, point: InsertionPoint, html: &str) -> Result<u64, EditorError> {
        let mut record = self.insert_record(html)?;
        record.anchor = point.anchor;
        record.placement = point.placement;
        record.position = point.position;
        let id = record.id;
        let slot = point.log_index.min(self.records.len());
        self.records.insert(slot, record);
        Ok(id)
    }

    /// Insert by raw index only; anchored later by [`crate::resolve_anchors`]
    pub fn insert_at_position(&mut self, index: usize, html: &str) -> Result<u64, EditorError> {
        let mut record = self.insert_record(html)?;
        record.position = Some(index);
        let id = record.id;
        self.records.push(record);
        Ok(id)
    }

    fn removal(&mut self, anchor: Anchor, action: EditAction) -> u64 {
        if let Some(existing) = self
            .records
            .iter()
            .find(|r| r.action == action && r.source_key.is_none() && r.targets(&anchor))
        {
            return existing.id;
        }

        let id = self.allocate();
        let mut record = EditRecord::new(id, action);
        record.anchor = Some(anchor);
        self.records.push(record);
        id
    }

    /// Remove a baseline block
    pub fn remove(&mut self, anchor: Anchor) -> u64 {
        self.removal(anchor, EditAction::Remove)
    }

    /// Mark a baseline block for deletion at commit time
    pub fn mark(&mut self, anchor: Anchor) -> u64 {
        self.removal(anchor, EditAction::Mark)
    }

    /// Undo Remove/Mark records targeting `anchor`
    pub fn restore(&mut self, anchor: &Anchor) -> bool {
        let before = self.records.len();
        self.records
            .retain(|r| !(r.is_removal() && r.source_key.is_none() && r.targets(anchor)));
        before != self.records.len()
    }

    /// Replace a baseline block with new content.
    ///
    /// Re-editing the same block updates the existing pair.
    pub fn mark_edited(&mut self, anchor: Anchor, html: &str) -> Result<u64, EditorError> {
        let key = anchor.key();
        if let Some(existing) = self.current_edit(&anchor) {
            self.update(existing, html)?;
            return Ok(existing);
        }

        let mut insert = self.insert_record(html)?;
        let remove_id = self.allocate();
        let mut remove = EditRecord::new(remove_id, EditAction::Remove);
        remove.anchor = Some(anchor.clone());
        remove.source_key = Some(key.clone());

        insert.kind = RecordKind::Edited;
        insert.base_id = anchor.identity.clone();
        insert.anchor = Some(anchor);
        insert.placement = Placement::After;
        insert.source_key = Some(key);

        let id = insert.id;
        self.records.push(remove);
        self.records.push(insert);
        Ok(id)
    }

    /// Drop the staged edit of a baseline block. Submitted pairs stay.
    pub fn discard_edit(&mut self, anchor: &Anchor) -> bool {
        let keys: HashSet<String> = self
            .records
            .iter()
            .filter(|r| !r.is_pending() && r.targets(anchor))
            .filter_map(|r| r.source_key.clone())
            .collect();
        let before = self.records.len();
        self.records.retain(|r| {
            let paired = r.source_key.as_ref().is_some_and(|k| keys.contains(k));
            let revision = r.revises.is_some() && !r.is_pending() && r.targets(anchor);
            !paired && !revision
        });
        before != self.records.len()
    }

    /// Replace the html of a staged insert record
    pub fn update(&mut self, id: u64, html: &str) -> Result<(), EditorError> {
        let block = Block::from_html(html)?;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id && r.is_insert())
            .ok_or(EditorError::UnknownRecord(id))?;
        if record.is_pending() {
            return Err(EditorError::RecordPending(id));
        }
        record.html = block.html;
        Ok(())
    }

    /// Supersede the pending insert `id` with new content.
    ///
    /// `landed` locates the pending block in the page its request
    /// produces. Revising twice updates the same revision.
    pub fn revise(&mut self, id: u64, landed: Anchor, html: &str) -> Result<u64, EditorError> {
        if let Some(existing) = self
            .records
            .iter()
            .find(|r| r.revises.as_ref().is_some_and(|v| v.record_id == id))
            .map(|r| r.id)
        {
            self.update(existing, html)?;
            return Ok(existing);
        }

        let slot = self
            .records
            .iter()
            .position(|r| r.id == id && r.is_insert())
            .ok_or(EditorError::UnknownRecord(id))?;
        let pending = self.records[slot].clone();

        let mut record = self.insert_record(html)?;
        record.anchor = pending.anchor;
        record.placement = pending.placement;
        record.position = pending.position;
        record.kind = pending.kind;
        record.base_id = pending.base_id;
        record.revises = Some(Revision {
            record_id: id,
            landed,
        });

        let revision = record.id;
        self.records.insert(slot + 1, record);
        debug!(record_id = id, revision, "Revised pending record");
        Ok(revision)
    }

    /// Record a new baseline ordering, superseding any earlier one
    pub fn reorder(&mut self, order: Vec<String>) -> u64 {
        self.records
            .retain(|r| !matches!(r.action, EditAction::Reorder { .. }));
        let id = self.allocate();
        self.records
            .push(EditRecord::new(id, EditAction::Reorder { order }));
        id
    }

    /// Drop a record; both halves of an edit pair go together
    pub fn discard(&mut self, id: u64) -> Result<(), EditorError> {
        let record = self.get(id).ok_or(EditorError::UnknownRecord(id))?;
        match record.source_key.clone() {
            Some(key) => self
                .records
                .retain(|r| r.source_key.as_deref() != Some(key.as_str())),
            None => self.records.retain(|r| r.id != id),
        }
        Ok(())
    }

    /// Drop records that no longer change anything against `baseline`:
    /// edit pairs whose content is back to the baseline block, and a
    /// reorder that matches the baseline order. Returns how many records
    /// were dropped.
    pub fn normalize(&mut self, baseline: &[Block]) -> usize {
        // Revisions repeating the content they revise
        let repeated: HashSet<u64> = self
            .records
            .iter()
            .filter(|r| {
                r.revises
                    .as_ref()
                    .and_then(|v| self.get(v.record_id))
                    .is_some_and(|revised| revised.html == r.html)
            })
            .map(|r| r.id)
            .collect();

        let reverted: HashSet<String> = self
            .records
            .iter()
            .filter(|r| r.is_insert() && r.kind == RecordKind::Edited)
            .filter(|r| {
                let source = r.anchor.as_ref().and_then(|a| a.locate(baseline));
                source.is_some_and(|index| baseline[index].html == r.html)
            })
            .filter_map(|r| r.source_key.clone())
            .collect();

        let identity_order: Vec<&str> = baseline.iter().map(|b| b.identity.as_str()).collect();
        let before = self.records.len();
        self.records.retain(|r| {
            if repeated.contains(&r.id) {
                return false;
            }
            if let Some(key) = &r.source_key {
                if reverted.contains(key) {
                    return false;
                }
            }
            match &r.action {
                EditAction::Reorder { order } => {
                    !order.iter().map(String::as_str).eq(identity_order.iter().copied())
                }
                _ => true,
            }
        });

        let dropped = before - self.records.len();
        if dropped > 0 {
            debug!(dropped, "Normalized edit log");
        }
        dropped
    }

    /// Mark every staged record as part of request `request_id`
    pub fn stage_for_request(&mut self, request_id: &str) -> usize {
        let mut count = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.status == RecordStatus::Staged)
        {
            record.status = RecordStatus::Pending;
            record.request_id = Some(request_id.to_string());
            count += 1;
        }
        count
    }

    /// Request closed without merging: its records become staged again
    pub fn release_request(&mut self, request_id: &str) -> usize {
        let mut count = 0;
        for record in self
            .records
            .iter_mut()
            .filter(|r| r.request_id.as_deref() == Some(request_id))
        {
            record.status = RecordStatus::Staged;
            record.request_id = None;
            count += 1;
        }
        count
    }

    /// Request merged: its records are part of the baseline now.
    ///
    /// Revisions of its inserts turn into edits of the landed blocks.
    pub fn drop_request(&mut self, request_id: &str) -> usize {
        let merged: HashSet<u64> = self
            .records
            .iter()
            .filter(|r| r.request_id.as_deref() == Some(request_id))
            .map(|r| r.id)
            .collect();
        self.records.retain(|r| !merged.contains(&r.id));

        let rebased: Vec<u64> = self
            .records
            .iter()
            .filter(|r| r.revises.as_ref().is_some_and(|v| merged.contains(&v.record_id)))
            .map(|r| r.id)
            .collect();
        for id in rebased {
            self.rebase_revision(id);
        }
        merged.len()
    }

    fn rebase_revision(&mut self, id: u64) {
        let remove_id = self.allocate();
        let Some(slot) = self.index_of(id) else {
            return;
        };
        let record = &mut self.records[slot];
        let Some(revision) = record.revises.take() else {
            return;
        };

        let key = revision.landed.key();
        record.anchor = Some(revision.landed.clone());
        record.placement = Placement::After;
        record.position = None;
        record.kind = RecordKind::Edited;
        record.base_id = revision.landed.identity.clone();
        record.source_key = Some(key.clone());

        let mut remove = EditRecord::new(remove_id, EditAction::Remove);
        remove.anchor = Some(revision.landed);
        remove.source_key = Some(key);
        remove.status = record.status;
        remove.request_id = record.request_id.clone();
        self.records.insert(slot, remove);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_blocks;

    fn baseline() -> Vec<Block> {
        parse_blocks("<h2>Title</h2><p>One</p><p>Two</p>").unwrap()
    }

    #[test]
    fn test_insert_stores_canonical_html() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let id = log
            .insert(Anchor::of(&blocks[0]), Placement::After, "<p  class='x'>New</p>")
            .unwrap();

        let record = log.get(id).unwrap();
        assert_eq!(record.html, r#"<p class="x">New</p>"#);
        assert!(record.block_id.ends_with(&format!("-n{}", id)));
        assert_eq!(record.kind, RecordKind::New);
    }

    #[test]
    fn test_insert_rejects_multiple_blocks() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let err = log
            .insert(Anchor::of(&blocks[0]), Placement::After, "<p>a</p><p>b</p>")
            .unwrap_err();
        assert_eq!(err, EditorError::NotASingleBlock(2));
        assert!(log.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let first = log.remove(Anchor::of(&blocks[1]));
        let second = log.remove(Anchor::of(&blocks[1]));
        assert_eq!(first, second);
        assert_eq!(log.len(), 1);

        assert!(log.restore(&Anchor::of(&blocks[1])));
        assert!(log.is_empty());
        assert!(!log.restore(&Anchor::of(&blocks[1])));
    }

    #[test]
    fn test_mark_and_remove_are_distinct() {
        let blocks = baseline();
        let mut log = EditLog::new();
        log.remove(Anchor::of(&blocks[1]));
        log.mark(Anchor::of(&blocks[1]));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_mark_edited_creates_pair() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let id = log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();

        assert_eq!(log.len(), 2);
        let insert = log.get(id).unwrap();
        assert_eq!(insert.kind, RecordKind::Edited);
        assert_eq!(insert.base_id.as_deref(), Some(blocks[1].identity.as_str()));
        let remove = &log.records()[0];
        assert_eq!(remove.action, EditAction::Remove);
        assert_eq!(remove.source_key, insert.source_key);
    }

    #[test]
    fn test_re_editing_updates_the_pair() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let first = log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();
        let second = log.mark_edited(Anchor::of(&blocks[1]), "<p>One?</p>").unwrap();

        assert_eq!(first, second);
        assert_eq!(log.len(), 2);
        assert_eq!(log.get(first).unwrap().html, "<p>One?</p>");
    }

    #[test]
    fn test_discarding_half_a_pair_discards_both() {
        let blocks = baseline();
        let mut log = EditLog::new();
        log.remove(Anchor::of(&blocks[0]));
        let id = log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();

        log.discard(id).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].action, EditAction::Remove);
        assert_eq!(log.discard(id), Err(EditorError::UnknownRecord(id)));
    }

    #[test]
    fn test_discard_edit_by_anchor() {
        let blocks = baseline();
        let mut log = EditLog::new();
        log.mark_edited(Anchor::of(&blocks[2]), "<p>Two!</p>").unwrap();
        assert!(log.discard_edit(&Anchor::of(&blocks[2])));
        assert!(log.is_empty());
    }

    #[test]
    fn test_restore_leaves_edit_pairs_alone() {
        let blocks = baseline();
        let mut log = EditLog::new();
        log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();
        assert!(!log.restore(&Anchor::of(&blocks[1])));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_reorder_supersedes_previous() {
        let blocks = baseline();
        let ids: Vec<String> = blocks.iter().map(|b| b.identity.clone()).collect();
        let mut log = EditLog::new();
        log.reorder(vec![ids[1].clone(), ids[0].clone(), ids[2].clone()]);
        log.reorder(vec![ids[2].clone(), ids[0].clone(), ids[1].clone()]);

        assert_eq!(log.len(), 1);
        assert_eq!(log.ordering().unwrap()[0], ids[2]);
    }

    #[test]
    fn test_normalize_drops_reverted_edit() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let id = log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();
        assert_eq!(log.normalize(&blocks), 0);

        log.update(id, "<p>One</p>").unwrap();
        assert_eq!(log.normalize(&blocks), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_normalize_drops_identity_reorder() {
        let blocks = baseline();
        let mut log = EditLog::new();
        log.reorder(blocks.iter().map(|b| b.identity.clone()).collect());
        assert_eq!(log.normalize(&blocks), 1);
    }

    #[test]
    fn test_update_unknown_record() {
        let mut log = EditLog::new();
        assert_eq!(log.update(9, "<p>x</p>"), Err(EditorError::UnknownRecord(9)));
    }

    #[test]
    fn test_request_lifecycle() {
        let blocks = baseline();
        let mut log = EditLog::new();
        log.remove(Anchor::of(&blocks[0]));
        assert_eq!(log.stage_for_request("17"), 1);
        assert!(!log.has_staged());

        log.insert(Anchor::of(&blocks[2]), Placement::After, "<p>Three</p>")
            .unwrap();
        assert!(log.has_staged());

        assert_eq!(log.release_request("17"), 1);
        assert!(log.records().iter().all(|r| !r.is_pending()));

        log.stage_for_request("18");
        assert_eq!(log.drop_request("18"), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_pending_records_are_frozen() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let id = log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();
        log.stage_for_request("3");

        assert_eq!(log.update(id, "<p>One?</p>"), Err(EditorError::RecordPending(id)));
        assert_eq!(
            log.mark_edited(Anchor::of(&blocks[1]), "<p>One?</p>"),
            Err(EditorError::RecordPending(id))
        );
        assert_eq!(log.get(id).unwrap().html, "<p>One!</p>");

        // Staged-only discard leaves the submitted pair alone
        assert!(!log.discard_edit(&Anchor::of(&blocks[1])));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_revision_rebases_when_request_merges() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let id = log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();
        log.stage_for_request("3");

        let landed = Anchor::by_signature(crate::signature::signature("<p>One!</p>"), 0);
        let revision = log.revise(id, landed.clone(), "<p>One?</p>").unwrap();
        assert_eq!(log.revise(id, landed.clone(), "<p>One?!</p>").unwrap(), revision);
        assert!(log.has_staged());
        assert_eq!(log.current_edit(&Anchor::of(&blocks[1])), Some(revision));
        assert!(log.revised().contains(&id));
        assert_eq!(log.live_inserts().len(), 1);

        assert_eq!(log.drop_request("3"), 2);
        assert_eq!(log.len(), 2);
        let remove = &log.records()[0];
        let insert = &log.records()[1];
        assert_eq!(remove.action, EditAction::Remove);
        assert_eq!(remove.anchor.as_ref(), Some(&landed));
        assert_eq!(insert.id, revision);
        assert_eq!(insert.html, "<p>One?!</p>");
        assert_eq!(insert.anchor.as_ref(), Some(&landed));
        assert_eq!(insert.revises, None);
        assert_eq!(remove.source_key, insert.source_key);
        assert!(log.has_staged());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let blocks = baseline();
        let mut log = EditLog::new();
        let a = log.remove(Anchor::of(&blocks[0]));
        log.discard(a).unwrap();
        let b = log.remove(Anchor::of(&blocks[0]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_storage_schema() {
        let blocks = baseline();
        let mut log = EditLog::new();
        log.mark_edited(Anchor::of(&blocks[1]), "<p>One!</p>").unwrap();

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["nextId"], 2);
        assert_eq!(json["records"][0]["action"]["type"], "remove");
        assert_eq!(json["records"][1]["kind"], "edited");
        assert_eq!(json["records"][1]["placement"], "after");
        assert_eq!(json["records"][1]["status"], "staged");

        let back: EditLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }
}
