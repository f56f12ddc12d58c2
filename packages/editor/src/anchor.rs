//! # Anchor Resolver
//!
//! On-screen insertion points are transient offsets that stop meaning
//! anything as soon as the baseline moves. They are converted into anchors
//! exactly once, at the moment the edit is made: a reference to a baseline
//! block (by identity, or by signature and occurrence when the identity is
//! not known yet) plus a before/after placement.

use crate::block::Block;
use crate::edit_log::{EditLog, EditRecord};
use crate::merge::{MergedBlock, Origin};
use crate::signature::signature;
use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Durable reference to a baseline block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub identity: Option<String>,
    pub signature: String,
    pub occurrence: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    #[default]
    After,
}

impl Anchor {
    /// Anchor to a block of an identity-assigned sequence
    pub fn of(block: &Block) -> Self {
        Self {
            identity: (!block.identity.is_empty()).then(|| block.identity.clone()),
            signature: block.signature.clone(),
            occurrence: block.occurrence,
        }
    }

    /// Signature-only anchor, identity to be back-filled later
    pub fn by_signature(signature: impl Into<String>, occurrence: usize) -> Self {
        Self {
            identity: None,
            signature: signature.into(),
            occurrence,
        }
    }

    /// Index of the referenced block: identity first, then
    /// signature + occurrence
    pub fn locate(&self, blocks: &[Block]) -> Option<usize> {
        if let Some(identity) = &self.identity {
            if let Some(index) = blocks.iter().position(|b| &b.identity == identity) {
                return Some(index);
            }
        }
        blocks
            .iter()
            .position(|b| b.signature == self.signature && b.occurrence == self.occurrence)
    }

    /// Stable key naming the referenced block
    pub fn key(&self) -> String {
        match &self.identity {
            Some(identity) => identity.clone(),
            None => format!("{}#{}", self.signature, self.occurrence),
        }
    }

    /// Same target, comparing identities when both sides carry one
    pub fn same_target(&self, other: &Anchor) -> bool {
        match (&self.identity, &other.identity) {
            (Some(a), Some(b)) => a == b,
            _ => self.signature == other.signature && self.occurrence == other.occurrence,
        }
    }
}

/// Where a new record goes: its anchoring plus the log slot that keeps it
/// next to its on-screen neighbours
#[derive(Debug, Clone, PartialEq)]
pub struct InsertionPoint {
    pub anchor: Option<Anchor>,
    pub placement: Placement,
    pub position: Option<usize>,
    /// Index in the edit log at which the record is inserted
    pub log_index: usize,
}

/// Convert an on-screen insertion index (the new block will sit before the
/// block currently at `index`) into an anchored insertion point.
///
/// Records sharing an anchor and placement are emitted contiguously in log
/// order, so copying a neighbouring record's anchoring and slotting the new
/// record next to it in the log reproduces the on-screen position exactly.
pub fn insertion_point(
    view: &[MergedBlock],
    baseline: &[Block],
    log: &EditLog,
    index: usize,
) -> Result<InsertionPoint, EditorError> {
    if index > view.len() {
        return Err(EditorError::IndexOutOfRange {
            index,
            len: view.len(),
        });
    }

    // Next block is a placed record: go right before it
    if let Some(next) = view.get(index) {
        if let Some(point) = adjacent_to_record(next, log, 0) {
            return Ok(point);
        }
    }

    // Previous block is a placed record: go right after it
    if index > 0 {
        if let Some(point) = adjacent_to_record(&view[index - 1], log, 1) {
            return Ok(point);
        }
    }

    // Otherwise anchor to the nearest baseline neighbour
    let following = view[index..]
        .iter()
        .find_map(|m| baseline_block(m, baseline));
    if let Some(block) = following {
        return Ok(InsertionPoint {
            anchor: Some(Anchor::of(block)),
            placement: Placement::Before,
            position: None,
            log_index: log.len(),
        });
    }

    let preceding = view[..index]
        .iter()
        .rev()
        .find_map(|m| baseline_block(m, baseline));
    if let Some(block) = preceding {
        return Ok(InsertionPoint {
            anchor: Some(Anchor::of(block)),
            placement: Placement::After,
            position: None,
            log_index: log.len(),
        });
    }

    // No baseline at all: raw position is all there is
    Ok(InsertionPoint {
        anchor: None,
        placement: Placement::After,
        position: Some(index),
        log_index: log.len(),
    })
}

fn adjacent_to_record(neighbour: &MergedBlock, log: &EditLog, offset: usize) -> Option<InsertionPoint> {
    let Origin::Inserted { record_id, .. } = neighbour.origin else {
        return None;
    };
    let slot = log.index_of(record_id)?;
    let record = &log.records()[slot];
    // A record placed by position only shares its neighbour's position
    let position = match record.anchor {
        Some(_) => None,
        None => Some(record.position?),
    };

    Some(InsertionPoint {
        anchor: record.anchor.clone(),
        placement: record.placement,
        position,
        log_index: slot + offset,
    })
}

fn baseline_block<'a>(merged: &MergedBlock, baseline: &'a [Block]) -> Option<&'a Block> {
    match merged.origin {
        Origin::Baseline { .. } => baseline.iter().find(|b| b.identity == merged.block.identity),
        Origin::Inserted { .. } => None,
    }
}

/// Give every insert record a durable anchor.
///
/// Records without an anchor are located by signature among the blocks of
/// `merged` that do not come from the baseline and anchored to their
/// nearest baseline neighbour. Signature-only anchors get their identity
/// back-filled from `baseline`.
pub fn resolve_anchors(baseline: &[Block], log: &EditLog, merged: &[Block]) -> EditLog {
    let mut resolved = log.clone();
    let mut claimed: HashSet<usize> = HashSet::new();

    for record in resolved.records_mut() {
        if !record.is_insert() {
            continue;
        }

        if let Some(anchor) = record.anchor.as_mut() {
            if anchor.identity.is_none() {
                backfill_identity(anchor, baseline);
            }
            continue;
        }

        if let Some((anchor, placement, position)) =
            anchor_from_merged(record, baseline, merged, &mut claimed)
        {
            record.anchor = anchor;
            record.placement = placement;
            record.position = position;
        }
    }

    resolved
}

fn backfill_identity(anchor: &mut Anchor, baseline: &[Block]) {
    if let Some(block) = baseline
        .iter()
        .find(|b| b.signature == anchor.signature && b.occurrence == anchor.occurrence)
    {
        anchor.identity = Some(block.identity.clone());
    }
}

type Resolution = (Option<Anchor>, Placement, Option<usize>);

fn anchor_from_merged(
    record: &EditRecord,
    baseline: &[Block],
    merged: &[Block],
    claimed: &mut HashSet<usize>,
) -> Option<Resolution> {
    // A merged block is attributable to the baseline when both its identity
    // and its content match a baseline block
    let baseline_anchor = |block: &Block| {
        baseline
            .iter()
            .find(|b| b.identity == block.identity && b.signature == block.signature)
            .map(Anchor::of)
    };

    let wanted = signature(&record.html);
    let index = (0..merged.len()).find(|&i| {
        !claimed.contains(&i)
            && merged[i].signature == wanted
            && baseline_anchor(&merged[i]).is_none()
    })?;
    claimed.insert(index);

    if let Some(anchor) = merged[..index].iter().rev().find_map(&baseline_anchor) {
        return Some((Some(anchor), Placement::After, None));
    }
    if let Some(anchor) = merged[index + 1..].iter().find_map(&baseline_anchor) {
        return Some((Some(anchor), Placement::Before, None));
    }

    Some((None, Placement::After, Some(index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_blocks;
    use crate::merge::{merge, MergeOptions};

    #[test]
    fn test_locate_prefers_identity() {
        let blocks = parse_blocks("<p>a</p><p>b</p>").unwrap();
        let mut anchor = Anchor::of(&blocks[1]);
        anchor.signature = blocks[0].signature.clone();
        anchor.occurrence = 0;
        assert_eq!(anchor.locate(&blocks), Some(1));
    }

    #[test]
    fn test_locate_falls_back_to_signature() {
        let blocks = parse_blocks("<hr><p>a</p><hr>").unwrap();
        let anchor = Anchor::by_signature(blocks[2].signature.clone(), 1);
        assert_eq!(anchor.locate(&blocks), Some(2));

        let stale = Anchor {
            identity: Some("gone-0".to_string()),
            ..Anchor::of(&blocks[1])
        };
        assert_eq!(stale.locate(&blocks), Some(1));
    }

    #[test]
    fn test_insertion_point_without_baseline_blocks() {
        let mut log = EditLog::new();
        let view = merge(&[], &log, MergeOptions::preview());
        let point = insertion_point(&view, &[], &log, 0).unwrap();
        assert_eq!(point.position, Some(0));
        log.insert_at(point, "<p>a</p>").unwrap();

        let view = merge(&[], &log, MergeOptions::preview());
        let point = insertion_point(&view, &[], &log, 0).unwrap();
        assert_eq!(point.anchor, None);
        assert_eq!(point.position, Some(0));
        assert_eq!(point.log_index, 0);
        log.insert_at(point, "<p>b</p>").unwrap();

        let view = merge(&[], &log, MergeOptions::preview());
        let point = insertion_point(&view, &[], &log, 2).unwrap();
        assert_eq!(point.log_index, 2);
        log.insert_at(point, "<p>c</p>").unwrap();

        let html: Vec<String> = merge(&[], &log, MergeOptions::preview())
            .into_iter()
            .map(|m| m.block.html)
            .collect();
        assert_eq!(html, vec!["<p>b</p>", "<p>a</p>", "<p>c</p>"]);
    }

    #[test]
    fn test_backfill_identity() {
        let baseline = parse_blocks("<p>a</p><p>b</p>").unwrap();
        let mut log = EditLog::new();
        log.insert(
            Anchor::by_signature(baseline[1].signature.clone(), 0),
            Placement::After,
            "<p>new</p>",
        )
        .unwrap();

        let resolved = resolve_anchors(&baseline, &log, &baseline);
        let anchor = resolved.records()[0].anchor.as_ref().unwrap();
        assert_eq!(anchor.identity.as_deref(), Some(baseline[1].identity.as_str()));
    }

    #[test]
    fn test_resolve_unanchored_record_from_merged_document() {
        let baseline = parse_blocks("<p>a</p><p>b</p>").unwrap();
        let mut log = EditLog::new();
        log.insert_at_position(5, "<p>new</p>").unwrap();

        // The editor shows the new block between a and b
        let merged = parse_blocks("<p>a</p><p>new</p><p>b</p>").unwrap();
        let resolved = resolve_anchors(&baseline, &log, &merged);
        let record = &resolved.records()[0];

        assert_eq!(record.anchor, Some(Anchor::of(&baseline[0])));
        assert_eq!(record.placement, Placement::After);
        assert_eq!(record.position, None);
    }

    #[test]
    fn test_resolve_leading_record_anchors_before() {
        let baseline = parse_blocks("<p>a</p>").unwrap();
        let mut log = EditLog::new();
        log.insert_at_position(0, "<h1>top</h1>").unwrap();

        let merged = parse_blocks("<h1>top</h1><p>a</p>").unwrap();
        let resolved = resolve_anchors(&baseline, &log, &merged);
        let record = &resolved.records()[0];
        assert_eq!(record.anchor, Some(Anchor::of(&baseline[0])));
        assert_eq!(record.placement, Placement::Before);
    }
}
