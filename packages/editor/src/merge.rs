//! # Merge Engine
//!
//! Projects an edit log onto a baseline block sequence. Precedence is fixed:
//!
//! 1. Apply the authoritative reorder (unlisted blocks follow the listed
//!    ones in their baseline order)
//! 2. Drop Remove targets, and Mark targets when removals are respected
//! 3. Walk the ordered baseline: `Before` inserts, the block, `After`
//!    inserts, ties in log order
//! 4. Inserts with no resolvable anchor but a position hint are spliced
//!    into the post-removal sequence by index
//! 5. Inserts with neither are appended
//!
//! Inserts hidden behind a revision are skipped.
//!
//! `merge` reads nothing but its arguments.

use crate::anchor::Placement;
use crate::block::Block;
use crate::edit_log::{EditAction, EditLog, EditRecord, RecordKind};
use crate::identity::assign_identities;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Drop blocks marked for deletion instead of showing them
    pub respect_removals: bool,
}

impl MergeOptions {
    /// Edit-time preview: marked blocks stay visible
    pub fn preview() -> Self {
        Self {
            respect_removals: false,
        }
    }

    /// Submission: marked blocks are dropped
    pub fn commit() -> Self {
        Self {
            respect_removals: true,
        }
    }
}

/// Where a merged block came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Origin {
    Baseline {
        #[serde(rename = "removedMarked")]
        removed_marked: bool,
    },
    Inserted {
        #[serde(rename = "recordId")]
        record_id: u64,
        kind: RecordKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedBlock {
    pub block: Block,
    pub origin: Origin,
}

impl MergedBlock {
    pub fn is_baseline(&self) -> bool {
        matches!(self.origin, Origin::Baseline { .. })
    }

    pub fn record_id(&self) -> Option<u64> {
        match self.origin {
            Origin::Inserted { record_id, .. } => Some(record_id),
            Origin::Baseline { .. } => None,
        }
    }
}

/// Baseline in the order given by the log's reorder record
pub fn effective_order(baseline: &[Block], log: &EditLog) -> Vec<Block> {
    let Some(order) = log.ordering() else {
        return baseline.to_vec();
    };

    let mut taken = vec![false; baseline.len()];
    let mut ordered = Vec::with_capacity(baseline.len());
    for identity in order {
        if let Some(index) = baseline.iter().position(|b| &b.identity == identity) {
            if !taken[index] {
                taken[index] = true;
                ordered.push(baseline[index].clone());
            }
        }
    }
    for (index, block) in baseline.iter().enumerate() {
        if !taken[index] {
            ordered.push(block.clone());
        }
    }
    ordered
}

/// Identities of `ordered` blocks that left their baseline relative order.
///
/// The blocks on a longest increasing run of baseline indexes count as
/// stationary; everything else was moved.
pub fn moved_identities(baseline: &[Block], ordered: &[Block]) -> HashSet<String> {
    let indexes: Vec<(usize, &str)> = ordered
        .iter()
        .filter_map(|b| {
            baseline
                .iter()
                .position(|base| base.identity == b.identity)
                .map(|i| (i, b.identity.as_str()))
        })
        .collect();

    let keys: Vec<usize> = indexes.iter().map(|(i, _)| *i).collect();
    let stationary = longest_increasing(&keys);
    indexes
        .iter()
        .enumerate()
        .filter(|(slot, _)| !stationary.contains(slot))
        .map(|(_, (_, identity))| identity.to_string())
        .collect()
}

/// Slots of one longest strictly increasing subsequence
fn longest_increasing(keys: &[usize]) -> HashSet<usize> {
    // tails[k]: slot of the smallest tail of an increasing run of length k+1
    let mut tails: Vec<usize> = Vec::new();
    let mut parent: Vec<Option<usize>> = vec![None; keys.len()];

    for (slot, &key) in keys.iter().enumerate() {
        let length = tails.partition_point(|&t| keys[t] < key);
        if length > 0 {
            parent[slot] = Some(tails[length - 1]);
        }
        if length == tails.len() {
            tails.push(slot);
        } else {
            tails[length] = slot;
        }
    }

    let mut run = HashSet::new();
    let mut cursor = tails.last().copied();
    while let Some(slot) = cursor {
        run.insert(slot);
        cursor = parent[slot];
    }
    run
}

/// Merge `log` into `baseline`
pub fn merge(baseline: &[Block], log: &EditLog, options: MergeOptions) -> Vec<MergedBlock> {
    let ordered = effective_order(baseline, log);

    let mut removed: HashSet<usize> = HashSet::new();
    let mut marked: HashSet<usize> = HashSet::new();
    for record in log.records() {
        let target = record.anchor.as_ref().and_then(|a| a.locate(&ordered));
        match (&record.action, target) {
            (EditAction::Remove, Some(index)) => {
                removed.insert(index);
            }
            (EditAction::Mark, Some(index)) if options.respect_removals => {
                removed.insert(index);
            }
            (EditAction::Mark, Some(index)) => {
                marked.insert(index);
            }
            _ => {}
        }
    }

    let survivors: Vec<usize> = (0..ordered.len()).filter(|i| !removed.contains(i)).collect();

    let mut before: HashMap<usize, Vec<&EditRecord>> = HashMap::new();
    let mut after: HashMap<usize, Vec<&EditRecord>> = HashMap::new();
    let mut spliced: HashMap<usize, Vec<&EditRecord>> = HashMap::new();
    let mut tail: Vec<&EditRecord> = Vec::new();
    let mut orphans: Vec<&EditRecord> = Vec::new();

    for record in log.live_inserts() {
        let target = record.anchor.as_ref().and_then(|a| a.locate(&ordered));
        match (target, record.position) {
            (Some(index), _) => {
                let slot = match record.placement {
                    Placement::Before => &mut before,
                    Placement::After => &mut after,
                };
                slot.entry(index).or_default().push(record);
            }
            (None, Some(position)) => match survivors.get(position) {
                Some(&index) => spliced.entry(index).or_default().push(record),
                None => tail.push(record),
            },
            (None, None) => {
                warn!(
                    record_id = record.id,
                    anchor = ?record.anchor.as_ref().map(|a| a.key()),
                    "Insert has no resolvable anchor or position, appending"
                );
                orphans.push(record);
            }
        }
    }

    let mut merged: Vec<MergedBlock> = Vec::with_capacity(ordered.len() + log.len());
    for (index, block) in ordered.iter().enumerate() {
        for record in spliced.get(&index).into_iter().flatten() {
            merged.push(inserted(record));
        }
        for record in before.get(&index).into_iter().flatten() {
            merged.push(inserted(record));
        }
        if !removed.contains(&index) {
            merged.push(MergedBlock {
                block: block.clone(),
                origin: Origin::Baseline {
                    removed_marked: marked.contains(&index),
                },
            });
        }
        for record in after.get(&index).into_iter().flatten() {
            merged.push(inserted(record));
        }
    }
    merged.extend(tail.into_iter().map(inserted));
    merged.extend(orphans.into_iter().map(inserted));

    let mut blocks: Vec<Block> = merged.iter().map(|m| m.block.clone()).collect();
    assign_identities(&mut blocks);
    for (entry, block) in merged.iter_mut().zip(blocks) {
        entry.block = block;
    }
    merged
}

fn inserted(record: &EditRecord) -> MergedBlock {
    MergedBlock {
        block: Block::from_html_lossy(&record.html).with_identity(record.block_id.clone()),
        origin: Origin::Inserted {
            record_id: record.id,
            kind: record.kind,
        },
    }
}

/// The plain block sequence of a merge result
pub fn merged_blocks(merged: &[MergedBlock]) -> Vec<Block> {
    merged.iter().map(|m| m.block.clone()).collect()
}
