//! Per-block labels handed to the rendering layer

use crate::edit_log::{EditLog, RecordKind};
use crate::ledger::SessionLedger;
use crate::merge::{MergedBlock, Origin};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Baseline,
    New,
    Edited,
    Reordered,
    /// Landed through a request merged this session
    Committed,
    /// Marked for deletion
    Removed,
    /// Part of a submitted request that is still open
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBlock {
    pub identity: String,
    /// Markup carrying the identity attribute
    pub html: String,
    pub classification: Classification,
    pub record_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub path: String,
    pub blocks: Vec<ViewBlock>,
}

impl PageView {
    pub fn count(&self, classification: Classification) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.classification == classification)
            .count()
    }

    pub fn identities(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.identity.as_str()).collect()
    }
}

/// Label every block of a preview merge
pub fn classify(
    path: &str,
    merged: &[MergedBlock],
    log: &EditLog,
    ledger: &SessionLedger,
    moved: &HashSet<String>,
) -> PageView {
    let blocks = merged
        .iter()
        .map(|entry| {
            let block = &entry.block;
            let classification = match entry.origin {
                Origin::Baseline {
                    removed_marked: true,
                } => Classification::Removed,
                Origin::Inserted { record_id, kind } => {
                    let pending = log.get(record_id).is_some_and(|r| r.is_pending())
                        || ledger.is_pending(path, block);
                    match kind {
                        _ if pending => Classification::Pending,
                        RecordKind::New => Classification::New,
                        RecordKind::Edited => Classification::Edited,
                    }
                }
                Origin::Baseline { .. } if ledger.is_committed(path, block) => {
                    Classification::Committed
                }
                Origin::Baseline { .. } if moved.contains(&block.identity) => {
                    Classification::Reordered
                }
                Origin::Baseline { .. } => Classification::Baseline,
            };

            ViewBlock {
                identity: block.identity.clone(),
                html: block.annotated_html(),
                classification,
                record_id: entry.record_id(),
            }
        })
        .collect();

    PageView {
        path: path.to_string(),
        blocks,
    }
}
