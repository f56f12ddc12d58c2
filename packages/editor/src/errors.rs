//! Error types for the editor

use pagedraft_parser::{ParseError, RegionError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Region error: {0}")]
    Region(#[from] RegionError),

    #[error("Expected exactly one block, found {0}")]
    NotASingleBlock(usize),

    #[error("Page not loaded: {0}")]
    UnknownPage(String),

    #[error("Block not found: {0}")]
    UnknownBlock(String),

    #[error("Edit record not found: {0}")]
    UnknownRecord(u64),

    #[error("Edit record {0} is part of an open request")]
    RecordPending(u64),

    #[error("Insertion index {index} out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },
}

impl EditorError {
    /// Missing or duplicated region markers
    pub fn is_structural(&self) -> bool {
        matches!(self, EditorError::Region(_))
    }
}
