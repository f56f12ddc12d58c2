//! # Canonicalizer
//!
//! Writes a block sequence back into the page's `main` region. Previews,
//! stored dirty pages and submitted files all go through
//! [`render_document`], so what the editor sees is byte-for-byte what gets
//! committed.

use crate::block::{parse_blocks, Block};
use crate::EditorError;
use pagedraft_parser::RegionDocument;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const HERO_REGION: &str = "hero";
pub const MAIN_REGION: &str = "main";

const REQUIRED_REGIONS: &[&str] = &[HERO_REGION, MAIN_REGION];

/// Non-fatal findings of a render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    /// Content outside the regions changed
    pub outside_drift: bool,
    pub serialized_blocks: usize,
    /// Block count of the output's main region, parsed again
    pub reparsed_blocks: usize,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        !self.outside_drift && self.serialized_blocks == self.reparsed_blocks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonicalized {
    pub document: String,
    pub report: ConsistencyReport,
}

/// Main region text for a block sequence
pub fn serialize_main(blocks: &[Block]) -> String {
    let mut output = String::from("\n");
    for block in blocks {
        output.push_str(&block.html);
        output.push('\n');
    }
    output
}

fn regions(document: &str) -> Result<RegionDocument<'_>, EditorError> {
    Ok(RegionDocument::parse_with(document, REQUIRED_REGIONS)?)
}

/// Identity-assigned blocks of a page's main region
pub fn main_blocks(document: &str) -> Result<Vec<Block>, EditorError> {
    let regions = regions(document)?;
    parse_blocks(regions.content(MAIN_REGION)?)
}

/// Replace the main region of `document` with `blocks`
pub fn render_document(document: &str, blocks: &[Block]) -> Result<Canonicalized, EditorError> {
    let source = regions(document)?;
    let output = source.replace_region(MAIN_REGION, &serialize_main(blocks))?;

    // Markers must survive the round trip; anything else is only reported
    let rendered = regions(&output)?;
    let reparsed = parse_blocks(rendered.content(MAIN_REGION)?)?;

    let report = ConsistencyReport {
        outside_drift: source.outside_regions() != rendered.outside_regions(),
        serialized_blocks: blocks.len(),
        reparsed_blocks: reparsed.len(),
    };

    if report.outside_drift {
        warn!("Content outside the editable regions changed during render");
    }
    if report.serialized_blocks != report.reparsed_blocks {
        warn!(
            serialized = report.serialized_blocks,
            reparsed = report.reparsed_blocks,
            "Block count changed when re-parsing rendered main region"
        );
    }
    debug!(blocks = blocks.len(), bytes = output.len(), "Rendered document");

    Ok(Canonicalized {
        document: output,
        report,
    })
}

/// Re-serialize a page's main region in canonical form
pub fn canonicalize(document: &str) -> Result<Canonicalized, EditorError> {
    let blocks = main_blocks(document)?;
    render_document(document, &blocks)
}
