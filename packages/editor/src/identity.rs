//! # Identity Assignor
//!
//! Identities have the shape `{seed}-{occurrence}` where the seed is the
//! CRC32 of the block signature. Blocks created by the editor get
//! `{seed}-n{record}` instead, which can never collide with a baseline
//! identity. Identities already carried by a block are kept as long as no
//! earlier block in the same pass claimed them; leftover collisions are
//! resolved by appending `~1`, `~2`, ...

use crate::block::Block;
use crc32fast::Hasher;
use std::collections::{HashMap, HashSet};

/// Short hex seed derived from a signature
pub fn identity_seed(signature: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(signature.as_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Identity synthesized from signature and occurrence
pub fn synthesize(signature: &str, occurrence: usize) -> String {
    format!("{}-{}", identity_seed(signature), occurrence)
}

/// Identity for a block created by edit record `record_id`
pub fn fresh_identity(signature: &str, record_id: u64) -> String {
    format!("{}-n{}", identity_seed(signature), record_id)
}

/// Assign occurrences and identities to a block sequence in document order
pub fn assign_identities(blocks: &mut [Block]) {
    let mut counters: HashMap<String, usize> = HashMap::new();
    for block in blocks.iter_mut() {
        let counter = counters.entry(block.signature.clone()).or_insert(0);
        block.occurrence = *counter;
        *counter += 1;
    }

    // Carried identities are reserved first so a synthesized one can never
    // steal them from a later block
    let mut used: HashSet<String> = HashSet::new();
    let mut pending: Vec<usize> = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        if !block.identity.is_empty() && used.insert(block.identity.clone()) {
            continue;
        }
        pending.push(index);
    }

    for index in pending {
        let block = &mut blocks[index];
        let base = synthesize(&block.signature, block.occurrence);
        let mut candidate = base.clone();
        let mut suffix = 1;
        while used.contains(&candidate) {
            candidate = format!("{}~{}", base, suffix);
            suffix += 1;
        }
        used.insert(candidate.clone());
        block.identity = candidate;
    }
}

/// Drop carried identities and assign from scratch
pub fn reassign_identities(blocks: &mut [Block]) {
    for block in blocks.iter_mut() {
        block.identity.clear();
    }
    assign_identities(blocks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_blocks;

    #[test]
    fn test_duplicate_signatures_get_distinct_occurrences() {
        let blocks = parse_blocks("<hr><p>a</p><hr>").unwrap();
        assert_eq!(blocks[0].signature, blocks[2].signature);
        assert_eq!(blocks[0].occurrence, 0);
        assert_eq!(blocks[2].occurrence, 1);
        assert_ne!(blocks[0].identity, blocks[2].identity);
        assert!(blocks[0].identity.ends_with("-0"));
        assert!(blocks[2].identity.ends_with("-1"));
    }

    #[test]
    fn test_reparse_assigns_same_identities() {
        let source = "<h2>Intro</h2><p>One</p><p>One</p><ul><li>x</li></ul>";
        let first: Vec<String> = parse_blocks(source)
            .unwrap()
            .into_iter()
            .map(|b| b.identity)
            .collect();
        let second: Vec<String> = parse_blocks(source)
            .unwrap()
            .into_iter()
            .map(|b| b.identity)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_identity_survives_unrelated_insertion() {
        let before = parse_blocks("<p>a</p><p>b</p>").unwrap();
        let after = parse_blocks("<h1>new</h1><p>a</p><p>b</p>").unwrap();
        assert_eq!(before[0].identity, after[1].identity);
        assert_eq!(before[1].identity, after[2].identity);
    }

    #[test]
    fn test_carried_identity_is_kept() {
        let blocks = parse_blocks(r#"<p data-block-id="keep-me">a</p><p>b</p>"#).unwrap();
        assert_eq!(blocks[0].identity, "keep-me");
    }

    #[test]
    fn test_duplicated_carried_identity_is_repaired() {
        let blocks =
            parse_blocks(r#"<p data-block-id="dup">a</p><p data-block-id="dup">b</p>"#).unwrap();
        assert_eq!(blocks[0].identity, "dup");
        assert_ne!(blocks[1].identity, "dup");
    }

    #[test]
    fn test_collision_with_carried_identity_gets_suffix() {
        let plain = parse_blocks("<p>b</p>").unwrap();
        let taken = plain[0].identity.clone();
        // The first block claims the identity the second would synthesize
        let source = format!(r#"<p data-block-id="{}">a</p><p>b</p>"#, taken);
        let blocks = parse_blocks(&source).unwrap();
        assert_eq!(blocks[0].identity, taken);
        assert_eq!(blocks[1].identity, format!("{}~1", taken));
    }

    #[test]
    fn test_fresh_identity_namespace() {
        let id = fresh_identity("sig", 7);
        assert!(id.ends_with("-n7"));
        assert_ne!(id, synthesize("sig", 7));
    }
}
