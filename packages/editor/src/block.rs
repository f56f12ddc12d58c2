use crate::identity::assign_identities;
use crate::signature::signature;
use crate::EditorError;
use pagedraft_parser::{parse, serialize, serialize_node, Node};
use serde::{Deserialize, Serialize};

/// Attribute carrying a block's identity while it is on screen
pub const IDENTITY_ATTR: &str = "data-block-id";

/// One top-level node of the main region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Canonical serialization without the identity attribute
    pub html: String,
    pub signature: String,
    /// Index among same-signature blocks of the enclosing sequence
    pub occurrence: usize,
    /// Empty until identities are assigned
    pub identity: String,
}

impl Block {
    /// Build a block from a parsed node, taking over any identity attribute
    pub fn from_node(node: &Node) -> Self {
        let mut node = node.clone();
        if let Node::Text { content } = &mut node {
            *content = content.trim().to_string();
        }
        let prior = node.remove_attr(IDENTITY_ATTR).unwrap_or_default();
        let html = serialize_node(&node);

        Self {
            signature: signature(&html),
            html,
            occurrence: 0,
            identity: prior.trim().to_string(),
        }
    }

    /// Parse markup that must contain exactly one block
    pub fn from_html(html: &str) -> Result<Self, EditorError> {
        let nodes = parse(html)?;
        let blocks: Vec<&Node> = nodes.iter().filter(|n| !n.is_blank()).collect();
        match blocks.as_slice() {
            [node] => Ok(Self::from_node(node)),
            other => Err(EditorError::NotASingleBlock(other.len())),
        }
    }

    /// Like [`Block::from_html`] but never fails; markup that does not parse
    /// into a single block is kept verbatim
    pub fn from_html_lossy(html: &str) -> Self {
        Self::from_html(html).unwrap_or_else(|_| Self {
            html: html.trim().to_string(),
            signature: signature(html),
            occurrence: 0,
            identity: String::new(),
        })
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Markup with the identity attribute, for the rendering layer
    pub fn annotated_html(&self) -> String {
        match parse(&self.html) {
            Ok(mut nodes) if nodes.len() == 1 && nodes[0].tag().is_some() => {
                nodes[0].set_attr(IDENTITY_ATTR, self.identity.clone());
                serialize(&nodes)
            }
            _ => self.html.clone(),
        }
    }

    /// Canonical content equality (ignores identity and occurrence)
    pub fn same_content(&self, other: &Block) -> bool {
        self.html == other.html
    }
}

/// Split main-region markup into blocks and assign identities
pub fn parse_blocks(main_html: &str) -> Result<Vec<Block>, EditorError> {
    let nodes = parse(main_html)?;
    let mut blocks: Vec<Block> = nodes
        .iter()
        .filter(|n| !n.is_blank())
        .map(Block::from_node)
        .collect();
    assign_identities(&mut blocks);
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_html_strips_identity() {
        let block = Block::from_html(r#"<p data-block-id="x-1" class="a">Hi</p>"#).unwrap();
        assert_eq!(block.html, r#"<p class="a">Hi</p>"#);
        assert_eq!(block.identity, "x-1");
    }

    #[test]
    fn test_from_html_rejects_multiple_blocks() {
        let err = Block::from_html("<p>a</p>\n<p>b</p>").unwrap_err();
        assert_eq!(err, EditorError::NotASingleBlock(2));
        let err = Block::from_html("   ").unwrap_err();
        assert_eq!(err, EditorError::NotASingleBlock(0));
    }

    #[test]
    fn test_annotated_html_carries_identity() {
        let block = Block::from_html("<p>Hi</p>").unwrap().with_identity("abc-0");
        assert_eq!(block.annotated_html(), r#"<p data-block-id="abc-0">Hi</p>"#);
    }

    #[test]
    fn test_parse_blocks_skips_blank_text() {
        let blocks = parse_blocks("\n  <h2>T</h2>\n\n  <p>a</p>\n").unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| !b.identity.is_empty()));
    }
}
