//! # Block Signature
//!
//! Content fingerprint of a block that survives re-parsing. Two blocks share
//! a signature when a human editor would call them the same content:
//!
//! - attribute order does not matter (attributes and class tokens are sorted)
//! - the identity attribute and other editor-only attributes are ignored
//! - whitespace runs in text collapse to one space (except preformatted text)
//! - preview artifacts are dropped and syntax-highlight spans are unwrapped
//!
//! Anything else, including tag names, attribute values and text, is
//! significant.

use crate::block::IDENTITY_ATTR;
use pagedraft_parser::{parse, serialize, Attribute, Node};
use sha2::{Digest, Sha256};

/// Attributes added by the editing surface rather than by the author
const VOLATILE_ATTRS: &[&str] = &[
    IDENTITY_ATTR,
    "contenteditable",
    "spellcheck",
    "draggable",
    "data-highlighted",
];

const VOLATILE_ATTR_PREFIXES: &[&str] = &["data-preview-"];

const PREVIEW_ARTIFACT_ATTR: &str = "data-preview-artifact";
const PREVIEW_ARTIFACT_CLASS: &str = "preview-artifact";

/// Class tokens left on elements by the highlighter
const HIGHLIGHT_CLASSES: &[&str] = &["hljs"];
const HIGHLIGHT_CLASS_PREFIXES: &[&str] = &["hljs-", "token"];

/// Elements whose whitespace is content
const PREFORMATTED: &[&str] = &["pre", "textarea", "script", "style"];

/// Containers in which whitespace-only text between children is layout
const BLOCK_CONTAINERS: &[&str] = &[
    "article",
    "aside",
    "blockquote",
    "details",
    "div",
    "dl",
    "fieldset",
    "figure",
    "footer",
    "form",
    "header",
    "nav",
    "ol",
    "section",
    "table",
    "tbody",
    "tfoot",
    "thead",
    "tr",
    "ul",
];

/// Length of the hex signature
const SIGNATURE_LEN: usize = 32;

/// Signature of a serialized block
pub fn signature(html: &str) -> String {
    let form = normalized_form(html);
    if form.is_empty() {
        // Nothing meaningful survived normalization; fall back to the raw text
        return digest(&format!("raw:{}", html.trim()));
    }
    digest(&form)
}

/// Canonical normalized markup the signature is computed from
pub fn normalized_form(html: &str) -> String {
    match parse(html) {
        Ok(nodes) => serialize(&normalize(&nodes)),
        Err(_) => html.split_whitespace().collect::<Vec<_>>().join(" "),
    }
}

/// Normalize a fragment as if it were the children of a block container
pub fn normalize(nodes: &[Node]) -> Vec<Node> {
    normalize_children(nodes, false, true)
}

fn digest(input: &str) -> String {
    let hash = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(hash);
    hex.truncate(SIGNATURE_LEN);
    hex
}

fn normalize_children(nodes: &[Node], preformatted: bool, container: bool) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    for node in nodes {
        normalize_node(node, preformatted, &mut out);
    }

    let mut merged: Vec<Node> = Vec::with_capacity(out.len());
    for node in out {
        if let (Node::Text { content: incoming }, Some(Node::Text { content })) =
            (&node, merged.last_mut())
        {
            content.push_str(incoming);
            continue;
        }
        merged.push(node);
    }

    if preformatted {
        return merged;
    }

    if let Some(Node::Text { content }) = merged.first_mut() {
        *content = content.trim_start().to_string();
    }
    if let Some(Node::Text { content }) = merged.last_mut() {
        *content = content.trim_end().to_string();
    }

    merged.retain(|n| match n {
        Node::Text { content } => !content.is_empty() && !(container && content == " "),
        _ => true,
    });
    merged
}

fn normalize_node(node: &Node, preformatted: bool, out: &mut Vec<Node>) {
    match node {
        Node::Element {
            tag,
            attributes,
            children,
        } => {
            if is_preview_artifact(node) {
                return;
            }
            if is_highlight_span(node) {
                for child in children {
                    normalize_node(child, preformatted, out);
                }
                return;
            }

            let preformatted = preformatted || PREFORMATTED.contains(&tag.as_str());
            let container = BLOCK_CONTAINERS.contains(&tag.as_str());
            out.push(Node::Element {
                tag: tag.clone(),
                attributes: normalize_attributes(attributes),
                children: normalize_children(children, preformatted, container),
            });
        }
        Node::Text { content } => {
            if preformatted {
                out.push(Node::text(content.clone()));
            } else {
                out.push(Node::text(collapse_whitespace(content)));
            }
        }
        Node::Comment { .. } | Node::Doctype { .. } => {}
    }
}

fn normalize_attributes(attributes: &[Attribute]) -> Vec<Attribute> {
    let mut kept: Vec<Attribute> = attributes
        .iter()
        .filter(|a| !is_volatile(&a.name))
        .filter_map(|a| {
            if a.name != "class" {
                return Some(a.clone());
            }
            let mut classes: Vec<&str> = a
                .value
                .as_deref()
                .unwrap_or("")
                .split_whitespace()
                .filter(|c| !is_highlight_class(c))
                .collect();
            classes.sort_unstable();
            classes.dedup();
            if classes.is_empty() {
                None
            } else {
                Some(Attribute::new("class", classes.join(" ")))
            }
        })
        .collect();
    kept.sort_by(|a, b| a.name.cmp(&b.name));
    kept
}

fn is_volatile(name: &str) -> bool {
    VOLATILE_ATTRS.contains(&name) || VOLATILE_ATTR_PREFIXES.iter().any(|p| name.starts_with(p))
}

fn is_highlight_class(class: &str) -> bool {
    HIGHLIGHT_CLASSES.contains(&class) || HIGHLIGHT_CLASS_PREFIXES.iter().any(|p| class.starts_with(p))
}

fn is_preview_artifact(node: &Node) -> bool {
    node.has_attr(PREVIEW_ARTIFACT_ATTR) || node.classes().contains(&PREVIEW_ARTIFACT_CLASS)
}

/// A `<span>` inserted by the highlighter (`hljs-title function_` and friends)
fn is_highlight_span(node: &Node) -> bool {
    if node.tag() != Some("span") {
        return false;
    }
    let Node::Element { attributes, .. } = node else {
        return false;
    };
    node.classes().iter().any(|c| is_highlight_class(c))
        && attributes.iter().all(|a| a.name == "class" || is_volatile(&a.name))
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
