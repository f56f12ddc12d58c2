use serde::{Deserialize, Serialize};

/// Elements that never take children or a close tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text up to the matching close tag
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Single attribute, kept in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean attributes (`<input disabled>`)
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// Markup tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Element {
        tag: String,
        attributes: Vec<Attribute>,
        children: Vec<Node>,
    },

    /// Raw text, entities left undecoded
    Text { content: String },

    Comment { content: String },

    Doctype { content: String },
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.push(Attribute::new(name, value));
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_deref().unwrap_or("")),
            _ => None,
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        match self {
            Node::Element { attributes, .. } => attributes.iter().any(|a| a.name == name),
            _ => false,
        }
    }

    /// Set or replace an attribute value
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        if let Node::Element { attributes, .. } = self {
            let value = value.into();
            match attributes.iter_mut().find(|a| a.name == name) {
                Some(existing) => existing.value = Some(value),
                None => attributes.push(Attribute::new(name, value)),
            }
        }
    }

    /// Remove an attribute, returning its value if it was present
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        if let Node::Element { attributes, .. } = self {
            if let Some(index) = attributes.iter().position(|a| a.name == name) {
                let removed = attributes.remove(index);
                return Some(removed.value.unwrap_or_default());
            }
        }
        None
    }

    /// Whitespace-only text
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Text { content } if content.trim().is_empty())
    }

    /// Space-separated class tokens
    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }
}
