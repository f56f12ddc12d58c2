use crate::ast::{is_raw_text, is_void, Attribute, Node};
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{parse_attributes, tokenize, Token};
use std::ops::Range;

/// Element still waiting for its close tag
struct OpenElement {
    tag: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

/// Lenient markup parser producing a tree of [`Node`]s
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            pos: 0,
        })
    }

    /// Parse the whole input as a fragment (sequence of sibling nodes)
    pub fn parse_fragment(&mut self) -> ParseResult<Vec<Node>> {
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<OpenElement> = Vec::new();

        while self.pos < self.tokens.len() {
            let (token, span) = self.tokens[self.pos].clone();
            self.pos += 1;

            match token {
                Token::Text(text) => append(&mut stack, &mut root, Node::text(text)),
                Token::Comment(content) => append(&mut stack, &mut root, Node::comment(content)),
                Token::Doctype(content) => append(
                    &mut stack,
                    &mut root,
                    Node::Doctype {
                        content: content.to_string(),
                    },
                ),
                Token::OpenTag(tag) => {
                    let name = tag.name.to_ascii_lowercase();
                    let attributes = parse_attributes(tag.attrs);

                    if is_void(&name) || tag.self_closing {
                        append(
                            &mut stack,
                            &mut root,
                            Node::Element {
                                tag: name,
                                attributes,
                                children: Vec::new(),
                            },
                        );
                    } else if is_raw_text(&name) {
                        let content = self.take_raw_text(&name, span.end)?;
                        let children = if content.is_empty() {
                            Vec::new()
                        } else {
                            vec![Node::text(content)]
                        };
                        append(
                            &mut stack,
                            &mut root,
                            Node::Element {
                                tag: name,
                                attributes,
                                children,
                            },
                        );
                    } else {
                        stack.push(OpenElement {
                            tag: name,
                            attributes,
                            children: Vec::new(),
                        });
                    }
                }
                Token::CloseTag(name) => {
                    let name = name.to_ascii_lowercase();
                    // A close tag with no matching open ancestor is dropped
                    if let Some(depth) = stack.iter().rposition(|e| e.tag == name) {
                        while stack.len() > depth {
                            close_top(&mut stack, &mut root);
                        }
                    }
                }
            }
        }

        while !stack.is_empty() {
            close_top(&mut stack, &mut root);
        }

        Ok(root)
    }

    /// Consume raw text up to `</tag`, skipping every token lexed inside it
    fn take_raw_text(&mut self, tag: &str, start: usize) -> ParseResult<String> {
        let lower = self.source[start..].to_ascii_lowercase();
        let needle = format!("</{}", tag);
        let offset = lower
            .find(&needle)
            .ok_or_else(|| ParseError::unterminated_raw_text(start, tag))?;

        let content_end = start + offset;
        let close_end = self.source[content_end..]
            .find('>')
            .map(|i| content_end + i + 1)
            .unwrap_or(self.source.len());

        while self.pos < self.tokens.len() && self.tokens[self.pos].1.start < close_end {
            self.pos += 1;
        }

        Ok(self.source[start..content_end].to_string())
    }
}

fn append(stack: &mut [OpenElement], root: &mut Vec<Node>, node: Node) {
    let siblings = match stack.last_mut() {
        Some(open) => &mut open.children,
        None => root,
    };

    // Adjacent text runs (split around stray `<`) become one node
    if let Node::Text { content: incoming } = &node {
        if let Some(Node::Text { content }) = siblings.last_mut() {
            content.push_str(incoming);
            return;
        }
    }
    siblings.push(node);
}

fn close_top(stack: &mut Vec<OpenElement>, root: &mut Vec<Node>) {
    if let Some(open) = stack.pop() {
        let node = Node::Element {
            tag: open.tag,
            attributes: open.attributes,
            children: open.children,
        };
        append(stack, root, node);
    }
}

/// Parse a markup fragment
pub fn parse(source: &str) -> ParseResult<Vec<Node>> {
    Parser::new(source)?.parse_fragment()
}
