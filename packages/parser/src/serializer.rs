use crate::ast::{is_void, Attribute, Node};

/// Serializer converts a node tree back to markup.
///
/// Output is canonical: attribute values are always double-quoted, void
/// elements carry no close tag and text is emitted verbatim. Parsing the
/// output and serializing again yields the same string.
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    pub fn serialize(mut self, nodes: &[Node]) -> String {
        for node in nodes {
            self.write_node(node);
        }
        self.output
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Element {
                tag,
                attributes,
                children,
            } => {
                self.output.push('<');
                self.output.push_str(tag);
                for attr in attributes {
                    self.write_attribute(attr);
                }
                self.output.push('>');

                if is_void(tag) {
                    return;
                }

                for child in children {
                    self.write_node(child);
                }

                self.output.push_str("</");
                self.output.push_str(tag);
                self.output.push('>');
            }
            Node::Text { content } => self.output.push_str(content),
            Node::Comment { content } => {
                self.output.push_str("<!--");
                self.output.push_str(content);
                self.output.push_str("-->");
            }
            Node::Doctype { content } => {
                self.output.push_str("<!");
                self.output.push_str(content);
                self.output.push('>');
            }
        }
    }

    fn write_attribute(&mut self, attr: &Attribute) {
        self.output.push(' ');
        self.output.push_str(&attr.name);
        if let Some(value) = &attr.value {
            self.output.push_str("=\"");
            self.output.push_str(&value.replace('"', "&quot;"));
            self.output.push('"');
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a sequence of sibling nodes
pub fn serialize(nodes: &[Node]) -> String {
    Serializer::new().serialize(nodes)
}

/// Serialize a single node
pub fn serialize_node(node: &Node) -> String {
    Serializer::new().serialize(std::slice::from_ref(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_serialize_built_tree() {
        let node = Node::element("p")
            .with_attr("class", "lead")
            .with_child(Node::text("Hello "))
            .with_child(Node::element("br"));
        assert_eq!(serialize_node(&node), r#"<p class="lead">Hello <br></p>"#);
    }

    #[test]
    fn test_single_quoted_value_with_double_quote() {
        let nodes = parse(r#"<a title='say "hi"'>x</a>"#).unwrap();
        assert_eq!(serialize(&nodes), r#"<a title="say &quot;hi&quot;">x</a>"#);
    }

    #[test]
    fn test_serializer_output_is_a_fixed_point() {
        let sources = [
            r#"<DIV class=a  id='b'><p>one<br/>two</div>"#,
            "<!-- c --><hr><p>x < y</p>",
            "<pre>  keep\n   spacing </pre><input disabled>",
            "<script>a<b</script><ul><li>1<li>2</ul>",
        ];

        for source in sources {
            let once = serialize(&parse(source).unwrap());
            let twice = serialize(&parse(&once).unwrap());
            assert_eq!(once, twice, "not stable for {}", source);
        }
    }
}
