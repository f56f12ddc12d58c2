//! Parse → serialize behaviour on whole page documents

use pagedraft_parser::{marker, parse, serialize, MarkerKind, Node, RegionDocument};

fn sample_page() -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Docs</title>\n<style>h1 > a {{ color: red }}</style></head>\n<body>\n{}\n<header><h1>Welcome</h1></header>\n{}\n<main>\n{}\n<section class=\"intro\"><p>First   paragraph.</p></section>\n<hr>\n<pre><code>fn main() {{}}\n</code></pre>\n{}\n</main>\n</body>\n</html>\n",
        marker("hero", MarkerKind::Start),
        marker("hero", MarkerKind::End),
        marker("main", MarkerKind::Start),
        marker("main", MarkerKind::End),
    )
}

#[test]
fn test_main_region_blocks() {
    let page = sample_page();
    let doc = RegionDocument::parse_with(&page, &["hero", "main"]).expect("regions");
    let nodes = parse(doc.content("main").unwrap()).expect("parse main");

    let blocks: Vec<&Node> = nodes.iter().filter(|n| !n.is_blank()).collect();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].tag(), Some("section"));
    assert_eq!(blocks[1].tag(), Some("hr"));
    assert_eq!(blocks[2].tag(), Some("pre"));
}

#[test]
fn test_whole_page_roundtrip_is_stable() {
    let page = sample_page();
    let once = serialize(&parse(&page).unwrap());
    let twice = serialize(&parse(&once).unwrap());
    assert_eq!(once, twice);
    assert!(once.contains("h1 > a { color: red }"));
}

#[test]
fn test_nodes_serialize_to_json() {
    let nodes = parse(r#"<p id="x">hi</p>"#).unwrap();
    let json = serde_json::to_string(&nodes).expect("Failed to serialize");
    assert!(json.contains("\"type\":\"Element\""));
    let back: Vec<Node> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, nodes);
}
