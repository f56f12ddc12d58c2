//! # Region Markers
//!
//! A page document carries named editable regions delimited by comment
//! markers:
//!
//! ```text
//! <!-- pagedraft:main:start -->
//! ...blocks...
//! <!-- pagedraft:main:end -->
//! ```
//!
//! Scanning happens in two passes. The first pass lexes the document into
//! comments and the opaque runs between them, keeping the marker comments;
//! the second pairs them into regions and validates that each
//! name opens and closes exactly once without overlapping another region.
//! Everything outside the region contents is an opaque span that is never
//! interpreted.

use crate::error::RegionError;
use logos::{Lexer, Logos};
use std::collections::HashSet;
use std::ops::Range;

pub const MARKER_NAMESPACE: &str = "pagedraft";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Start => "start",
            MarkerKind::End => "end",
        }
    }
}

/// A marker comment found by the first pass
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub kind: MarkerKind,
    pub range: Range<usize>,
}

/// A paired region
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// The start marker comment
    pub open: Range<usize>,
    /// Bytes strictly between the markers
    pub content: Range<usize>,
    /// The end marker comment
    pub close: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Opaque(Range<usize>),
    Region(Region),
}

/// Render the marker comment for a region boundary
pub fn marker(name: &str, kind: MarkerKind) -> String {
    format!("<!-- {}:{}:{} -->", MARKER_NAMESPACE, name, kind.as_str())
}

/// First-pass tokens. An unterminated comment lexes as an error and is
/// skipped like any other opaque text.
#[derive(Logos, Debug, Clone, PartialEq)]
enum ScanToken<'src> {
    #[token("<!--", comment_body)]
    Comment(&'src str),

    #[regex(r"[^<]+")]
    #[token("<")]
    Opaque,
}

fn comment_body<'src>(lex: &mut Lexer<'src, ScanToken<'src>>) -> Option<&'src str> {
    let rest = lex.remainder();
    let end = rest.find("-->")?;
    lex.bump(end + 3);
    Some(&rest[..end])
}

/// First pass: locate every marker comment in document order
pub fn scan_markers(source: &str) -> Vec<Marker> {
    let mut lexer = ScanToken::lexer(source);
    let mut markers = Vec::new();

    while let Some(token) = lexer.next() {
        let Ok(ScanToken::Comment(body)) = token else {
            continue;
        };
        if let Some((name, kind)) = parse_marker_body(body) {
            markers.push(Marker {
                name,
                kind,
                range: lexer.span(),
            });
        }
    }

    markers
}

fn parse_marker_body(body: &str) -> Option<(String, MarkerKind)> {
    let mut parts = body.trim().split(':');
    if parts.next()? != MARKER_NAMESPACE {
        return None;
    }
    let name = parts.next()?;
    let kind = match parts.next()? {
        "start" => MarkerKind::Start,
        "end" => MarkerKind::End,
        _ => return None,
    };
    if parts.next().is_some()
        || name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    Some((name.to_string(), kind))
}

/// Second pass: pair markers into segments covering the whole source
pub fn pair_markers(source: &str, markers: &[Marker]) -> Result<Vec<Segment>, RegionError> {
    let mut segments = Vec::new();
    let mut seen_start: HashSet<&str> = HashSet::new();
    let mut seen_end: HashSet<&str> = HashSet::new();
    let mut open: Option<&Marker> = None;
    let mut cursor = 0;

    for m in markers {
        match m.kind {
            MarkerKind::Start => {
                if !seen_start.insert(m.name.as_str()) {
                    return Err(RegionError::Duplicate {
                        name: m.name.clone(),
                        kind: "start",
                        pos: m.range.start,
                    });
                }
                if let Some(outer) = open {
                    return Err(RegionError::Overlapping {
                        outer: outer.name.clone(),
                        inner: m.name.clone(),
                        pos: m.range.start,
                    });
                }
                if cursor < m.range.start {
                    segments.push(Segment::Opaque(cursor..m.range.start));
                }
                open = Some(m);
            }
            MarkerKind::End => {
                if !seen_end.insert(m.name.as_str()) {
                    return Err(RegionError::Duplicate {
                        name: m.name.clone(),
                        kind: "end",
                        pos: m.range.start,
                    });
                }
                match open {
                    Some(start) if start.name == m.name => {
                        segments.push(Segment::Region(Region {
                            name: m.name.clone(),
                            open: start.range.clone(),
                            content: start.range.end..m.range.start,
                            close: m.range.clone(),
                        }));
                        cursor = m.range.end;
                        open = None;
                    }
                    Some(outer) => {
                        return Err(RegionError::Overlapping {
                            outer: outer.name.clone(),
                            inner: m.name.clone(),
                            pos: m.range.start,
                        });
                    }
                    None if markers
                        .iter()
                        .any(|o| o.name == m.name && o.kind == MarkerKind::Start) =>
                    {
                        return Err(RegionError::EndBeforeStart {
                            name: m.name.clone(),
                            pos: m.range.start,
                        });
                    }
                    None => return Err(RegionError::MissingStart(m.name.clone())),
                }
            }
        }
    }

    if let Some(start) = open {
        return Err(RegionError::MissingEnd(start.name.clone()));
    }
    if cursor < source.len() {
        segments.push(Segment::Opaque(cursor..source.len()));
    }

    Ok(segments)
}

/// A document split into opaque spans and named regions
#[derive(Debug, Clone)]
pub struct RegionDocument<'a> {
    source: &'a str,
    segments: Vec<Segment>,
}

impl<'a> RegionDocument<'a> {
    pub fn parse(source: &'a str) -> Result<Self, RegionError> {
        let markers = scan_markers(source);
        let segments = pair_markers(source, &markers)?;
        Ok(Self { source, segments })
    }

    /// Parse and require each of `names` to be present
    pub fn parse_with(source: &'a str, names: &[&str]) -> Result<Self, RegionError> {
        let doc = Self::parse(source)?;
        for name in names {
            if doc.region(name).is_none() {
                return Err(RegionError::MissingRegion(name.to_string()));
            }
        }
        Ok(doc)
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Region(r) => Some(r),
            Segment::Opaque(_) => None,
        })
    }

    pub fn region_names(&self) -> Vec<&str> {
        self.regions().map(|r| r.name.as_str()).collect()
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions().find(|r| r.name == name)
    }

    /// Content strictly between a region's markers
    pub fn content(&self, name: &str) -> Result<&'a str, RegionError> {
        let region = self
            .region(name)
            .ok_or_else(|| RegionError::MissingRegion(name.to_string()))?;
        Ok(&self.source[region.content.clone()])
    }

    /// New document text with one region's content replaced
    pub fn replace_region(&self, name: &str, content: &str) -> Result<String, RegionError> {
        let region = self
            .region(name)
            .ok_or_else(|| RegionError::MissingRegion(name.to_string()))?;

        let mut output = String::with_capacity(self.source.len() + content.len());
        output.push_str(&self.source[..region.content.start]);
        output.push_str(content);
        output.push_str(&self.source[region.content.end..]);
        Ok(output)
    }

    /// Everything except region contents, markers included, in order
    pub fn outside_regions(&self) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Opaque(range) => output.push_str(&self.source[range.clone()]),
                Segment::Region(region) => {
                    output.push_str(&self.source[region.open.clone()]);
                    output.push_str(&self.source[region.close.clone()]);
                }
            }
        }
        output
    }
}
