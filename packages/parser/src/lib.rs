//! # Pagedraft Parser
//!
//! Markup model shared by the editing engine: a lenient parser producing a
//! plain tree of [`Node`]s, a canonical [`serialize`] and the region-marker
//! scanner used to locate the editable parts of a page.

pub mod ast;
pub mod error;
pub mod parser;
pub mod regions;
pub mod serializer;
pub mod tokenizer;

pub use ast::{Attribute, Node};
pub use error::{ParseError, ParseResult, RegionError};
pub use parser::{parse, Parser};
pub use regions::{marker, MarkerKind, Region, RegionDocument, Segment};
pub use serializer::{serialize, serialize_node, Serializer};
pub use tokenizer::{tokenize, Token};
