use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unterminated comment starting at {pos}")]
    UnterminatedComment { pos: usize },

    #[error("Unterminated <{tag}> raw text starting at {pos}")]
    UnterminatedRawText { pos: usize, tag: String },
}

impl ParseError {
    pub fn unterminated_comment(pos: usize) -> Self {
        Self::UnterminatedComment { pos }
    }

    pub fn unterminated_raw_text(pos: usize, tag: impl Into<String>) -> Self {
        Self::UnterminatedRawText {
            pos,
            tag: tag.into(),
        }
    }

    pub fn pos(&self) -> usize {
        match self {
            ParseError::UnterminatedComment { pos } => *pos,
            ParseError::UnterminatedRawText { pos, .. } => *pos,
        }
    }
}

/// Structural errors in the page's region markers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    #[error("Missing start marker for region '{0}'")]
    MissingStart(String),

    #[error("Missing end marker for region '{0}'")]
    MissingEnd(String),

    #[error("Duplicate {kind} marker for region '{name}' at {pos}")]
    Duplicate {
        name: String,
        kind: &'static str,
        pos: usize,
    },

    #[error("End marker for region '{name}' at {pos} precedes its start marker")]
    EndBeforeStart { name: String, pos: usize },

    #[error("Region '{inner}' at {pos} overlaps region '{outer}'")]
    Overlapping {
        outer: String,
        inner: String,
        pos: usize,
    },

    #[error("Required region '{0}' not found")]
    MissingRegion(String),
}
