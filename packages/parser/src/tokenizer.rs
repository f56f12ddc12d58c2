use crate::error::{ParseError, ParseResult};
use logos::{Lexer, Logos};
use std::ops::Range;

/// Raw open tag as it appears in the source
#[derive(Debug, Clone, PartialEq)]
pub struct TagSource<'src> {
    pub name: &'src str,
    /// Everything between the tag name and the closing `>`
    pub attrs: &'src str,
    pub self_closing: bool,
}

/// Markup tokens. Stray `<` characters surface as lexer errors and are
/// folded back into text by [`tokenize`].
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    #[regex(r"<![a-zA-Z][^>]*>", |lex| { let s = lex.slice(); &s[2..s.len() - 1] })]
    Doctype(&'src str),

    #[regex(r"<[a-zA-Z][a-zA-Z0-9:_-]*", lex_open_tag)]
    OpenTag(TagSource<'src>),

    #[regex(r"</[a-zA-Z][^>]*>", lex_close_tag)]
    CloseTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

fn lex_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let rest = lex.remainder();
    let end = rest.find("-->")?;
    lex.bump(end + 3);
    Some(&rest[..end])
}

fn lex_open_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<TagSource<'src>> {
    let name = &lex.slice()[1..];
    let rest = lex.remainder();
    let mut quote: Option<char> = None;

    for (i, c) in rest.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '<' => return None,
                '>' => {
                    let attrs = &rest[..i];
                    lex.bump(i + 1);
                    return Some(TagSource {
                        name,
                        attrs,
                        self_closing: attrs.trim_end().ends_with('/'),
                    });
                }
                _ => {}
            },
        }
    }

    None
}

fn lex_close_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let inner = &lex.slice()[2..lex.slice().len() - 1];
    let end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    &inner[..end]
}

/// Tokenize markup into tokens with their byte spans
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, Range<usize>)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let slice = lexer.slice();
                if slice.starts_with("<!--") {
                    return Err(ParseError::unterminated_comment(span.start));
                }
                tokens.push((Token::Text(slice), span));
            }
        }
    }

    Ok(tokens)
}

/// Split the attribute portion of an open tag into name/value pairs.
/// Names are lowercased; values are kept raw (entities undecoded).
pub fn parse_attributes(src: &str) -> Vec<crate::ast::Attribute> {
    use crate::ast::Attribute;

    let bytes = src.as_bytes();
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let name = src[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                let value_start = i + 1;
                i = value_start;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                let value = src[value_start..i].to_string();
                i = (i + 1).min(bytes.len());
                Some(value)
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                Some(src[value_start..i].to_string())
            }
        } else {
            None
        };

        if name.is_empty() {
            continue;
        }
        // First occurrence wins, as in browsers
        if attributes.iter().any(|a| a.name == name) {
            continue;
        }
        attributes.push(Attribute { name, value });
    }

    attributes
}
