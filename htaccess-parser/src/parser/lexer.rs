//! Argument tokenizer
//!
//! Splits the text after a directive or block name into argument tokens:
//! - whitespace separates tokens and is skipped
//! - "..." is one token with the quotes removed and inner whitespace kept;
//!   inside it `\"` stands for `"` and `\\` for `\`, other backslashes are
//!   literal
//! - any other run of non-whitespace is one token, taken verbatim

use logos::{Logos, Span};
use std::fmt;

/// Byte range in the normalized source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

impl From<Location> for std::ops::Range<usize> {
    fn from(location: Location) -> Self {
        location.start..location.end
    }
}

/// A token with its location in the argument text
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Location,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: impl Into<Location>) -> Self {
        Self {
            value,
            span: span.into(),
        }
    }
}

/// Argument token types
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")]
pub enum Token {
    /// Quoted run: "..." (quotes stripped, escapes resolved)
    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        unescape(&s[1..s.len() - 1])
    }, priority = 10)]
    Quoted(String),

    /// Unquoted run of non-whitespace, an unterminated quote included
    #[regex(r"[^\s]+", |lex| lex.slice().to_string(), priority = 1)]
    Bare(String),
}

/// Resolve `\"` and `\\`; any other backslash is kept as written
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next @ ('"' | '\\')) = chars.peek() {
                out.push(next);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Quote `value` so that [`Token::Quoted`] reads it back unchanged.
///
/// `"` is escaped. A backslash is doubled only where it would otherwise be
/// read as an escape: before `"`, before another backslash, or at the end.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' if matches!(chars.peek(), None | Some('"' | '\\')) => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Token {
    pub fn into_value(self) -> String {
        match self {
            Token::Quoted(s) | Token::Bare(s) => s,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Quoted(s) => f.write_str(&quote(s)),
            Token::Bare(s) => write!(f, "{}", s),
        }
    }
}

/// Tokenize argument text. Never fails: text the token rules reject, such
/// as an unterminated quote, is split on whitespace into bare tokens.
pub fn tokenize(source: &str) -> Vec<Spanned<Token>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Spanned::new(token, span)),
            Err(()) => {
                tracing::trace!("unmatched argument text at {}..{}", span.start, span.end);
                split_bare(lexer.slice(), span.start, &mut tokens);
            }
        }
    }

    tokens
}

fn split_bare(text: &str, offset: usize, tokens: &mut Vec<Spanned<Token>>) {
    let mut start = None;
    for (i, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        match (start, c.is_whitespace()) {
            (None, false) => start = Some(i),
            (Some(s), true) => {
                let word = &text[s..i];
                tokens.push(Spanned::new(
                    Token::Bare(word.to_string()),
                    offset + s..offset + i,
                ));
                start = None;
            }
            _ => {}
        }
    }
}

/// Argument values in order
pub fn tokenize_arguments(source: &str) -> Vec<String> {
    tokenize(source)
        .into_iter()
        .map(|spanned| spanned.value.into_value())
        .collect()
}
