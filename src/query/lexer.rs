//! Splits query text into tokens.

use crate::query::QueryError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Keywords, field names, tags and unquoted literals.
    Word(String),
    /// A quoted string without its quotes.
    Quoted(String),
    /// A bracketed list literal, brackets included.
    List(String),
    Comma,
    /// A comparison symbol such as `>=`.
    Symbol(&'static str),
    /// A lone `!`.
    Bang,
    /// A character that starts no token, kept only inside a `WHERE` clause.
    Stray(char),
}

impl Token {
    /// Returns true if this is the given keyword, ignoring case.
    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{}", w),
            Token::Quoted(s) => write!(f, "\"{}\"", s),
            Token::List(raw) => write!(f, "{}", raw),
            Token::Comma => write!(f, ","),
            Token::Symbol(s) => write!(f, "{}", s),
            Token::Bang => write!(f, "!"),
            Token::Stray(c) => write!(f, "{}", c),
        }
    }
}

const SYMBOLS: [&str; 7] = ["==", "!=", ">=", "<=", "=", ">", "<"];

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | '"' | '\'' | '[' | ']' | '=' | '!' | '<' | '>')
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, QueryError> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if c == ',' {
            tokens.push(Token::Comma);
            rest = &rest[1..];
        } else if c == '"' || c == '\'' {
            let body = &rest[1..];
            match body.find(c) {
                Some(end) => {
                    tokens.push(Token::Quoted(body[..end].to_string()));
                    rest = &body[end + 1..];
                }
                None => {
                    stray(&mut tokens, c, QueryError::Unterminated("string"))?;
                    rest = body;
                }
            }
        } else if c == '[' {
            match list_end(rest) {
                Some(end) => {
                    tokens.push(Token::List(rest[..end].to_string()));
                    rest = &rest[end..];
                }
                None => {
                    stray(&mut tokens, c, QueryError::Unterminated("list"))?;
                    rest = &rest[1..];
                }
            }
        } else if let Some(symbol) = SYMBOLS.iter().find(|s| rest.starts_with(**s)) {
            tokens.push(Token::Symbol(*symbol));
            rest = &rest[symbol.len()..];
        } else if c == '!' {
            tokens.push(Token::Bang);
            rest = &rest[1..];
        } else if c == ']' {
            stray(&mut tokens, c, QueryError::UnexpectedToken("]".to_string()))?;
            rest = &rest[1..];
        } else {
            let end = rest.find(|ch: char| !is_word_char(ch)).unwrap_or(rest.len());
            tokens.push(Token::Word(rest[..end].to_string()));
            rest = &rest[end..];
        }
    }

    Ok(tokens)
}

/// Handles a character that cannot start a token.
///
/// Once a `WHERE` keyword has been read the character becomes a
/// [`Token::Stray`], so the malformed condition is dropped by the parser.
/// Before that it is an error.
fn stray(tokens: &mut Vec<Token>, c: char, err: QueryError) -> Result<(), QueryError> {
    if tokens.iter().any(|t| t.is_keyword("WHERE")) {
        tokens.push(Token::Stray(c));
        Ok(())
    } else {
        Err(err)
    }
}

/// Byte offset just past the bracket closing the list that opens `text`.
fn list_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
