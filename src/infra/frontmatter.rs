//! Frontmatter parser for the `---` delimited preamble of a note's text.

use crate::domain::{Value, parse_number};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// Frontmatter entries in the order they were written.
pub type Frontmatter = IndexMap<String, Value>;

/// Result of splitting a note's text into frontmatter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedText {
    pub frontmatter: Frontmatter,
    pub body: String,
}

// Anchored at the very start of the text; the closing newline is optional.
static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A---\r?\n((?s:.*?))\r?\n---(?:\r?\n)?").unwrap());

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w][\w.-]*)\s*:\s*(.*)$").unwrap());

/// Parses the frontmatter block at the start of `text`.
///
/// # Format
/// ```text
/// ---
/// status: Active
/// priority: 2
/// tags: [project, work]
/// ---
/// Body content here...
/// ```
///
/// Each `key: value` line inside the block becomes an entry; other lines are
/// skipped. Values are coerced in order: `[a, b]` becomes a list of strings,
/// a quoted value loses its quotes, `true`/`false` become booleans, numeric
/// text becomes a number, and anything else stays a string.
///
/// This never fails. Text without a well-formed block at its very start
/// yields empty frontmatter and the whole text as body.
pub fn parse_frontmatter(text: &str) -> ParsedText {
    let Some(caps) = FRONTMATTER_RE.captures(text) else {
        return ParsedText {
            frontmatter: Frontmatter::new(),
            body: text.to_string(),
        };
    };

    let block_end = caps.get(0).map_or(0, |m| m.end());
    let yaml = caps.get(1).map_or("", |m| m.as_str());

    let mut frontmatter = Frontmatter::new();
    for line in yaml.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(entry) = ENTRY_RE.captures(line) {
            let key = entry[1].to_string();
            let value = parse_scalar(entry[2].trim());
            frontmatter.insert(key, value);
        }
    }

    ParsedText {
        frontmatter,
        body: text[block_end..].to_string(),
    }
}

/// Coerces a raw frontmatter value.
fn parse_scalar(raw: &str) -> Value {
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        let items = raw[1..raw.len() - 1]
            .split(',')
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .map(Value::string)
            .collect();
        return Value::List(items);
    }

    if is_quoted(raw) {
        return Value::string(&raw[1..raw.len() - 1]);
    }

    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    match parse_number(raw) {
        Some(n) => Value::Number(n),
        None => Value::string(raw),
    }
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
}

fn unquote(s: &str) -> &str {
    if is_quoted(s) { &s[1..s.len() - 1] } else { s }
}
