//! Tag, wiki link and word extraction from note text.

use crate::domain::{Note, Tag, Value, WikiLink};
use crate::infra::Frontmatter;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

// Matches inline #hashtags
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([\w-]+)").unwrap());

// Matches [[target]] or [[target|alias]]
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

/// Returns the text a note is indexed from.
///
/// Block contents joined with newlines when the note has blocks, otherwise
/// the flat content.
pub fn derive_text(note: &Note) -> String {
    if note.blocks().is_empty() {
        return note.content().to_string();
    }
    note.blocks()
        .iter()
        .map(|b| b.content())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collects a note's tags from its `tags` frontmatter entry and inline
/// `#hashtags` in the body, normalized and deduplicated.
pub fn extract_tags(body: &str, frontmatter: &Frontmatter) -> BTreeSet<Tag> {
    let mut tags = BTreeSet::new();

    match frontmatter.get("tags") {
        Some(Value::List(items)) => {
            tags.extend(items.iter().filter_map(|v| Tag::new(&v.to_string()).ok()));
        }
        Some(Value::Null) | None => {}
        Some(scalar) => {
            tags.extend(Tag::new(&scalar.to_string()).ok());
        }
    }

    tags.extend(
        TAG_RE
            .captures_iter(body)
            .filter_map(|cap| Tag::new(&cap[1]).ok()),
    );

    tags
}

/// Extracts wiki links from the body, left to right.
///
/// The bracket contents are split once on `|`; both halves are trimmed and
/// links with an empty target are skipped.
pub fn extract_wiki_links(body: &str) -> Vec<WikiLink> {
    WIKILINK_RE
        .captures_iter(body)
        .filter_map(|cap| {
            let inner = cap.get(1)?.as_str();
            let (target, alias) = match inner.split_once('|') {
                Some((target, alias)) => (target.trim(), Some(alias.trim().to_string())),
                None => (inner.trim(), None),
            };
            if target.is_empty() {
                return None;
            }
            Some(WikiLink::new(target, alias))
        })
        .collect()
}

/// Counts whitespace-delimited words.
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Block;
    use crate::infra::parse_frontmatter;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn tag_strs(tags: &BTreeSet<Tag>) -> Vec<&str> {
        tags.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn tags_merge_frontmatter_and_inline() {
        let parsed = parse_frontmatter("---\nstatus: Active\ntags: [x, y]\n---\nbody #z");
        let tags = extract_tags(&parsed.body, &parsed.frontmatter);
        assert_eq!(tag_strs(&tags), vec!["x", "y", "z"]);
    }

    #[test]
    fn tags_are_case_folded_and_deduplicated() {
        let parsed = parse_frontmatter("---\ntags: Foo\n---\n#foo and #FOO and #bar-baz");
        let tags = extract_tags(&parsed.body, &parsed.frontmatter);
        assert_eq!(tag_strs(&tags), vec!["bar-baz", "foo"]);
    }

    #[test]
    fn frontmatter_tags_may_carry_hash() {
        let parsed = parse_frontmatter("---\ntags: [\"#Work\", home]\n---\n");
        let tags = extract_tags(&parsed.body, &parsed.frontmatter);
        assert_eq!(tag_strs(&tags), vec!["home", "work"]);
    }

    #[test]
    fn heading_marker_is_not_a_tag() {
        let tags = extract_tags("# Heading\n## Sub", &Frontmatter::new());
        assert!(tags.is_empty());
    }

    #[test]
    fn links_in_document_order_with_aliases() {
        let links = extract_wiki_links("See [[Beta]] then [[Alpha|the first]] and [[Beta]].");
        assert_eq!(
            links,
            vec![
                WikiLink::new("Beta", None),
                WikiLink::new("Alpha", Some("the first".to_string())),
                WikiLink::new("Beta", None),
            ]
        );
    }

    #[test]
    fn link_splits_on_first_pipe_only() {
        let links = extract_wiki_links("[[Target|a|b]]");
        assert_eq!(links[0].target(), "Target");
        assert_eq!(links[0].alias(), "a|b");
    }

    #[test]
    fn empty_targets_are_skipped() {
        assert!(extract_wiki_links("[[ |alias]] and [[]]").is_empty());
    }

    #[test]
    fn word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  one\ttwo\n\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn derive_text_prefers_blocks() {
        let now = Utc::now();
        let note = crate::domain::Note::builder("n", "t", now, now)
            .content("ignored")
            .block(Block::new("a", crate::domain::BlockKind::Text, "---"))
            .block(Block::new("b", crate::domain::BlockKind::Text, "status: x"))
            .block(Block::new("c", crate::domain::BlockKind::Text, "---"))
            .block(Block::task("d", "body", false))
            .build();
        assert_eq!(derive_text(&note), "---\nstatus: x\n---\nbody");
    }

    #[test]
    fn derive_text_falls_back_to_content() {
        let now = Utc::now();
        let note = crate::domain::Note::new("n", "t", "flat", now, now);
        assert_eq!(derive_text(&note), "flat");
    }
}
