//! The derived metadata record kept for every live note.

use crate::domain::{Note, Tag, Value, WikiLink};
use crate::infra::{
    Frontmatter, derive_text, extract_tags, extract_wiki_links, parse_frontmatter, word_count,
};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// A note as seen by the index.
///
/// Records are derived purely from a note's current text and are never
/// edited by hand; re-deriving an unchanged note yields an equal record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    id: String,
    title: String,
    path: String,
    frontmatter: Frontmatter,
    tags: BTreeSet<Tag>,
    links: Vec<WikiLink>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    word_count: usize,
    block_count: usize,
}

impl MetadataRecord {
    /// Derives the record for a note.
    pub fn from_note(note: &Note) -> Self {
        let text = derive_text(note);
        let parsed = parse_frontmatter(&text);
        let tags = extract_tags(&parsed.body, &parsed.frontmatter);
        let links = extract_wiki_links(&parsed.body);

        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            path: note.path().to_string(),
            word_count: word_count(&parsed.body),
            block_count: note.blocks().len(),
            frontmatter: parsed.frontmatter,
            tags,
            links,
            created: note.created(),
            modified: note.modified(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the trimmed, lowercase title used to resolve links.
    pub fn title_key(&self) -> String {
        self.title.trim().to_lowercase()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Returns the outbound wiki links in document order.
    pub fn links(&self) -> &[WikiLink] {
        &self.links
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Returns the lowercase keys this record contributes to the link index.
    pub fn link_keys(&self) -> BTreeSet<String> {
        self.links.iter().map(WikiLink::target_key).collect()
    }

    /// Views the record as a nested value for dot-path property access.
    pub fn to_value(&self) -> Value {
        let mut map = IndexMap::new();
        map.insert("id".to_string(), Value::string(&self.id));
        map.insert("title".to_string(), Value::string(&self.title));
        map.insert("path".to_string(), Value::string(&self.path));
        map.insert(
            "frontmatter".to_string(),
            Value::Map(self.frontmatter.clone()),
        );
        map.insert("tags".to_string(), self.tags_value());
        map.insert(
            "links".to_string(),
            Value::List(
                self.links
                    .iter()
                    .map(|link| {
                        let mut entry = IndexMap::new();
                        entry.insert("target".to_string(), Value::string(link.target()));
                        entry.insert("alias".to_string(), Value::string(link.alias()));
                        Value::Map(entry)
                    })
                    .collect(),
            ),
        );
        map.insert("created".to_string(), timestamp_value(self.created));
        map.insert("modified".to_string(), timestamp_value(self.modified));
        map.insert("wordCount".to_string(), Value::from(self.word_count));
        map.insert("blockCount".to_string(), Value::from(self.block_count));
        Value::Map(map)
    }

    /// Returns the tags as a list value.
    pub fn tags_value(&self) -> Value {
        Value::List(self.tags.iter().map(|t| Value::string(t.as_str())).collect())
    }
}

/// Timestamps resolve to RFC 3339 strings, which sort chronologically.
pub fn timestamp_value(ts: DateTime<Utc>) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}
