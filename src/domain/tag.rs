//! Case-insensitive tag type for categorizing notes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A case-insensitive tag attached to a note.
///
/// Tags come from a `tags` frontmatter entry or from inline `#hashtags` in a
/// note's body. They are normalized to lowercase with any leading `#`
/// removed, making `#Draft`, `draft` and `DRAFT` equivalent.
///
/// # Normalization
/// - Surrounding whitespace is trimmed
/// - Leading `#` characters are stripped
/// - Converted to lowercase
///
/// # Examples
///
/// ```
/// use notedex::domain::Tag;
///
/// let tag = Tag::new("#Draft").unwrap();
/// assert_eq!(tag.as_str(), "draft");
///
/// // Case-insensitive equality
/// let tag2 = Tag::new("DRAFT").unwrap();
/// assert_eq!(tag, tag2);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String); // Always stored lowercase

/// Error returned when parsing an invalid tag.
#[derive(Debug, Clone)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTagError {}

impl Tag {
    /// Creates a new Tag from a string.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if nothing is left after trimming whitespace
    /// and stripping the leading `#`.
    pub fn new(s: &str) -> Result<Self, ParseTagError> {
        let normalized = s.trim().trim_start_matches('#').trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ParseTagError("tag cannot be empty".to_string()));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized tag value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self.0)
    }
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn new_with_valid_tag() {
        let tag = Tag::new("project").unwrap();
        assert_eq!(tag.to_string(), "project");
    }

    #[test]
    fn new_rejects_empty_string() {
        assert!(Tag::new("").is_err());
        assert!(Tag::new("   ").is_err());
    }

    #[test]
    fn new_rejects_bare_hash() {
        assert!(Tag::new("#").is_err());
        assert!(Tag::new("##").is_err());
    }

    #[test]
    fn strips_leading_hash() {
        assert_eq!(Tag::new("#project").unwrap().as_str(), "project");
        assert_eq!(Tag::new("  #Reading-List ").unwrap().as_str(), "reading-list");
    }

    #[test]
    fn normalizes_to_lowercase() {
        assert_eq!(Tag::new("NeedsReview").unwrap().as_str(), "needsreview");
    }

    #[test]
    fn equality_case_insensitive() {
        let t1 = Tag::new("#Foo").unwrap();
        let t2 = Tag::new("foo").unwrap();
        assert_eq!(t1, t2);

        let mut set = HashSet::new();
        set.insert(t1);
        assert!(set.contains(&t2));
    }

    #[test]
    fn keeps_non_ascii_words() {
        assert_eq!(Tag::new("Café").unwrap().as_str(), "café");
    }

    #[test]
    fn debug_format() {
        let tag = Tag::new("draft").unwrap();
        assert_eq!(format!("{:?}", tag), "Tag(\"draft\")");
    }

    #[test]
    fn serde_normalizes_on_deserialize() {
        let tag: Tag = serde_json::from_str("\"#DRAFT\"").unwrap();
        assert_eq!(tag.as_str(), "draft");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"draft\"");
    }

    #[test]
    fn serde_rejects_empty_on_deserialize() {
        let result: Result<Tag, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
