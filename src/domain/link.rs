//! Wiki link type representing in-body references between notes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `[[Target]]` or `[[Target|Alias]]` reference found in a note's body.
///
/// Links point at other notes by title, not by id. The target is kept exactly
/// as written; resolution against note titles happens in the index and is
/// case-insensitive.
///
/// # Examples
///
/// ```
/// use notedex::domain::WikiLink;
///
/// let link = WikiLink::new("Project Alpha", None);
/// assert_eq!(link.alias(), "Project Alpha");
/// assert_eq!(link.target_key(), "project alpha");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WikiLink {
    target: String,
    alias: String,
}

impl WikiLink {
    /// Creates a new link. The alias defaults to the target when absent.
    pub fn new(target: impl Into<String>, alias: Option<String>) -> Self {
        let target = target.into();
        let alias = alias.unwrap_or_else(|| target.clone());
        Self { target, alias }
    }

    /// Returns the link target as written.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the display alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the lowercase target used as the link index key.
    pub fn target_key(&self) -> String {
        self.target.to_lowercase()
    }
}

impl fmt::Display for WikiLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias == self.target {
            write!(f, "[[{}]]", self.target)
        } else {
            write!(f, "[[{}|{}]]", self.target, self.alias)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn alias_defaults_to_target() {
        let link = WikiLink::new("Inbox", None);
        assert_eq!(link.target(), "Inbox");
        assert_eq!(link.alias(), "Inbox");
    }

    #[test]
    fn explicit_alias_is_kept() {
        let link = WikiLink::new("Inbox", Some("the inbox".to_string()));
        assert_eq!(link.alias(), "the inbox");
    }

    #[test]
    fn target_key_is_lowercase() {
        assert_eq!(WikiLink::new("Weekly Review", None).target_key(), "weekly review");
    }

    #[test]
    fn display_matches_source_syntax() {
        assert_eq!(WikiLink::new("A", None).to_string(), "[[A]]");
        assert_eq!(WikiLink::new("A", Some("b".into())).to_string(), "[[A|b]]");
    }
}
