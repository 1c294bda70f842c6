//! Consistency issues found when checking the metadata index.
//!
//! Any difference between the inverted indices and what the live records
//! imply is an error. Links that do not resolve to any note are warnings.

use std::fmt;

/// One of the inverted indices kept by the metadata index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Tag,
    Link,
    Backlink,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Tag => write!(f, "tag index"),
            IndexKind::Link => write!(f, "link index"),
            IndexKind::Backlink => write!(f, "backlink index"),
        }
    }
}

/// A consistency issue found during checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A key maps to an empty set instead of being removed.
    EmptyBucket { index: IndexKind, key: String },

    /// A note id appears in an index without a live metadata record.
    OrphanId {
        index: IndexKind,
        key: String,
        id: String,
    },

    /// A backlink slot is keyed by a note that no longer exists.
    StaleKey { index: IndexKind, key: String },

    /// A live note's contribution is absent from an index.
    MissingEntry {
        index: IndexKind,
        key: String,
        id: String,
    },

    /// An index lists a live note under a key the note does not contribute.
    UnexpectedEntry {
        index: IndexKind,
        key: String,
        id: String,
    },

    /// A note links to a title that matches no note.
    UnresolvedLink { id: String, target: String },
}

impl ValidationIssue {
    /// Returns the severity of this issue.
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::EmptyBucket { .. } => Severity::Error,
            ValidationIssue::OrphanId { .. } => Severity::Error,
            ValidationIssue::StaleKey { .. } => Severity::Error,
            ValidationIssue::MissingEntry { .. } => Severity::Error,
            ValidationIssue::UnexpectedEntry { .. } => Severity::Error,
            ValidationIssue::UnresolvedLink { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyBucket { index, key } => {
                write!(f, "{}: key '{}' maps to an empty set", index, key)
            }
            ValidationIssue::OrphanId { index, key, id } => {
                write!(f, "{}: key '{}' lists unknown note '{}'", index, key, id)
            }
            ValidationIssue::StaleKey { index, key } => {
                write!(f, "{}: key '{}' is not a live note", index, key)
            }
            ValidationIssue::MissingEntry { index, key, id } => {
                write!(f, "{}: key '{}' is missing note '{}'", index, key, id)
            }
            ValidationIssue::UnexpectedEntry { index, key, id } => {
                write!(f, "{}: key '{}' wrongly lists note '{}'", index, key, id)
            }
            ValidationIssue::UnresolvedLink { id, target } => {
                write!(f, "{}: link to '{}' does not resolve", id, target)
            }
        }
    }
}

/// Severity level of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational message.
    Warning,
    /// The index is inconsistent.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Summary of validation results.
#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationSummary {
    /// Creates a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the summary.
    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Returns the total number of issues.
    pub fn total(&self) -> usize {
        self.issues.len()
    }

    /// Returns the number of errors.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
            .count()
    }

    /// Returns true if any issue is an error.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns issues sorted with errors first.
    pub fn issues_by_severity(&self) -> Vec<&ValidationIssue> {
        let mut sorted: Vec<_> = self.issues.iter().collect();
        sorted.sort_by(|a, b| b.severity().cmp(&a.severity()));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unresolved_link_is_a_warning() {
        let issue = ValidationIssue::UnresolvedLink {
            id: "a".into(),
            target: "Nowhere".into(),
        };
        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(issue.to_string(), "a: link to 'Nowhere' does not resolve");
    }

    #[test]
    fn summary_counts_by_severity() {
        let mut summary = ValidationSummary::new();
        summary.add(ValidationIssue::UnresolvedLink {
            id: "a".into(),
            target: "x".into(),
        });
        summary.add(ValidationIssue::EmptyBucket {
            index: IndexKind::Tag,
            key: "draft".into(),
        });

        assert_eq!(summary.total(), 2);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.warning_count(), 1);
        assert!(summary.has_errors());
        assert!(!summary.is_ok());
        assert_eq!(summary.issues_by_severity()[0].severity(), Severity::Error);
    }

    #[test]
    fn orphan_display_names_index_and_id() {
        let issue = ValidationIssue::OrphanId {
            index: IndexKind::Backlink,
            key: "b".into(),
            id: "ghost".into(),
        };
        assert_eq!(
            issue.to_string(),
            "backlink index: key 'b' lists unknown note 'ghost'"
        );
    }
}
